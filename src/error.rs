use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("no response within {0:?}")]
    TimedOut(Duration),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("feed payload is empty")]
    EmptyPayload,
    #[error("feed payload is not utf-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("xml feed parse error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("feed has no channel element")]
    MissingChannel,
    #[error("invalid bookmark count: {0:?}")]
    InvalidBookmarkCount(String),
    #[error("invalid date: {0:?}")]
    InvalidDate(String),
}

#[derive(Debug, thiserror::Error)]
pub enum HotentryError {
    #[error("category not found: {0:?}")]
    CategoryNotFound(String),
    #[error("fetch failed: {0}")]
    FetchFailed(#[source] TransportError),
    #[error("parse failed: {0}")]
    ParseFailed(#[source] ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    CategoryNotFound,
    FetchFailed,
    ParseFailed,
}

impl HotentryError {
    pub fn kind(&self) -> FailureKind {
        match self {
            HotentryError::CategoryNotFound(_) => FailureKind::CategoryNotFound,
            HotentryError::FetchFailed(_) => FailureKind::FetchFailed,
            HotentryError::ParseFailed(_) => FailureKind::ParseFailed,
        }
    }
}

impl From<TransportError> for HotentryError {
    fn from(err: TransportError) -> Self {
        HotentryError::FetchFailed(err)
    }
}

impl From<ParseError> for HotentryError {
    fn from(err: ParseError) -> Self {
        HotentryError::ParseFailed(err)
    }
}
