use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::category::FeedResolver;
use crate::error::{HotentryError, TransportError};
use crate::feed::{parse_feed, Entry, Feed};

pub const HATENA_BASE_URL: &str = "http://b.hatena.ne.jp";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Issues the single GET a fetch needs.
///
/// Implementations hand back a response that owns the underlying stream;
/// dropping it releases the connection.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    type Response: FeedResponse;

    async fn get(&self, url: &str) -> Result<Self::Response, TransportError>;
}

#[async_trait]
pub trait FeedResponse: Send {
    async fn read_body(&mut self) -> Result<Vec<u8>, TransportError>;
}

fn build_user_agent() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers
}

pub struct ReqwestResponse(Option<reqwest::Response>);

#[async_trait]
impl HttpTransport for reqwest::Client {
    type Response = ReqwestResponse;

    async fn get(&self, url: &str) -> Result<ReqwestResponse, TransportError> {
        let response = reqwest::Client::get(self, url)
            .headers(build_user_agent())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }
        Ok(ReqwestResponse(Some(response)))
    }
}

#[async_trait]
impl FeedResponse for ReqwestResponse {
    async fn read_body(&mut self) -> Result<Vec<u8>, TransportError> {
        let consumed = || std::io::Error::other("response body already consumed");
        let response = self.0.take().ok_or_else(consumed)?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Fetches hot entry feeds for spoken category labels.
pub struct FeedClient<T> {
    transport: T,
    resolver: Arc<FeedResolver>,
    base_url: String,
    timeout: Duration,
}

impl<T: HttpTransport> FeedClient<T> {
    pub fn new(transport: T, resolver: Arc<FeedResolver>) -> Self {
        Self {
            transport,
            resolver,
            base_url: HATENA_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn fetch(&self, label: &str) -> Result<Vec<Entry>, HotentryError> {
        self.fetch_within(label, self.timeout).await
    }

    /// Same as [`fetch`](Self::fetch) but bounded by the caller's deadline.
    pub async fn fetch_within(
        &self,
        label: &str,
        timeout: Duration,
    ) -> Result<Vec<Entry>, HotentryError> {
        Ok(self.fetch_feed_within(label, timeout).await?.entries)
    }

    pub async fn fetch_feed(&self, label: &str) -> Result<Feed, HotentryError> {
        self.fetch_feed_within(label, self.timeout).await
    }

    #[instrument(level = "debug", skip(self), fields(url = tracing::field::Empty))]
    pub async fn fetch_feed_within(
        &self,
        label: &str,
        timeout: Duration,
    ) -> Result<Feed, HotentryError> {
        let path = self.resolver.resolve(label)?;
        let url = format!("{}{}", self.base_url, path);
        tracing::Span::current().record("url", url.as_str());

        let body = tokio::time::timeout(timeout, self.download(&url))
            .await
            .map_err(|_| TransportError::TimedOut(timeout))??;
        debug!(bytes = body.len(), "Fetched feed");

        let feed = parse_feed(&body)?;
        debug!(entries = feed.entries.len(), "Parsed feed");
        Ok(feed)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let mut response = self.transport.get(url).await?;
        let body = response.read_body().await;
        drop(response);
        body
    }
}
