use tracing::{info, warn};

use crate::client::{FeedClient, HttpTransport};
use crate::clova::{Request, RequestMessage, ResponseMessage, SpeechBuilder};
use crate::error::{FailureKind, HotentryError};
use crate::feed::Entry;

pub const MAX_SPOKEN_ENTRIES: usize = 3;

pub const LAUNCH_PROMPT: &str = "Reading popular entries. Please tell me a category.";
pub const RETRY_PROMPT: &str = "Sorry, I didn't catch that. Please say it again.";

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("unknown request type: {0}")]
    UnknownRequestType(&'static str),
    #[error("request is for application {actual:?}, expected {expected:?}")]
    ApplicationMismatch {
        expected: String,
        actual: Option<String>,
    },
}

/// What a single slot value produced.
#[derive(Debug, PartialEq)]
pub enum Lookup {
    Found(Vec<Entry>),
    Empty,
    Failed(FailureKind),
}

/// Answers CEK requests by reading out hot entries.
pub struct Assistant<T> {
    client: FeedClient<T>,
    extension_id: Option<String>,
}

impl<T: HttpTransport> Assistant<T> {
    pub fn new(client: FeedClient<T>) -> Self {
        Self {
            client,
            extension_id: None,
        }
    }

    /// Rejects requests addressed to any other extension.
    pub fn with_extension_id(mut self, extension_id: Option<String>) -> Self {
        self.extension_id = extension_id;
        self
    }

    pub async fn respond(
        &self,
        message: &RequestMessage,
    ) -> Result<ResponseMessage, AssistantError> {
        if let Some(expected) = &self.extension_id {
            let actual = message.application_id();
            if actual != Some(expected.as_str()) {
                return Err(AssistantError::ApplicationMismatch {
                    expected: expected.clone(),
                    actual: actual.map(ToString::to_string),
                });
            }
        }

        match &message.request {
            Request::LaunchRequest => Ok(SpeechBuilder::new().add_text(LAUNCH_PROMPT).build()),
            Request::IntentRequest { intent } => {
                for value in intent.slot_values() {
                    if let Lookup::Found(entries) = self.lookup(value).await {
                        return Ok(render_entries(value, &entries));
                    }
                }
                info!(intent = %intent.name, "No slot yielded entries, asking again");
                Ok(SpeechBuilder::new().add_text(RETRY_PROMPT).build())
            }
            other => {
                warn!(request_type = other.type_name(), "Unsupported request");
                Err(AssistantError::UnknownRequestType(other.type_name()))
            }
        }
    }

    /// Fetches one slot value and logs which way it went.
    pub async fn lookup(&self, value: &str) -> Lookup {
        match self.client.fetch(value).await {
            Ok(entries) if entries.is_empty() => {
                info!(category = value, "Feed has no entries");
                Lookup::Empty
            }
            Ok(entries) => Lookup::Found(entries),
            Err(err) => {
                log_failure(value, &err);
                Lookup::Failed(err.kind())
            }
        }
    }
}

fn log_failure(value: &str, err: &HotentryError) {
    match err.kind() {
        FailureKind::CategoryNotFound => info!(slot = value, "Slot is not a category"),
        FailureKind::FetchFailed => warn!(category = value, error = %err, "Feed fetch failed"),
        FailureKind::ParseFailed => warn!(category = value, error = %err, "Feed parse failed"),
    }
}

pub fn render_entries(category: &str, entries: &[Entry]) -> ResponseMessage {
    let heading = format!("{category} popular entries.");
    let mut speech = SpeechBuilder::new().add_text(heading);
    for entry in entries.iter().take(MAX_SPOKEN_ENTRIES) {
        let line = format!("{}. {} bookmarks.", entry.title, entry.bookmark_count);
        speech = speech.add_text(line);
    }
    speech.build()
}
