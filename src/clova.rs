//! Clova Extension Kit (CEK) request and response messages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const SPEECH_LANG: &str = "en";

#[derive(Debug, Clone, Deserialize)]
pub struct RequestMessage {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub session: Option<Value>,
    #[serde(default)]
    pub context: Option<Context>,
    pub request: Request,
}

impl RequestMessage {
    pub fn application_id(&self) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|context| context.system.application.as_ref())
            .map(|application| application.application_id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Context {
    #[serde(rename = "System")]
    pub system: System,
}

#[derive(Debug, Clone, Deserialize)]
pub struct System {
    #[serde(default)]
    pub application: Option<Application>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    LaunchRequest,
    IntentRequest { intent: Intent },
    SessionEndedRequest,
    #[serde(other)]
    Unknown,
}

impl Request {
    pub fn type_name(&self) -> &'static str {
        match self {
            Request::LaunchRequest => "LaunchRequest",
            Request::IntentRequest { .. } => "IntentRequest",
            Request::SessionEndedRequest => "SessionEndedRequest",
            Request::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    /// CEK sends `null` when the utterance filled no slot.
    #[serde(default)]
    pub slots: Option<BTreeMap<String, Slot>>,
}

impl Intent {
    /// Slot values in slot-name order, skipping slots the platform left empty.
    pub fn slot_values(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .flat_map(|slots| slots.values())
            .filter_map(|slot| slot.value.as_deref())
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    pub version: String,
    pub session_attributes: Map<String, Value>,
    pub response: Response,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub output_speech: OutputSpeech,
    pub card: Map<String, Value>,
    pub directives: Vec<Value>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "values")]
pub enum OutputSpeech {
    SimpleSpeech(SpeechInfo),
    SpeechList(Vec<SpeechInfo>),
}

impl OutputSpeech {
    pub fn texts(&self) -> Vec<&str> {
        match self {
            OutputSpeech::SimpleSpeech(info) => vec![info.value.as_str()],
            OutputSpeech::SpeechList(infos) => {
                infos.iter().map(|info| info.value.as_str()).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpeechInfo {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub lang: &'static str,
    pub value: String,
}

impl SpeechInfo {
    pub fn plain_text(value: impl Into<String>) -> Self {
        Self {
            kind: "PlainText",
            lang: SPEECH_LANG,
            value: value.into(),
        }
    }
}

/// Collects speech lines; one line becomes `SimpleSpeech`, more become `SpeechList`.
#[derive(Debug, Default)]
pub struct SpeechBuilder {
    values: Vec<SpeechInfo>,
}

impl SpeechBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(mut self, text: impl Into<String>) -> Self {
        self.values.push(SpeechInfo::plain_text(text));
        self
    }

    pub fn build(mut self) -> ResponseMessage {
        let output_speech = if self.values.len() == 1 {
            OutputSpeech::SimpleSpeech(self.values.remove(0))
        } else {
            OutputSpeech::SpeechList(self.values)
        };

        ResponseMessage {
            version: "1.0".to_string(),
            session_attributes: Map::new(),
            response: Response {
                output_speech,
                card: Map::new(),
                directives: Vec::new(),
                should_end_session: true,
            },
        }
    }
}
