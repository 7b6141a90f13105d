//! Core types for the yuba chat widget
//!
//! This crate provides the data model shared by the session core, the
//! transports and both front-ends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod reply;

pub use reply::{formatted_text, is_truthy, CallbackRequest, ChatReply};

// ============================================================================
// Constants
// ============================================================================

/// Text of the transient bot entry shown while a reply is outstanding
pub const TYPING_PLACEHOLDER: &str = "Typing...";

/// Bot text appended when the `/chat` round-trip fails
pub const TRANSPORT_FAILURE_TEXT: &str =
    "⚠️ Sorry, I couldn’t process that. Please try again or rephrase your request.";

/// Bot text appended when the host callback (or the follow-up formatting) fails
pub const CALLBACK_FAILURE_TEXT: &str =
    "❌ Hmm, I couldn’t complete that request. Maybe the server is down or something went wrong.";

/// Backend origin used when nothing else is configured
pub const DEFAULT_BACKEND: &str = "http://localhost:8000";

// ============================================================================
// Message Types
// ============================================================================

/// Who authored a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    /// Prefix shown in front of the message text
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You: ",
            Sender::Bot => "Bot: ",
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One entry of the conversation history.
///
/// `text` is a JSON value rather than a string: a backend `response` field is
/// stored exactly as received, even when it is an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: Value,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "is_false")]
    pub transient: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: Value::String(text.into()),
            sender: Sender::User,
            transient: false,
        }
    }

    pub fn bot(text: impl Into<Value>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            transient: false,
        }
    }

    /// The "typing" indicator
    pub fn typing() -> Self {
        Self {
            text: Value::String(TYPING_PLACEHOLDER.to_string()),
            sender: Sender::Bot,
            transient: true,
        }
    }

    /// Render the text for display: strings verbatim, anything else as pretty JSON
    pub fn display_text(&self) -> String {
        match &self.text {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}

// ============================================================================
// Configuration Reference
// ============================================================================

/// Opaque reference telling the backend which bot profile to use.
///
/// The widget never inspects or mutates it; it is forwarded as the
/// `config_url` field of every chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigReference(Value);

impl ConfigReference {
    /// A bare URL or identifier
    pub fn url(url: impl Into<String>) -> Self {
        Self(Value::String(url.into()))
    }

    /// The `{configuration, userEmail}` shape the reference backend expects
    pub fn profile(configuration: impl Into<String>, user_email: Option<String>) -> Self {
        let mut map = serde_json::Map::new();
        map.insert("configuration".to_string(), Value::String(configuration.into()));
        if let Some(email) = user_email {
            map.insert("userEmail".to_string(), Value::String(email));
        }
        Self(Value::Object(map))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}
