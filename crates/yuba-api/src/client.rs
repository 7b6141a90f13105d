use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::requests::{ChatRequest, FormatRequest};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid backend origin: {0}")]
    InvalidOrigin(String),
}

/// Client for the two backend endpoints.
///
/// Futures are not required to be `Send`: the widget runs on a single
/// cooperative thread (the browser event loop, or a current-thread runtime).
#[async_trait(?Send)]
pub trait BackendClient {
    /// `POST {origin}/chat`
    async fn chat(&self, request: &ChatRequest) -> Result<Value, TransportError>;

    /// `POST {origin}/format`
    async fn format(&self, request: &FormatRequest) -> Result<Value, TransportError>;
}

/// Decode a response body. JSON is parsed; anything else is kept as a string.
pub fn decode_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
