use serde::{Deserialize, Serialize};
use serde_json::Value;
use yuba_types::ConfigReference;

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub config_url: ConfigReference,
}

/// Body of `POST /format`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatRequest {
    /// Whatever the host callback returned
    pub raw_data: Value,
    /// The user message that triggered the callback
    pub org_msg: String,
}
