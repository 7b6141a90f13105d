//! Interpretation of backend reply bodies

use serde_json::Value;

/// Backend-issued instruction for the host page
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackRequest {
    pub action: String,
    pub payload: Value,
}

impl CallbackRequest {
    fn from_value(callback: &Value) -> Self {
        let action = match callback.get("action") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let payload = callback.get("payload").cloned().unwrap_or(Value::Null);
        Self { action, payload }
    }
}

/// Shape of a `/chat` reply, checked in priority order
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    /// The backend wants the host to perform `action` with `payload`
    Callback(CallbackRequest),
    /// Object carrying a `response` field; the value is kept verbatim
    Response(Value),
    /// Raw string body, already trimmed
    Text(String),
    /// Anything else, shown as pretty-printed JSON
    Other(Value),
    /// A `null` body, which cannot be interpreted at all
    Malformed,
}

impl ChatReply {
    pub fn classify(body: Value) -> Self {
        match body {
            Value::Null => ChatReply::Malformed,
            Value::Object(mut map) => {
                if let Some(callback) = map.get("callback").filter(|v| is_truthy(v)) {
                    return ChatReply::Callback(CallbackRequest::from_value(callback));
                }
                match map.remove("response") {
                    Some(response) => ChatReply::Response(response),
                    None => ChatReply::Other(Value::Object(map)),
                }
            }
            Value::String(s) => ChatReply::Text(s.trim().to_string()),
            other => ChatReply::Other(other),
        }
    }

    /// Bot text for the non-callback shapes. `None` for `Callback` and `Malformed`.
    pub fn into_bot_text(self) -> Option<Value> {
        match self {
            ChatReply::Response(value) => Some(value),
            ChatReply::Text(text) => Some(Value::String(text)),
            ChatReply::Other(value) => Some(Value::String(pretty(&value))),
            ChatReply::Callback(_) | ChatReply::Malformed => None,
        }
    }
}

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text to show for a `/format` reply: its `response` field when truthy,
/// otherwise the whole body, stringified unless it already is a string.
///
/// A `null` body has nothing to show and yields `None`.
pub fn formatted_text(body: Value) -> Option<String> {
    let formatted = match body {
        Value::Null => return None,
        Value::Object(mut map) => match map.remove("response") {
            Some(response) if is_truthy(&response) => response,
            Some(response) => {
                map.insert("response".to_string(), response);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    };

    Some(match formatted {
        Value::String(s) => s,
        other => pretty(&other),
    })
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
