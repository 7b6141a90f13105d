use async_trait::async_trait;
use serde_json::Value;
use yuba_api::{decode_body, normalize_origin, TransportError};
use yuba_chat::{BridgeError, HostBridge};

/// Host bridge that performs each action as `GET {host_api}/{action}`.
///
/// Scalar fields of an object payload become query parameters; nested values
/// are not forwarded. The response body (JSON or text) is the result.
pub struct HttpHostBridge {
    base_url: String,
    client: reqwest::Client,
}

impl HttpHostBridge {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            base_url: normalize_origin(base_url)?,
            client: reqwest::Client::new(),
        })
    }
}

/// Query parameters for a payload
pub fn query_pairs(payload: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = payload else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), value))
        })
        .collect()
}

#[async_trait(?Send)]
impl HostBridge for HttpHostBridge {
    async fn invoke(&self, action: &str, payload: Value) -> Result<Value, BridgeError> {
        let action = action.trim().trim_matches('/');
        if action.is_empty() {
            return Err(BridgeError::Unavailable("callback named no action".to_string()));
        }

        let url = format!("{}/{}", self.base_url, action);
        let query = query_pairs(&payload);
        log::debug!("Host action GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| BridgeError::Rejected(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BridgeError::Rejected(e.to_string()))?;

        if !status.is_success() {
            return Err(BridgeError::Rejected(format!("{} returned {}: {}", url, status, text)));
        }

        Ok(decode_body(&text))
    }
}
