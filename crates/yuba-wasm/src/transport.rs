use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde_json::Value;
use web_sys::RequestCredentials;
use yuba_api::{decode_body, BackendClient, BackendConfig, ChatRequest, FormatRequest, TransportError};

/// `fetch`-based transport; cookies go along with every request
pub struct FetchBackend {
    config: BackendConfig,
}

impl FetchBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    async fn post(&self, endpoint: &str, body: &impl serde::Serialize) -> Result<Value, TransportError> {
        let url = self.config.endpoint(endpoint);
        log::debug!("POST {}", url);

        let response = Request::post(&url)
            .credentials(RequestCredentials::Include)
            .json(body)
            .map_err(|e| TransportError::Network(format!("Failed to serialize: {}", e)))?
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        read_body(&url, response).await
    }
}

async fn read_body(url: &str, response: Response) -> Result<Value, TransportError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    if !response.ok() {
        log::error!("Server responded with {}: {}", status, text);
        return Err(TransportError::Status { status, body: text });
    }

    log::debug!("Response from {}: {}", url, text);
    Ok(decode_body(&text))
}

#[async_trait(?Send)]
impl BackendClient for FetchBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<Value, TransportError> {
        self.post("chat", request).await
    }

    async fn format(&self, request: &FormatRequest) -> Result<Value, TransportError> {
        self.post("format", request).await
    }
}
