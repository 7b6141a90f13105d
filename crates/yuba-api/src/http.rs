use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::client::{decode_body, BackendClient, TransportError};
use crate::config::BackendConfig;
use crate::requests::{ChatRequest, FormatRequest};

/// reqwest-backed transport.
///
/// The client keeps a cookie store, so session cookies issued by the backend
/// travel with every later request. No timeout is configured.
pub struct HttpBackend {
    config: BackendConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn post<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<Value, TransportError> {
        let url = self.config.endpoint(endpoint);

        if log::log_enabled!(log::Level::Debug) {
            let json = serde_json::to_string(body).unwrap_or_default();
            log::debug!("POST {} {}", url, json);
        }

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            log::warn!("{} responded with {}: {}", url, status, text);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(decode_body(&text))
    }
}

#[async_trait(?Send)]
impl BackendClient for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<Value, TransportError> {
        self.post("chat", request).await
    }

    async fn format(&self, request: &FormatRequest) -> Result<Value, TransportError> {
        self.post("format", request).await
    }
}
