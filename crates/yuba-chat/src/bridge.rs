use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("host callback rejected: {0}")]
    Rejected(String),
    #[error("host callback unavailable: {0}")]
    Unavailable(String),
}

/// Capability supplied by the embedding host.
///
/// The backend names an `action` it cannot perform itself; the host performs
/// it with `payload` and hands back a result that is sent on for formatting.
/// Validating the payload is the host's job.
#[async_trait(?Send)]
pub trait HostBridge {
    async fn invoke(&self, action: &str, payload: Value) -> Result<Value, BridgeError>;
}

/// Adapts an async closure into a [`HostBridge`]
pub struct FnBridge<F> {
    f: F,
}

impl<F> FnBridge<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait(?Send)]
impl<F, Fut> HostBridge for FnBridge<F>
where
    F: Fn(String, Value) -> Fut + 'static,
    Fut: Future<Output = Result<Value, BridgeError>> + 'static,
{
    async fn invoke(&self, action: &str, payload: Value) -> Result<Value, BridgeError> {
        (self.f)(action.to_string(), payload).await
    }
}
