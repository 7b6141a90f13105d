use async_trait::async_trait;
use js_sys::{Function, Promise, JSON};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use yuba_chat::{BridgeError, HostBridge};

/// Host callback supplied by the embedding page, called as `callback(action, payload)`.
/// A returned Promise is awaited; a throw or rejection is a bridge failure.
pub struct JsBridge {
    callback: Function,
}

impl JsBridge {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

#[async_trait(?Send)]
impl HostBridge for JsBridge {
    async fn invoke(&self, action: &str, payload: Value) -> Result<Value, BridgeError> {
        let payload = to_js(&payload)?;
        let returned = self
            .callback
            .call2(&JsValue::NULL, &JsValue::from_str(action), &payload)
            .map_err(|e| BridgeError::Rejected(describe(&e)))?;

        let settled = match returned.dyn_into::<Promise>() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .map_err(|e| BridgeError::Rejected(describe(&e)))?,
            Err(value) => value,
        };

        from_js(&settled)
    }
}

fn to_js(value: &Value) -> Result<JsValue, BridgeError> {
    let text = serde_json::to_string(value).map_err(|e| BridgeError::Rejected(e.to_string()))?;
    JSON::parse(&text).map_err(|e| BridgeError::Rejected(describe(&e)))
}

fn from_js(value: &JsValue) -> Result<Value, BridgeError> {
    if value.is_undefined() {
        return Ok(Value::Null);
    }
    let text = JSON::stringify(value).map_err(|e| BridgeError::Rejected(describe(&e)))?;
    match JsValue::from(text).as_string() {
        Some(text) => serde_json::from_str(&text).map_err(|e| BridgeError::Rejected(e.to_string())),
        // Functions and symbols have no JSON form
        None => Ok(Value::Null),
    }
}

fn describe(error: &JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{:?}", error))
}
