use crate::client::TransportError;

/// Where the backend lives. Fixed at deploy time, never changed by the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    origin: String,
}

impl BackendConfig {
    pub fn new(origin: &str) -> Result<Self, TransportError> {
        Ok(Self {
            origin: normalize_origin(origin)?,
        })
    }

    /// Full URL of an endpoint, e.g. `endpoint("chat")`
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.origin, name.trim_start_matches('/'))
    }
}

/// Trim whitespace and trailing slashes; only http(s) origins are accepted
pub fn normalize_origin(origin: &str) -> Result<String, TransportError> {
    let trimmed = origin.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| TransportError::InvalidOrigin(origin.to_string()))?;
    if host.is_empty() {
        return Err(TransportError::InvalidOrigin(origin.to_string()));
    }
    Ok(trimmed.to_string())
}
