use yuba_types::DEFAULT_BACKEND;

/// Backend origin, fixed when the widget is built (`YUBA_BACKEND=... wasm-pack build`)
pub fn backend_origin() -> &'static str {
    option_env!("YUBA_BACKEND").unwrap_or(DEFAULT_BACKEND)
}

/// Escape HTML to prevent XSS
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
