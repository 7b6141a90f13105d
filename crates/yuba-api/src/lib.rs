//! # yuba-api
//!
//! Transport between the chat widget and its backend. The backend exposes two
//! endpoints, both called with `POST` and credentials included:
//!
//! - `{origin}/chat` takes `{message, config_url}` and answers with a callback
//!   instruction, a `{response}` object, a raw string, or arbitrary JSON
//! - `{origin}/format` takes `{raw_data, org_msg}` and answers with
//!   `{response}` or arbitrary JSON
//!
//! The [`BackendClient`] trait is implemented here by [`HttpBackend`]
//! (reqwest, native targets) and by the browser front-end on top of `fetch`.

pub mod client;
pub mod config;
pub mod requests;

#[cfg(feature = "http")]
pub mod http;

pub use client::{decode_body, BackendClient, TransportError};
pub use config::{normalize_origin, BackendConfig};
pub use requests::{ChatRequest, FormatRequest};

#[cfg(feature = "http")]
pub use http::HttpBackend;
