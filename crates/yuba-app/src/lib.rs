//! Terminal front-end for the yuba chat widget

use std::rc::Rc;

use anyhow::{Context, Result};
use yuba_api::{BackendClient, BackendConfig, HttpBackend};
use yuba_chat::{ConversationSession, HostBridge, Widget};
use yuba_types::ConfigReference;

pub mod app;
pub mod cli;
pub mod host_api;
pub mod host_bridge;

pub use cli::{Cli, Commands};
pub use host_bridge::HttpHostBridge;

/// Initialize env_logger; `RUST_LOG` wins over the `--verbose` default
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

/// Build the shell/toggle whose sessions talk to the configured backend
pub fn build_widget(cli: &Cli) -> Result<Widget> {
    let config = BackendConfig::new(&cli.backend).context("Invalid --backend")?;
    let backend: Rc<dyn BackendClient> =
        Rc::new(HttpBackend::new(config).context("Failed to create HTTP client")?);

    let bridge: Option<Rc<dyn HostBridge>> = match &cli.host_api {
        Some(url) => Some(Rc::new(HttpHostBridge::new(url).context("Invalid --host-api")?)),
        None => None,
    };

    let reference = ConfigReference::profile(cli.config_url.clone(), cli.user_email.clone());

    Ok(Widget::new(move || {
        let session = ConversationSession::new(backend.clone(), reference.clone());
        match &bridge {
            Some(bridge) => session.with_bridge(bridge.clone()),
            None => session,
        }
    }))
}
