use std::net::SocketAddr;

use anyhow::Result;
use axum::routing::get;
use axum::{Json, Router};
use colored::Colorize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

/// Routes of the mock host API
pub fn create_router() -> Router {
    Router::new()
        .route("/news", get(news))
        .route("/weather", get(weather))
        // Mirrors the request origin and allows credentials, like the chat backend
        .layer(CorsLayer::very_permissive())
}

async fn news() -> Json<Value> {
    Json(json!({"headline": "AI is changing the world!"}))
}

async fn weather() -> Json<Value> {
    Json(json!({"forecast": "Rainy day with thunderstorms"}))
}

/// Small stand-in for a host site's own API, used to exercise callback actions
pub struct HostApiServer {
    bind_addr: SocketAddr,
}

impl HostApiServer {
    pub fn new(port: u16) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
        }
    }

    pub async fn start(self) -> Result<()> {
        println!("{}", format!("🌐 Host API listening on http://{}", self.bind_addr).bright_cyan());
        println!("   Actions: GET /news, GET /weather");

        let listener = tokio::net::TcpListener::bind(&self.bind_addr).await?;
        axum::serve(listener, create_router()).await?;

        Ok(())
    }
}
