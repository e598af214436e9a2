//! HTTP server assembly for Medis.
//!
//! Mounts the JSON API under `/api`, adds a banner at `/` and wraps
//! everything in a request trace layer.

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, routing::get};
use medis_core::store::RecordStore;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STORE_PATH: &str = "~/.local/share/medis/records.db";

/// Runtime server configuration, deserialised from `config.toml` and
/// `MEDIS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ──────────────────────────────────────────────────────────────────

async fn banner() -> Json<Value> {
  Json(json!({ "message": "Health Record API is running!" }))
}

/// Build the complete application router for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/", get(banner))
    .nest("/api", medis_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
