//! JSON REST API for Medis.
//!
//! Exposes an axum [`Router`] backed by any [`medis_core::store::RecordStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", medis_api::api_router(store.clone()))
//! ```

pub mod classify;
pub mod error;
pub mod records;
pub mod report;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use medis_core::store::RecordStore;
use serde_json::{Value, json};

pub use error::ApiError;

/// `GET /health`
async fn health() -> Json<Value> {
  Json(json!({ "status": "OK", "message": "Server is running" }))
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Records
    .route(
      "/records",
      get(records::list::<S>)
        .post(records::create::<S>)
        .delete(records::delete_all::<S>),
    )
    .route(
      "/records/{id}",
      get(records::get_one::<S>)
        .put(records::replace::<S>)
        .delete(records::delete_one::<S>),
    )
    // Classification preview
    .route("/classify", get(classify::handler))
    // Reports
    .route("/report", get(report::show::<S>))
    .route("/report/export", get(report::export::<S>))
    .route("/health", get(health))
    .with_state(store)
}
