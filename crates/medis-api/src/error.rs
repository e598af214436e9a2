//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use medis_core::submission::ValidationError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The submission was well-formed but cannot be saved as it stands.
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("rendering failed: {0}")]
  Render(#[from] medis_export::Error),
}

impl ApiError {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl From<medis_core::Error> for ApiError {
  fn from(e: medis_core::Error) -> Self {
    match e {
      medis_core::Error::Validation(v) => Self::Validation(v),
      other => Self::BadRequest(other.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Validation(ValidationError::MissingFields(missing)) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "error": self.to_string(), "missing": missing }),
      ),
      ApiError::Validation(v) => (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": v.to_string() })),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
      ApiError::Render(e) => {
        tracing::error!(error = %e, "report rendering failed");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": self.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
