//! Handlers for `/records` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/records` | Newest first |
//! | `POST`   | `/records` | Body: [`RecordForm`]; returns 201 + stored record |
//! | `DELETE` | `/records` | Deletes everything; returns `{"deleted": n}` |
//! | `GET`    | `/records/{id}` | 404 if not found |
//! | `PUT`    | `/records/{id}` | Body: [`RecordForm`]; full replace, reclassified |
//! | `DELETE` | `/records/{id}` | 204, or 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
  http::StatusCode,
  response::IntoResponse,
};
use medis_core::{record::Record, store::RecordStore, submission::RecordForm};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::ApiError;

/// Wall-clock time stamped on every submission.
fn time_of_entry() -> String { chrono::Local::now().format("%H:%M:%S").to_string() }

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /records`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Record>>, ApiError>
where
  S: RecordStore,
{
  let records = store.list_records().await.map_err(ApiError::store)?;
  Ok(Json(records))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /records`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<RecordForm>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let Json(form) = body?;
  let input = form.validate(time_of_entry())?;
  let record = store.create_record(input).await.map_err(ApiError::store)?;
  tracing::info!(
    record_id = %record.record_id,
    name = %record.employee.name,
    fitness = record.fitness.label(),
    "record created"
  );
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /records/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Record>, ApiError>
where
  S: RecordStore,
{
  let Path(id) = id?;
  let record = store
    .get_record(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("record {id} not found")))?;
  Ok(Json(record))
}

// ─── Replace ─────────────────────────────────────────────────────────────────

/// `PUT /records/{id}`
pub async fn replace<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<RecordForm>, JsonRejection>,
) -> Result<Json<Record>, ApiError>
where
  S: RecordStore,
{
  let Path(id) = id?;
  let Json(form) = body?;
  let input = form.validate(time_of_entry())?;
  let record = store
    .update_record(id, input)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("record {id} not found")))?;
  tracing::info!(
    record_id = %record.record_id,
    fitness = record.fitness.label(),
    "record updated"
  );
  Ok(Json(record))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /records/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  let Path(id) = id?;
  if !store.delete_record(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("record {id} not found")));
  }
  tracing::info!(record_id = %id, "record deleted");
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /records`
pub async fn delete_all<S>(State(store): State<Arc<S>>) -> Result<Json<Value>, ApiError>
where
  S: RecordStore,
{
  let deleted = store.delete_all_records().await.map_err(ApiError::store)?;
  tracing::info!(deleted, "all records deleted");
  Ok(Json(json!({ "deleted": deleted })))
}
