//! Handler for `GET /classify`: a live preview of the verdict for a set of
//! readings. Nothing is stored, so any number is accepted, including
//! fractional or negative pressures.

use axum::{
  Json,
  extract::{Query, rejection::QueryRejection},
};
use medis_core::classify::{Classification, Readings};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
  #[serde(flatten)]
  pub classification: Classification,
  /// Vitals that graded worse than FIT.
  pub concerns:       Vec<&'static str>,
  pub note_required:  bool,
}

/// `GET /classify?systolic=..&diastolic=..&pulse=..&spo2=..&temperature=..`
pub async fn handler(
  params: Result<Query<Readings>, QueryRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
  let Query(readings) = params?;
  let classification = readings.classify();
  Ok(Json(ClassifyResponse {
    concerns: classification.grades.concerns(),
    note_required: classification.fitness.requires_note(),
    classification,
  }))
}
