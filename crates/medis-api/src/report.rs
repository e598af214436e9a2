//! Handlers for `/report` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/report` | `?mode=all\|daily\|weekly[&date=YYYY-MM-DD][&week=YYYY-Www]` |
//! | `GET`  | `/report/export` | Same, plus `format=csv\|text`; served as an attachment |
//!
//! A daily or weekly report without an explicit key covers the current day
//! or week in server-local time.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
  http::header,
  response::IntoResponse,
};
use chrono::NaiveDate;
use medis_core::{
  report::{ReportFilter, ReportMode},
  store::RecordStore,
};
use medis_export::{ExportFormat, Report};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
  #[serde(default)]
  pub mode:   ReportMode,
  /// Day key for daily reports, compared verbatim against stored dates.
  pub date:   Option<String>,
  /// `YYYY-Www` for weekly reports.
  pub week:   Option<String>,
  #[serde(default)]
  pub format: ExportFormat,
}

fn today() -> NaiveDate { chrono::Local::now().date_naive() }

async fn build_report<S>(store: &S, params: &ReportParams) -> Result<Report, ApiError>
where
  S: RecordStore,
{
  let today = today();
  let filter = ReportFilter::resolve(
    params.mode,
    params.date.as_deref(),
    params.week.as_deref(),
    today,
  )?;
  let records = store.list_records().await.map_err(ApiError::store)?;
  let report = Report::build(filter, &records, today);
  tracing::debug!(
    title = %report.title,
    records = report.records.len(),
    "report built"
  );
  Ok(report)
}

/// `GET /report`
pub async fn show<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<Report>, ApiError>
where
  S: RecordStore,
{
  let Query(params) = params?;
  Ok(Json(build_report(store.as_ref(), &params).await?))
}

/// `GET /report/export`
pub async fn export<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let Query(params) = params?;
  let report = build_report(store.as_ref(), &params).await?;
  let body = report.render(params.format)?;
  let disposition = format!(
    "attachment; filename=\"{}\"",
    report.file_name(params.format)
  );
  Ok((
    [
      (header::CONTENT_TYPE, params.format.content_type().to_owned()),
      (header::CONTENT_DISPOSITION, disposition),
    ],
    body,
  ))
}
