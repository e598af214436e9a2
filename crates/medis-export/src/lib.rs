//! Report documents for Medis.
//!
//! Bundles a filtered record set with its statistics and renders it as CSV
//! or as a plain-text table. Pure synchronous; no HTTP or database
//! dependencies.

mod columns;
mod csv;
pub mod error;
mod text;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use medis_core::{
  record::Record,
  report::ReportFilter,
  stats::{Statistics, aggregate},
};

pub use columns::{HEADERS, cells, fills};
pub use error::{Error, Result};

// ─── Formats ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
  #[default]
  Text,
  Csv,
}

impl ExportFormat {
  pub fn extension(self) -> &'static str {
    match self {
      Self::Text => "txt",
      Self::Csv => "csv",
    }
  }

  pub fn content_type(self) -> &'static str {
    match self {
      Self::Text => "text/plain; charset=utf-8",
      Self::Csv => "text/csv; charset=utf-8",
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// A filtered record set ready for printing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
  pub title:      String,
  pub printed_on: NaiveDate,
  pub filter:     ReportFilter,
  pub records:    Vec<Record>,
  pub stats:      Statistics,
}

impl Report {
  /// Select the records `filter` covers, preserving their order, and
  /// aggregate them.
  pub fn build(filter: ReportFilter, records: &[Record], printed_on: NaiveDate) -> Self {
    let records: Vec<Record> = filter.apply(records).into_iter().cloned().collect();
    let stats = aggregate(&records);
    Self {
      title: filter.title(),
      printed_on,
      filter,
      records,
      stats,
    }
  }

  /// Download file name, e.g. `report-daily-2024-05-01.csv`.
  pub fn file_name(&self, format: ExportFormat) -> String {
    format!("{}.{}", self.filter.file_stem(self.printed_on), format.extension())
  }

  pub fn render(&self, format: ExportFormat) -> Result<String> {
    match format {
      ExportFormat::Csv => csv::render(self),
      ExportFormat::Text => text::render(self),
    }
  }
}
