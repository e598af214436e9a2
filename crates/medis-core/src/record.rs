//! Record types: one health check of one employee.
//!
//! The derived fields (`color`, `fitness`) are computed once when a
//! [`NewRecord`] is built and travel with it into the store. They are never
//! recomputed on read; editing a record means replacing it with a freshly
//! classified [`NewRecord`].

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  classify::{BpCategory, BpColor, Classification, Fitness, classify},
  submission::ValidationError,
};

// ─── Measurements ────────────────────────────────────────────────────────────

/// The five measurements taken at a health check, validated and classified
/// as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
  /// mmHg.
  pub systolic:    u32,
  /// mmHg.
  pub diastolic:   u32,
  /// Beats per minute.
  pub pulse:       u32,
  /// Oxygen saturation, percent.
  pub spo2:        f64,
  /// Body temperature, °C.
  pub temperature: f64,
}

impl VitalSigns {
  pub fn classify(&self) -> Classification { classify(self) }
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// Who was checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub name:         String,
  pub badge_number: String,
  pub age:          u32,
  pub job_title:    String,
  pub supervisor:   String,
  pub department:   String,
}

// ─── Stored verdict ──────────────────────────────────────────────────────────

/// The fitness verdict as it was persisted.
///
/// Rows written outside this crate may carry a label that is not one of the
/// three tiers; those are kept verbatim so reports can flag them instead of
/// failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordedFitness {
  Tier(Fitness),
  Unrecognised(String),
}

impl RecordedFitness {
  /// Parse a stored label; never fails.
  pub fn from_label(label: &str) -> Self {
    Fitness::from_str(label)
      .map(Self::Tier)
      .unwrap_or_else(|_| Self::Unrecognised(label.to_owned()))
  }

  pub fn tier(&self) -> Option<Fitness> {
    match self {
      Self::Tier(f) => Some(*f),
      Self::Unrecognised(_) => None,
    }
  }

  pub fn label(&self) -> &str {
    match self {
      Self::Tier(f) => f.label(),
      Self::Unrecognised(s) => s,
    }
  }
}

impl From<Fitness> for RecordedFitness {
  fn from(f: Fitness) -> Self { Self::Tier(f) }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A persisted health check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  /// Store-assigned identity.
  pub record_id:     Uuid,
  #[serde(flatten)]
  pub employee:      Employee,
  #[serde(flatten)]
  pub vitals:        VitalSigns,
  /// Calendar date of the check.
  pub date:          NaiveDate,
  /// Wall-clock time the record was entered; informational only.
  pub time_of_entry: String,
  pub color:         BpColor,
  pub fitness:       RecordedFitness,
  /// Present iff the verdict is FIT WITH NOTE.
  pub note:          Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl Record {
  /// The display category, recomputed from the stored pressures.
  pub fn bp_category(&self) -> BpCategory {
    let v = &self.vitals;
    BpCategory::from_pressure(f64::from(v.systolic), f64::from(v.diastolic))
  }

  /// The stored date in its canonical `YYYY-MM-DD` form, which is what the
  /// daily report compares against.
  pub fn date_key(&self) -> String { self.date.format("%Y-%m-%d").to_string() }
}

// ─── NewRecord ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::RecordStore::create_record`] and
/// [`crate::store::RecordStore::update_record`].
///
/// Always fully classified: the only constructor derives the classification
/// from the vitals and enforces the note policy, and the fields are read-only
/// afterwards. Identity and timestamps are set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
  employee:       Employee,
  vitals:         VitalSigns,
  date:           NaiveDate,
  time_of_entry:  String,
  classification: Classification,
  note:           Option<String>,
}

impl NewRecord {
  /// Classify `vitals` and attach the note.
  ///
  /// The note is trimmed. It is required when the verdict is FIT WITH NOTE
  /// and discarded for every other verdict.
  pub fn new(
    employee: Employee,
    vitals: VitalSigns,
    date: NaiveDate,
    time_of_entry: impl Into<String>,
    note: Option<&str>,
  ) -> Result<Self, ValidationError> {
    let classification = vitals.classify();
    let note = note.map(str::trim).filter(|n| !n.is_empty());

    let note = if classification.fitness.requires_note() {
      Some(note.ok_or(ValidationError::NoteRequired)?.to_owned())
    } else {
      None
    };

    Ok(Self {
      employee,
      vitals,
      date,
      time_of_entry: time_of_entry.into(),
      classification,
      note,
    })
  }

  pub fn employee(&self) -> &Employee { &self.employee }

  pub fn vitals(&self) -> &VitalSigns { &self.vitals }

  pub fn date(&self) -> NaiveDate { self.date }

  pub fn time_of_entry(&self) -> &str { &self.time_of_entry }

  pub fn classification(&self) -> &Classification { &self.classification }

  pub fn color(&self) -> BpColor { self.classification.color }

  pub fn fitness(&self) -> Fitness { self.classification.fitness }

  pub fn note(&self) -> Option<&str> { self.note.as_deref() }

  /// Assemble the persisted form once the store has assigned identity and
  /// timestamps.
  pub fn into_record(
    self,
    record_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Record {
    Record {
      record_id,
      employee: self.employee,
      vitals: self.vitals,
      date: self.date,
      time_of_entry: self.time_of_entry,
      color: self.classification.color,
      fitness: self.classification.fitness.into(),
      note: self.note,
      created_at,
      updated_at,
    }
  }
}
