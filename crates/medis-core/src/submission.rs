//! The submission workflow: turning a raw health-check form into a
//! classified [`NewRecord`].
//!
//! Exactly two things can go wrong, and both are for the user to fix: a
//! required field is missing, or the verdict is FIT WITH NOTE and no note was
//! given.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

use crate::record::{Employee, NewRecord, Record, VitalSigns};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("all fields must be filled in (missing: {})", .0.join(", "))]
  MissingFields(Vec<&'static str>),

  #[error("a note is required when the verdict is FIT WITH NOTE")]
  NoteRequired,
}

/// A health-check form as entered by a user. Every field may be absent.
///
/// Text fields count as missing when blank; numeric fields count as missing
/// when absent or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordForm {
  pub name:         String,
  pub badge_number: String,
  pub age:          Option<u32>,
  pub job_title:    String,
  pub supervisor:   String,
  pub department:   String,
  pub systolic:     Option<u32>,
  pub diastolic:    Option<u32>,
  pub pulse:        Option<u32>,
  pub spo2:         Option<f64>,
  pub temperature:  Option<f64>,
  #[serde(deserialize_with = "blank_as_none")]
  pub date:         Option<NaiveDate>,
  pub note:         String,
}

/// A blank date string is an unfilled field, not a malformed one.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) => s.parse().map(Some).map_err(de::Error::custom),
  }
}

fn present_u32(v: Option<u32>) -> Option<u32> { v.filter(|n| *n != 0) }

fn present_f64(v: Option<f64>) -> Option<f64> { v.filter(|n| *n != 0.0) }

fn present_str(s: &str) -> Option<&str> {
  let t = s.trim();
  (!t.is_empty()).then_some(t)
}

impl RecordForm {
  /// Pre-fill a form from an existing record, for editing.
  pub fn from_record(record: &Record) -> Self {
    Self {
      name:         record.employee.name.clone(),
      badge_number: record.employee.badge_number.clone(),
      age:          Some(record.employee.age),
      job_title:    record.employee.job_title.clone(),
      supervisor:   record.employee.supervisor.clone(),
      department:   record.employee.department.clone(),
      systolic:     Some(record.vitals.systolic),
      diastolic:    Some(record.vitals.diastolic),
      pulse:        Some(record.vitals.pulse),
      spo2:         Some(record.vitals.spo2),
      temperature:  Some(record.vitals.temperature),
      date:         Some(record.date),
      note:         record.note.clone().unwrap_or_default(),
    }
  }

  /// The five vitals, if all of them have been entered.
  pub fn vitals(&self) -> Option<VitalSigns> {
    Some(VitalSigns {
      systolic:    present_u32(self.systolic)?,
      diastolic:   present_u32(self.diastolic)?,
      pulse:       present_u32(self.pulse)?,
      spo2:        present_f64(self.spo2)?,
      temperature: present_f64(self.temperature)?,
    })
  }

  /// Names of the required fields that are still missing, in form order.
  pub fn missing_fields(&self) -> Vec<&'static str> {
    let checks = [
      ("name", present_str(&self.name).is_some()),
      ("badge_number", present_str(&self.badge_number).is_some()),
      ("age", present_u32(self.age).is_some()),
      ("job_title", present_str(&self.job_title).is_some()),
      ("supervisor", present_str(&self.supervisor).is_some()),
      ("department", present_str(&self.department).is_some()),
      ("systolic", present_u32(self.systolic).is_some()),
      ("diastolic", present_u32(self.diastolic).is_some()),
      ("pulse", present_u32(self.pulse).is_some()),
      ("spo2", present_f64(self.spo2).is_some()),
      ("temperature", present_f64(self.temperature).is_some()),
      ("date", self.date.is_some()),
    ];
    checks
      .into_iter()
      .filter(|(_, ok)| !ok)
      .map(|(name, _)| name)
      .collect()
  }

  /// Validate the form and classify it.
  ///
  /// `time_of_entry` is the wall-clock time to stamp on the record.
  pub fn validate(
    &self,
    time_of_entry: impl Into<String>,
  ) -> Result<NewRecord, ValidationError> {
    let missing = self.missing_fields();
    if !missing.is_empty() {
      return Err(ValidationError::MissingFields(missing));
    }

    let (Some(vitals), Some(age), Some(date)) =
      (self.vitals(), present_u32(self.age), self.date)
    else {
      return Err(ValidationError::MissingFields(self.missing_fields()));
    };

    let employee = Employee {
      name: self.name.trim().to_owned(),
      badge_number: self.badge_number.trim().to_owned(),
      age,
      job_title: self.job_title.trim().to_owned(),
      supervisor: self.supervisor.trim().to_owned(),
      department: self.department.trim().to_owned(),
    };

    NewRecord::new(employee, vitals, date, time_of_entry, Some(&self.note))
  }
}
