//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 strings so that `ORDER BY created_at`
//! is chronological. Dates are `YYYY-MM-DD`. UUIDs are hyphenated lowercase.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use medis_core::{
  classify::BpColor,
  record::{Employee, Record, RecordedFitness, VitalSigns},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn decode_color(s: &str) -> Result<BpColor> {
  BpColor::from_str(s).map_err(|_| Error::UnknownColor(s.to_owned()))
}

fn decode_u32(column: &str, v: i64) -> Result<u32> {
  u32::try_from(v).map_err(|_| Error::OutOfRange(format!("{column} = {v}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` that feeds [`RawRecord::from_row`].
pub const RECORD_COLUMNS: &str = "
  record_id, name, badge_number, age, job_title, supervisor, department,
  systolic, diastolic, pulse, spo2, temperature,
  date, time_of_entry, color, fitness, note, created_at, updated_at";

/// Raw values read directly from a `records` row.
pub struct RawRecord {
  pub record_id:     String,
  pub name:          String,
  pub badge_number:  String,
  pub age:           i64,
  pub job_title:     String,
  pub supervisor:    String,
  pub department:    String,
  pub systolic:      i64,
  pub diastolic:     i64,
  pub pulse:         i64,
  pub spo2:          f64,
  pub temperature:   f64,
  pub date:          String,
  pub time_of_entry: String,
  pub color:         String,
  pub fitness:       String,
  pub note:          Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawRecord {
  /// Read a row selected with [`RECORD_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:     row.get(0)?,
      name:          row.get(1)?,
      badge_number:  row.get(2)?,
      age:           row.get(3)?,
      job_title:     row.get(4)?,
      supervisor:    row.get(5)?,
      department:    row.get(6)?,
      systolic:      row.get(7)?,
      diastolic:     row.get(8)?,
      pulse:         row.get(9)?,
      spo2:          row.get(10)?,
      temperature:   row.get(11)?,
      date:          row.get(12)?,
      time_of_entry: row.get(13)?,
      color:         row.get(14)?,
      fitness:       row.get(15)?,
      note:          row.get(16)?,
      created_at:    row.get(17)?,
      updated_at:    row.get(18)?,
    })
  }

  /// Decode into a [`Record`]. The stored verdict is taken verbatim; an
  /// unrecognised label becomes [`RecordedFitness::Unrecognised`].
  pub fn into_record(self) -> Result<Record> {
    Ok(Record {
      record_id:     decode_uuid(&self.record_id)?,
      employee:      Employee {
        name:         self.name,
        badge_number: self.badge_number,
        age:          decode_u32("age", self.age)?,
        job_title:    self.job_title,
        supervisor:   self.supervisor,
        department:   self.department,
      },
      vitals:        VitalSigns {
        systolic:    decode_u32("systolic", self.systolic)?,
        diastolic:   decode_u32("diastolic", self.diastolic)?,
        pulse:       decode_u32("pulse", self.pulse)?,
        spo2:        self.spo2,
        temperature: self.temperature,
      },
      date:          decode_date(&self.date)?,
      time_of_entry: self.time_of_entry,
      color:         decode_color(&self.color)?,
      fitness:       RecordedFitness::from_label(&self.fitness),
      note:          self.note,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let a = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let b = a + chrono::Duration::microseconds(1500);
    assert_eq!(encode_dt(a), "2024-05-01T08:00:00.000000Z");
    assert_eq!(encode_dt(a).len(), encode_dt(b).len());
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn date_round_trips_in_canonical_form() {
    let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    assert_eq!(encode_date(d), "2024-05-01");
    assert_eq!(decode_date("2024-05-01").unwrap(), d);
    assert!(decode_date("01/05/2024").is_err());
  }

  #[test]
  fn unknown_color_is_an_error() {
    assert_eq!(decode_color("orange").unwrap(), BpColor::Orange);
    assert!(matches!(decode_color("purple"), Err(Error::UnknownColor(c)) if c == "purple"));
  }

  #[test]
  fn negative_integers_are_rejected() {
    assert!(matches!(decode_u32("age", -1), Err(Error::OutOfRange(_))));
    assert_eq!(decode_u32("age", 42).unwrap(), 42);
  }
}
