//! The fixed column layout shared by every export format.

use medis_core::record::Record;

pub const HEADERS: [&str; 15] = [
  "Name",
  "Badge",
  "Age",
  "Job Title",
  "Supervisor",
  "Dept",
  "Systolic",
  "Diastolic",
  "Pulse",
  "SpO2",
  "Temp",
  "Date",
  "BP Status",
  "Fitness",
  "Note",
];

/// One record rendered as display cells, in [`HEADERS`] order.
pub fn cells(record: &Record) -> [String; 15] {
  let e = &record.employee;
  let v = &record.vitals;
  [
    e.name.clone(),
    e.badge_number.clone(),
    e.age.to_string(),
    e.job_title.clone(),
    e.supervisor.clone(),
    e.department.clone(),
    v.systolic.to_string(),
    v.diastolic.to_string(),
    v.pulse.to_string(),
    format!("{}%", v.spo2),
    format!("{}°C", v.temperature),
    record.date_key(),
    record.bp_category().to_string(),
    record.fitness.label().to_owned(),
    record.note.clone().filter(|n| !n.is_empty()).unwrap_or_else(|| "-".to_owned()),
  ]
}

/// Highlight fill for the BP status and fitness cells. The fitness fill is
/// `None` for an unrecognised verdict.
pub fn fills(record: &Record) -> ([u8; 3], Option<[u8; 3]>) {
  (
    record.bp_category().fill_rgb(),
    record.fitness.tier().map(|f| f.fill_rgb()),
  )
}
