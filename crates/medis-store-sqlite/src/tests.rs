//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use medis_core::{
  classify::{BpColor, Fitness},
  record::{Employee, NewRecord, RecordedFitness, VitalSigns},
  stats::aggregate,
  store::RecordStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn employee(name: &str) -> Employee {
  Employee {
    name:         name.into(),
    badge_number: "BN-042".into(),
    age:          41,
    job_title:    "Dump Truck Operator".into(),
    supervisor:   "Budi".into(),
    department:   "Hauling".into(),
  }
}

fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

fn fit_vitals() -> VitalSigns {
  VitalSigns { systolic: 110, diastolic: 70, pulse: 80, spo2: 98.0, temperature: 36.8 }
}

fn fit_record(name: &str, day: &str) -> NewRecord {
  NewRecord::new(employee(name), fit_vitals(), date(day), "07:30:00", None).unwrap()
}

// ─── Create / read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_record() {
  let s = store().await;

  let created = s.create_record(fit_record("Andi", "2024-05-01")).await.unwrap();
  assert_eq!(created.fitness, RecordedFitness::Tier(Fitness::Fit));
  assert_eq!(created.color, BpColor::Green);
  assert_eq!(created.created_at, created.updated_at);

  let fetched = s.get_record(created.record_id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.date_key(), "2024-05-01");
}

#[tokio::test]
async fn get_record_missing_returns_none() {
  let s = store().await;
  assert!(s.get_record(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn classification_is_stored_with_the_record() {
  let s = store().await;

  let vitals = VitalSigns { systolic: 135, ..fit_vitals() };
  let input = NewRecord::new(
    employee("Citra"),
    vitals,
    date("2024-05-02"),
    "09:15:00",
    Some("  recheck in a week "),
  )
  .unwrap();

  let created = s.create_record(input).await.unwrap();
  let fetched = s.get_record(created.record_id).await.unwrap().unwrap();
  assert_eq!(fetched.fitness, RecordedFitness::Tier(Fitness::FitWithNote));
  assert_eq!(fetched.color, BpColor::Yellow);
  assert_eq!(fetched.note.as_deref(), Some("recheck in a week"));
  assert_eq!(fetched.vitals, vitals);
}

#[tokio::test]
async fn list_is_newest_first() {
  let s = store().await;
  let a = s.create_record(fit_record("a", "2024-05-01")).await.unwrap();
  let b = s.create_record(fit_record("b", "2024-04-01")).await.unwrap();
  let c = s.create_record(fit_record("c", "2024-06-01")).await.unwrap();

  let ids: Vec<Uuid> = s
    .list_records()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.record_id)
    .collect();
  assert_eq!(ids, vec![c.record_id, b.record_id, a.record_id]);
}

#[tokio::test]
async fn list_empty_store() {
  let s = store().await;
  assert!(s.list_records().await.unwrap().is_empty());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_and_reclassifies() {
  let s = store().await;
  let created = s.create_record(fit_record("Dewi", "2024-05-01")).await.unwrap();

  let unfit = VitalSigns { temperature: 38.4, ..fit_vitals() };
  let replacement =
    NewRecord::new(employee("Dewi"), unfit, date("2024-05-03"), "10:00:00", None).unwrap();

  let updated = s
    .update_record(created.record_id, replacement)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.record_id, created.record_id);
  assert_eq!(updated.created_at, created.created_at);
  assert!(updated.updated_at >= created.updated_at);
  assert_eq!(updated.fitness, RecordedFitness::Tier(Fitness::Unfit));

  let fetched = s.get_record(created.record_id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
  assert_eq!(fetched.date_key(), "2024-05-03");
  assert_eq!(s.list_records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_clears_note_when_no_longer_required() {
  let s = store().await;
  let noted = NewRecord::new(
    employee("Eko"),
    VitalSigns { pulse: 105, ..fit_vitals() },
    date("2024-05-01"),
    "08:00:00",
    Some("ran to the clinic"),
  )
  .unwrap();
  let created = s.create_record(noted).await.unwrap();
  assert!(created.note.is_some());

  let updated = s
    .update_record(created.record_id, fit_record("Eko", "2024-05-01"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.note, None);
  let fetched = s.get_record(created.record_id).await.unwrap().unwrap();
  assert_eq!(fetched.note, None);
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;
  let result = s
    .update_record(Uuid::new_v4(), fit_record("x", "2024-05-01"))
    .await
    .unwrap();
  assert!(result.is_none());
  assert!(s.list_records().await.unwrap().is_empty());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_one_record() {
  let s = store().await;
  let a = s.create_record(fit_record("a", "2024-05-01")).await.unwrap();
  let b = s.create_record(fit_record("b", "2024-05-01")).await.unwrap();

  assert!(s.delete_record(a.record_id).await.unwrap());
  assert!(!s.delete_record(a.record_id).await.unwrap());

  let remaining = s.list_records().await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].record_id, b.record_id);
}

#[tokio::test]
async fn delete_all_reports_count() {
  let s = store().await;
  for name in ["a", "b", "c"] {
    s.create_record(fit_record(name, "2024-05-01")).await.unwrap();
  }

  assert_eq!(s.delete_all_records().await.unwrap(), 3);
  assert!(s.list_records().await.unwrap().is_empty());
  assert_eq!(s.delete_all_records().await.unwrap(), 0);
}

// ─── Stored verdicts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn legacy_unfit_label_is_read_as_unfit() {
  let s = store().await;
  let created = s.create_record(fit_record("a", "2024-05-01")).await.unwrap();
  s.overwrite_fitness_label(created.record_id, "UNFIT").await.unwrap();

  let fetched = s.get_record(created.record_id).await.unwrap().unwrap();
  assert_eq!(fetched.fitness, RecordedFitness::Tier(Fitness::Unfit));
}

#[tokio::test]
async fn unknown_label_survives_and_is_flagged() {
  let s = store().await;
  let odd = s.create_record(fit_record("a", "2024-05-01")).await.unwrap();
  s.create_record(fit_record("b", "2024-05-01")).await.unwrap();
  s.overwrite_fitness_label(odd.record_id, "SEHAT").await.unwrap();

  let records = s.list_records().await.unwrap();
  assert_eq!(records.len(), 2);

  let stats = aggregate(&records);
  assert_eq!(stats.total, 2);
  assert_eq!(stats.fit, 1);
  assert_eq!(stats.anomalies.len(), 1);
  assert_eq!(stats.anomalies[0].record_id, odd.record_id);
  assert_eq!(stats.anomalies[0].label, "SEHAT");
}
