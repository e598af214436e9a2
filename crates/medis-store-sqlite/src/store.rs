//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use medis_core::{
  record::{NewRecord, Record},
  store::RecordStore,
};

use crate::{
  Result,
  encode::{RECORD_COLUMNS, RawRecord, decode_dt, encode_date, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Column values of a [`NewRecord`], owned so they can move onto the
/// database thread.
struct RecordParams {
  name:          String,
  badge_number:  String,
  age:           u32,
  job_title:     String,
  supervisor:    String,
  department:    String,
  systolic:      u32,
  diastolic:     u32,
  pulse:         u32,
  spo2:          f64,
  temperature:   f64,
  date:          String,
  time_of_entry: String,
  color:         &'static str,
  fitness:       &'static str,
  note:          Option<String>,
}

impl RecordParams {
  fn of(input: &NewRecord) -> Self {
    let employee = input.employee();
    let vitals = input.vitals();
    Self {
      name:          employee.name.clone(),
      badge_number:  employee.badge_number.clone(),
      age:           employee.age,
      job_title:     employee.job_title.clone(),
      supervisor:    employee.supervisor.clone(),
      department:    employee.department.clone(),
      systolic:      vitals.systolic,
      diastolic:     vitals.diastolic,
      pulse:         vitals.pulse,
      spo2:          vitals.spo2,
      temperature:   vitals.temperature,
      date:          encode_date(input.date()),
      time_of_entry: input.time_of_entry().to_owned(),
      color:         input.color().into(),
      fitness:       input.fitness().label(),
      note:          input.note().map(str::to_owned),
    }
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened record store");
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  async fn list_records(&self) -> Result<Vec<Record>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM records
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn get_record(&self, id: Uuid) -> Result<Option<Record>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RECORD_COLUMNS} FROM records WHERE record_id = ?1"),
              rusqlite::params![id_str],
              RawRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn create_record(&self, input: NewRecord) -> Result<Record> {
    let record_id = Uuid::new_v4();
    let now = Utc::now().trunc_subsecs(6);

    let id_str = encode_uuid(record_id);
    let at_str = encode_dt(now);
    let p = RecordParams::of(&input);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO records (
             record_id, name, badge_number, age, job_title, supervisor,
             department, systolic, diastolic, pulse, spo2, temperature,
             date, time_of_entry, color, fitness, note, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                     ?13, ?14, ?15, ?16, ?17, ?18, ?18)",
          rusqlite::params![
            id_str,
            p.name,
            p.badge_number,
            p.age,
            p.job_title,
            p.supervisor,
            p.department,
            p.systolic,
            p.diastolic,
            p.pulse,
            p.spo2,
            p.temperature,
            p.date,
            p.time_of_entry,
            p.color,
            p.fitness,
            p.note,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(input.into_record(record_id, now, now))
  }

  async fn update_record(&self, id: Uuid, input: NewRecord) -> Result<Option<Record>> {
    let now = Utc::now().trunc_subsecs(6);

    let id_str = encode_uuid(id);
    let at_str = encode_dt(now);
    let p = RecordParams::of(&input);

    let created_at: Option<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let created_at: Option<String> = tx
          .query_row(
            "SELECT created_at FROM records WHERE record_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;

        if created_at.is_some() {
          tx.execute(
            "UPDATE records SET
               name = ?2, badge_number = ?3, age = ?4, job_title = ?5,
               supervisor = ?6, department = ?7, systolic = ?8,
               diastolic = ?9, pulse = ?10, spo2 = ?11, temperature = ?12,
               date = ?13, time_of_entry = ?14, color = ?15, fitness = ?16,
               note = ?17, updated_at = ?18
             WHERE record_id = ?1",
            rusqlite::params![
              id_str,
              p.name,
              p.badge_number,
              p.age,
              p.job_title,
              p.supervisor,
              p.department,
              p.systolic,
              p.diastolic,
              p.pulse,
              p.spo2,
              p.temperature,
              p.date,
              p.time_of_entry,
              p.color,
              p.fitness,
              p.note,
              at_str,
            ],
          )?;
        }
        tx.commit()?;
        Ok(created_at)
      })
      .await?;

    let Some(created_at) = created_at else {
      return Ok(None);
    };
    Ok(Some(input.into_record(id, decode_dt(&created_at)?, now)))
  }

  async fn delete_record(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM records WHERE record_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }

  async fn delete_all_records(&self) -> Result<usize> {
    let removed = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM records", [])?))
      .await?;
    Ok(removed)
  }
}

#[cfg(test)]
impl SqliteStore {
  /// Overwrite a stored verdict label, simulating a row written by another
  /// tool.
  pub(crate) async fn overwrite_fitness_label(&self, id: Uuid, label: &str) -> Result<()> {
    let id_str = encode_uuid(id);
    let label = label.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE records SET fitness = ?2 WHERE record_id = ?1",
          rusqlite::params![id_str, label],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
