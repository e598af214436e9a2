//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `medis-store-sqlite`). Higher layers
//! (`medis-api`, `medis-server`) depend on this abstraction, not on any
//! concrete backend. A store handle is constructed once and passed to
//! whoever needs it; there is no global connection.

use std::future::Future;

use uuid::Uuid;

use crate::record::{NewRecord, Record};

/// Abstraction over a health-record store backend.
///
/// Writes take a [`NewRecord`], which is always classified; the store only
/// assigns identity and timestamps and never reclassifies.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All records, newest first.
  fn list_records(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_record(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Persist a new record and return it with its assigned id.
  fn create_record(
    &self,
    input: NewRecord,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Replace every field of an existing record. `created_at` is preserved,
  /// `updated_at` is refreshed. Returns `None` if the id is unknown.
  fn update_record(
    &self,
    id: Uuid,
    input: NewRecord,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Delete one record. Returns `false` if the id is unknown.
  fn delete_record(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete every record and return how many were removed.
  fn delete_all_records(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
