//! Error types for `medis-core`.

use thiserror::Error;

use crate::submission::ValidationError;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("invalid week key {0:?}; expected YYYY-Www")]
  InvalidWeekKey(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
