//! Error types for the medis-export renderers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("formatting error: {0}")]
  Fmt(#[from] std::fmt::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
