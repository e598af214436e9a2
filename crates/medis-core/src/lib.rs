//! Core types and rules for the Medis health-check record system.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it. Everything here except the
//! [`store::RecordStore`] trait is pure and synchronous.

pub mod classify;
pub mod error;
pub mod record;
pub mod report;
pub mod stats;
pub mod store;
pub mod submission;

pub use classify::{BpCategory, BpColor, Classification, Fitness, Readings, VitalGrades, classify};
pub use error::{Error, Result};
pub use record::{Employee, NewRecord, Record, RecordedFitness, VitalSigns};
pub use report::{ReportFilter, ReportMode, WeekKey};
pub use stats::{Statistics, aggregate};
pub use submission::{RecordForm, ValidationError};
