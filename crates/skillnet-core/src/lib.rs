#![forbid(unsafe_code)]
//! skillnet-core library.
//!
//! Shared data model for the course network analysis: the association matrix
//! and course catalog inputs, the per-threshold output rows, run
//! configuration, and the CSV persistence layer.
//!
//! # Conventions
//!
//! - **Errors**: Library functions return [`error::Result`]; undefined metrics
//!   are `None`, never an error.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod catalog;
pub mod config;
pub mod error;
pub mod hash;
pub mod io;
pub mod matrix;
pub mod record;
pub mod threshold;

pub use catalog::{CourseCatalog, UNKNOWN_LABEL};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, ErrorCode, Result};
pub use matrix::AssociationMatrix;
pub use record::{CourseInfluence, InfluenceTable, SensitivityRecord, ThresholdSummary};
