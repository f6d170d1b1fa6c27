#![forbid(unsafe_code)]
//! skillnet-network library.
//!
//! Builds one course network per threshold from the course × skill
//! association matrix, measures it, sweeps a threshold range, and compares
//! every threshold against a baseline.
//!
//! # Conventions
//!
//! - **Errors**: Use [`skillnet_core::Result`] for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod graph;
pub mod metrics;
pub mod sensitivity;
pub mod sweep;

pub use metrics::{NetworkMetrics, compute_metrics};
pub use sensitivity::{SensitivityReport, analyze_sensitivity, load_sweep};
pub use sweep::{CsvSink, MemorySink, SweepOutcome, SweepSink, analyze_threshold, run_sweep, run_thresholds};
