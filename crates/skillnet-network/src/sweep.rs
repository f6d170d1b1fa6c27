//! Threshold sweep orchestration.
//!
//! # Overview
//!
//! For each threshold in ascending order the sweep runs
//! binarize → project → build → metrics, hands the course table to a
//! [`SweepSink`], and appends one [`ThresholdSummary`] row. Once every
//! threshold is done the summary sequence goes to the sink as well.
//!
//! ## Partial Results
//!
//! A threshold whose computation fails with a recoverable error is logged,
//! recorded as a summary row with no density or ratio, and skipped; the
//! sweep carries on. Fatal errors and every sink failure abort the sweep.
//!
//! ## Parallelism
//!
//! Thresholds are independent. With `parallel` set they are computed on the
//! rayon pool against the shared read-only matrix and catalog; results are
//! collected in threshold order before anything reaches the sink, so the
//! persisted output does not depend on scheduling.

use std::path::PathBuf;

use rayon::prelude::*;
use skillnet_core::config::SweepConfig;
use skillnet_core::{
    AssociationMatrix, CourseCatalog, CourseInfluence, InfluenceTable, Result, ThresholdSummary,
    io,
};
use tracing::{debug, info, instrument, warn};

use crate::graph::{CourseNetwork, binarize, project};
use crate::metrics::{NetworkMetrics, compute_metrics};

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Destination for sweep output.
pub trait SweepSink {
    /// Store the course table computed for `threshold`.
    ///
    /// # Errors
    ///
    /// Any error aborts the sweep.
    fn persist_influence(&mut self, threshold: f64, rows: &[CourseInfluence]) -> Result<()>;

    /// Store the summary rows, one per threshold, after the sweep completes.
    ///
    /// # Errors
    ///
    /// Any error aborts the sweep.
    fn persist_summary(&mut self, rows: &[ThresholdSummary]) -> Result<()>;
}

/// Writes `course_data_{t}.csv` and the summary table into a directory.
///
/// File names carry the threshold with two decimals, or `precision`
/// decimals when that is larger, so every threshold of a valid sweep gets
/// its own file.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
    precision: u32,
    written: Vec<PathBuf>,
}

impl CsvSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, precision: u32) -> Self {
        Self {
            dir: dir.into(),
            precision,
            written: Vec::new(),
        }
    }

    /// Files written so far, in write order.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl SweepSink for CsvSink {
    fn persist_influence(&mut self, threshold: f64, rows: &[CourseInfluence]) -> Result<()> {
        let path = io::write_influence_table(&self.dir, threshold, self.precision, rows)?;
        debug!(path = %path.display(), rows = rows.len(), "wrote influence table");
        self.written.push(path);
        Ok(())
    }

    fn persist_summary(&mut self, rows: &[ThresholdSummary]) -> Result<()> {
        let path = io::write_summary_table(&self.dir, rows)?;
        debug!(path = %path.display(), rows = rows.len(), "wrote summary table");
        self.written.push(path);
        Ok(())
    }
}

/// Keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub tables: Vec<InfluenceTable>,
    pub summary: Vec<ThresholdSummary>,
}

impl SweepSink for MemorySink {
    fn persist_influence(&mut self, threshold: f64, rows: &[CourseInfluence]) -> Result<()> {
        self.tables.push(InfluenceTable {
            threshold,
            courses: rows.to_vec(),
        });
        Ok(())
    }

    fn persist_summary(&mut self, rows: &[ThresholdSummary]) -> Result<()> {
        self.summary = rows.to_vec();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Everything a sweep produced, ready for the sensitivity analyzer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepOutcome {
    /// One row per threshold, in sweep order, failed thresholds included.
    pub summaries: Vec<ThresholdSummary>,
    /// Course tables for the thresholds that succeeded.
    pub tables: Vec<InfluenceTable>,
    /// Thresholds that failed and were recorded as missing.
    pub failed: Vec<f64>,
}

impl SweepOutcome {
    /// Course table for `threshold`, matched exactly.
    #[must_use]
    pub fn table(&self, threshold: f64) -> Option<&InfluenceTable> {
        self.tables
            .iter()
            .find(|t| t.threshold.total_cmp(&threshold).is_eq())
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Build the course network for one threshold and measure it.
///
/// # Errors
///
/// Returns [`skillnet_core::AnalysisError::InvalidThreshold`] for a
/// non-finite threshold and `ShapeMismatch` if the matrix ids and values
/// disagree.
pub fn analyze_threshold(
    matrix: &AssociationMatrix,
    catalog: &CourseCatalog,
    threshold: f64,
) -> Result<NetworkMetrics> {
    let binarized = binarize(matrix, threshold)?;
    debug!(threshold, passing = binarized.passing_count(), "binarized");

    let projection = project(&binarized);
    let network = CourseNetwork::from_projection(matrix.course_ids(), &projection)?;
    Ok(compute_metrics(&network, catalog))
}

/// Sweep the thresholds described by `config`.
///
/// # Errors
///
/// Returns `Configuration` for an invalid range, plus anything
/// [`run_thresholds`] returns.
pub fn run_sweep<S>(
    matrix: &AssociationMatrix,
    catalog: &CourseCatalog,
    config: &SweepConfig,
    sink: &mut S,
) -> Result<SweepOutcome>
where
    S: SweepSink + ?Sized,
{
    let thresholds = config.thresholds()?;
    run_thresholds(matrix, catalog, &thresholds, config.parallel, sink)
}

/// Sweep an explicit threshold list, in the order given.
///
/// # Errors
///
/// Returns the first fatal computation error or any sink error.
#[instrument(skip_all, fields(thresholds = thresholds.len(), parallel = parallel))]
pub fn run_thresholds<S>(
    matrix: &AssociationMatrix,
    catalog: &CourseCatalog,
    thresholds: &[f64],
    parallel: bool,
    sink: &mut S,
) -> Result<SweepOutcome>
where
    S: SweepSink + ?Sized,
{
    let (courses, skills) = matrix.shape();
    info!(courses, skills, "starting threshold sweep");

    let mut outcome = SweepOutcome {
        summaries: Vec::with_capacity(thresholds.len()),
        tables: Vec::with_capacity(thresholds.len()),
        failed: Vec::new(),
    };

    if parallel {
        let results: Vec<Result<NetworkMetrics>> = thresholds
            .par_iter()
            .map(|&t| analyze_threshold(matrix, catalog, t))
            .collect();
        for (&threshold, result) in thresholds.iter().zip(results) {
            record(&mut outcome, threshold, result, sink)?;
        }
    } else {
        for &threshold in thresholds {
            let result = analyze_threshold(matrix, catalog, threshold);
            record(&mut outcome, threshold, result, sink)?;
        }
    }

    sink.persist_summary(&outcome.summaries)?;

    info!(
        swept = outcome.summaries.len(),
        failed = outcome.failed.len(),
        "threshold sweep complete"
    );
    Ok(outcome)
}

fn record<S>(
    outcome: &mut SweepOutcome,
    threshold: f64,
    result: Result<NetworkMetrics>,
    sink: &mut S,
) -> Result<()>
where
    S: SweepSink + ?Sized,
{
    match result {
        Ok(metrics) => {
            info!(
                threshold,
                density = metrics.density,
                giant_component_ratio = metrics.giant_component_ratio,
                edges = metrics.edge_count,
                components = metrics.component_count,
                isolated = metrics.isolated_count,
                "processed threshold"
            );
            sink.persist_influence(threshold, &metrics.courses)?;
            outcome.summaries.push(metrics.summary(threshold));
            outcome.tables.push(metrics.into_table(threshold));
            Ok(())
        }
        Err(e) if !e.is_fatal() => {
            warn!(threshold, error = %e, "threshold failed; recording as missing");
            outcome.summaries.push(ThresholdSummary::missing(threshold));
            outcome.failed.push(threshold);
            Ok(())
        }
        Err(e) => Err(e),
    }
}
