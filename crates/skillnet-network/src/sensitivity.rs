//! Sensitivity of the network and the influence ranking to the threshold.
//!
//! # Overview
//!
//! Every swept threshold is compared with a baseline threshold on three
//! axes:
//!
//! - **Rank correlation**: Spearman's rho between the baseline's course
//!   influence and this threshold's, over the courses both tables contain.
//!   Pairs where either side has no influence are dropped first.
//! - **Relative density**: `density / baseline_density`.
//! - **Relative giant component ratio**: `ratio / baseline_ratio`.
//!
//! Each is also reported as an absolute relative change against the
//! baseline: `|relative − 1|` for the two structural metrics and
//! `|rho − rho_baseline| / rho_baseline` for the correlation.
//!
//! Thresholds are matched with a tolerance
//! ([`skillnet_core::threshold::is_close`]), so `0.6` and `0.6000000001`
//! refer to the same threshold.

use std::collections::HashMap;
use std::path::Path;

use skillnet_core::config::SensitivityConfig;
use skillnet_core::record::defined;
use skillnet_core::threshold::is_close;
use skillnet_core::{
    AnalysisError, CourseInfluence, InfluenceTable, Result, SensitivityRecord, ThresholdSummary,
    io,
};
use tracing::{debug, info, instrument, warn};

use crate::metrics::rank::spearman;

/// Rank correlation of the baseline with itself.
pub const BASELINE_RANK_CORRELATION: f64 = 1.0;

/// Sensitivity rows for every swept threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityReport {
    pub baseline_threshold: f64,
    /// One record per summary row, in summary order.
    pub records: Vec<SensitivityRecord>,
}

impl SensitivityReport {
    /// Record whose threshold is close to `threshold`.
    #[must_use]
    pub fn record(&self, threshold: f64) -> Option<&SensitivityRecord> {
        self.records
            .iter()
            .find(|r| is_close(r.threshold, threshold))
    }
}

/// How two influence tables lined up on course id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinStats {
    pub baseline_courses: usize,
    pub other_courses: usize,
    /// Courses present in both tables.
    pub shared: usize,
    /// Shared courses with an influence value on both sides.
    pub paired: usize,
}

impl JoinStats {
    #[must_use]
    pub const fn is_mismatched(&self) -> bool {
        self.shared != self.baseline_courses || self.shared != self.other_courses
    }
}

/// Inner-join two influence tables on course id, keeping pairs where both
/// influences are defined. Pairs follow `baseline` order.
#[must_use]
pub fn join_influence(
    baseline: &[CourseInfluence],
    other: &[CourseInfluence],
) -> (Vec<f64>, Vec<f64>, JoinStats) {
    let mut by_id: HashMap<&str, Option<f64>> = HashMap::with_capacity(other.len());
    for row in other {
        by_id.entry(row.id.as_str()).or_insert(row.influence);
    }

    let mut xs = Vec::with_capacity(baseline.len());
    let mut ys = Vec::with_capacity(baseline.len());
    let mut shared = 0usize;
    for row in baseline {
        let Some(&other_influence) = by_id.get(row.id.as_str()) else {
            continue;
        };
        shared += 1;
        if let (Some(x), Some(y)) = (row.influence, other_influence) {
            xs.push(x);
            ys.push(y);
        }
    }

    let stats = JoinStats {
        baseline_courses: baseline.len(),
        other_courses: other.len(),
        shared,
        paired: xs.len(),
    };
    (xs, ys, stats)
}

/// Spearman correlation of course influence between two tables.
///
/// Logs a warning when the course sets differ; the correlation then covers
/// only the shared courses.
#[must_use]
pub fn rank_correlation(baseline: &InfluenceTable, other: &InfluenceTable) -> Option<f64> {
    let (xs, ys, stats) = join_influence(&baseline.courses, &other.courses);
    if stats.is_mismatched() {
        warn!(
            baseline = baseline.threshold,
            threshold = other.threshold,
            baseline_courses = stats.baseline_courses,
            other_courses = stats.other_courses,
            shared = stats.shared,
            "course sets differ; correlating shared courses only"
        );
    }
    let rho = spearman(&xs, &ys);
    debug!(threshold = other.threshold, paired = stats.paired, ?rho, "rank correlation");
    rho
}

/// Compare every threshold in `summaries` against the configured baseline.
///
/// `tables` holds the influence table of each threshold that succeeded; a
/// summary row without a matching table gets no rank correlation.
///
/// # Errors
///
/// - [`AnalysisError::Configuration`] if the baseline has no summary row,
///   its summary row is missing metrics, or it has no influence table.
/// - [`AnalysisError::DegenerateBaseline`] if the baseline rank
///   correlation cannot be used as a divisor.
///
/// The baseline row's rank correlation is [`BASELINE_RANK_CORRELATION`]
/// whatever its influence values are; other thresholds get `None` when
/// there is nothing to rank.
#[instrument(skip_all, fields(baseline = config.baseline_threshold, thresholds = summaries.len()))]
pub fn analyze_sensitivity(
    config: &SensitivityConfig,
    tables: &[InfluenceTable],
    summaries: &[ThresholdSummary],
) -> Result<SensitivityReport> {
    let baseline = config.baseline_threshold;

    let base_summary = summaries
        .iter()
        .find(|s| is_close(s.threshold, baseline))
        .ok_or_else(|| {
            AnalysisError::Configuration(format!(
                "baseline threshold {baseline} is not among the swept thresholds"
            ))
        })?;
    let (Some(base_density), Some(base_ratio)) =
        (base_summary.density, base_summary.giant_component_ratio)
    else {
        return Err(AnalysisError::Configuration(format!(
            "baseline threshold {baseline} failed during the sweep"
        )));
    };
    let base_table = find_table(tables, baseline).ok_or_else(|| {
        AnalysisError::Configuration(format!(
            "no influence table for baseline threshold {baseline}"
        ))
    })?;

    let base_rho = BASELINE_RANK_CORRELATION;
    if base_density == 0.0 {
        warn!(baseline, "baseline density is zero; relative density is not finite");
    }
    if base_ratio == 0.0 {
        warn!(baseline, "baseline giant component ratio is zero; relative ratio is not finite");
    }

    let records = summaries
        .iter()
        .map(|summary| -> Result<SensitivityRecord> {
            let threshold = summary.threshold;
            let rho = if is_close(threshold, baseline) {
                Some(base_rho)
            } else {
                find_table(tables, threshold).and_then(|table| rank_correlation(base_table, table))
            };

            let relative_density = summary.density.and_then(|d| defined(d / base_density));
            let relative_ratio = summary
                .giant_component_ratio
                .and_then(|r| defined(r / base_ratio));

            Ok(SensitivityRecord {
                threshold,
                rank_correlation: rho,
                relative_density,
                relative_giant_component_ratio: relative_ratio,
                abs_delta_rank_correlation: correlation_delta(rho, base_rho)?,
                abs_delta_density: relative_density.map(|r| (r - 1.0).abs()),
                abs_delta_giant_component_ratio: relative_ratio.map(|r| (r - 1.0).abs()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(rows = records.len(), "sensitivity analysis complete");
    Ok(SensitivityReport {
        baseline_threshold: baseline,
        records,
    })
}

/// `|rho − base_rho| / base_rho`, or `None` when `rho` is undefined.
///
/// # Errors
///
/// Returns [`AnalysisError::DegenerateBaseline`] if `base_rho` is zero or
/// not finite.
pub fn correlation_delta(rho: Option<f64>, base_rho: f64) -> Result<Option<f64>> {
    if base_rho == 0.0 || !base_rho.is_finite() {
        return Err(AnalysisError::DegenerateBaseline(format!(
            "baseline rank correlation {base_rho} cannot be used as a divisor"
        )));
    }
    Ok(rho.map(|r| (r - base_rho).abs() / base_rho))
}

fn find_table(tables: &[InfluenceTable], threshold: f64) -> Option<&InfluenceTable> {
    tables.iter().find(|t| is_close(t.threshold, threshold))
}

/// Read a previous sweep's influence tables and summary table from `dir`.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] or [`AnalysisError::Csv`] if the summary
/// table or any influence table cannot be read.
pub fn load_sweep(dir: &Path) -> Result<(Vec<InfluenceTable>, Vec<ThresholdSummary>)> {
    let summaries = io::read_summary_table(&dir.join(io::SUMMARY_FILE_NAME))?;
    let tables = io::list_influence_tables(dir)?
        .into_iter()
        .map(|(threshold, path)| {
            io::read_influence_table(&path).map(|courses| InfluenceTable { threshold, courses })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(
        dir = %dir.display(),
        tables = tables.len(),
        summaries = summaries.len(),
        "loaded sweep results"
    );
    Ok((tables, summaries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, influence: Option<f64>) -> CourseInfluence {
        CourseInfluence {
            id: id.to_string(),
            label: String::new(),
            coverage: 0,
            degree: 0,
            influence,
        }
    }

    fn table(threshold: f64, rows: &[(&str, Option<f64>)]) -> InfluenceTable {
        InfluenceTable {
            threshold,
            courses: rows.iter().map(|&(id, v)| row(id, v)).collect(),
        }
    }

    fn summary(threshold: f64, density: f64, ratio: f64) -> ThresholdSummary {
        ThresholdSummary {
            threshold,
            density: Some(density),
            giant_component_ratio: Some(ratio),
        }
    }

    fn config(baseline: f64) -> SensitivityConfig {
        SensitivityConfig {
            baseline_threshold: baseline,
        }
    }

    fn close(value: Option<f64>, expected: f64) -> bool {
        value.is_some_and(|v| (v - expected).abs() < 1e-12)
    }

    #[test]
    fn join_drops_undefined_pairs_and_unmatched_ids() {
        let baseline = [row("a", Some(1.0)), row("b", None), row("c", Some(3.0))];
        let other = [row("c", Some(2.0)), row("a", Some(0.5)), row("b", Some(9.0)), row("z", Some(1.0))];

        let (xs, ys, stats) = join_influence(&baseline, &other);
        assert_eq!(xs, vec![1.0, 3.0]);
        assert_eq!(ys, vec![0.5, 2.0]);
        assert_eq!(stats.shared, 3);
        assert_eq!(stats.paired, 2);
        assert!(stats.is_mismatched());
    }

    #[test]
    fn baseline_row_is_identity() {
        let tables = [table(0.6, &[("a", Some(1.0)), ("b", Some(2.0)), ("c", Some(3.0))])];
        let summaries = [summary(0.6, 0.25, 0.8)];
        let report = analyze_sensitivity(&config(0.6), &tables, &summaries).expect("report");

        let base = &report.records[0];
        assert!(close(base.rank_correlation, 1.0));
        assert!(close(base.relative_density, 1.0));
        assert!(close(base.relative_giant_component_ratio, 1.0));
        assert!(close(base.abs_delta_rank_correlation, 0.0));
        assert!(close(base.abs_delta_density, 0.0));
        assert!(close(base.abs_delta_giant_component_ratio, 0.0));
    }

    #[test]
    fn relative_values_and_deltas() {
        let tables = [
            table(0.5, &[("a", Some(3.0)), ("b", Some(2.0)), ("c", Some(1.0))]),
            table(0.6, &[("a", Some(1.0)), ("b", Some(2.0)), ("c", Some(3.0))]),
        ];
        let summaries = [summary(0.5, 0.5, 1.0), summary(0.6, 0.25, 0.8)];
        let report = analyze_sensitivity(&config(0.6), &tables, &summaries).expect("report");

        let r = report.record(0.5).expect("0.5 row");
        assert!(close(r.rank_correlation, -1.0));
        assert!(close(r.abs_delta_rank_correlation, 2.0));
        assert!(close(r.relative_density, 2.0));
        assert!(close(r.abs_delta_density, 1.0));
        assert!(close(r.relative_giant_component_ratio, 1.25));
        assert!(close(r.abs_delta_giant_component_ratio, 0.25));
    }

    #[test]
    fn unswept_baseline_is_a_configuration_error() {
        let tables = [table(0.6, &[("a", Some(1.0)), ("b", Some(2.0))])];
        let summaries = [summary(0.6, 0.5, 1.0)];
        let err = analyze_sensitivity(&config(0.61), &tables, &summaries).expect_err("0.61 not swept");
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn baseline_is_matched_with_tolerance() {
        let tables = [table(0.6, &[("a", Some(1.0)), ("b", Some(2.0))])];
        let summaries = [summary(0.6, 0.5, 1.0)];
        assert!(analyze_sensitivity(&config(0.600_000_000_1), &tables, &summaries).is_ok());
    }

    #[test]
    fn failed_baseline_is_a_configuration_error() {
        let tables = [table(0.6, &[("a", Some(1.0)), ("b", Some(2.0))])];
        let summaries = [ThresholdSummary::missing(0.6)];
        let err = analyze_sensitivity(&config(0.6), &tables, &summaries).expect_err("no metrics");
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn constant_baseline_ranking_still_compares_to_itself() {
        let tables = [
            table(0.5, &[("a", Some(2.0)), ("b", Some(1.0)), ("c", Some(3.0))]),
            table(0.6, &[("a", Some(1.0)), ("b", Some(1.0)), ("c", None)]),
        ];
        let summaries = [summary(0.5, 0.5, 1.0), summary(0.6, 0.5, 1.0)];
        let report = analyze_sensitivity(&config(0.6), &tables, &summaries).expect("report");

        let base = report.record(0.6).expect("baseline row");
        assert_eq!(base.rank_correlation, Some(1.0));
        assert_eq!(base.abs_delta_rank_correlation, Some(0.0));

        let other = report.record(0.5).expect("0.5 row");
        assert_eq!(other.rank_correlation, None, "nothing to rank against");
        assert_eq!(other.abs_delta_rank_correlation, None);
    }

    #[test]
    fn zero_or_undefined_baseline_correlation_is_degenerate() {
        for base in [0.0, f64::NAN, f64::INFINITY] {
            let err = correlation_delta(Some(0.5), base).expect_err("not a divisor");
            assert!(matches!(err, AnalysisError::DegenerateBaseline(_)));
        }
        assert_eq!(correlation_delta(Some(0.5), 1.0).expect("delta"), Some(0.5));
        assert_eq!(correlation_delta(None, 1.0).expect("delta"), None);
    }

    #[test]
    fn failed_threshold_has_no_values() {
        let tables = [table(0.6, &[("a", Some(1.0)), ("b", Some(2.0))])];
        let summaries = [ThresholdSummary::missing(0.5), summary(0.6, 0.5, 1.0)];
        let report = analyze_sensitivity(&config(0.6), &tables, &summaries).expect("report");

        let r = &report.records[0];
        assert_eq!(r.rank_correlation, None);
        assert_eq!(r.relative_density, None);
        assert_eq!(r.abs_delta_giant_component_ratio, None);
    }

    #[test]
    fn zero_baseline_density_yields_infinite_or_undefined() {
        let tables = [
            table(0.5, &[("a", Some(1.0)), ("b", Some(2.0))]),
            table(0.6, &[("a", Some(1.0)), ("b", Some(2.0))]),
        ];
        let summaries = [summary(0.5, 0.5, 1.0), summary(0.6, 0.0, 1.0)];
        let report = analyze_sensitivity(&config(0.6), &tables, &summaries).expect("report");

        assert_eq!(report.records[0].relative_density, Some(f64::INFINITY));
        assert_eq!(report.records[1].relative_density, None, "0 / 0");
    }

    #[test]
    fn load_sweep_reads_back_written_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rows = vec![row("a", Some(1.5)), row("b", None)];
        io::write_influence_table(dir.path(), 0.6, 2, &rows).expect("table");
        io::write_summary_table(dir.path(), &[summary(0.6, 0.5, 1.0)]).expect("summary");

        let (tables, summaries) = load_sweep(dir.path()).expect("load");
        assert_eq!(tables.len(), 1);
        assert!(is_close(tables[0].threshold, 0.6));
        assert_eq!(tables[0].courses, rows);
        assert_eq!(summaries.len(), 1);
    }
}
