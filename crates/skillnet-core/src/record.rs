//! Row types shared by the network engine, the persistence layer, and the CLI.
//!
//! Every metric that can be mathematically undefined is an `Option<f64>`:
//! `None` means "no value", which is distinct from zero. In CSV files a
//! `None` is written as an empty field.

use serde::{Deserialize, Serialize};

/// Per-course metrics for one threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseInfluence {
    pub id: String,
    #[serde(rename = "course_label")]
    pub label: String,
    /// Skills retained for this course at the threshold.
    pub coverage: usize,
    /// Number of courses sharing at least one retained skill.
    pub degree: usize,
    /// `coverage / degree`, undefined for isolated courses.
    #[serde(rename = "course_influence")]
    pub influence: Option<f64>,
}

/// All course rows computed for one threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct InfluenceTable {
    pub threshold: f64,
    pub courses: Vec<CourseInfluence>,
}

/// Graph-level shape of the network at one threshold.
///
/// `density` and `giant_component_ratio` are `None` only when the threshold
/// failed to compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSummary {
    pub threshold: f64,
    pub density: Option<f64>,
    pub giant_component_ratio: Option<f64>,
}

impl ThresholdSummary {
    /// A row recording that the threshold produced no result.
    #[must_use]
    pub const fn missing(threshold: f64) -> Self {
        Self {
            threshold,
            density: None,
            giant_component_ratio: None,
        }
    }

    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.density.is_none() && self.giant_component_ratio.is_none()
    }
}

/// Deviation of one threshold from the baseline threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRecord {
    pub threshold: f64,
    /// Spearman correlation of course influence against the baseline.
    pub rank_correlation: Option<f64>,
    pub relative_density: Option<f64>,
    pub relative_giant_component_ratio: Option<f64>,
    pub abs_delta_rank_correlation: Option<f64>,
    pub abs_delta_density: Option<f64>,
    pub abs_delta_giant_component_ratio: Option<f64>,
}

/// Map NaN to `None`, keeping infinities so degenerate divisions stay visible.
#[must_use]
pub fn defined(value: f64) -> Option<f64> {
    if value.is_nan() { None } else { Some(value) }
}
