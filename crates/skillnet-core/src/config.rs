//! Run configuration: threshold sweep range, sensitivity baseline, input and
//! output locations.
//!
//! Loaded from `skillnet.toml` when present; every field has a default so an
//! empty or missing file yields the standard 0.50..=0.70 sweep with a 0.60
//! baseline. The configuration object is passed explicitly to the sweep and
//! the analyzer; nothing here is process-global.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::threshold::{is_close, round_to};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "skillnet.toml";

/// Upper bound on the number of thresholds a single sweep may produce.
pub const MAX_THRESHOLDS: usize = 10_000;

/// Upper bound on [`SweepConfig::precision`].
pub const MAX_PRECISION: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub sensitivity: SensitivityConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Inclusive threshold range `start..=stop` walked in `step` increments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_start")]
    pub start: f64,
    #[serde(default = "default_stop")]
    pub stop: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    /// Decimal places every generated threshold is rounded to.
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Compute thresholds on a worker pool.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            stop: default_stop(),
            step: default_step(),
            precision: default_precision(),
            parallel: false,
        }
    }
}

impl SweepConfig {
    /// Check the range is finite, non-empty, and walkable.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("start", self.start), ("stop", self.stop), ("step", self.step)] {
            if !value.is_finite() {
                return Err(AnalysisError::Configuration(format!(
                    "sweep.{name} must be finite, got {value}"
                )));
            }
        }
        if self.step <= 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "sweep.step must be positive, got {}",
                self.step
            )));
        }
        if self.start > self.stop {
            return Err(AnalysisError::Configuration(format!(
                "sweep.start ({}) is greater than sweep.stop ({})",
                self.start, self.stop
            )));
        }
        if self.precision > MAX_PRECISION {
            return Err(AnalysisError::Configuration(format!(
                "sweep.precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        if self.step_count() >= MAX_THRESHOLDS {
            return Err(AnalysisError::Configuration(format!(
                "sweep would produce more than {MAX_THRESHOLDS} thresholds"
            )));
        }
        if let Some(w) = self.generate().windows(2).find(|w| w[1] <= w[0]) {
            return Err(AnalysisError::Configuration(format!(
                "sweep.step {} is too fine for sweep.precision {}: consecutive thresholds both round to {}",
                self.step, self.precision, w[0]
            )));
        }
        Ok(())
    }

    /// Number of whole steps between `start` and `stop`, tolerating float
    /// noise in the division.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn step_count(&self) -> usize {
        let steps = (self.stop - self.start) / self.step;
        let rounded = steps.round();
        let whole = if (steps - rounded).abs() < 1e-9 {
            rounded
        } else {
            steps.floor()
        };
        whole.max(0.0).min(MAX_THRESHOLDS as f64) as usize
    }

    /// The ordered threshold list, each value rounded to `precision`.
    ///
    /// Values are derived as `start + i * step` rather than by repeated
    /// addition, so the last threshold lands on `stop` when the range divides
    /// evenly.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if the range is invalid.
    pub fn thresholds(&self) -> Result<Vec<f64>> {
        self.validate()?;
        Ok(self.generate())
    }

    #[allow(clippy::cast_precision_loss)]
    fn generate(&self) -> Vec<f64> {
        (0..=self.step_count())
            .map(|i| round_to(self.step.mul_add(i as f64, self.start), self.precision))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Threshold every other threshold is compared against.
    #[serde(default = "default_baseline")]
    pub baseline_threshold: f64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            baseline_threshold: default_baseline(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Course × skill association matrix (CSV).
    #[serde(default = "default_matrix_path")]
    pub matrix: PathBuf,
    /// Course id → label catalog (CSV with `id` and `course_label`).
    #[serde(default = "default_catalog_path")]
    pub catalog: PathBuf,
    /// Column of the matrix file holding course ids.
    #[serde(default = "default_id_column")]
    pub id_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            matrix: default_matrix_path(),
            catalog: default_catalog_path(),
            id_column: default_id_column(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving per-threshold tables, summaries, and the manifest.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl AnalysisConfig {
    /// Validate the sweep range and confirm the baseline is one of its thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if the range is invalid or the
    /// baseline is not a swept threshold.
    pub fn validate(&self) -> Result<()> {
        let thresholds = self.sweep.thresholds()?;
        let baseline = self.sensitivity.baseline_threshold;
        if !baseline.is_finite() {
            return Err(AnalysisError::Configuration(format!(
                "sensitivity.baseline_threshold must be finite, got {baseline}"
            )));
        }
        if !thresholds.iter().any(|&t| is_close(t, baseline)) {
            return Err(AnalysisError::Configuration(format!(
                "baseline threshold {baseline} is not in the swept range {}..={} step {}",
                self.sweep.start, self.sweep.stop, self.sweep.step
            )));
        }
        Ok(())
    }
}

/// Load configuration from an explicit file path.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if the file cannot be read and
/// [`AnalysisError::Configuration`] if it is not valid TOML for this schema.
pub fn load_config_file(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
        path: path.display().to_string(),
        source,
    })?;

    toml::from_str::<AnalysisConfig>(&content).map_err(|e| {
        AnalysisError::Configuration(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Load `skillnet.toml` from `project_root`, falling back to defaults when
/// the file does not exist.
///
/// # Errors
///
/// See [`load_config_file`].
pub fn load_project_config(project_root: &Path) -> Result<AnalysisConfig> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(AnalysisConfig::default());
    }
    load_config_file(&path)
}

const fn default_start() -> f64 {
    0.50
}

const fn default_stop() -> f64 {
    0.70
}

const fn default_step() -> f64 {
    0.02
}

const fn default_precision() -> u32 {
    2
}

const fn default_baseline() -> f64 {
    0.60
}

fn default_matrix_path() -> PathBuf {
    PathBuf::from("course_skill_matrix.csv")
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("df_course.csv")
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
