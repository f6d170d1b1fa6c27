//! Subcommand handlers plus the argument groups they share.
//!
//! Every command starts from `skillnet.toml` (or `--config PATH`) and layers
//! its command-line overrides on top before validating.

pub mod completions;
pub mod plot;
pub mod run;
pub mod sensitivity;
pub mod sweep;
pub mod thresholds;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use skillnet_core::config::{load_config_file, load_project_config};
use skillnet_core::{AnalysisConfig, AssociationMatrix, CourseCatalog, io};
use tracing::{info, warn};

/// Overrides for the `[sweep]` table.
#[derive(Args, Debug, Default, Clone)]
pub struct SweepOverrides {
    /// First threshold of the sweep.
    #[arg(long)]
    pub start: Option<f64>,

    /// Last threshold of the sweep (inclusive when reachable).
    #[arg(long)]
    pub stop: Option<f64>,

    /// Distance between consecutive thresholds.
    #[arg(long)]
    pub step: Option<f64>,

    /// Decimal places each threshold is rounded to.
    #[arg(long)]
    pub precision: Option<u32>,

    /// Compute thresholds on a thread pool.
    #[arg(long)]
    pub parallel: bool,
}

/// Overrides for the `[input]` table.
#[derive(Args, Debug, Default, Clone)]
pub struct InputOverrides {
    /// Course × skill association matrix CSV.
    #[arg(long, value_name = "PATH")]
    pub matrix: Option<PathBuf>,

    /// Course catalog CSV with `id` and `course_label` columns.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Header of the course id column in the matrix.
    #[arg(long)]
    pub id_column: Option<String>,
}

/// Override for the `[output]` table.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputDirOverride {
    /// Directory the result tables are written to (and read from).
    #[arg(short, long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Override for the `[sensitivity]` table.
#[derive(Args, Debug, Default, Clone)]
pub struct BaselineOverride {
    /// Threshold every other threshold is compared against.
    #[arg(long)]
    pub baseline: Option<f64>,
}

impl SweepOverrides {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        let sweep = &mut config.sweep;
        if let Some(start) = self.start {
            sweep.start = start;
        }
        if let Some(stop) = self.stop {
            sweep.stop = stop;
        }
        if let Some(step) = self.step {
            sweep.step = step;
        }
        if let Some(precision) = self.precision {
            sweep.precision = precision;
        }
        if self.parallel {
            sweep.parallel = true;
        }
    }
}

impl InputOverrides {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(ref matrix) = self.matrix {
            config.input.matrix.clone_from(matrix);
        }
        if let Some(ref catalog) = self.catalog {
            config.input.catalog.clone_from(catalog);
        }
        if let Some(ref id_column) = self.id_column {
            config.input.id_column.clone_from(id_column);
        }
    }
}

impl OutputDirOverride {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(ref dir) = self.out_dir {
            config.output.dir.clone_from(dir);
        }
    }
}

impl BaselineOverride {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(baseline) = self.baseline {
            config.sensitivity.baseline_threshold = baseline;
        }
    }
}

/// Load `--config PATH`, or `skillnet.toml` from `project_root` if present.
pub fn load_config(config_path: Option<&Path>, project_root: &Path) -> anyhow::Result<AnalysisConfig> {
    match config_path {
        Some(path) => load_config_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => load_project_config(project_root).context("failed to load skillnet.toml"),
    }
}

/// Resolve `path` against `project_root` unless it is already absolute.
pub fn resolve(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

/// Matrix and catalog for a sweep, with their resolved paths.
pub struct Inputs {
    pub matrix_path: PathBuf,
    pub catalog_path: PathBuf,
    pub matrix: AssociationMatrix,
    pub catalog: CourseCatalog,
}

/// Read the association matrix and catalog named by `config`.
pub fn load_inputs(config: &AnalysisConfig, project_root: &Path) -> anyhow::Result<Inputs> {
    let matrix_path = resolve(project_root, &config.input.matrix);
    let catalog_path = resolve(project_root, &config.input.catalog);

    let matrix = io::read_matrix(&matrix_path, &config.input.id_column)
        .with_context(|| format!("failed to load association matrix {}", matrix_path.display()))?;
    let catalog = io::read_catalog(&catalog_path)
        .with_context(|| format!("failed to load course catalog {}", catalog_path.display()))?;

    let (courses, skills) = matrix.shape();
    let labelled = catalog.coverage_of(matrix.course_ids());
    info!(courses, skills, catalog = catalog.len(), labelled, "loaded inputs");
    if labelled == 0 && courses > 0 {
        warn!("no matrix course id appears in the catalog; every label will be Unknown");
    }

    Ok(Inputs {
        matrix_path,
        catalog_path,
        matrix,
        catalog,
    })
}

/// Format an optional metric for human output.
pub fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

/// Format an optional metric for tab-separated output; `None` is empty.
pub fn tsv_metric(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut config = AnalysisConfig::default();
        SweepOverrides {
            stop: Some(0.8),
            parallel: true,
            ..SweepOverrides::default()
        }
        .apply(&mut config);
        BaselineOverride {
            baseline: Some(0.7),
        }
        .apply(&mut config);

        assert!((config.sweep.start - 0.5).abs() < f64::EPSILON);
        assert!((config.sweep.stop - 0.8).abs() < f64::EPSILON);
        assert!(config.sweep.parallel);
        assert!((config.sensitivity.baseline_threshold - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn input_overrides_replace_paths() {
        let mut config = AnalysisConfig::default();
        InputOverrides {
            matrix: Some(PathBuf::from("m.csv")),
            id_column: Some("course_id".into()),
            ..InputOverrides::default()
        }
        .apply(&mut config);
        OutputDirOverride {
            out_dir: Some(PathBuf::from("results")),
        }
        .apply(&mut config);

        assert_eq!(config.input.matrix, PathBuf::from("m.csv"));
        assert_eq!(config.input.catalog, PathBuf::from("df_course.csv"));
        assert_eq!(config.input.id_column, "course_id");
        assert_eq!(config.output.dir, PathBuf::from("results"));
    }

    #[test]
    fn relative_paths_resolve_against_root() {
        let root = Path::new("/work");
        assert_eq!(resolve(root, Path::new("a.csv")), PathBuf::from("/work/a.csv"));
        assert_eq!(resolve(root, Path::new("/abs/a.csv")), PathBuf::from("/abs/a.csv"));
    }

    #[test]
    fn metric_formatting() {
        assert_eq!(fmt_metric(None), "-");
        assert_eq!(fmt_metric(Some(0.5)), "0.5000");
        assert_eq!(tsv_metric(None), "");
        assert_eq!(tsv_metric(Some(0.25)), "0.25");
    }
}
