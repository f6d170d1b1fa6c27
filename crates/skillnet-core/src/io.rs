//! Flat-file persistence: CSV inputs and the per-threshold output tables.
//!
//! # Files
//!
//! | File | Rows |
//! |------|------|
//! | association matrix (input) | one per course; id column + one column per skill |
//! | course catalog (input) | `id`, `course_label`, any other columns ignored |
//! | `course_data_{t}.csv` | [`CourseInfluence`] for threshold `t`, two decimals or the sweep precision if larger |
//! | `link_density_and_giant_component_ratio.csv` | [`ThresholdSummary`] per threshold |
//! | `sensitivity.csv` | [`SensitivityRecord`] per threshold |
//!
//! Undefined metrics are written as empty fields and read back as `None`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::catalog::CourseCatalog;
use crate::error::{AnalysisError, Result};
use crate::matrix::AssociationMatrix;
use crate::record::{CourseInfluence, SensitivityRecord, ThresholdSummary, defined};
use crate::threshold::format_threshold;

/// Summary table written after a sweep.
pub const SUMMARY_FILE_NAME: &str = "link_density_and_giant_component_ratio.csv";

/// Sensitivity table written by the analyzer.
pub const SENSITIVITY_FILE_NAME: &str = "sensitivity.csv";

const INFLUENCE_PREFIX: &str = "course_data_";
const CATALOG_ID_COLUMN: &str = "id";
const CATALOG_LABEL_COLUMN: &str = "course_label";

const INFLUENCE_HEADERS: &[&str] = &["id", "course_label", "coverage", "degree", "course_influence"];
const SUMMARY_HEADERS: &[&str] = &["threshold", "density", "giant_component_ratio"];
const SENSITIVITY_HEADERS: &[&str] = &[
    "threshold",
    "rank_correlation",
    "relative_density",
    "relative_giant_component_ratio",
    "abs_delta_rank_correlation",
    "abs_delta_density",
    "abs_delta_giant_component_ratio",
];

/// File name of the influence table for `threshold` swept at `precision`.
#[must_use]
pub fn influence_file_name(threshold: f64, precision: u32) -> String {
    format!("{INFLUENCE_PREFIX}{}.csv", format_threshold(threshold, precision))
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Read the course × skill association matrix.
///
/// `id_column` names the header holding course ids; every other column is a
/// skill. Every cell must hold a number; an empty cell is an error.
///
/// # Errors
///
/// - [`AnalysisError::MissingColumn`] if `id_column` is not in the header.
/// - [`AnalysisError::ShapeMismatch`] for rows with the wrong field count or
///   duplicate course ids.
/// - [`AnalysisError::InvalidValue`] for non-numeric cells.
/// - [`AnalysisError::Csv`] if the file cannot be opened or parsed.
#[instrument]
pub fn read_matrix(path: &Path, id_column: &str) -> Result<AssociationMatrix> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    let id_idx = headers
        .iter()
        .position(|h| h == id_column)
        .ok_or_else(|| AnalysisError::MissingColumn {
            path: path.display().to_string(),
            column: id_column.to_string(),
        })?;

    let skill_ids: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != id_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut course_ids = Vec::new();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map_or(0, csv::Position::line);

        if record.len() != headers.len() {
            return Err(AnalysisError::ShapeMismatch(format!(
                "{} line {line} has {} fields, header has {}",
                path.display(),
                record.len(),
                headers.len()
            )));
        }

        let mut row = Vec::with_capacity(skill_ids.len());
        for (i, field) in record.iter().enumerate() {
            if i == id_idx {
                continue;
            }
            let value = parse_cell(field).ok_or_else(|| AnalysisError::InvalidValue {
                path: path.display().to_string(),
                line,
                column: headers.get(i).unwrap_or_default().to_string(),
                value: field.to_string(),
            })?;
            row.push(value);
        }

        course_ids.push(record.get(id_idx).unwrap_or_default().to_string());
        rows.push(row);
    }

    debug!(
        courses = course_ids.len(),
        skills = skill_ids.len(),
        "loaded association matrix"
    );
    AssociationMatrix::from_rows(course_ids, skill_ids, &rows)
}

/// Read the course catalog (`id`, `course_label`).
///
/// # Errors
///
/// Returns [`AnalysisError::MissingColumn`] if either column is absent and
/// [`AnalysisError::Csv`] if the file cannot be parsed.
#[instrument]
pub fn read_catalog(path: &Path) -> Result<CourseCatalog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnalysisError::MissingColumn {
                path: path.display().to_string(),
                column: name.to_string(),
            })
    };
    let id_idx = column(CATALOG_ID_COLUMN)?;
    let label_idx = column(CATALOG_LABEL_COLUMN)?;

    let mut pairs = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let id = record.get(id_idx).unwrap_or_default().to_string();
        let label = record.get(label_idx).unwrap_or_default().to_string();
        pairs.push((id, label));
    }

    let catalog = CourseCatalog::from_pairs(pairs);
    debug!(entries = catalog.len(), "loaded course catalog");
    Ok(catalog)
}

fn parse_cell(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| !v.is_nan())
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Write the influence table for one threshold into `dir`.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] / [`AnalysisError::Csv`] on write failure.
pub fn write_influence_table(
    dir: &Path,
    threshold: f64,
    precision: u32,
    rows: &[CourseInfluence],
) -> Result<PathBuf> {
    let path = dir.join(influence_file_name(threshold, precision));
    write_rows(&path, INFLUENCE_HEADERS, rows)?;
    Ok(path)
}

/// Read an influence table written by [`write_influence_table`].
///
/// # Errors
///
/// Returns [`AnalysisError::Csv`] if the file is missing or malformed.
pub fn read_influence_table(path: &Path) -> Result<Vec<CourseInfluence>> {
    let mut rows: Vec<CourseInfluence> = read_rows(path)?;
    for row in &mut rows {
        row.influence = row.influence.and_then(defined);
    }
    Ok(rows)
}

/// Discover every `course_data_*.csv` in `dir`, sorted by threshold.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if the directory cannot be listed.
pub fn list_influence_tables(dir: &Path) -> Result<Vec<(f64, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|source| AnalysisError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut tables = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| AnalysisError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(threshold) = name
            .strip_prefix(INFLUENCE_PREFIX)
            .and_then(|rest| rest.strip_suffix(".csv"))
        else {
            continue;
        };
        match threshold.parse::<f64>() {
            Ok(t) if t.is_finite() => tables.push((t, entry.path())),
            _ => warn!(file = name, "ignoring influence table with unparseable threshold"),
        }
    }

    tables.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(tables)
}

/// Write the per-threshold summary table into `dir`.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] / [`AnalysisError::Csv`] on write failure.
pub fn write_summary_table(dir: &Path, rows: &[ThresholdSummary]) -> Result<PathBuf> {
    let path = dir.join(SUMMARY_FILE_NAME);
    write_rows(&path, SUMMARY_HEADERS, rows)?;
    Ok(path)
}

/// Read a summary table written by [`write_summary_table`].
///
/// # Errors
///
/// Returns [`AnalysisError::Csv`] if the file is missing or malformed.
pub fn read_summary_table(path: &Path) -> Result<Vec<ThresholdSummary>> {
    let mut rows: Vec<ThresholdSummary> = read_rows(path)?;
    for row in &mut rows {
        row.density = row.density.and_then(defined);
        row.giant_component_ratio = row.giant_component_ratio.and_then(defined);
    }
    Ok(rows)
}

/// Write the sensitivity table into `dir`.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] / [`AnalysisError::Csv`] on write failure.
pub fn write_sensitivity_table(dir: &Path, rows: &[SensitivityRecord]) -> Result<PathBuf> {
    let path = dir.join(SENSITIVITY_FILE_NAME);
    write_rows(&path, SENSITIVITY_HEADERS, rows)?;
    Ok(path)
}

/// Read a sensitivity table written by [`write_sensitivity_table`].
///
/// # Errors
///
/// Returns [`AnalysisError::Csv`] if the file is missing or malformed.
pub fn read_sensitivity_table(path: &Path) -> Result<Vec<SensitivityRecord>> {
    read_rows(path)
}

/// Create `dir` (and parents) if it does not exist yet.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if creation fails.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| AnalysisError::Io {
        path: dir.display().to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Header row first, then one serialized record per row, so empty tables
/// still carry their schema.
fn write_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    writer
        .write_record(headers)
        .map_err(|e| csv_error(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|source| AnalysisError::Io {
        path: path.display().to_string(),
        source,
    })?;

    debug!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| csv_error(path, e))
}

fn csv_error(path: &Path, source: csv::Error) -> AnalysisError {
    AnalysisError::Csv {
        path: path.display().to_string(),
        source,
    }
}
