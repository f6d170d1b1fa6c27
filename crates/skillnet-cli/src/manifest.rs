//! `manifest.json`: provenance for a results directory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillnet_core::hash::content_hash;

pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// A hashed input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFingerprint {
    pub path: String,
    /// `blake3:<hex>` of the file contents.
    pub hash: String,
}

impl InputFingerprint {
    pub fn of(path: &Path) -> anyhow::Result<Self> {
        let hash = content_hash(path).with_context(|| format!("failed to hash {}", path.display()))?;
        Ok(Self {
            path: path.display().to_string(),
            hash,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub tool_version: String,
    pub created_at: DateTime<Utc>,
    pub matrix: InputFingerprint,
    pub catalog: InputFingerprint,
    pub courses: usize,
    pub skills: usize,
    pub thresholds: Vec<f64>,
    /// Set when the run included the sensitivity analysis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_threshold: Option<f64>,
    pub failed_thresholds: Vec<f64>,
}

impl RunManifest {
    /// Write the manifest into `dir`, replacing any previous one.
    pub fn write(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("failed to write {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}
