//! Content hashing for run provenance.
//!
//! A results directory records the BLAKE3 hash of each input file so the
//! tables can be traced back to the exact matrix and catalog they came from.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// BLAKE3 hash of a file's bytes, formatted as `blake3:<hex>`.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if the file cannot be read.
pub fn content_hash(path: &Path) -> Result<String> {
    let io_error = |source| AnalysisError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut BufReader::new(file), &mut hasher).map_err(io_error)?;
    Ok(format!("blake3:{}", hasher.finalize()))
}
