use std::fmt;

/// Machine-readable error codes for scripted consumers of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ShapeMismatch,
    InvalidValue,
    MissingColumn,
    ConfigurationError,
    DegenerateBaseline,
    InvalidThreshold,
    IoFailed,
    CsvFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ShapeMismatch => "E1001",
            Self::InvalidValue => "E1002",
            Self::MissingColumn => "E1003",
            Self::ConfigurationError => "E2001",
            Self::DegenerateBaseline => "E2002",
            Self::InvalidThreshold => "E2003",
            Self::IoFailed => "E5001",
            Self::CsvFailed => "E5002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ShapeMismatch => "Course identifiers and matrix shape disagree",
            Self::InvalidValue => "Non-numeric association value",
            Self::MissingColumn => "Required column missing",
            Self::ConfigurationError => "Invalid sweep configuration",
            Self::DegenerateBaseline => "Baseline value cannot be used as a divisor",
            Self::InvalidThreshold => "Threshold is not a finite number",
            Self::IoFailed => "File read or write failed",
            Self::CsvFailed => "Malformed CSV input",
        }
    }

    /// Optional remediation hint that can be surfaced to the analyst.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ShapeMismatch => {
                Some("Check that every matrix row has one value per skill column and ids are unique.")
            }
            Self::InvalidValue => Some("Association cells must be numbers; leave a cell empty for no value."),
            Self::MissingColumn => Some("Pass --id-column or fix the CSV header row."),
            Self::ConfigurationError => {
                Some("Fix [sweep]/[sensitivity] in skillnet.toml; the baseline must be a swept threshold.")
            }
            Self::DegenerateBaseline => {
                Some("The baseline rank correlation must be a finite, non-zero divisor.")
            }
            Self::InvalidThreshold => None,
            Self::IoFailed => Some("Check that the path exists and is writable."),
            Self::CsvFailed => Some("Re-export the file as comma-separated UTF-8 with a header row."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by loading, validating, and analysing course networks.
///
/// Undefined metrics (influence of an isolated course, rank correlation with
/// no variance) are not errors; they travel as `None` values.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Course identifiers, matrix rows, and per-course vectors are not row-aligned.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A matrix cell could not be parsed as a number.
    #[error("invalid value {value:?} in {path} at line {line}, column {column:?}")]
    InvalidValue {
        path: String,
        line: u64,
        column: String,
        value: String,
    },

    /// A required CSV column is absent from the header row.
    #[error("missing column {column:?} in {path}")]
    MissingColumn { path: String, column: String },

    /// The sweep or sensitivity configuration is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A baseline value used as a divisor is zero or undefined.
    #[error("degenerate baseline: {0}")]
    DegenerateBaseline(String),

    /// A threshold is NaN or infinite.
    #[error("invalid threshold {0}: must be finite")]
    InvalidThreshold(f64),

    /// Filesystem failure on a specific path.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV reader or writer failure on a specific path.
    #[error("CSV error on {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl AnalysisError {
    /// The stable code for this error kind.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ShapeMismatch(_) => ErrorCode::ShapeMismatch,
            Self::InvalidValue { .. } => ErrorCode::InvalidValue,
            Self::MissingColumn { .. } => ErrorCode::MissingColumn,
            Self::Configuration(_) => ErrorCode::ConfigurationError,
            Self::DegenerateBaseline(_) => ErrorCode::DegenerateBaseline,
            Self::InvalidThreshold(_) => ErrorCode::InvalidThreshold,
            Self::Io { .. } => ErrorCode::IoFailed,
            Self::Csv { .. } => ErrorCode::CsvFailed,
        }
    }

    /// Whether the error should abort the whole run rather than a single threshold.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidThreshold(_))
    }
}

/// Convenience alias used across the skillnet crates.
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
