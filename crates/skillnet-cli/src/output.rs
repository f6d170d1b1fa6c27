//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: aligned tables for humans, tab-separated rows for pipes and
//! scripts, or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use serde::Serialize;
use skillnet_core::AnalysisError;
use std::io::{self, IsTerminal, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (tables, sections, visual framing).
    Pretty,
    /// Tab-separated rows with a header line.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Core resolution logic, separated from I/O for testability.
///
/// `format_flag`: explicit `--format` value if provided.
/// `json_flag`: hidden `--json` alias.
/// `format_env`: the value of `FORMAT` if set.
/// `is_tty`: true if stdout is a TTY.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    if let Some(val) = format_env {
        match val.to_lowercase().as_str() {
            "json" => return OutputMode::Json,
            "text" => return OutputMode::Text,
            "pretty" => return OutputMode::Pretty,
            _ => {} // unknown value, fall through to TTY detection
        }
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, and TTY defaults.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, json_flag, env_val.as_deref(), is_tty)
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_mode_to(&mut out, mode, value, text_fn, pretty_fn)
}

fn render_mode_to<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E2001").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }
}

impl From<&AnalysisError> for CliError {
    fn from(err: &AnalysisError) -> Self {
        let code = err.error_code();
        Self {
            message: err.to_string(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

impl From<&anyhow::Error> for CliError {
    /// Uses the outermost context as the message and the first
    /// [`AnalysisError`] in the chain for the code and hint.
    fn from(err: &anyhow::Error) -> Self {
        let analysis = err.chain().find_map(|e| e.downcast_ref::<AnalysisError>());
        let message = format!("{err:#}");
        match analysis {
            Some(analysis) => {
                let code = analysis.error_code();
                Self {
                    message,
                    suggestion: code.hint().map(str::to_string),
                    error_code: Some(code.code().to_string()),
                }
            }
            None => Self::new(message),
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    render_error_to(&mut out, mode, error)
}

fn render_error_to(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn resolve_format_flag_wins_over_json_and_env() {
        let mode = resolve_output_mode_inner(Some(OutputMode::Text), true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("text"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_format_env_case_insensitive() {
        let mode = resolve_output_mode_inner(None, false, Some("JSON"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_format_env_unknown_falls_through_to_tty() {
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("yaml"), true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("yaml"), false),
            OutputMode::Text
        );
    }

    #[test]
    fn resolve_default_no_tty_is_text() {
        assert_eq!(resolve_output_mode_inner(None, false, None, false), OutputMode::Text);
    }

    // ── render_mode ─────────────────────────────────────────────────────────

    #[derive(Serialize)]
    struct Row {
        threshold: f64,
    }

    #[test]
    fn render_json_output() {
        let mut buf = Vec::new();
        render_mode_to(
            &mut buf,
            OutputMode::Json,
            &Row { threshold: 0.6 },
            |_, _| Ok(()),
            |_, _| Ok(()),
        )
        .expect("render");
        let parsed: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(parsed["threshold"], serde_json::json!(0.6));
    }

    #[test]
    fn render_text_and_pretty_use_their_closures() {
        let row = Row { threshold: 0.6 };
        let mut text = Vec::new();
        render_mode_to(
            &mut text,
            OutputMode::Text,
            &row,
            |r, w| writeln!(w, "text {:.2}", r.threshold),
            |_, w| writeln!(w, "pretty"),
        )
        .expect("text");
        assert_eq!(String::from_utf8(text).expect("utf8"), "text 0.60\n");

        let mut pretty = Vec::new();
        render_mode_to(
            &mut pretty,
            OutputMode::Pretty,
            &row,
            |_, w| writeln!(w, "text"),
            |_, w| writeln!(w, "pretty"),
        )
        .expect("pretty");
        assert_eq!(String::from_utf8(pretty).expect("utf8"), "pretty\n");
    }

    // ── errors ──────────────────────────────────────────────────────────────

    #[test]
    fn cli_error_from_analysis_error() {
        let err = AnalysisError::Configuration("baseline 0.61 not swept".into());
        let cli: CliError = (&err).into();
        assert_eq!(cli.error_code.as_deref(), Some("E2001"));
        assert!(cli.message.contains("baseline 0.61"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn cli_error_finds_analysis_error_under_context() {
        let err = Err::<(), _>(AnalysisError::DegenerateBaseline("flat".into()))
            .context("sensitivity analysis failed")
            .expect_err("error");
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2002"));
        assert!(cli.message.starts_with("sensitivity analysis failed"));
    }

    #[test]
    fn cli_error_without_analysis_error_has_no_code() {
        let err = anyhow::anyhow!("plain failure");
        let cli = CliError::from(&err);
        assert!(cli.error_code.is_none());
        assert_eq!(cli.message, "plain failure");
    }

    #[test]
    fn render_error_json() {
        let mut buf = Vec::new();
        let err = AnalysisError::Configuration("bad".into());
        render_error_to(&mut buf, OutputMode::Json, &CliError::from(&err)).expect("render");
        let parsed: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(parsed["error"]["error_code"], "E2001");
    }

    #[test]
    fn render_error_human() {
        let mut buf = Vec::new();
        render_error_to(&mut buf, OutputMode::Text, &CliError::new("boom")).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "error: boom\n");
    }
}
