//! `skillnet sweep`: build and measure the course network at every threshold.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use skillnet_core::threshold::format_threshold;
use skillnet_core::{AnalysisConfig, ThresholdSummary, io as store};
use skillnet_network::{CsvSink, SweepOutcome, run_sweep};
use tracing::info;

use super::{InputOverrides, Inputs, OutputDirOverride, SweepOverrides, fmt_metric, load_inputs, resolve, tsv_metric};
use crate::manifest::{InputFingerprint, RunManifest};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `skillnet sweep`.
#[derive(Args, Debug, Default)]
pub struct SweepArgs {
    #[command(flatten)]
    pub input: InputOverrides,

    #[command(flatten)]
    pub sweep: SweepOverrides,

    #[command(flatten)]
    pub output: OutputDirOverride,
}

impl SweepArgs {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        self.input.apply(config);
        self.sweep.apply(config);
        self.output.apply(config);
    }
}

/// Report payload for `skillnet sweep`.
#[derive(Debug, Serialize)]
pub struct SweepReport {
    pub output_dir: String,
    pub courses: usize,
    pub skills: usize,
    pub thresholds: Vec<ThresholdSummary>,
    pub failed_thresholds: Vec<f64>,
    pub files: Vec<String>,
    #[serde(skip)]
    pub precision: u32,
}

/// Everything a sweep leaves behind for the caller.
pub struct SweepRun {
    pub precision: u32,
    pub inputs: Inputs,
    pub out_dir: PathBuf,
    pub outcome: SweepOutcome,
    pub files: Vec<PathBuf>,
}

impl SweepRun {
    pub fn report(&self) -> SweepReport {
        let (courses, skills) = self.inputs.matrix.shape();
        SweepReport {
            output_dir: self.out_dir.display().to_string(),
            courses,
            skills,
            thresholds: self.outcome.summaries.clone(),
            failed_thresholds: self.outcome.failed.clone(),
            files: self.files.iter().map(|p| p.display().to_string()).collect(),
            precision: self.precision,
        }
    }

    /// Manifest for this sweep; `baseline` is set when sensitivity ran too.
    pub fn manifest(&self, baseline: Option<f64>) -> anyhow::Result<RunManifest> {
        let (courses, skills) = self.inputs.matrix.shape();
        Ok(RunManifest {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now(),
            matrix: InputFingerprint::of(&self.inputs.matrix_path)?,
            catalog: InputFingerprint::of(&self.inputs.catalog_path)?,
            courses,
            skills,
            thresholds: self.outcome.summaries.iter().map(|s| s.threshold).collect(),
            baseline_threshold: baseline,
            failed_thresholds: self.outcome.failed.clone(),
        })
    }
}

/// Load inputs, sweep, and persist the per-threshold and summary tables.
pub fn execute_sweep(config: &AnalysisConfig, project_root: &Path) -> anyhow::Result<SweepRun> {
    let inputs = load_inputs(config, project_root)?;
    let out_dir = resolve(project_root, &config.output.dir);
    store::ensure_dir(&out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let mut sink = CsvSink::new(&out_dir, config.sweep.precision);
    let outcome = run_sweep(&inputs.matrix, &inputs.catalog, &config.sweep, &mut sink)
        .context("threshold sweep failed")?;
    let files = sink.written().to_vec();

    Ok(SweepRun {
        precision: config.sweep.precision,
        inputs,
        out_dir,
        outcome,
        files,
    })
}

/// Execute `skillnet sweep`.
pub fn run_sweep_cmd(
    args: &SweepArgs,
    config_path: Option<&Path>,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path, project_root)?;
    args.apply(&mut config);
    config.sweep.validate().context("invalid sweep configuration")?;

    let run = execute_sweep(&config, project_root)?;
    let manifest = run.manifest(None)?.write(&run.out_dir)?;
    info!(path = %manifest.display(), "wrote run manifest");

    if quiet {
        return Ok(());
    }
    render_mode(output, &run.report(), write_sweep_text, write_sweep_pretty)
}

pub fn write_sweep_text(report: &SweepReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "threshold\tdensity\tgiant_component_ratio")?;
    for row in &report.thresholds {
        writeln!(
            w,
            "{}\t{}\t{}",
            format_threshold(row.threshold, report.precision),
            tsv_metric(row.density),
            tsv_metric(row.giant_component_ratio)
        )?;
    }
    Ok(())
}

pub fn write_sweep_pretty(report: &SweepReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Threshold sweep")?;
    pretty_kv(w, "courses", report.courses.to_string())?;
    pretty_kv(w, "skills", report.skills.to_string())?;
    pretty_kv(w, "output", &report.output_dir)?;
    writeln!(w)?;
    writeln!(w, "{:>9}  {:>10}  {:>12}", "threshold", "density", "giant ratio")?;
    pretty_rule(w)?;
    for row in &report.thresholds {
        writeln!(
            w,
            "{:>9}  {:>10}  {:>12}",
            format_threshold(row.threshold, report.precision),
            fmt_metric(row.density),
            fmt_metric(row.giant_component_ratio)
        )?;
    }
    if !report.failed_thresholds.is_empty() {
        writeln!(w)?;
        let failed: Vec<String> = report
            .failed_thresholds
            .iter()
            .map(|&t| format_threshold(t, report.precision))
            .collect();
        pretty_kv(w, "failed", failed.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SweepReport {
        SweepReport {
            output_dir: "out".into(),
            courses: 3,
            skills: 2,
            thresholds: vec![
                ThresholdSummary {
                    threshold: 0.5,
                    density: Some(0.5),
                    giant_component_ratio: Some(1.0),
                },
                ThresholdSummary::missing(0.52),
            ],
            failed_thresholds: vec![0.52],
            files: Vec::new(),
            precision: 2,
        }
    }

    #[test]
    fn text_rows_leave_missing_metrics_empty() {
        let mut buf = Vec::new();
        write_sweep_text(&report(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "threshold\tdensity\tgiant_component_ratio");
        assert_eq!(lines[1], "0.50\t0.5\t1");
        assert_eq!(lines[2], "0.52\t\t");
    }

    #[test]
    fn pretty_lists_failed_thresholds() {
        let mut buf = Vec::new();
        write_sweep_pretty(&report(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Threshold sweep"));
        assert!(text.contains("failed:"));
        assert!(text.contains("0.52"));
    }
}
