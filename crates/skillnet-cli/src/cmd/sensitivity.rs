//! `skillnet sensitivity`: compare a previous sweep against a baseline threshold.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use skillnet_core::threshold::format_threshold;
use skillnet_core::{AnalysisConfig, InfluenceTable, SensitivityRecord, ThresholdSummary, io as store};
use skillnet_network::{analyze_sensitivity, load_sweep};

use super::{BaselineOverride, OutputDirOverride, fmt_metric, resolve, tsv_metric};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `skillnet sensitivity`.
#[derive(Args, Debug, Default)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub baseline: BaselineOverride,

    #[command(flatten)]
    pub output: OutputDirOverride,
}

impl SensitivityArgs {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        self.baseline.apply(config);
        self.output.apply(config);
    }
}

/// Report payload for `skillnet sensitivity`.
#[derive(Debug, Serialize)]
pub struct SensitivityPayload {
    pub baseline_threshold: f64,
    pub file: String,
    pub records: Vec<SensitivityRecord>,
    #[serde(skip)]
    pub precision: u32,
}

/// Analyze `tables`/`summaries` and persist `sensitivity.csv` into `out_dir`.
pub fn execute_sensitivity(
    config: &AnalysisConfig,
    tables: &[InfluenceTable],
    summaries: &[ThresholdSummary],
    out_dir: &Path,
) -> anyhow::Result<(SensitivityPayload, PathBuf)> {
    let report = analyze_sensitivity(&config.sensitivity, tables, summaries)
        .context("sensitivity analysis failed")?;
    let path = store::write_sensitivity_table(out_dir, &report.records)
        .with_context(|| format!("failed to write sensitivity table into {}", out_dir.display()))?;

    let payload = SensitivityPayload {
        baseline_threshold: report.baseline_threshold,
        file: path.display().to_string(),
        records: report.records,
        precision: config.sweep.precision,
    };
    Ok((payload, path))
}

/// Execute `skillnet sensitivity`.
pub fn run_sensitivity_cmd(
    args: &SensitivityArgs,
    config_path: Option<&Path>,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path, project_root)?;
    args.apply(&mut config);

    let out_dir = resolve(project_root, &config.output.dir);
    let (tables, summaries) = load_sweep(&out_dir)
        .with_context(|| format!("failed to read sweep results from {}", out_dir.display()))?;
    let (payload, _) = execute_sensitivity(&config, &tables, &summaries, &out_dir)?;

    if quiet {
        return Ok(());
    }
    render_mode(output, &payload, write_sensitivity_text, write_sensitivity_pretty)
}

pub fn write_sensitivity_text(payload: &SensitivityPayload, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "threshold\trank_correlation\trelative_density\trelative_giant_component_ratio\t\
         abs_delta_rank_correlation\tabs_delta_density\tabs_delta_giant_component_ratio"
    )?;
    for r in &payload.records {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            format_threshold(r.threshold, payload.precision),
            tsv_metric(r.rank_correlation),
            tsv_metric(r.relative_density),
            tsv_metric(r.relative_giant_component_ratio),
            tsv_metric(r.abs_delta_rank_correlation),
            tsv_metric(r.abs_delta_density),
            tsv_metric(r.abs_delta_giant_component_ratio),
        )?;
    }
    Ok(())
}

pub fn write_sensitivity_pretty(payload: &SensitivityPayload, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Threshold sensitivity")?;
    pretty_kv(w, "baseline", format_threshold(payload.baseline_threshold, payload.precision))?;
    pretty_kv(w, "written", &payload.file)?;
    writeln!(w)?;
    writeln!(
        w,
        "{:>9}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
        "threshold", "rho", "rel d", "rel r", "|Δrho|", "|Δd|", "|Δr|"
    )?;
    pretty_rule(w)?;
    for r in &payload.records {
        writeln!(
            w,
            "{:>9}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
            format_threshold(r.threshold, payload.precision),
            fmt_metric(r.rank_correlation),
            fmt_metric(r.relative_density),
            fmt_metric(r.relative_giant_component_ratio),
            fmt_metric(r.abs_delta_rank_correlation),
            fmt_metric(r.abs_delta_density),
            fmt_metric(r.abs_delta_giant_component_ratio),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_has_one_row_per_record() {
        let payload = SensitivityPayload {
            baseline_threshold: 0.6,
            file: "sensitivity.csv".into(),
            records: vec![SensitivityRecord {
                threshold: 0.6,
                rank_correlation: Some(1.0),
                relative_density: Some(1.0),
                relative_giant_component_ratio: Some(1.0),
                abs_delta_rank_correlation: Some(0.0),
                abs_delta_density: Some(0.0),
                abs_delta_giant_component_ratio: None,
            }],
            precision: 2,
        };
        let mut buf = Vec::new();
        write_sensitivity_text(&payload, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split('\t').count(), 7);
        assert_eq!(lines[1], "0.60\t1\t1\t1\t0\t0\t");
    }
}
