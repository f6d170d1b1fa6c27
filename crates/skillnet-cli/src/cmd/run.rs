//! `skillnet run`: sweep then sensitivity in one process.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use skillnet_core::AnalysisConfig;
use tracing::info;

use super::sensitivity::{SensitivityPayload, execute_sensitivity, write_sensitivity_pretty, write_sensitivity_text};
use super::sweep::{SweepArgs, SweepReport, execute_sweep, write_sweep_pretty, write_sweep_text};
use super::BaselineOverride;
use crate::output::{OutputMode, render_mode};
use crate::plot::render_figures;

/// Arguments for `skillnet run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,

    #[command(flatten)]
    pub baseline: BaselineOverride,

    /// Also draw the sensitivity figures into the output directory.
    #[arg(long)]
    pub plot: bool,
}

impl RunArgs {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        self.sweep.apply(config);
        self.baseline.apply(config);
    }
}

/// Report payload for `skillnet run`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub sweep: SweepReport,
    pub sensitivity: SensitivityPayload,
}

/// Execute `skillnet run`.
pub fn run_run_cmd(
    args: &RunArgs,
    config_path: Option<&Path>,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path, project_root)?;
    args.apply(&mut config);
    // Reject an unswept baseline before spending time on the sweep.
    config.validate().context("invalid configuration")?;

    let run = execute_sweep(&config, project_root)?;
    let (sensitivity, _) = execute_sensitivity(
        &config,
        &run.outcome.tables,
        &run.outcome.summaries,
        &run.out_dir,
    )?;
    if args.plot {
        let figures = render_figures(
            &run.out_dir,
            config.sensitivity.baseline_threshold,
            config.sweep.precision,
            &sensitivity.records,
        )?;
        info!(figures = figures.len(), "drew sensitivity figures");
    }
    let manifest = run
        .manifest(Some(config.sensitivity.baseline_threshold))?
        .write(&run.out_dir)?;
    info!(path = %manifest.display(), "wrote run manifest");

    if quiet {
        return Ok(());
    }
    let report = RunReport {
        sweep: run.report(),
        sensitivity,
    };
    render_mode(output, &report, write_run_text, write_run_pretty)
}

fn write_run_text(report: &RunReport, w: &mut dyn Write) -> io::Result<()> {
    write_sweep_text(&report.sweep, w)?;
    writeln!(w)?;
    write_sensitivity_text(&report.sensitivity, w)
}

fn write_run_pretty(report: &RunReport, w: &mut dyn Write) -> io::Result<()> {
    write_sweep_pretty(&report.sweep, w)?;
    writeln!(w)?;
    write_sensitivity_pretty(&report.sensitivity, w)
}
