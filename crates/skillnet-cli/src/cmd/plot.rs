//! `skillnet plot`: draw the sensitivity figures from `sensitivity.csv`.

use std::path::Path;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use skillnet_core::io::{self as store, SENSITIVITY_FILE_NAME};

use super::{BaselineOverride, OutputDirOverride, resolve};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::plot::render_figures;

/// Arguments for `skillnet plot`.
#[derive(Args, Debug, Default)]
pub struct PlotArgs {
    #[command(flatten)]
    pub baseline: BaselineOverride,

    #[command(flatten)]
    pub output: OutputDirOverride,
}

#[derive(Debug, Serialize)]
struct PlotReport {
    source: String,
    figures: Vec<String>,
}

/// Execute `skillnet plot`.
pub fn run_plot_cmd(
    args: &PlotArgs,
    config_path: Option<&Path>,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path, project_root)?;
    args.baseline.apply(&mut config);
    args.output.apply(&mut config);

    let out_dir = resolve(project_root, &config.output.dir);
    let source = out_dir.join(SENSITIVITY_FILE_NAME);
    let records = store::read_sensitivity_table(&source)
        .with_context(|| format!("failed to read {}", source.display()))?;
    let figures = render_figures(
        &out_dir,
        config.sensitivity.baseline_threshold,
        config.sweep.precision,
        &records,
    )?;

    if quiet {
        return Ok(());
    }
    let report = PlotReport {
        source: source.display().to_string(),
        figures: figures.iter().map(|p| p.display().to_string()).collect(),
    };
    render_mode(
        output,
        &report,
        |r, w| {
            for figure in &r.figures {
                writeln!(w, "{figure}")?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, "Sensitivity figures")?;
            pretty_kv(w, "source", &r.source)?;
            for figure in &r.figures {
                pretty_kv(w, "written", figure)?;
            }
            Ok(())
        },
    )
}
