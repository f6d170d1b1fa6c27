//! `skillnet thresholds`: print the configured threshold list.

use std::path::Path;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use skillnet_core::threshold::{format_threshold, is_close};

use super::{BaselineOverride, SweepOverrides};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `skillnet thresholds`.
#[derive(Args, Debug, Default)]
pub struct ThresholdsArgs {
    #[command(flatten)]
    pub sweep: SweepOverrides,

    #[command(flatten)]
    pub baseline: BaselineOverride,
}

#[derive(Debug, Serialize)]
struct ThresholdList {
    thresholds: Vec<f64>,
    baseline_threshold: f64,
    baseline_swept: bool,
    #[serde(skip)]
    precision: u32,
}

/// Execute `skillnet thresholds`.
pub fn run_thresholds_cmd(
    args: &ThresholdsArgs,
    config_path: Option<&Path>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path, project_root)?;
    args.sweep.apply(&mut config);
    args.baseline.apply(&mut config);

    let thresholds = config.sweep.thresholds().context("invalid sweep configuration")?;
    let baseline = config.sensitivity.baseline_threshold;
    let list = ThresholdList {
        baseline_swept: thresholds.iter().any(|&t| is_close(t, baseline)),
        thresholds,
        baseline_threshold: baseline,
        precision: config.sweep.precision,
    };

    render_mode(
        output,
        &list,
        |l, w| {
            for &t in &l.thresholds {
                writeln!(w, "{}", format_threshold(t, l.precision))?;
            }
            Ok(())
        },
        |l, w| {
            pretty_section(w, "Thresholds")?;
            let rendered: Vec<String> = l.thresholds.iter().map(|&t| format_threshold(t, l.precision)).collect();
            pretty_kv(w, "count", l.thresholds.len().to_string())?;
            pretty_kv(w, "values", rendered.join(" "))?;
            let marker = if l.baseline_swept { "" } else { " (not swept)" };
            pretty_kv(w, "baseline", format!("{}{marker}", format_threshold(l.baseline_threshold, l.precision)))
        },
    )
}
