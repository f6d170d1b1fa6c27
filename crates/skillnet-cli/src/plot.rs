//! Sensitivity figures.
//!
//! Three line charts over the swept thresholds, written as SVG next to
//! `sensitivity.csv`:
//!
//! | File | Series | y axis |
//! |------|--------|--------|
//! | [`RELATIVE_FIGURE`] | relative density, relative giant component ratio | log, reference line at 1 |
//! | [`RANK_FIGURE`] | rank correlation against the baseline | 0 to 1 |
//! | [`CHANGE_FIGURE`] | the three absolute changes | 0 to 2 |
//!
//! Undefined values and values outside the y axis leave a gap in the line.

use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use skillnet_core::SensitivityRecord;
use skillnet_core::threshold::{format_threshold, threshold_decimals};
use tracing::debug;

pub const RELATIVE_FIGURE: &str = "relative_structure.svg";
pub const RANK_FIGURE: &str = "rank_correlation.svg";
pub const CHANGE_FIGURE: &str = "absolute_change.svg";

const SIZE: (u32, u32) = (800, 600);
const DENSITY_COLOR: RGBColor = RGBColor(31, 119, 180);
const RATIO_COLOR: RGBColor = RGBColor(255, 127, 14);
const RANK_COLOR: RGBColor = RGBColor(44, 160, 44);

type Points = Vec<(f64, Option<f64>)>;

/// Render all three figures into `dir` and return their paths.
///
/// # Errors
///
/// Returns an error if a figure cannot be drawn or written.
pub fn render_figures(
    dir: &Path,
    baseline: f64,
    precision: u32,
    records: &[SensitivityRecord],
) -> Result<Vec<PathBuf>> {
    let x = x_range(records);
    let decimals = threshold_decimals(precision);
    let base = format_threshold(baseline, precision);

    let relative = dir.join(RELATIVE_FIGURE);
    draw_relative(&relative, x.clone(), decimals, records)
        .with_context(|| format!("failed to draw {}", relative.display()))?;

    let rank = dir.join(RANK_FIGURE);
    draw_rank(&rank, x.clone(), decimals, records)
        .with_context(|| format!("failed to draw {}", rank.display()))?;

    let change = dir.join(CHANGE_FIGURE);
    draw_change(&change, x, decimals, &base, records)
        .with_context(|| format!("failed to draw {}", change.display()))?;

    let files = vec![relative, rank, change];
    debug!(figures = files.len(), dir = %dir.display(), "rendered sensitivity figures");
    Ok(files)
}

fn draw_relative(
    path: &Path,
    x: Range<f64>,
    decimals: usize,
    records: &[SensitivityRecord],
) -> Result<()> {
    let positive = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);
    let density = points(records, |r| positive(r.relative_density));
    let ratio = points(records, |r| positive(r.relative_giant_component_ratio));
    let y = log_bounds(density.iter().chain(&ratio).filter_map(|&(_, v)| v));

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Relative density and giant component ratio", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x.clone(), y.log_scale())?;

    chart
        .configure_mesh()
        .x_desc("Threshold")
        .y_desc("Value")
        .x_label_formatter(&|t| format!("{t:.decimals$}"))
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(x.start, 1.0), (x.end, 1.0)],
        BLACK.mix(0.6),
    )))?;
    draw_line(&mut chart, "Relative density", DENSITY_COLOR, &density)?;
    draw_line(&mut chart, "Relative giant component ratio", RATIO_COLOR, &ratio)?;
    draw_legend(&mut chart)?;

    root.present()?;
    Ok(())
}

fn draw_rank(
    path: &Path,
    x: Range<f64>,
    decimals: usize,
    records: &[SensitivityRecord],
) -> Result<()> {
    let y = 0.0..1.05;
    let rank = points(records, |r| within(r.rank_correlation, &y));

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Rank correlation with the baseline", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x, y)?;

    chart
        .configure_mesh()
        .x_desc("Threshold")
        .y_desc("Rank correlation")
        .x_label_formatter(&|t| format!("{t:.decimals$}"))
        .draw()?;

    draw_line(&mut chart, "Rank correlation", RANK_COLOR, &rank)?;

    root.present()?;
    Ok(())
}

fn draw_change(
    path: &Path,
    x: Range<f64>,
    decimals: usize,
    base: &str,
    records: &[SensitivityRecord],
) -> Result<()> {
    let y = 0.0..2.0;
    let rank = points(records, |r| within(r.abs_delta_rank_correlation, &y));
    let density = points(records, |r| within(r.abs_delta_density, &y));
    let ratio = points(records, |r| within(r.abs_delta_giant_component_ratio, &y));

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Absolute change against the baseline", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x, y)?;

    chart
        .configure_mesh()
        .x_desc("Threshold")
        .y_desc("Absolute change")
        .x_label_formatter(&|t| format!("{t:.decimals$}"))
        .draw()?;

    draw_line(&mut chart, &format!("|Δρ / ρ({base})|"), RANK_COLOR, &rank)?;
    draw_line(&mut chart, &format!("|Δd / d({base})|"), DENSITY_COLOR, &density)?;
    draw_line(&mut chart, &format!("|Δr / r({base})|"), RATIO_COLOR, &ratio)?;
    draw_legend(&mut chart)?;

    root.present()?;
    Ok(())
}

/// Line segments between consecutive defined points, plus a marker on each.
fn draw_line<'a, DB, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
    label: &str,
    color: RGBColor,
    points: &[(f64, Option<f64>)],
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64>,
{
    for segment in segments(points) {
        chart.draw_series(LineSeries::new(segment, color))?;
    }
    chart
        .draw_series(
            points
                .iter()
                .filter_map(|&(x, y)| y.map(|y| Circle::new((x, y), 3, color.filled()))),
        )?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    Ok(())
}

fn draw_legend<'a, DB, Y>(chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64>,
{
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn points(records: &[SensitivityRecord], value: impl Fn(&SensitivityRecord) -> Option<f64>) -> Points {
    records.iter().map(|r| (r.threshold, value(r))).collect()
}

fn within(value: Option<f64>, range: &Range<f64>) -> Option<f64> {
    value.filter(|v| range.contains(v))
}

/// Runs of consecutive defined points.
fn segments(points: &[(f64, Option<f64>)]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in points {
        match y {
            Some(y) => current.push((x, y)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn x_range(records: &[SensitivityRecord]) -> Range<f64> {
    let (lo, hi) = records
        .iter()
        .map(|r| r.threshold)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(t), hi.max(t)));
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((hi - lo) * 0.05).max(0.01);
    (lo - pad)..(hi + pad)
}

/// Log-axis bounds covering every value and the reference line at 1.
fn log_bounds(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((1.0_f64, 1.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (lo * 0.8)..(hi * 1.25)
}
