// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress plot rendering.
//!
//! One image per collection:
//! - upper panel: elapsed time at each checkpoint, one line per participant
//! - lower panels: a bar chart per leg and a ranked total-time bar chart

use crate::error::{AppError, Result};
use crate::models::{CheckpointSet, ParticipantCollection};
use crate::time_utils::{format_duration_human, format_hours_mins};
use chrono::TimeDelta;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, RGBAColor};
use std::panic;
use std::path::{Path, PathBuf};

/// Default image size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1600, 900);

/// Cumulative elapsed time of one participant at every checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSeries {
    pub label: String,
    pub race_number: u32,
    /// Elapsed time since this participant's start, per checkpoint
    pub points: Vec<TimeDelta>,
}

impl ProgressSeries {
    /// Points as `(checkpoint ordinal, hours)` for plotting.
    fn coords(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(i, d)| (i as i32, hours(*d)))
    }
}

/// What was drawn and where.
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub path: PathBuf,
    /// Series in the order they were drawn (collection insertion order)
    pub series: Vec<ProgressSeries>,
}

/// Renders a participant collection to an image file.
#[derive(Debug, Clone)]
pub struct PlotRenderer {
    title: String,
    size: (u32, u32),
}

impl PlotRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Build the progress series for a collection without drawing.
    ///
    /// Fails if the collection is empty or any participant lacks a derived
    /// value for one of the collection's checkpoints.
    pub fn series(&self, collection: &ParticipantCollection) -> Result<Vec<ProgressSeries>> {
        if collection.is_empty() {
            return Err(AppError::Render("no participants to plot".to_string()));
        }

        let expected = collection.checkpoints().len();
        collection
            .iter()
            .zip(collection.display_labels())
            .map(|(p, label)| {
                let points = p.cumulative_durations();
                if points.len() != expected {
                    return Err(AppError::Render(format!(
                        "race number {} ({}) has {} of {} checkpoint values",
                        p.race_number(),
                        p.name(),
                        points.len(),
                        expected
                    )));
                }
                Ok(ProgressSeries {
                    label,
                    race_number: p.race_number(),
                    points,
                })
            })
            .collect()
    }

    /// Draw the collection to `path`, overwriting any existing file.
    ///
    /// The backend is picked from the extension: `.svg` gives SVG, anything
    /// else PNG.
    pub fn render_to_file(
        &self,
        collection: &ParticipantCollection,
        path: &Path,
    ) -> Result<RenderReport> {
        let series = self.series(collection)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

        // Font lookups inside the backends can panic on hosts without fonts
        let drawn = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            if is_svg {
                let root = SVGBackend::new(path, self.size).into_drawing_area();
                self.draw(&root, collection, &series)
            } else {
                let root = BitMapBackend::new(path, self.size).into_drawing_area();
                self.draw(&root, collection, &series)
            }
        }));
        drawn.map_err(|_| AppError::Render("plotting backend panicked".to_string()))??;

        tracing::info!(path = %path.display(), series = series.len(), "Saved plot");
        Ok(RenderReport {
            path: path.to_path_buf(),
            series,
        })
    }

    fn draw<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
        collection: &ParticipantCollection,
        series: &[ProgressSeries],
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE).map_err(render_err)?;
        let body = root
            .titled(&self.title, font(26.0))
            .map_err(render_err)?;

        let (_, height) = body.dim_in_pixel();
        let (upper, lower) = body.split_vertically((height * 11 / 20) as i32);

        let checkpoints = collection.checkpoints();
        draw_progress(&upper, checkpoints, series)?;

        let labels: Vec<String> = series.iter().map(|s| s.label.clone()).collect();
        let colors: Vec<RGBAColor> = (0..series.len()).map(series_color).collect();

        let legs = checkpoints.leg_count();
        let panels = lower.split_evenly((1, legs + 1));
        for (leg_index, panel) in panels.iter().take(legs).enumerate() {
            let leg_no = leg_index + 1;
            let times = collection.leg_times(leg_no).ok_or_else(|| {
                AppError::Render(format!("leg {} missing from collection", leg_no))
            })?;
            let bars: Vec<Bar> = times
                .into_iter()
                .enumerate()
                .map(|(i, duration)| Bar {
                    label: labels[i].clone(),
                    duration,
                    color: colors[i],
                })
                .collect();
            let title = format!(
                "Leg {}: {} to {}",
                leg_no,
                CheckpointSet::label(&checkpoints.names()[leg_index]),
                CheckpointSet::label(&checkpoints.names()[leg_no])
            );
            draw_bars(panel, &title, &bars)?;
        }

        let totals = collection.total_times();
        let ranked: Vec<Bar> = collection
            .ranked_by_total_time()
            .into_iter()
            .map(|i| Bar {
                label: labels[i].clone(),
                duration: totals[i],
                color: colors[i],
            })
            .collect();
        if let Some(panel) = panels.last() {
            draw_bars(panel, "Total Time", &ranked)?;
        }

        root.present().map_err(render_err)?;
        Ok(())
    }
}

/// One bar in a leg or total panel.
struct Bar {
    label: String,
    duration: TimeDelta,
    color: RGBAColor,
}

fn draw_progress<DB>(
    area: &DrawingArea<DB, Shift>,
    checkpoints: &CheckpointSet,
    series: &[ProgressSeries],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let checkpoint_labels: Vec<String> = checkpoints
        .names()
        .iter()
        .map(|n| CheckpointSet::label(n))
        .collect();
    let last = (checkpoints.len() - 1) as i32;

    let all_hours = series.iter().flat_map(|s| s.coords().map(|(_, h)| h));
    let (y_lo, y_hi) = value_range(all_hours);

    let mut chart = ChartBuilder::on(area)
        .caption("Elapsed time at each checkpoint", font(20.0))
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(70)
        .build_cartesian_2d(0..last, y_lo..y_hi)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_labels(checkpoints.len())
        .x_label_formatter(&|x| {
            checkpoint_labels
                .get(*x as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_label_formatter(&|y| format_hours_mins(seconds(*y)))
        .y_desc("Time (Hours : Mins)")
        .label_style(font(14.0))
        .draw()
        .map_err(render_err)?;

    for (i, s) in series.iter().enumerate() {
        let color = series_color(i);
        chart
            .draw_series(LineSeries::new(s.coords(), color.stroke_width(2)))
            .map_err(render_err)?
            .label(s.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(2)));
        chart
            .draw_series(s.coords().map(|c| Circle::new(c, 3, color.filled())))
            .map_err(render_err)?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .label_font(font(14.0))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(render_err)?;

    Ok(())
}

fn draw_bars<DB>(area: &DrawingArea<DB, Shift>, title: &str, bars: &[Bar]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let count = bars.len() as u32;
    let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
    let (y_lo, y_hi) = bar_range(bars.iter().map(|b| hours(b.duration)));
    let fastest = bars.iter().map(|b| b.duration).min().unwrap_or(TimeDelta::zero());

    let mut chart = ChartBuilder::on(area)
        .caption(title, font(16.0))
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..count).into_segmented(), y_lo..y_hi)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|y| format_hours_mins(seconds(*y)))
        .label_style(font(12.0))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let i = i as u32;
            let mut rect = Rectangle::new(
                [
                    (SegmentValue::Exact(i), y_lo.max(0.0)),
                    (SegmentValue::Exact(i + 1), hours(bar.duration)),
                ],
                bar.color.mix(0.8).filled(),
            );
            rect.set_margin(0, 0, 4, 4);
            rect
        }))
        .map_err(render_err)?;

    let annotation = font(11.0)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let text = if bar.duration == fastest {
                format_duration_human(bar.duration)
            } else {
                format!(
                    "{} (+{})",
                    format_duration_human(bar.duration),
                    format_duration_human(bar.duration - fastest)
                )
            };
            Text::new(
                text,
                (SegmentValue::CenterOf(i as u32), hours(bar.duration)),
                annotation.clone(),
            )
        }))
        .map_err(render_err)?;

    Ok(())
}

/// Axis range covering every value, extended to include zero.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let hi = if hi <= 0.0 { 1.0 } else { hi * 1.08 };
    let lo = if lo < 0.0 { lo * 1.08 } else { 0.0 };
    (lo, hi)
}

/// Bar axis range zoomed onto the values so small gaps stay visible.
///
/// Starts just below the smallest bar and leaves headroom above the
/// largest for its annotation. Falls back to `value_range` when any value
/// is zero or negative.
fn bar_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let values: Vec<f64> = values.collect();
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if values.is_empty() || min <= 0.0 {
        return value_range(values.into_iter());
    }

    let lo = min * 0.965;
    let top = max * 1.009;
    (lo, top + (top - lo) * 0.1)
}

fn series_color(index: usize) -> RGBAColor {
    Palette99::pick(index).to_rgba()
}

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

fn hours(duration: TimeDelta) -> f64 {
    duration.num_seconds() as f64 / 3600.0
}

fn seconds(hours: f64) -> i64 {
    (hours * 3600.0).round() as i64
}

fn render_err<E: std::fmt::Display>(err: E) -> AppError {
    AppError::Render(err.to_string())
}
