// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mighty Hike Plotter: compare participants' progress through a hike
//!
//! This crate looks up participants on the public results site by race
//! number, parses their checkpoint times, and renders a comparison plot.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use error::Result;
use models::{Location, ParticipantCollection};
use services::{BatchOutcome, ResultsProcessor, ResultsSource};

/// Fetch every race number and build a collection.
///
/// Failures are collected per race number; the caller decides whether to
/// plot what succeeded.
pub fn collect_participants<S: ResultsSource>(
    source: S,
    config: &config::Config,
    location: Location,
    race_numbers: &[u32],
) -> BatchOutcome {
    ResultsProcessor::new(source, config.checkpoints.clone()).process(location, race_numbers)
}

/// Plot title for a location and year, e.g. "Mighty Hike Jurassic Coast 2024".
pub fn plot_title(location: Location, year: i32) -> String {
    format!("Mighty Hike {} {}", location.name, year)
}

/// Render a collection to `<output_dir>/<EventName>_<Year>_plot.png`.
pub fn render_default(
    collection: &ParticipantCollection,
    config: &config::Config,
    location: Location,
) -> Result<services::RenderReport> {
    let path = config
        .output_dir
        .join(location.plot_filename(config.event_year));
    services::PlotRenderer::new(plot_title(location, config.event_year))
        .render_to_file(collection, &path)
}
