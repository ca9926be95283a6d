// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - fetching, processing and rendering.

pub mod plot;
pub mod processor;
pub mod results;

pub use plot::{PlotRenderer, ProgressSeries, RenderReport};
pub use processor::{BatchOutcome, ResultsProcessor};
pub use results::{ManualResults, ResultsClient, ResultsSource};
