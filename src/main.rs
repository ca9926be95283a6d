// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mighty Hike Plotter CLI
//!
//! Looks up a group of participants on the results site and saves a plot
//! comparing their progress through the event.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use mighty_hike_plotter::{
    cli,
    config::Config,
    models::Location,
    services::{BatchOutcome, ManualResults, PlotRenderer, ResultsClient},
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot Mighty Hike results for a group of participants", long_about = None)]
struct Args {
    /// Location id (prompted for when omitted)
    #[arg(short, long)]
    location: Option<u32>,

    /// Race numbers to look up (prompted for when omitted)
    #[arg(short = 'n', long = "race-number")]
    race_numbers: Vec<u32>,

    /// JSON file of manually supplied results, used instead of the results site
    #[arg(long, value_hint = ValueHint::FilePath)]
    from_file: Option<PathBuf>,

    /// Output image path (defaults to <EventName>_<Year>_plot.png in OUTPUT_DIR)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Event year used in the title and default filename
    #[arg(long)]
    year: Option<i32>,

    /// Plot the participants that succeeded even if some race numbers failed
    #[arg(long, action = ArgAction::SetTrue)]
    allow_partial: bool,

    /// List known locations and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list_locations: bool,

    /// Enable debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(year) = args.year {
        config.event_year = year;
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    if args.list_locations {
        cli::print_locations(&mut out)?;
        return Ok(());
    }

    let location = match args.location {
        Some(id) => Location::from_id(id)?,
        None => {
            println!("+----------------------+");
            println!("|  Mighty Hike Plotter |");
            println!("+----------------------+");
            println!();
            cli::print_locations(&mut out)?;
            cli::ask_for_location(&mut input, &mut out)?
        }
    };
    tracing::info!(location = %location, year = config.event_year, "Selected event");

    let outcome = match &args.from_file {
        Some(path) => {
            let manual = ManualResults::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            let race_numbers = if args.race_numbers.is_empty() {
                manual.race_numbers().to_vec()
            } else {
                args.race_numbers.clone()
            };
            mighty_hike_plotter::collect_participants(manual, &config, location, &race_numbers)
        }
        None => {
            let race_numbers = if args.race_numbers.is_empty() {
                cli::ask_for_race_numbers(&mut input, &mut out)?
            } else {
                args.race_numbers.clone()
            };
            let client = ResultsClient::new(&config)?;
            mighty_hike_plotter::collect_participants(client, &config, location, &race_numbers)
        }
    };

    report(&outcome, args.allow_partial);
    let failed = outcome.failures.len();
    let requested = failed + outcome.collection.len();
    let collection = outcome
        .into_collection(args.allow_partial)
        .with_context(|| format!("{} of {} race numbers failed", failed, requested))?;

    let rendered = match &args.output {
        Some(path) => PlotRenderer::new(mighty_hike_plotter::plot_title(location, config.event_year))
            .render_to_file(&collection, path)?,
        None => mighty_hike_plotter::render_default(&collection, &config, location)?,
    };
    println!("Saved plot as {}", rendered.path.display());

    Ok(())
}

/// Tell the user what succeeded and what did not.
///
/// Failures are listed only when the run goes on to plot; otherwise the
/// first one is returned from `main`.
fn report(outcome: &BatchOutcome, allow_partial: bool) {
    for participant in outcome.collection.iter() {
        println!(
            "Parsed race number {} -> {}",
            participant.race_number(),
            participant.name()
        );
    }
    for warning in &outcome.warnings {
        eprintln!("Warning: {}", warning);
    }
    if outcome.can_plot(allow_partial) {
        for (_, err) in &outcome.failures {
            eprintln!("Skipped: {}", err);
        }
    }
}

/// Initialize logging to stderr; `LOG_FORMAT=json` selects JSON lines.
fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "mighty_hike_plotter=debug"
    } else {
        "mighty_hike_plotter=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{}", default_directive)));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true)
                    .with_writer(io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init()
    };
}
