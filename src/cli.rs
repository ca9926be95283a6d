// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interactive prompts for the location and race numbers.
//!
//! Generic over the reader and writer so they can be driven from tests.

use crate::error::{AppError, Result};
use crate::models::Location;
use std::io::{BufRead, Write};

/// Answers that stop the "add more race numbers" loop.
const NO_MORE: [&str; 3] = ["", "n", "no"];

/// Print the table of known locations.
pub fn print_locations<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Mighty Hike locations:")?;
    writeln!(out)?;
    for location in Location::all() {
        writeln!(out, "{} : {}", location.id, location.name)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Ask for a location id until a known one is entered.
pub fn ask_for_location<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Location> {
    let mut prompt = "Enter the location id:";
    loop {
        let line = read_answer(input, out, prompt)?;
        let location = line
            .parse::<u32>()
            .ok()
            .and_then(|id| Location::from_id(id).ok());
        if let Some(location) = location {
            return Ok(location);
        }
        prompt = "Could not find that location id.\nPlease enter a valid location id:";
    }
}

/// Ask for a single positive race number until one parses.
pub fn ask_for_race_number<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<u32> {
    let mut prompt = "Enter a race number:";
    loop {
        let line = read_answer(input, out, prompt)?;
        match line.parse::<u32>() {
            Ok(n) if n > 0 => return Ok(n),
            _ => {
                prompt = "Could not parse that race number.\nPlease enter a valid race number:";
            }
        }
    }
}

/// Ask for race numbers until the user declines to add more.
///
/// At least one race number is always collected.
pub fn ask_for_race_numbers<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Vec<u32>> {
    let mut race_numbers = Vec::new();
    loop {
        race_numbers.push(ask_for_race_number(input, out)?);

        let more = read_answer(input, out, "Add more race numbers? `Y`/[`N`]")?;
        if NO_MORE.contains(&more.to_lowercase().as_str()) {
            return Ok(race_numbers);
        }
    }
}

/// Write a prompt and read one trimmed line. End of input is an error.
fn read_answer<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<String> {
    writeln!(out, "{}", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AppError::InvalidInput("input ended before an answer was given".to_string()));
    }
    Ok(line.trim().to_string())
}
