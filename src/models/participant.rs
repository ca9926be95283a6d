// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Participant record and its construction from raw checkpoint strings.

use crate::error::{AppError, Result};
use crate::models::CheckpointSet;
use crate::time_utils::{format_time_of_day, parse_time_of_day};
use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unparsed result for one participant, as scraped or supplied by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResult {
    /// Display name (free text)
    pub name: String,
    /// Public race number
    pub race_number: u32,
    /// Checkpoint name -> `HH:MM:SS` string
    pub times: BTreeMap<String, String>,
}

impl RawResult {
    pub fn new(name: impl Into<String>, race_number: u32) -> Self {
        Self {
            name: name.into(),
            race_number,
            times: BTreeMap::new(),
        }
    }

    /// Builder-style helper for manually supplied results.
    pub fn with_time(mut self, checkpoint: impl Into<String>, time: impl Into<String>) -> Self {
        self.times.insert(checkpoint.into(), time.into());
        self
    }

    /// Checkpoints from `set` that this result does not provide.
    pub fn missing_checkpoints<'a>(&self, set: &'a CheckpointSet) -> Vec<&'a str> {
        set.names()
            .iter()
            .filter(|name| !self.times.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// One runner with a parsed time for every checkpoint. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    name: String,
    race_number: u32,
    checkpoints: CheckpointSet,
    /// Times aligned with `checkpoints.names()`
    times: Vec<NaiveTime>,
}

impl Participant {
    /// Parse every checkpoint of `raw` in checkpoint-set order.
    ///
    /// Either all checkpoints parse or construction fails; there are no
    /// partial participants. Fields outside the set are ignored.
    pub fn from_raw(raw: &RawResult, checkpoints: &CheckpointSet) -> Result<Self> {
        if raw.race_number == 0 {
            return Err(AppError::InvalidInput(format!(
                "race number must be positive ({})",
                raw.name
            )));
        }

        let name = raw.name.trim().to_string();
        let mut times = Vec::with_capacity(checkpoints.len());

        for checkpoint in checkpoints.names() {
            let value = raw.times.get(checkpoint).map(String::as_str).unwrap_or("");
            let time = parse_time_of_day(value).map_err(|source| AppError::Format {
                race_number: raw.race_number,
                name: Some(name.clone()),
                checkpoint: checkpoint.clone(),
                source,
            })?;
            times.push(time);
        }

        for extra in raw.times.keys().filter(|k| checkpoints.position(k).is_none()) {
            tracing::debug!(race_number = raw.race_number, field = %extra, "Ignoring extra field");
        }

        Ok(Self {
            name,
            race_number: raw.race_number,
            checkpoints: checkpoints.clone(),
            times,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First whitespace-separated token of the name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    pub fn race_number(&self) -> u32 {
        self.race_number
    }

    pub fn checkpoints(&self) -> &CheckpointSet {
        &self.checkpoints
    }

    /// `(checkpoint, time)` pairs in checkpoint order.
    pub fn checkpoint_times(&self) -> impl Iterator<Item = (&str, NaiveTime)> + '_ {
        self.checkpoints
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.times.iter().copied())
    }

    pub fn time_at(&self, checkpoint: &str) -> Option<NaiveTime> {
        self.checkpoints
            .position(checkpoint)
            .map(|i| self.times[i])
    }

    /// Duration of each leg: `time(i) - time(i - 1)`. Negative values are
    /// kept as they are.
    pub fn leg_durations(&self) -> Vec<TimeDelta> {
        self.times
            .windows(2)
            .map(|pair| pair[1].signed_duration_since(pair[0]))
            .collect()
    }

    /// Elapsed time at each checkpoint relative to this participant's start.
    /// The first entry is always zero.
    pub fn cumulative_durations(&self) -> Vec<TimeDelta> {
        let start = self.times[0];
        self.times
            .iter()
            .map(|t| t.signed_duration_since(start))
            .collect()
    }

    /// Duration of leg `leg_no` (1-based), `None` when out of range.
    pub fn leg_duration(&self, leg_no: usize) -> Option<TimeDelta> {
        if leg_no == 0 || leg_no >= self.times.len() {
            return None;
        }
        Some(self.times[leg_no].signed_duration_since(self.times[leg_no - 1]))
    }

    /// Finish minus start.
    pub fn total_time(&self) -> TimeDelta {
        self.times[self.times.len() - 1].signed_duration_since(self.times[0])
    }

    /// Report the first checkpoint that is earlier than its predecessor.
    pub fn check_monotonic(&self) -> Result<()> {
        for (i, pair) in self.times.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(AppError::OutOfOrder {
                    race_number: self.race_number,
                    name: self.name.clone(),
                    checkpoint: self.checkpoints.names()[i + 1].clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Participant:")?;
        writeln!(f, "  {:>10} : {}", "race no", self.race_number)?;
        writeln!(f, "  {:>10} : {}", "name", self.name)?;
        for (checkpoint, time) in self.checkpoint_times() {
            writeln!(f, "  {:>10} : {}", checkpoint, format_time_of_day(time))?;
        }
        Ok(())
    }
}
