// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mighty Hike event locations (static reference data).

use crate::error::{AppError, Result};
use std::fmt;

/// A Mighty Hike event, identified by its results-site race id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Race id on the results site (the `RId` query parameter)
    pub id: u32,
    /// Human readable event name (e.g., "Jurassic Coast")
    pub name: &'static str,
}

/// All known events, ordered by id.
pub static LOCATIONS: [Location; 14] = [
    Location { id: 20427, name: "Norfolk Coast" },
    Location { id: 20428, name: "Eryri Snowdonia" },
    Location { id: 20429, name: "London" },
    Location { id: 20430, name: "South Coast" },
    Location { id: 20431, name: "Lake District" },
    Location { id: 20432, name: "Giants Causeway" },
    Location { id: 20433, name: "Yorkshire Dales" },
    Location { id: 20434, name: "Gower Peninsula" },
    Location { id: 20435, name: "Thames Path" },
    Location { id: 20436, name: "Peak District" },
    Location { id: 20437, name: "Rob Roy" },
    Location { id: 20438, name: "Cornwall Coast" },
    Location { id: 20439, name: "Wye Valley" },
    Location { id: 20440, name: "Jurassic Coast" },
];

impl Location {
    /// Look up a location by race id.
    pub fn from_id(id: u32) -> Result<Self> {
        LOCATIONS
            .iter()
            .find(|l| l.id == id)
            .copied()
            .ok_or_else(|| AppError::InvalidInput(format!("unknown location id {}", id)))
    }

    /// Every known location.
    pub fn all() -> &'static [Location] {
        &LOCATIONS
    }

    /// Filename-safe event name: "Jurassic Coast" -> "Jurassic_Coast".
    pub fn file_stem(&self) -> String {
        self.name.replace(' ', "_")
    }

    /// Default plot filename: `<EventName>_<Year>_plot.png`.
    pub fn plot_filename(&self, year: i32) -> String {
        format!("{}_{}_plot.png", self.file_stem(), year)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
