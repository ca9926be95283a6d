// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use mighty_hike_plotter::error::{AppError, Result};
use mighty_hike_plotter::models::{CheckpointSet, Location, RawResult};
use mighty_hike_plotter::services::results::{scrape_result, search_path};
use mighty_hike_plotter::services::ResultsSource;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;

pub const COMPETITION_ID: u32 = 8;

/// Read a fixture file from `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{}", name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

/// The Jurassic Coast location used throughout the tests.
#[allow(dead_code)]
pub fn jurassic_coast() -> Location {
    Location::from_id(20440).expect("Jurassic Coast is a known location")
}

/// Offline stand-in for the results site, serving saved pages by path.
///
/// Unknown search paths get the site's "no results" page; any other unknown
/// path is a 404. Every lookup is recorded.
#[allow(dead_code)]
pub struct FixtureSite {
    routes: HashMap<String, String>,
    checkpoints: CheckpointSet,
    pub requested: RefCell<Vec<u32>>,
    pub pages_served: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl FixtureSite {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            checkpoints: CheckpointSet::default(),
            requested: RefCell::new(Vec::new()),
            pages_served: RefCell::new(Vec::new()),
        }
    }

    /// Register a participant: their search page and the stats page it links to.
    pub fn with_participant(
        mut self,
        race_number: u32,
        search_fixture: &str,
        stats_href: &str,
        stats_fixture: &str,
    ) -> Self {
        let search = search_path(COMPETITION_ID, jurassic_coast(), race_number);
        self.routes.insert(search, fixture(search_fixture));
        self.routes
            .insert(stats_href.to_string(), fixture(stats_fixture));
        self
    }

    /// Site with Jane Walker (643), Tom Ridge (644) and a split-times-only
    /// record (700).
    pub fn jurassic_coast() -> Self {
        Self::new()
            .with_participant(
                643,
                "search_643.html",
                "Results.aspx?CId=8&RId=20440&EId=1&AId=3521",
                "stats_643.html",
            )
            .with_participant(
                644,
                "search_644.html",
                "Results.aspx?CId=8&RId=20440&EId=1&AId=3522",
                "stats_644.html",
            )
            .with_participant(
                700,
                "search_700.html",
                "Results.aspx?CId=8&RId=20440&EId=1&AId=3600",
                "stats_split_only.html",
            )
    }

    fn get_page(&self, path: &str, location: Location, race_number: u32) -> Result<String> {
        self.pages_served.borrow_mut().push(path.to_string());
        match self.routes.get(path) {
            Some(body) => Ok(body.clone()),
            None if path.starts_with("Search.aspx") => Ok(fixture("search_none.html")),
            None => Err(AppError::NotFound {
                race_number,
                location: location.name.to_string(),
            }),
        }
    }
}

impl ResultsSource for FixtureSite {
    fn fetch(&self, location: Location, race_number: u32) -> Result<RawResult> {
        self.requested.borrow_mut().push(race_number);
        scrape_result(
            location,
            race_number,
            COMPETITION_ID,
            &self.checkpoints,
            |path| self.get_page(path, location, race_number),
        )
    }
}
