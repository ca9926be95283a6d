// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Results site client for looking up participants by race number.
//!
//! The lookup is a two-step scrape:
//! - the search page maps a race number to the participant name and a link
//! - the linked stats page holds the split grid with one row per checkpoint
//!
//! Page parsing is kept in free functions so it can be exercised against
//! saved HTML without network access.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{CheckpointSet, Location, RawResult};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use scraper::{Html, Selector};
use std::collections::{BTreeMap, HashMap};

/// Element id of the search results table.
const SEARCH_TABLE_SELECTOR: &str = "table#ctl00_Content_Main_grdSearch";
/// Element id of the container wrapping the split grid.
const SPLIT_GRID_SELECTOR: &str = "div#ctl00_Content_Main_divSplitGrid";

const USER_AGENT: &str = concat!("mighty-hike-plotter/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce a raw result for a race number.
pub trait ResultsSource {
    /// Look up one participant.
    ///
    /// Fails with `NotFound` when the race number is unknown and with
    /// `UnsupportedFormat` when the record lacks the expected checkpoints.
    fn fetch(&self, location: Location, race_number: u32) -> Result<RawResult>;
}

impl<S: ResultsSource + ?Sized> ResultsSource for &S {
    fn fetch(&self, location: Location, race_number: u32) -> Result<RawResult> {
        (**self).fetch(location, race_number)
    }
}

/// A search hit: the participant's name and the link to their stats page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: String,
    pub stats_href: String,
}

/// Extract the first hit from a search results page.
///
/// Returns `None` when the results table or its link is missing, which is
/// how the site reports an unknown race number.
pub fn parse_search_page(html: &str) -> Option<SearchHit> {
    let document = Html::parse_document(html);
    let table_selector = selector(SEARCH_TABLE_SELECTOR);
    let link_selector = selector("a[href]");

    let table = document.select(&table_selector).next()?;
    let link = table.select(&link_selector).next()?;

    let name = collapse_whitespace(&link.text().collect::<String>());
    let stats_href = link.value().attr("href")?.trim().to_string();
    if name.is_empty() || stats_href.is_empty() {
        return None;
    }

    Some(SearchHit { name, stats_href })
}

/// Extract `checkpoint key -> time string` rows from a stats page.
///
/// The header row is skipped. Keys are normalized (lowercase, spaces to
/// underscores). Returns `None` when the split grid is absent.
pub fn parse_split_page(html: &str) -> Option<BTreeMap<String, String>> {
    let document = Html::parse_document(html);
    let grid_selector = selector(SPLIT_GRID_SELECTOR);
    let table_selector = selector("table");
    let row_selector = selector("tr");
    let cell_selector = selector("td");

    let grid = document.select(&grid_selector).next()?;
    let table = grid.select(&table_selector).next()?;

    let mut rows = BTreeMap::new();
    for row in table.select(&row_selector).skip(1) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .take(2)
            .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
            .collect();
        if let [key, value] = cells.as_slice() {
            rows.insert(CheckpointSet::key_from_header(key), value.clone());
        }
    }

    Some(rows)
}

/// Build a raw result from a parsed split grid, checking that every
/// checkpoint is present.
pub fn raw_result_from_split(
    name: &str,
    race_number: u32,
    rows: BTreeMap<String, String>,
    checkpoints: &CheckpointSet,
) -> Result<RawResult> {
    let raw = RawResult {
        name: name.to_string(),
        race_number,
        times: rows,
    };

    let missing = raw.missing_checkpoints(checkpoints);
    if !missing.is_empty() {
        return Err(AppError::UnsupportedFormat {
            race_number,
            name: Some(name.to_string()),
            reason: format!("missing checkpoint(s): {}", missing.join(", ")),
        });
    }

    Ok(raw)
}

/// Site-relative path of the search page for one race number.
pub fn search_path(competition_id: u32, location: Location, race_number: u32) -> String {
    format!(
        "Search.aspx?CId={}&RId={}&S={}",
        competition_id, location.id, race_number
    )
}

/// Run the two-step lookup using `get_page` to load site-relative links.
///
/// `get_page` is called with the search path first and then with the stats
/// link found on the search page.
pub fn scrape_result<F>(
    location: Location,
    race_number: u32,
    competition_id: u32,
    checkpoints: &CheckpointSet,
    mut get_page: F,
) -> Result<RawResult>
where
    F: FnMut(&str) -> Result<String>,
{
    let search_html = get_page(&search_path(competition_id, location, race_number))?;
    let hit = parse_search_page(&search_html).ok_or_else(|| AppError::NotFound {
        race_number,
        location: location.name.to_string(),
    })?;
    tracing::debug!(race_number, name = %hit.name, href = %hit.stats_href, "Found participant");

    let stats_html = get_page(&hit.stats_href)?;
    let rows = parse_split_page(&stats_html).ok_or_else(|| AppError::UnsupportedFormat {
        race_number,
        name: Some(hit.name.clone()),
        reason: "no split grid on stats page".to_string(),
    })?;

    raw_result_from_split(&hit.name, race_number, rows, checkpoints)
}

/// Blocking HTTP client for the results site.
#[derive(Clone)]
pub struct ResultsClient {
    http: Client,
    base_url: Url,
    competition_id: u32,
    checkpoints: CheckpointSet,
}

impl ResultsClient {
    /// Create a client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.results_base_url).map_err(|e| {
            AppError::InvalidInput(format!(
                "invalid results base URL '{}': {}",
                config.results_base_url, e
            ))
        })?;

        let http = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::ResultsSite(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            competition_id: config.competition_id,
            checkpoints: config.checkpoints.clone(),
        })
    }

    /// URL of the search page for one race number.
    pub fn search_url(&self, location: Location, race_number: u32) -> Result<Url> {
        self.join(&search_path(self.competition_id, location, race_number))
    }

    fn join(&self, href: &str) -> Result<Url> {
        self.base_url
            .join(href)
            .map_err(|e| AppError::ResultsSite(format!("Bad link '{}': {}", href, e)))
    }

    /// GET a page and return its body. 404 means the race number is unknown.
    fn get_page(&self, url: Url, location: Location, race_number: u32) -> Result<String> {
        tracing::debug!(url = %url, race_number, "Fetching results page");

        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|e| AppError::ResultsSite(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound {
                race_number,
                location: location.name.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AppError::ResultsSite(format!("HTTP {} for {}", status, url)));
        }

        response
            .text()
            .map_err(|e| AppError::ResultsSite(format!("Failed to read {}: {}", url, e)))
    }
}

impl ResultsSource for ResultsClient {
    fn fetch(&self, location: Location, race_number: u32) -> Result<RawResult> {
        scrape_result(
            location,
            race_number,
            self.competition_id,
            &self.checkpoints,
            |href| self.get_page(self.join(href)?, location, race_number),
        )
    }
}

/// Manually supplied results, looked up by race number.
///
/// Stands in for the results site when the times are already known (or the
/// event only publishes split times).
#[derive(Debug, Clone, Default)]
pub struct ManualResults {
    results: HashMap<u32, RawResult>,
    order: Vec<u32>,
}

impl ManualResults {
    pub fn new(results: Vec<RawResult>) -> Self {
        let mut manual = Self::default();
        for raw in results {
            manual.insert(raw);
        }
        manual
    }

    /// Load a JSON array of results.
    pub fn from_json(json: &str) -> Result<Self> {
        let results: Vec<RawResult> = serde_json::from_str(json)
            .map_err(|e| AppError::InvalidInput(format!("participants file: {}", e)))?;
        Ok(Self::new(results))
    }

    /// Load a JSON array of results from a file.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Add or replace a result.
    pub fn insert(&mut self, raw: RawResult) {
        if !self.results.contains_key(&raw.race_number) {
            self.order.push(raw.race_number);
        }
        self.results.insert(raw.race_number, raw);
    }

    /// Race numbers in the order they were supplied.
    pub fn race_numbers(&self) -> &[u32] {
        &self.order
    }
}

impl ResultsSource for ManualResults {
    fn fetch(&self, location: Location, race_number: u32) -> Result<RawResult> {
        self.results
            .get(&race_number)
            .cloned()
            .ok_or_else(|| AppError::NotFound {
                race_number,
                location: location.name.to_string(),
            })
    }
}

/// Compile a selector that is a constant in this module.
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static CSS selector is valid")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
