//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local runs.
//! Command line flags override these values in `main`.

use crate::models::CheckpointSet;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default results site root.
pub const DEFAULT_RESULTS_BASE_URL: &str = "https://results.resultsbase.net/";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Results site root, ending in `/`
    pub results_base_url: String,
    /// Competition id on the results site (the `CId` query parameter)
    pub competition_id: u32,
    /// Timeout for each HTTP request
    pub http_timeout: Duration,
    /// Year used in the output filename
    pub event_year: i32,
    /// Directory the plot is written to
    pub output_dir: PathBuf,
    /// Ordered checkpoints every participant must report
    pub checkpoints: CheckpointSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_base_url: DEFAULT_RESULTS_BASE_URL.to_string(),
            competition_id: 8,
            http_timeout: Duration::from_secs(30),
            event_year: 2024,
            output_dir: PathBuf::from("."),
            checkpoints: CheckpointSet::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let mut results_base_url =
            env::var("RESULTS_BASE_URL").unwrap_or(defaults.results_base_url);
        if !results_base_url.ends_with('/') {
            results_base_url.push('/');
        }

        let checkpoints = match env::var("CHECKPOINTS") {
            Ok(list) => CheckpointSet::parse_list(&list)
                .map_err(|e| ConfigError::Invalid("CHECKPOINTS", e.to_string()))?,
            Err(_) => defaults.checkpoints,
        };

        Ok(Self {
            results_base_url,
            competition_id: parse_var("RESULTS_COMPETITION_ID", defaults.competition_id)?,
            http_timeout: Duration::from_secs(parse_var(
                "HTTP_TIMEOUT_SECS",
                defaults.http_timeout.as_secs(),
            )?),
            event_year: parse_var("EVENT_YEAR", defaults.event_year)?,
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            checkpoints,
        })
    }
}

/// Read and parse an optional variable; unset means `default`.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(name, format!("'{}': {}", raw, e))),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    Invalid(&'static str, String),
}
