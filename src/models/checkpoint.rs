// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordered checkpoint configuration for an event.

use crate::error::{AppError, Result};
use std::fmt;
use std::sync::Arc;

/// Checkpoints used by every Mighty Hike results page.
pub const DEFAULT_CHECKPOINTS: [&str; 5] = ["start", "pitstop_1", "pitstop_2", "pitstop_3", "finish"];

/// Ordered list of checkpoint names, from start to finish.
///
/// Iteration order is the list order, never the order fields happened to
/// arrive in. Cloning is cheap; participants share one set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointSet {
    names: Arc<[String]>,
}

impl Default for CheckpointSet {
    fn default() -> Self {
        Self {
            names: DEFAULT_CHECKPOINTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CheckpointSet {
    /// Build a checkpoint set, validating the names.
    ///
    /// Requires at least a start and a finish, unique names, and names made
    /// of lowercase ASCII letters, digits and underscores.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.len() < 2 {
            return Err(AppError::InvalidInput(format!(
                "checkpoint set needs at least a start and a finish, got {}",
                names.len()
            )));
        }

        for (i, name) in names.iter().enumerate() {
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if !valid {
                return Err(AppError::InvalidInput(format!(
                    "invalid checkpoint name '{}'",
                    name
                )));
            }
            if names[..i].contains(name) {
                return Err(AppError::InvalidInput(format!(
                    "duplicate checkpoint name '{}'",
                    name
                )));
            }
        }

        Ok(Self {
            names: names.into(),
        })
    }

    /// Parse a comma separated list such as `start,pitstop_1,finish`.
    pub fn parse_list(list: &str) -> Result<Self> {
        Self::new(list.split(',').map(str::trim))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; a valid set has at least two checkpoints.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn start(&self) -> &str {
        &self.names[0]
    }

    pub fn finish(&self) -> &str {
        &self.names[self.names.len() - 1]
    }

    /// Number of legs (adjacent checkpoint pairs).
    pub fn leg_count(&self) -> usize {
        self.names.len() - 1
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Display label for a checkpoint: `pitstop_1` -> `Pitstop 1`.
    pub fn label(name: &str) -> String {
        name.split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Normalize a results-page row header into a checkpoint key:
    /// lowercase, spaces become underscores.
    pub fn key_from_header(header: &str) -> String {
        header.trim().to_lowercase().replace(' ', "_")
    }
}

impl fmt::Display for CheckpointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(","))
    }
}
