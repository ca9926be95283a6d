// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with participant attribution.

/// A time string that is not a valid 24-hour `HH:MM:SS` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time '{value}' (expected HH:MM:SS)")]
pub struct TimeFormatError {
    pub value: String,
}

/// Application error type.
///
/// Messages carry the race number and participant name whenever they are
/// known so the user can correct the input by hand.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Race number {race_number} ({}): checkpoint '{checkpoint}': {source}", .name.as_deref().unwrap_or("unknown name"))]
    Format {
        race_number: u32,
        name: Option<String>,
        checkpoint: String,
        #[source]
        source: TimeFormatError,
    },

    #[error("Race number {race_number} not found for {location}")]
    NotFound { race_number: u32, location: String },

    #[error("Race number {race_number} ({}): unsupported results page: {reason}", .name.as_deref().unwrap_or("unknown name"))]
    UnsupportedFormat {
        race_number: u32,
        name: Option<String>,
        reason: String,
    },

    #[error("Race number {race_number} ({name}): checkpoint '{checkpoint}' is earlier than the previous checkpoint")]
    OutOfOrder {
        race_number: u32,
        name: String,
        checkpoint: String,
    },

    #[error("Race number {0} appears more than once")]
    DuplicateRaceNumber(u32),

    #[error("Race number {race_number} ({name}) uses a different checkpoint set")]
    CheckpointMismatch { race_number: u32, name: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Results site error: {0}")]
    ResultsSite(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Race number the error is attributed to, if any.
    pub fn race_number(&self) -> Option<u32> {
        match self {
            AppError::Format { race_number, .. }
            | AppError::NotFound { race_number, .. }
            | AppError::UnsupportedFormat { race_number, .. }
            | AppError::OutOfOrder { race_number, .. }
            | AppError::CheckpointMismatch { race_number, .. } => Some(*race_number),
            AppError::DuplicateRaceNumber(race_number) => Some(*race_number),
            _ => None,
        }
    }

    /// Whether retrying the same request could never succeed.
    ///
    /// Transport failures and I/O errors are the only transient kinds.
    pub fn is_permanent(&self) -> bool {
        !matches!(self, AppError::ResultsSite(_) | AppError::Io(_))
    }
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, AppError>;
