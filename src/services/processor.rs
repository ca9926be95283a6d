// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Batch processing of race numbers into a participant collection.
//!
//! Handles the core workflow for each race number, one at a time:
//! 1. Fetch the raw result from the source
//! 2. Parse checkpoint times into a participant
//! 3. Check checkpoint order (reported, never corrected)
//! 4. Append to the collection
//!
//! A failure for one race number is recorded and the next one is processed.

use crate::error::{AppError, Result};
use crate::models::{CheckpointSet, Location, Participant, ParticipantCollection};
use crate::services::ResultsSource;

/// Outcome of processing a batch of race numbers.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Participants that were built, in input order.
    pub collection: ParticipantCollection,
    /// Race numbers that failed, with the reason, in input order.
    pub failures: Vec<(u32, AppError)>,
    /// Data-quality problems in participants that were kept.
    pub warnings: Vec<AppError>,
}

impl BatchOutcome {
    /// Returns true if every race number produced a participant.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns true if no race number produced a participant.
    pub fn is_complete_failure(&self) -> bool {
        self.collection.is_empty() && !self.failures.is_empty()
    }

    /// Race numbers that failed.
    pub fn failed_race_numbers(&self) -> Vec<u32> {
        self.failures.iter().map(|(n, _)| *n).collect()
    }

    /// Turn the outcome into a collection ready for plotting.
    ///
    /// Any failure is surfaced unless `allow_partial` is set and at least one
    /// participant was built.
    pub fn into_collection(self, allow_partial: bool) -> Result<ParticipantCollection> {
        if self.can_plot(allow_partial) {
            return Ok(self.collection);
        }
        match self.failures.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Err(AppError::Render("no participants to plot".to_string())),
        }
    }

    /// Whether `into_collection(allow_partial)` will hand back a collection.
    pub fn can_plot(&self, allow_partial: bool) -> bool {
        self.is_complete_success() || (allow_partial && !self.collection.is_empty())
    }
}

/// Turns race numbers into participants using a results source.
pub struct ResultsProcessor<S> {
    source: S,
    checkpoints: CheckpointSet,
}

impl<S: ResultsSource> ResultsProcessor<S> {
    pub fn new(source: S, checkpoints: CheckpointSet) -> Self {
        Self {
            source,
            checkpoints,
        }
    }

    /// Fetch and build a single participant.
    pub fn process_race_number(&self, location: Location, race_number: u32) -> Result<Participant> {
        if race_number == 0 {
            return Err(AppError::InvalidInput(
                "race number must be positive".to_string(),
            ));
        }

        let raw = self.source.fetch(location, race_number)?;
        let participant = Participant::from_raw(&raw, &self.checkpoints)?;

        tracing::info!(
            race_number,
            name = %participant.name(),
            location = %location.name,
            "Parsed participant"
        );
        Ok(participant)
    }

    /// Process every race number sequentially.
    pub fn process(&self, location: Location, race_numbers: &[u32]) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            collection: ParticipantCollection::new(self.checkpoints.clone()),
            failures: Vec::new(),
            warnings: Vec::new(),
        };

        for &race_number in race_numbers {
            if outcome.collection.contains(race_number) {
                tracing::warn!(race_number, "Duplicate race number skipped");
                outcome
                    .failures
                    .push((race_number, AppError::DuplicateRaceNumber(race_number)));
                continue;
            }

            let participant = match self.process_race_number(location, race_number) {
                Ok(p) => p,
                Err(err) => {
                    tracing::warn!(race_number, error = %err, "Failed to process race number");
                    outcome.failures.push((race_number, err));
                    continue;
                }
            };

            if let Err(warning) = participant.check_monotonic() {
                tracing::warn!(race_number, warning = %warning, "Checkpoint times out of order");
                outcome.warnings.push(warning);
            }

            if let Err(err) = outcome.collection.push(participant) {
                outcome.failures.push((race_number, err));
            }
        }

        tracing::info!(
            location = %location.name,
            succeeded = outcome.collection.len(),
            failed = outcome.failures.len(),
            "Batch processed"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawResult;
    use crate::services::ManualResults;

    fn full(name: &str, race_number: u32, start: &str, p1: &str) -> RawResult {
        RawResult::new(name, race_number)
            .with_time("start", start)
            .with_time("pitstop_1", p1)
            .with_time("pitstop_2", "11:00:00")
            .with_time("pitstop_3", "13:00:00")
            .with_time("finish", "15:00:00")
    }

    fn processor(results: Vec<RawResult>) -> ResultsProcessor<ManualResults> {
        ResultsProcessor::new(ManualResults::new(results), CheckpointSet::default())
    }

    fn location() -> Location {
        Location::from_id(20440).unwrap()
    }

    #[test]
    fn test_unknown_race_number_does_not_stop_batch() {
        let p = processor(vec![
            full("Ann", 1, "07:00:00", "09:00:00"),
            full("Ben", 3, "07:05:00", "09:10:00"),
        ]);

        let outcome = p.process(location(), &[1, 2, 3]);

        assert_eq!(outcome.collection.len(), 2);
        assert_eq!(outcome.failed_race_numbers(), vec![2]);
        assert!(matches!(outcome.failures[0].1, AppError::NotFound { race_number: 2, .. }));
        assert!(!outcome.is_complete_success());
        assert!(!outcome.is_complete_failure());
    }

    #[test]
    fn test_format_error_attributed() {
        let p = processor(vec![full("Ann", 1, "7am", "09:00:00")]);
        let outcome = p.process(location(), &[1]);

        assert!(outcome.is_complete_failure());
        let (race_number, err) = &outcome.failures[0];
        assert_eq!(*race_number, 1);
        assert_eq!(err.race_number(), Some(1));
        assert!(err.to_string().contains("Ann"));
    }

    #[test]
    fn test_out_of_order_kept_with_warning() {
        let p = processor(vec![full("Ann", 1, "09:30:00", "09:00:00")]);
        let outcome = p.process(location(), &[1]);

        assert_eq!(outcome.collection.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.is_complete_success());
    }

    #[test]
    fn test_duplicate_and_zero_race_numbers() {
        let p = processor(vec![full("Ann", 1, "07:00:00", "09:00:00")]);
        let outcome = p.process(location(), &[1, 1, 0]);

        assert_eq!(outcome.collection.len(), 1);
        assert!(matches!(outcome.failures[0].1, AppError::DuplicateRaceNumber(1)));
        assert!(matches!(outcome.failures[1].1, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_into_collection_policy() {
        let p = processor(vec![full("Ann", 1, "07:00:00", "09:00:00")]);

        let strict = p.process(location(), &[1, 2]).into_collection(false);
        assert!(matches!(strict, Err(AppError::NotFound { race_number: 2, .. })));

        let partial = p.process(location(), &[1, 2]).into_collection(true).unwrap();
        assert_eq!(partial.len(), 1);

        let none = p.process(location(), &[2]).into_collection(true);
        assert!(none.is_err());
    }

    #[test]
    fn test_can_plot_matches_into_collection() {
        let p = processor(vec![full("Ann", 1, "07:00:00", "09:00:00")]);

        for (numbers, allow_partial, expected) in [
            (&[1][..], false, true),
            (&[1, 2][..], false, false),
            (&[1, 2][..], true, true),
            (&[2][..], true, false),
        ] {
            let outcome = p.process(location(), numbers);
            assert_eq!(outcome.can_plot(allow_partial), expected, "{:?}", numbers);
            assert_eq!(outcome.into_collection(allow_partial).is_ok(), expected);
        }
    }
}
