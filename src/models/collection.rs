// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Ordered collection of participants and the metrics derived from it.
//!
//! Durations are always recomputed from the participants' checkpoint times;
//! nothing derived is stored.

use crate::error::{AppError, Result};
use crate::models::{CheckpointSet, Participant};
use chrono::TimeDelta;
use std::collections::HashSet;

/// Participants of one event, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ParticipantCollection {
    checkpoints: CheckpointSet,
    participants: Vec<Participant>,
}

impl ParticipantCollection {
    pub fn new(checkpoints: CheckpointSet) -> Self {
        Self {
            checkpoints,
            participants: Vec::new(),
        }
    }

    /// Add a participant at the end.
    ///
    /// Fails if the race number is already present or the participant was
    /// built against a different checkpoint set.
    pub fn push(&mut self, participant: Participant) -> Result<()> {
        if participant.checkpoints() != &self.checkpoints {
            return Err(AppError::CheckpointMismatch {
                race_number: participant.race_number(),
                name: participant.name().to_string(),
            });
        }
        if self.contains(participant.race_number()) {
            return Err(AppError::DuplicateRaceNumber(participant.race_number()));
        }
        self.participants.push(participant);
        Ok(())
    }

    pub fn contains(&self, race_number: u32) -> bool {
        self.participants
            .iter()
            .any(|p| p.race_number() == race_number)
    }

    pub fn checkpoints(&self) -> &CheckpointSet {
        &self.checkpoints
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Labels for plotting, aligned with insertion order.
    ///
    /// First names when they are all distinct, otherwise full names.
    pub fn display_labels(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let first_names_unique = self
            .participants
            .iter()
            .all(|p| seen.insert(p.first_name()));

        self.participants
            .iter()
            .map(|p| {
                if first_names_unique {
                    p.first_name().to_string()
                } else {
                    p.name().to_string()
                }
            })
            .collect()
    }

    /// Duration of leg `leg_no` (1-based) for every participant, in
    /// insertion order. `None` when the leg does not exist.
    pub fn leg_times(&self, leg_no: usize) -> Option<Vec<TimeDelta>> {
        self.participants
            .iter()
            .map(|p| p.leg_duration(leg_no))
            .collect()
    }

    /// Shortest time anyone took for leg `leg_no`.
    pub fn fastest_leg_time(&self, leg_no: usize) -> Option<TimeDelta> {
        self.leg_times(leg_no)?.into_iter().min()
    }

    /// Total time for every participant, in insertion order.
    pub fn total_times(&self) -> Vec<TimeDelta> {
        self.participants.iter().map(Participant::total_time).collect()
    }

    /// Participant indices sorted by total time, fastest first.
    ///
    /// Ties keep insertion order. The collection itself is not reordered.
    pub fn ranked_by_total_time(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.participants.len()).collect();
        order.sort_by_key(|&i| self.participants[i].total_time());
        order
    }
}

impl<'a> IntoIterator for &'a ParticipantCollection {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.participants.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawResult;

    fn participant(name: &str, race_number: u32, times: [&str; 5]) -> Participant {
        let set = CheckpointSet::default();
        let mut raw = RawResult::new(name, race_number);
        for (checkpoint, time) in set.names().iter().zip(times) {
            raw = raw.with_time(checkpoint.clone(), time);
        }
        Participant::from_raw(&raw, &set).unwrap()
    }

    fn sample() -> ParticipantCollection {
        let mut c = ParticipantCollection::default();
        c.push(participant(
            "Alex Moor",
            643,
            ["07:30:00", "09:00:00", "11:00:00", "13:30:00", "16:00:00"],
        ))
        .unwrap();
        c.push(participant(
            "Bea Fell",
            14,
            ["07:30:00", "08:50:00", "10:40:00", "13:00:00", "15:20:00"],
        ))
        .unwrap();
        c.push(participant(
            "Cal Tor",
            108,
            ["07:45:00", "09:20:00", "11:30:00", "14:10:00", "16:40:00"],
        ))
        .unwrap();
        c
    }

    #[test]
    fn test_insertion_order_preserved() {
        let c = sample();
        let numbers: Vec<u32> = c.iter().map(Participant::race_number).collect();
        assert_eq!(numbers, vec![643, 14, 108]);
        assert_eq!(c.display_labels(), vec!["Alex", "Bea", "Cal"]);
    }

    #[test]
    fn test_duplicate_race_number_rejected() {
        let mut c = sample();
        let dup = participant(
            "Someone Else",
            14,
            ["07:00:00", "08:00:00", "09:00:00", "10:00:00", "11:00:00"],
        );
        assert!(matches!(c.push(dup), Err(AppError::DuplicateRaceNumber(14))));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_checkpoint_mismatch_rejected() {
        let set = CheckpointSet::new(["start", "finish"]).unwrap();
        let raw = RawResult::new("Short Course", 9)
            .with_time("start", "08:00:00")
            .with_time("finish", "12:00:00");
        let p = Participant::from_raw(&raw, &set).unwrap();

        let mut c = ParticipantCollection::default();
        assert!(matches!(
            c.push(p),
            Err(AppError::CheckpointMismatch { race_number: 9, .. })
        ));
    }

    #[test]
    fn test_full_names_when_first_names_clash() {
        let mut c = ParticipantCollection::default();
        c.push(participant(
            "Sam Hill",
            1,
            ["07:00:00", "08:00:00", "09:00:00", "10:00:00", "11:00:00"],
        ))
        .unwrap();
        c.push(participant(
            "Sam Dale",
            2,
            ["07:00:00", "08:10:00", "09:00:00", "10:00:00", "11:00:00"],
        ))
        .unwrap();
        assert_eq!(c.display_labels(), vec!["Sam Hill", "Sam Dale"]);
    }

    #[test]
    fn test_leg_and_total_metrics() {
        let c = sample();
        let leg1 = c.leg_times(1).unwrap();
        assert_eq!(
            leg1,
            vec![
                TimeDelta::minutes(90),
                TimeDelta::minutes(80),
                TimeDelta::minutes(95)
            ]
        );
        assert_eq!(c.fastest_leg_time(1), Some(TimeDelta::minutes(80)));
        assert!(c.leg_times(5).is_none());

        assert_eq!(c.total_times()[1], TimeDelta::minutes(470));
        assert_eq!(c.ranked_by_total_time(), vec![1, 0, 2]);
        // ranking does not reorder the collection
        assert_eq!(c.participants()[0].race_number(), 643);
    }
}
