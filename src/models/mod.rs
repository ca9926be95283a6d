// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod checkpoint;
pub mod collection;
pub mod location;
pub mod participant;

pub use checkpoint::CheckpointSet;
pub use collection::ParticipantCollection;
pub use location::Location;
pub use participant::{Participant, RawResult};
