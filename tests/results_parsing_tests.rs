// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

mod common;

use common::fixture;
use mighty_hike_plotter::error::AppError;
use mighty_hike_plotter::models::{CheckpointSet, Participant};
use mighty_hike_plotter::services::results::{
    parse_search_page, parse_split_page, raw_result_from_split,
};

#[test]
fn test_search_fixture_hit() {
    let hit = parse_search_page(&fixture("search_644.html")).expect("search hit");

    assert_eq!(hit.name, "Tom Ridge");
    assert_eq!(hit.stats_href, "Results.aspx?CId=8&RId=20440&EId=1&AId=3522");
}

#[test]
fn test_no_results_page_has_no_hit() {
    assert!(parse_search_page(&fixture("search_none.html")).is_none());
}

#[test]
fn test_stats_fixture_rows() {
    let rows = parse_split_page(&fixture("stats_643.html")).expect("split grid");

    assert_eq!(rows.len(), 5);
    assert_eq!(rows["start"], "07:31:21");
    assert_eq!(rows["pitstop_2"], "12:02:10");
    assert_eq!(rows["finish"], "17:14:53");
}

#[test]
fn test_stats_fixture_builds_participant() {
    let checkpoints = CheckpointSet::default();
    let rows = parse_split_page(&fixture("stats_644.html")).expect("split grid");
    let raw = raw_result_from_split("Tom Ridge", 644, rows, &checkpoints).unwrap();

    let participant = Participant::from_raw(&raw, &checkpoints).unwrap();
    assert_eq!(participant.first_name(), "Tom");
    assert_eq!(
        participant.total_time(),
        chrono::TimeDelta::hours(9) + chrono::TimeDelta::minutes(48) + chrono::TimeDelta::seconds(41)
    );
}

#[test]
fn test_split_only_page_is_unsupported() {
    let rows = parse_split_page(&fixture("stats_split_only.html")).expect("split grid");
    assert!(rows.contains_key("split_1"));

    let err = raw_result_from_split("Kim Split", 700, rows, &CheckpointSet::default())
        .unwrap_err();
    match err {
        AppError::UnsupportedFormat { reason, .. } => {
            for checkpoint in ["start", "pitstop_1", "pitstop_2", "pitstop_3", "finish"] {
                assert!(reason.contains(checkpoint), "{} not in {}", checkpoint, reason);
            }
        }
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn test_search_page_is_not_a_stats_page() {
    assert!(parse_split_page(&fixture("search_643.html")).is_none());
}
