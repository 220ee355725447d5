//! Integration tests for the Sunspotter ELO ranking
//!
//! These tests exercise the whole pipeline: reading a classifications table,
//! replaying it through the adaptive ELO engine and writing the results.

mod fixtures;

use std::sync::Arc;
use sunspotter_elo::config::{ColumnMap, EloConfig, OutputFormat, OutputSettings};
use sunspotter_elo::rating::{expected_score, BatchRunner, RatingStorage};
use sunspotter_elo::table::{save_snapshot, MatchSource, SnapshotRow};
use sunspotter_elo::types::{MatchOutcome, MatchRecord};
use sunspotter_elo::RankingError;

use fixtures::{assert_close, synthetic_matches, write_classifications};

fn load(path: &std::path::Path) -> Vec<MatchRecord> {
    MatchSource::new(ColumnMap::default(), ';')
        .unwrap()
        .read_path(path)
        .unwrap()
}

#[test]
fn test_table_to_results_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_classifications(dir.path(), &[(1, 2, 1), (2, 2, 0), (3, 1, 0)]);

    let matches = load(&input);
    assert_eq!(matches.len(), 3);

    let runner = BatchRunner::for_matches(EloConfig::default(), &matches).unwrap();
    let snapshot = runner.run(&matches).unwrap();
    assert_eq!(snapshot.matches_applied, 2);
    assert_eq!(snapshot.self_matches_skipped, 1);

    let settings = OutputSettings {
        path: dir.path().join("run_results.csv"),
        ..OutputSettings::default()
    };
    save_snapshot(&snapshot, &settings).unwrap();

    let mut reader = csv::Reader::from_path(&settings.path).unwrap();
    let rows: Vec<SnapshotRow> = reader.deserialize().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 3);
    let ids: Vec<&str> = rows.iter().map(|r| r.entity_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    let image_1 = &rows[0];
    assert_eq!(image_1.count, 2);
    assert_eq!(rows[1].count, 1);
    assert_eq!(rows[2].count, 1);

    // Image 1 beat image 2 (1416, K 16), then beat image 3 (1400, K 32)
    let expected = expected_score(1416.0, 1400.0);
    assert_close(image_1.score, 1416.0 + 16.0 * (1.0 - expected));
    assert_close(rows[2].score, 1400.0 + 32.0 * (0.0 - (1.0 - expected)));
    assert_eq!(rows[1].score, 1384.0);
}

#[test]
fn test_json_results_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_classifications(dir.path(), &[(10, 20, 0)]);
    let matches = load(&input);

    let runner = BatchRunner::for_matches(EloConfig::default(), &matches).unwrap();
    let snapshot = runner.run(&matches).unwrap();

    let settings = OutputSettings {
        path: dir.path().join("ratings.json"),
        format: OutputFormat::Json,
        ..OutputSettings::default()
    };
    save_snapshot(&snapshot, &settings).unwrap();

    let contents = std::fs::read_to_string(&settings.path).unwrap();
    let rows: Vec<SnapshotRow> = serde_json::from_str(&contents).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].entity_id, "10");
    assert_eq!(rows[0].score, 1384.0);
    assert_eq!(rows[1].score, 1416.0);
}

#[test]
fn test_incorrect_column_map() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_classifications(dir.path(), &[(1, 2, 1)]);

    let columns = ColumnMap::new(
        "This is not player 0",
        "This is not player 1",
        "Player 0 is in it for the fun",
    );
    let err = MatchSource::new(columns, ';')
        .unwrap()
        .read_path(&input)
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RankingError>(),
        Some(RankingError::ConfigurationError { .. })
    ));
}

#[test]
fn test_count_invariant_on_long_stream() {
    let matches = synthetic_matches(12, 500);
    let non_self = matches.iter().filter(|m| !m.is_self_match()).count();

    let runner = BatchRunner::for_matches(EloConfig::default(), &matches).unwrap();
    let snapshot = runner.run(&matches).unwrap();

    assert_eq!(snapshot.matches_applied, non_self);
    assert_eq!(snapshot.matches_applied + snapshot.self_matches_skipped, 500);
    assert_eq!(snapshot.total_count(), 2 * non_self as u64);
}

#[test]
fn test_k_bounds_and_history_capacity() {
    let config = EloConfig {
        score_memory: 4,
        ..EloConfig::default()
    };
    let matches = synthetic_matches(6, 300);

    let runner = BatchRunner::for_matches(config.clone(), &matches).unwrap();
    let snapshot = runner.run(&matches).unwrap();

    for record in snapshot.ratings.values() {
        assert!(record.k_value >= config.k_min && record.k_value <= config.k_max);
        assert!(record.recent_scores.len() <= config.score_memory);
        assert!(record.score.is_finite());
    }
}

#[test]
fn test_split_replay_matches_full_replay() {
    let matches = synthetic_matches(8, 120);
    let (first, second) = matches.split_at(50);

    let full = BatchRunner::for_matches(EloConfig::default(), &matches)
        .unwrap()
        .run(&matches)
        .unwrap();

    let runner = BatchRunner::for_matches(EloConfig::default(), &matches).unwrap();
    runner.run(first).unwrap();
    let interim = runner.snapshot().unwrap();
    let resumed = runner.run(second).unwrap();

    assert_eq!(resumed.ratings, full.ratings);
    assert!(interim.total_count() < full.total_count());
}

#[test]
fn test_order_changes_result() {
    let forward = vec![
        MatchRecord::new("X", "Y", MatchOutcome::AWins),
        MatchRecord::new("X", "Z", MatchOutcome::BWins),
    ];
    let backward: Vec<MatchRecord> = forward.iter().rev().cloned().collect();

    let a = BatchRunner::for_matches(EloConfig::default(), &forward)
        .unwrap()
        .run(&forward)
        .unwrap();
    let b = BatchRunner::for_matches(EloConfig::default(), &backward)
        .unwrap()
        .run(&backward)
        .unwrap();

    assert_ne!(a.get("X").unwrap().score, b.get("X").unwrap().score);
}

#[test]
fn test_dominant_image_ranks_first() {
    let mut matches = Vec::new();
    for _ in 0..3 {
        for winner in 0..4u32 {
            for loser in (winner + 1)..4 {
                matches.push(MatchRecord::new(
                    winner.to_string(),
                    loser.to_string(),
                    MatchOutcome::AWins,
                ));
            }
        }
    }

    let snapshot = BatchRunner::for_matches(EloConfig::default(), &matches)
        .unwrap()
        .run(&matches)
        .unwrap();

    assert!(snapshot.get("0").unwrap().score > 1400.0);
    assert!(snapshot.get("3").unwrap().score < 1400.0);

    let ranked = snapshot.ranked();
    let position = |id: &str| ranked.iter().position(|r| r.entity_id == id).unwrap();
    assert!(position("0") < position("3"));
}

#[test]
fn test_runner_shared_across_threads() {
    let matches = synthetic_matches(5, 400);
    let runner = Arc::new(BatchRunner::for_matches(EloConfig::default(), &matches).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let runner = Arc::clone(&runner);
            let matches = matches.clone();
            std::thread::spawn(move || {
                runner.run(&matches).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let non_self = matches.iter().filter(|m| !m.is_self_match()).count() as u64;
    let snapshot = runner.snapshot().unwrap();
    assert_eq!(snapshot.total_count(), 4 * 2 * non_self);
    assert_eq!(runner.storage().len().unwrap(), 5);
}
