//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use sunspotter_elo::types::{MatchOutcome, MatchRecord};

/// Header of the Sunspotter classifications table
pub const CLASSIFICATIONS_HEADER: &str =
    "image_id_0;image_id_1;image0_more_complex_image1;used_inverted;user_id";

/// Write a `;`-delimited classifications table into `dir`
///
/// Each row is `(image_id_0, image_id_1, image0_more_complex_image1)`.
pub fn write_classifications(dir: &Path, rows: &[(u32, u32, u8)]) -> PathBuf {
    let path = dir.join("classifications.csv");
    let mut file = std::fs::File::create(&path).unwrap();

    writeln!(file, "{}", CLASSIFICATIONS_HEADER).unwrap();
    for (index, (a, b, outcome)) in rows.iter().enumerate() {
        writeln!(file, "{};{};{};False;{}", a, b, outcome, 1000 + index).unwrap();
    }

    path
}

/// Deterministic stream of comparisons among `entities` images
///
/// Lower ids tend to win, so the resulting ranking has a known order.
pub fn synthetic_matches(entities: u32, count: usize) -> Vec<MatchRecord> {
    (0..count)
        .map(|i| {
            let i = i as u32;
            let a = i % entities;
            let b = (i.wrapping_mul(7).wrapping_add(3)) % entities;
            let upset = i % 5 == 0;
            let a_wins = (a < b) != upset;
            MatchRecord::new(a.to_string(), b.to_string(), MatchOutcome::from(a_wins))
        })
        .collect()
}

/// Assert two floats agree to within `1e-9`
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
