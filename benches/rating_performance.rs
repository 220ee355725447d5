//! Performance benchmarks for rating calculations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sunspotter_elo::config::{ColumnMap, EloConfig};
use sunspotter_elo::rating::{expected_score, AdaptiveEloCalculator, BatchRunner};
use sunspotter_elo::table::MatchSource;
use sunspotter_elo::types::{MatchOutcome, MatchRecord};

fn bench_matches(entities: u32, count: u32) -> Vec<MatchRecord> {
    (0..count)
        .map(|i| {
            let a = i % entities;
            let b = (i * 7 + 3) % entities;
            MatchRecord::new(a.to_string(), b.to_string(), MatchOutcome::from(i % 3 != 0))
        })
        .collect()
}

fn bench_expected_score(c: &mut Criterion) {
    c.bench_function("expected_score", |b| {
        b.iter(|| expected_score(black_box(1450.0), black_box(1450.5)))
    });
}

fn bench_single_match(c: &mut Criterion) {
    let calculator = AdaptiveEloCalculator::new(EloConfig::default()).unwrap();
    let storage = calculator
        .initialize_storage(["0".to_string(), "1".to_string()])
        .unwrap();

    c.bench_function("apply_match", |b| {
        b.iter(|| {
            black_box(
                calculator
                    .apply_match(&storage, "0", "1", MatchOutcome::AWins)
                    .unwrap(),
            )
        })
    });
}

fn bench_batch_run(c: &mut Criterion) {
    let matches = bench_matches(1_000, 20_000);

    c.bench_function("batch_run_20k_matches", |b| {
        b.iter(|| {
            let runner = BatchRunner::for_matches(EloConfig::default(), &matches).unwrap();
            black_box(runner.run(&matches).unwrap())
        })
    });
}

fn bench_table_parsing(c: &mut Criterion) {
    let mut table = String::from("image_id_0;image_id_1;image0_more_complex_image1\n");
    for record in bench_matches(1_000, 20_000) {
        table.push_str(&format!(
            "{};{};{}\n",
            record.entity_a, record.entity_b, record.outcome
        ));
    }
    let source = MatchSource::new(ColumnMap::default(), ';').unwrap();

    c.bench_function("parse_20k_rows", |b| {
        b.iter(|| black_box(source.read(table.as_bytes()).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_expected_score,
    bench_single_match,
    bench_batch_run,
    bench_table_parsing
);
criterion_main!(benches);
