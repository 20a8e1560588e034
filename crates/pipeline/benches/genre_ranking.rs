//! Benchmarks for genre ranking
//!
//! Run with: cargo bench --package pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline::{GenreTally, Recommender};

/// A tally with many genres and lots of tied counts
fn build_tally(genres: usize) -> GenreTally {
    (0..genres)
        .map(|i| (format!("Genre {i}"), (i % 17) as u32))
        .collect()
}

fn bench_select_genres(c: &mut Criterion) {
    let tally = build_tally(10_000);

    c.bench_function("select_top_3_of_10k", |b| {
        b.iter(|| {
            let genres = Recommender::select_genres(black_box(&tally), black_box(3));
            black_box(genres)
        })
    });
}

fn bench_build_tally(c: &mut Criterion) {
    let labels: Vec<String> = (0..64).map(|i| format!("Genre {i}")).collect();

    c.bench_function("increment_100k", |b| {
        b.iter(|| {
            let mut tally = GenreTally::new();
            for i in 0..100_000 {
                tally.increment(&labels[i % labels.len()]);
            }
            black_box(tally)
        })
    });
}

criterion_group!(benches, bench_select_genres, bench_build_tally);
criterion_main!(benches);
