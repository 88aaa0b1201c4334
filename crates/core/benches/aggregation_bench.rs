//! Performance benchmarks for search analytics
//!
//! Measures the grouping views over synthetic logs of increasing size.
//!
//! Run with: cargo bench --bench aggregation_bench

use chrono::{Duration, TimeZone, Utc};
use cinelog_core::analytics::{
    count_actor_queries, count_search_types, count_title_queries, latest_distinct,
    normalize_parameters,
};
use cinelog_core::types::{ParamValue, SearchEvent, SearchKind};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const TITLES: [&str; 6] = [
    "Casablanca",
    "Alien",
    "Heat",
    "Vertigo",
    "Rashomon",
    "Metropolis",
];
const ACTORS: [&str; 4] = ["tom hanks", "meg ryan", "sigourney weaver", "al pacino"];

/// Build a log cycling through the search kinds
fn synthetic_log(size: usize) -> Vec<SearchEvent> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    (0..size)
        .map(|i| {
            let (kind, params) = match i % 3 {
                0 => (
                    SearchKind::Title,
                    vec![("title", ParamValue::from(TITLES[i % TITLES.len()]))],
                ),
                1 => (
                    SearchKind::Actor,
                    vec![("actor", ParamValue::from(ACTORS[i % ACTORS.len()]))],
                ),
                _ => (
                    SearchKind::GenreAndYears,
                    vec![
                        ("genre", ParamValue::from("drama")),
                        ("from", ParamValue::from(1990 + (i % 10) as i64)),
                        ("to", ParamValue::from(2020)),
                    ],
                ),
            };
            SearchEvent::new(
                kind.as_str(),
                normalize_parameters(params).unwrap(),
                (i % 17) as u64,
                base + Duration::milliseconds((i / 2) as i64),
            )
        })
        .collect()
}

fn benchmark_counting_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("counting_views");

    for size in [100, 1_000, 10_000] {
        let events = synthetic_log(size);

        group.bench_with_input(BenchmarkId::new("search_types", size), &events, |b, e| {
            b.iter(|| count_search_types(black_box(e), 5))
        });
        group.bench_with_input(BenchmarkId::new("titles", size), &events, |b, e| {
            b.iter(|| count_title_queries(black_box(e), 5))
        });
        group.bench_with_input(BenchmarkId::new("actors", size), &events, |b, e| {
            b.iter(|| count_actor_queries(black_box(e), 5))
        });
    }

    group.finish();
}

fn benchmark_latest_distinct(c: &mut Criterion) {
    let mut group = c.benchmark_group("latest_distinct");

    for size in [100, 1_000, 10_000] {
        let events = synthetic_log(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, e| {
            b.iter(|| latest_distinct(black_box(e), 5))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_counting_views, benchmark_latest_distinct);
criterion_main!(benches);
