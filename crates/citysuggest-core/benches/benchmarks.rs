//! Index build and request latency over the bundled sample dataset.
//!
//! Run with: cargo bench -p citysuggest-core

use citysuggest_core::text::bounded_levenshtein;
use citysuggest_core::{Catalog, RawParams, Suggester, TextIndex};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

const QUERIES: &[(&str, &str)] = &[
    ("short", "va"),
    ("prefix", "mont"),
    ("exact", "Montréal"),
    ("typo", "Torono"),
    ("miss", "SomeRandomCityInTheMiddleOfNowhere"),
];

fn bench_index_build(c: &mut Criterion) {
    let catalog = Catalog::load().expect("bundled dataset loads");
    c.bench_function("index_build", |b| {
        b.iter(|| TextIndex::build(black_box(&catalog)))
    });
}

fn bench_suggest(c: &mut Criterion) {
    let suggester = Suggester::with_defaults(Catalog::load().expect("bundled dataset loads"));
    let mut group = c.benchmark_group("suggest");

    for (label, q) in QUERIES {
        let plain = RawParams::query(*q);
        group.bench_with_input(BenchmarkId::new("plain", label), &plain, |b, params| {
            b.iter(|| suggester.suggest(black_box(params)).suggestions().len())
        });

        let biased = RawParams::query(*q).with_coordinate("45.50884", "-73.58781");
        group.bench_with_input(BenchmarkId::new("geo", label), &biased, |b, params| {
            b.iter(|| suggester.suggest(black_box(params)).suggestions().len())
        });
    }
    group.finish();
}

fn bench_levenshtein(c: &mut Criterion) {
    c.bench_function("bounded_levenshtein_hit", |b| {
        b.iter(|| bounded_levenshtein(black_box("montreal"), black_box("montrael"), 2))
    });
    c.bench_function("bounded_levenshtein_length_reject", |b| {
        b.iter(|| bounded_levenshtein(black_box("montreal"), black_box("vaudreuil-dorion"), 2))
    });
}

criterion_group!(benches, bench_index_build, bench_suggest, bench_levenshtein);
criterion_main!(benches);
