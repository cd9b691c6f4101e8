//! Benchmarks for PDG reference parsing and lookups.
//!
//! Run with: `cargo bench --bench pdg_map`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use caloview::PdgVisMap;

const CATEGORIES: [&str; 6] = [
    "QUARKS",
    "LEPTONS",
    "GAUGE AND HIGGS BOSONS",
    "LIGHT I=1 MESONS",
    "STRANGE BARYONS",
    "EXOTICA",
];

/// A reference file with `entries` particles spread over the categories.
fn reference_text(entries: usize) -> String {
    let mut text = String::new();
    for (i, category) in CATEGORIES.iter().enumerate() {
        text.push_str(&format!("CATEGORY {}\n", category));
        for j in (i..entries).step_by(CATEGORIES.len()) {
            text.push_str(&format!("particle({}) {}\n", j, 1000 + j));
        }
        text.push('\n');
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdg_parse");

    for entries in [100, 1_000, 10_000] {
        let text = reference_text(entries);
        group.bench_with_input(BenchmarkId::from_parameter(entries), &text, |b, text| {
            b.iter(|| black_box(PdgVisMap::parse(text.as_bytes()).unwrap()))
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let map = PdgVisMap::parse(reference_text(1_000).as_bytes()).unwrap();

    c.bench_function("pdg_color_lookup", |b| {
        b.iter(|| {
            for code in -1500..1500 {
                black_box(map.color(black_box(code)));
            }
        })
    });
}

criterion_group!(benches, bench_parse, bench_lookup);
criterion_main!(benches);
