//! Benchmarks for field matchers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nestfind_search::{
    levenshtein_distance, FieldMatcher, FuzzySettings, SynonymTable, ToleranceTable,
};
use std::collections::BTreeMap;

fn matcher() -> FieldMatcher {
    let mut amenities = BTreeMap::new();
    amenities.insert(
        "gym".to_string(),
        vec!["fitness center".to_string(), "exercise room".to_string()],
    );
    let mut array = BTreeMap::new();
    array.insert("amenities".to_string(), amenities);

    FieldMatcher::new(
        ToleranceTable::new([("square_feet", 100.0)]).unwrap(),
        SynonymTable::default(),
        SynonymTable::new(&array).unwrap(),
        FuzzySettings::default(),
    )
    .unwrap()
}

fn bench_scalar_matchers(c: &mut Criterion) {
    let m = matcher();

    c.bench_function("match_numeric", |b| {
        b.iter(|| m.match_numeric(black_box(950.0), black_box(1010.0), "square_feet"))
    });

    c.bench_function("match_string_fuzzy", |b| {
        b.iter(|| m.match_string(black_box("townhouse"), black_box("townhose"), "property_type"))
    });

    c.bench_function("levenshtein", |b| {
        b.iter(|| {
            levenshtein_distance(black_box("semi-detached house"), black_box("semi detached"))
        })
    });
}

fn bench_array_matcher(c: &mut Criterion) {
    let m = matcher();
    let mut group = c.benchmark_group("match_array");

    for size in [4, 16, 64].iter() {
        let requested: Vec<String> = (0..*size).map(|i| format!("amenity {}", i)).collect();
        let available: Vec<String> = (0..*size * 2).map(|i| format!("amenity {}", i)).collect();

        group.bench_with_input(BenchmarkId::new("items", size), size, |b, _| {
            b.iter(|| m.match_array(black_box(&requested), black_box(&available), "amenities"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scalar_matchers, bench_array_matcher);
criterion_main!(benches);
