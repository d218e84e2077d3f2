use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

use wc22_tactics::config::AnalysisConfig;
use wc22_tactics::csv_ingest::read_records;
use wc22_tactics::features::{build_matrix, select_features, standardize};
use wc22_tactics::kmeans::kmeans;
use wc22_tactics::metrics::derive_records;
use wc22_tactics::record::RawRecord;
use wc22_tactics::schema::resolve_dataset;
use wc22_tactics::session::run_analysis;

const TEAMS: [&str; 8] = [
    "ARGENTINA",
    "BRAZIL",
    "FRANCE",
    "CROATIA",
    "MOROCCO",
    "ENGLAND",
    "SPAIN",
    "JAPAN",
];

fn synthetic_matches(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            let p1 = 35 + (i * 7) % 30;
            RawRecord::new()
                .with("team1", TEAMS[i % TEAMS.len()])
                .with("team2", TEAMS[(i * 3 + 1) % TEAMS.len()])
                .with("possession team1", format!("{p1}%"))
                .with("possession team2", format!("{}%", 90 - p1))
                .with("number of goals team1", ((i * 5) % 4) as f64)
                .with("number of goals team2", ((i * 3) % 3) as f64)
                .with("total attempts team1", (6 + (i * 11) % 15) as f64)
                .with("total attempts team2", (4 + (i * 13) % 12) as f64)
                .with("passes team1", (300 + (i * 37) % 400) as f64)
                .with("passes team2", (250 + (i * 29) % 380) as f64)
                .with("yellow cards team1", (i % 4) as f64)
                .with("yellow cards team2", ((i + 1) % 3) as f64)
                .with("corners team1", (i % 9) as f64)
                .with("corners team2", ((i * 2) % 7) as f64)
        })
        .collect()
}

fn bench_derive(c: &mut Criterion) {
    let rows = synthetic_matches(64);
    let columns = resolve_dataset(&rows);
    c.bench_function("derive_records", |b| {
        b.iter(|| {
            let derived = derive_records(black_box(&rows), &columns);
            black_box(derived.len());
        })
    });
}

fn bench_standardize(c: &mut Criterion) {
    let rows = synthetic_matches(64);
    let derived = derive_records(&rows, &resolve_dataset(&rows));
    let matrix = build_matrix(&derived, &select_features(&derived));
    c.bench_function("standardize", |b| {
        b.iter(|| {
            let (scaled, _) = standardize(black_box(&matrix));
            black_box(scaled.n_rows());
        })
    });
}

fn bench_kmeans(c: &mut Criterion) {
    let rows = synthetic_matches(64);
    let derived = derive_records(&rows, &resolve_dataset(&rows));
    let (matrix, _) = standardize(&build_matrix(&derived, &select_features(&derived)));
    c.bench_function("kmeans_k3", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let out = kmeans(black_box(&matrix), 3, &mut rng);
            black_box(out.iterations);
        })
    });
}

fn bench_full_analysis(c: &mut Criterion) {
    let rows = synthetic_matches(64);
    let config = AnalysisConfig::default().with_seed(7);
    c.bench_function("full_analysis", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let snapshot = run_analysis(black_box(&rows), &config, &mut rng);
            black_box(snapshot.profiles.len());
        })
    });
}

fn bench_csv_ingest(c: &mut Criterion) {
    c.bench_function("csv_ingest", |b| {
        b.iter(|| {
            let records = read_records(black_box(WORLD_CUP_CSV.as_bytes())).unwrap();
            black_box(records.len());
        })
    });
}

criterion_group!(
    perf,
    bench_derive,
    bench_standardize,
    bench_kmeans,
    bench_full_analysis,
    bench_csv_ingest
);
criterion_main!(perf);

static WORLD_CUP_CSV: &str = include_str!("../tests/fixtures/world_cup_sample.csv");
