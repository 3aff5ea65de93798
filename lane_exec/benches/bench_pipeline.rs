//! # Steering Pipeline Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use lane_lib::{
    compute_direction_vector,
    per::{bright_pixels, lanes_edges, locate_lane_bases, synthetic_stripes, track_lanes},
};

fn pipeline_benchmark(c: &mut Criterion) {
    // ---- Build a dummy frame ----

    // Two straight lanes in a typical dashcam resolution
    let image = synthetic_stripes(1280, 720, &[340, 940], 24);

    c.bench_function("compute_direction_vector", |b| {
        b.iter(|| compute_direction_vector(&image).unwrap())
    });

    // ---- Individual perception stages ----

    let mask = bright_pixels(&image);
    let bases = locate_lane_bases(&mask).unwrap();
    let lanes = track_lanes(&mask, &bases);

    c.bench_function("per::bright_pixels", |b| b.iter(|| bright_pixels(&image)));
    c.bench_function("per::track_lanes", |b| {
        b.iter(|| track_lanes(&mask, &bases))
    });
    c.bench_function("per::lanes_edges", |b| b.iter(|| lanes_edges(&lanes)));
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
