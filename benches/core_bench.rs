use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use std::f64::consts::TAU;
use std::hint::black_box;
use track_cones::engine::{
    dedupe, reconstruct, sample_by_spacing, synthesize, Closure, CubicSpline, EngineParams,
};
use track_cones::formats::parse_graph;

fn build_wobbly_loop(count: usize) -> Vec<DVec2> {
    (0..count)
        .map(|i| {
            let a = TAU * i as f64 / count as f64;
            let r = 200.0 + 25.0 * (3.0 * a).sin();
            DVec2::new(a.cos() * r, a.sin() * r)
        })
        .collect()
}

fn build_scattered_points(count: usize) -> Vec<DVec2> {
    (0..count)
        .map(|i| {
            let x = (i % 1000) as f64 * 0.7 + 0.37;
            let y = ((i * 7) % 1000) as f64 * 0.7 + 0.63;
            DVec2::new(x, y)
        })
        .collect()
}

fn bench_graph_parsing(c: &mut Criterion) {
    let content = include_str!("../tests/fixtures/graph_live_output.txt");

    c.bench_function("graph_parse_live_output", |b| {
        b.iter(|| {
            let graph = parse_graph(black_box(content));
            black_box(graph.landmarks.len())
        })
    });
}

fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesis");
    let params = EngineParams::default();

    for &count in &[100usize, 1_000usize] {
        let centerline = build_wobbly_loop(count);
        group.bench_with_input(
            BenchmarkId::new("closed_loop", count),
            &centerline,
            |b, points| {
                b.iter(|| {
                    let layout = synthesize(black_box(points), Closure::Closed, &params)
                        .expect("Synthese fehlgeschlagen");
                    black_box(layout.markers.len())
                })
            },
        );
    }

    group.finish();
}

fn bench_sampling_and_dedupe(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");

    let spline =
        CubicSpline::fit(&build_wobbly_loop(200), true).expect("Spline-Fit fehlgeschlagen");
    group.bench_function("spline_by_spacing", |b| {
        b.iter(|| {
            let points = sample_by_spacing(&spline, black_box(2.0), 1000).expect("Abtastung");
            black_box(points.len())
        })
    });

    for &count in &[10_000usize, 100_000usize] {
        let points = build_scattered_points(count);
        group.bench_with_input(BenchmarkId::new("dedupe", count), &points, |b, points| {
            b.iter(|| black_box(dedupe(black_box(points), 2.0).len()))
        });
    }

    let detections = [build_wobbly_loop(300), build_scattered_points(300)].concat();
    let trail = build_wobbly_loop(50);
    group.bench_function("reconstruct_600", |b| {
        b.iter(|| {
            let result = reconstruct(black_box(&detections), &trail, &EngineParams::default())
                .expect("Rekonstruktion fehlgeschlagen");
            black_box(result.markers.len())
        })
    });

    group.finish();
}

criterion_group!(
    core_benches,
    bench_graph_parsing,
    bench_synthesis,
    bench_sampling_and_dedupe
);
criterion_main!(core_benches);
