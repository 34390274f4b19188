//! Benchmarks for buffer computation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bufferum::{buffer, buffer_with_params, BufferParameters, JoinStyle};
use geo_types::{Coord, Geometry, LineString, Polygon};

/// Generates a star-shaped polygon with alternating inner and outer radii.
fn generate_star(num_points: usize) -> Geometry<f64> {
    let coords: Vec<Coord<f64>> = (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64 * 2.0 * std::f64::consts::PI;
            let r = if i % 2 == 0 { 10.0 } else { 7.0 };
            Coord {
                x: r * t.cos(),
                y: r * t.sin(),
            }
        })
        .collect();
    Polygon::new(LineString::from(coords), Vec::new()).into()
}

/// Generates a random walk polyline.
fn generate_random_walk(num_points: usize, seed: u64) -> Geometry<f64> {
    let mut coords = Vec::with_capacity(num_points);
    let mut x = 0.0;
    let mut y = 0.0;
    let mut state = seed;

    for _ in 0..num_points {
        coords.push(Coord { x, y });

        // xorshift for deterministic steps
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;

        let angle = (state as f64 / u64::MAX as f64) * 2.0 * std::f64::consts::PI;
        x += angle.cos();
        y += angle.sin();
    }

    LineString::from(coords).into()
}

fn bench_polygon(c: &mut Criterion) {
    let mut group = c.benchmark_group("polygon");

    for size in [16, 128, 1024] {
        let star = generate_star(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("grow", size), &star, |b, g| {
            b.iter(|| buffer(black_box(g), black_box(1.0)))
        });
        group.bench_with_input(BenchmarkId::new("erode", size), &star, |b, g| {
            b.iter(|| buffer(black_box(g), black_box(-1.0)))
        });
    }

    group.finish();
}

fn bench_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("line");
    let mitre = BufferParameters::default().with_join_style(JoinStyle::Mitre);

    for size in [100, 1000] {
        let walk = generate_random_walk(size, 42);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("round", size), &walk, |b, g| {
            b.iter(|| buffer(black_box(g), black_box(0.5)))
        });
        group.bench_with_input(BenchmarkId::new("mitre", size), &walk, |b, g| {
            b.iter(|| buffer_with_params(black_box(g), black_box(0.5), &mitre))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_polygon, bench_line);
criterion_main!(benches);
