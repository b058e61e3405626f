#[macro_use]
extern crate criterion;

use criterion::Criterion;

use atlas_geometry::cursor::{
    NestedPolygonCursor, PackedPolygonCursor, PathCursor, SplitPolygonCursor,
};
use atlas_geometry::PathCommand;
use atlas_tests::{nested_fixture, packed_fixture, polygon_fixture, split_fixture};

const NUM_RINGS: usize = 10;
const NUM_POINTS: usize = 1_000;

fn walk<C: PathCursor>(cursor: &mut C) -> (usize, f64) {
    cursor.reset();
    let mut count = 0;
    let mut sum = 0.0;
    loop {
        match cursor.advance() {
            PathCommand::End => return (count, sum),
            command => {
                count += 1;
                if let Some(position) = command.position() {
                    sum += position.x + position.y;
                }
            }
        }
    }
}

fn cursor_iteration(bench: &mut Criterion) {
    let packed = packed_fixture(NUM_RINGS, NUM_POINTS);
    let nested = nested_fixture(NUM_RINGS, NUM_POINTS);
    let split = split_fixture(NUM_RINGS, NUM_POINTS);

    let mut group = bench.benchmark_group("cursor iteration");

    group.bench_function("packed", |b| {
        let mut cursor = PackedPolygonCursor::new(&packed).unwrap();
        b.iter(|| std::hint::black_box(walk(&mut cursor)));
    });

    group.bench_function("nested", |b| {
        let mut cursor = NestedPolygonCursor::new(&nested);
        b.iter(|| std::hint::black_box(walk(&mut cursor)));
    });

    group.bench_function("split", |b| {
        let mut cursor = SplitPolygonCursor::new(&split);
        b.iter(|| std::hint::black_box(walk(&mut cursor)));
    });

    group.finish();
}

fn polygon_construction(bench: &mut Criterion) {
    let rings = polygon_fixture(NUM_RINGS, NUM_POINTS);

    let mut group = bench.benchmark_group("polygon construction");

    group.bench_function("packed", |b| {
        b.iter(|| {
            use atlas_geometry::rings::FromRings;
            let polygon = atlas_geometry::PackedPolygon::from_rings(rings.clone());
            std::hint::black_box(polygon.footprint())
        });
    });

    group.bench_function("nested", |b| {
        b.iter(|| {
            use atlas_geometry::rings::FromRings;
            let polygon = atlas_geometry::NestedPolygon::from_rings(rings.clone());
            std::hint::black_box(polygon.footprint())
        });
    });

    group.bench_function("split", |b| {
        b.iter(|| {
            use atlas_geometry::rings::FromRings;
            let polygon = atlas_geometry::SplitPolygon::from_rings(rings.clone());
            std::hint::black_box(polygon.footprint())
        });
    });

    group.finish();
}

criterion_group!(benches, cursor_iteration, polygon_construction);
criterion_main!(benches);
