//! Shared fixtures for the integration tests and benchmarks.

use atlas_geometry::geometry::{NestedPolygon, PackedPolygon, Ring, SplitPolygon};
use atlas_geometry::math::point;
use atlas_geometry::rings::FromRings;

/// A closed ring of `num_points + 1` vertices on a diagonal grid, the
/// shape the layout benchmarks have always used.
pub fn grid_ring(num_points: usize) -> Ring {
    let mut ring = Ring::with_capacity(num_points + 1);
    for i in 0..num_points {
        ring.push(point(i as f64, (num_points - i) as f64));
    }
    ring.push(point(0.0, num_points as f64));
    ring
}

/// The same logical polygon in every layout: one exterior plus
/// `num_rings - 1` holes, each ring `num_points + 1` vertices.
pub fn polygon_fixture(num_rings: usize, num_points: usize) -> Vec<Ring> {
    (0..num_rings).map(|_| grid_ring(num_points)).collect()
}

pub fn packed_fixture(num_rings: usize, num_points: usize) -> PackedPolygon {
    PackedPolygon::from_rings(polygon_fixture(num_rings, num_points))
}

pub fn nested_fixture(num_rings: usize, num_points: usize) -> NestedPolygon {
    NestedPolygon::from_rings(polygon_fixture(num_rings, num_points))
}

pub fn split_fixture(num_rings: usize, num_points: usize) -> SplitPolygon {
    SplitPolygon::from_rings(polygon_fixture(num_rings, num_points))
}
