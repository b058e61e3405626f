//! Rectangle clipping through the `geo` crate.
//!
//! This module is the bridge to the external intersection engine: ring
//! views go in, freshly built polygons of the *same* storage layout come
//! out. It performs no validation and no recovery; whatever the engine
//! reports for malformed input propagates to the caller untouched.

use geometry::math::{point, Box2D, Point};
use geometry::rings::{FromRings, PolygonSource};
use geometry::{Geometry, MultiPolygon, Ring, SplitPolygon};

use geo::BooleanOps;

fn geo_ring(points: &[Point]) -> geo::LineString<f64> {
    points
        .iter()
        .map(|p| geo::Coord { x: p.x, y: p.y })
        .collect()
}

fn to_geo_polygon<P: PolygonSource>(polygon: &P) -> geo::Polygon<f64> {
    let exterior = geo_ring(polygon.exterior());
    let interiors = (0..polygon.num_interiors())
        .filter_map(|index| polygon.interior(index))
        .map(geo_ring)
        .collect();
    geo::Polygon::new(exterior, interiors)
}

fn from_geo_polygon<P: FromRings>(polygon: &geo::Polygon<f64>) -> P {
    let rings = std::iter::once(polygon.exterior())
        .chain(polygon.interiors().iter())
        .map(|line| line.0.iter().map(|c| point(c.x, c.y)).collect::<Ring>());
    P::from_rings(rings)
}

/// Clips one polygon against an axis-aligned window.
///
/// The results come back in the storage layout the input used; an
/// empty vector means nothing of the polygon lies inside the window.
pub fn clip_polygon<P>(window: &Box2D, polygon: &P) -> Vec<P>
where
    P: PolygonSource + FromRings,
{
    let frame = geo::Rect::new(
        geo::Coord {
            x: window.min.x,
            y: window.min.y,
        },
        geo::Coord {
            x: window.max.x,
            y: window.max.y,
        },
    )
    .to_polygon();
    let clipped = to_geo_polygon(polygon).intersection(&frame);
    clipped.0.iter().map(from_geo_polygon).collect()
}

/// Clips any geometry against an axis-aligned window.
///
/// Polygon-like variants come back in their own layout; points and line
/// strings clip to nothing.
pub fn clip_geometry(window: &Box2D, geometry: &Geometry) -> Vec<Geometry> {
    match geometry {
        Geometry::Point(_) | Geometry::LineString(_) => Vec::new(),
        Geometry::PackedPolygon(polygon) => clip_polygon(window, polygon)
            .into_iter()
            .map(Geometry::PackedPolygon)
            .collect(),
        Geometry::NestedPolygon(polygon) => clip_polygon(window, polygon)
            .into_iter()
            .map(Geometry::NestedPolygon)
            .collect(),
        Geometry::SplitPolygon(polygon) => clip_polygon(window, polygon)
            .into_iter()
            .map(Geometry::SplitPolygon)
            .collect(),
        Geometry::MultiPolygon(multi) => {
            let polygons: Vec<SplitPolygon> = multi
                .polygons
                .iter()
                .flat_map(|member| clip_polygon(window, member))
                .collect();
            if polygons.is_empty() {
                Vec::new()
            } else {
                vec![Geometry::MultiPolygon(MultiPolygon { polygons })]
            }
        }
    }
}

#[cfg(test)]
use crate::wkt::rings_from_commands;
#[cfg(test)]
use geometry::cursor::PathCursor;
#[cfg(test)]
use geometry::math::box2d;
#[cfg(test)]
use geometry::{NestedPolygon, PackedPolygon};

#[cfg(test)]
fn triangle() -> Ring {
    vec![
        point(50.0, 250.0),
        point(400.0, 250.0),
        point(150.0, 50.0),
        point(50.0, 250.0),
    ]
}

#[test]
fn clipped_triangle_stays_inside_the_window() {
    let window = box2d(100.0, 100.0, 175.0, 175.0);
    let polygon = SplitPolygon::from_rings(vec![triangle()]);

    let clipped = clip_polygon(&window, &polygon);
    assert!(!clipped.is_empty());

    for result in &clipped {
        let geometry = Geometry::SplitPolygon(result.clone());
        let mut cursor = geometry.cursor().unwrap();
        let rings = rings_from_commands(cursor.commands());
        assert!(!rings.is_empty());
        for ring in &rings {
            // The serializer's view of each output ring is closed and
            // fully inside the window.
            assert_eq!(ring.first(), ring.last());
            for position in ring {
                assert!(position.x >= window.min.x - 1e-9);
                assert!(position.x <= window.max.x + 1e-9);
                assert!(position.y >= window.min.y - 1e-9);
                assert!(position.y <= window.max.y + 1e-9);
            }
        }
    }
}

#[test]
fn results_keep_the_input_layout() {
    let window = box2d(100.0, 100.0, 175.0, 175.0);

    let packed = PackedPolygon::from_rings(vec![triangle()]);
    let clipped: Vec<PackedPolygon> = clip_polygon(&window, &packed);
    assert!(!clipped.is_empty());
    assert!(clipped.iter().all(|polygon| polygon.validate().is_ok()));

    let nested = NestedPolygon::from_rings(vec![triangle()]);
    let clipped: Vec<NestedPolygon> = clip_polygon(&window, &nested);
    assert!(!clipped.is_empty());
}

#[test]
fn window_inside_a_hole_clips_to_nothing() {
    let mut polygon = SplitPolygon::new();
    polygon.set_exterior(vec![
        point(0.0, 0.0),
        point(100.0, 0.0),
        point(100.0, 100.0),
        point(0.0, 100.0),
        point(0.0, 0.0),
    ]);
    polygon.add_hole(vec![
        point(20.0, 20.0),
        point(20.0, 80.0),
        point(80.0, 80.0),
        point(80.0, 20.0),
        point(20.0, 20.0),
    ]);

    let window = box2d(40.0, 40.0, 60.0, 60.0);
    assert!(clip_polygon(&window, &polygon).is_empty());
}

#[test]
fn clip_geometry_dispatches_per_variant() {
    let window = box2d(100.0, 100.0, 175.0, 175.0);

    assert!(clip_geometry(&window, &Geometry::Point(point(120.0, 120.0))).is_empty());

    let mut multi = MultiPolygon::new();
    multi.push(SplitPolygon::from_rings(vec![triangle()]));
    multi.push(SplitPolygon::from_rings(vec![vec![
        point(500.0, 500.0),
        point(600.0, 500.0),
        point(500.0, 600.0),
        point(500.0, 500.0),
    ]]));

    let clipped = clip_geometry(&window, &Geometry::MultiPolygon(multi));
    assert_eq!(clipped.len(), 1);
    match &clipped[0] {
        Geometry::MultiPolygon(multi) => assert!(multi.num_polygons() >= 1),
        other => panic!("expected a multi polygon, got {:?}", other),
    }

    let packed = PackedPolygon::from_rings(vec![triangle()]);
    let clipped = clip_geometry(&window, &Geometry::PackedPolygon(packed));
    assert!(clipped
        .iter()
        .all(|geometry| matches!(geometry, Geometry::PackedPolygon(_))));
}
