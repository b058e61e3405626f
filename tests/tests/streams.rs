//! Cross-crate scenarios: fixtures parsed from WKT, re-encoded into every
//! layout, walked through cursors and fed to the consumers.

use atlas_geometry::cursor::PathCursor;
use atlas_geometry::geometry::Geometry;
use atlas_geometry::math::{box2d, point, Point};
use atlas_geometry::rings::{FromRings, PolygonSource};
use atlas_geometry::{NestedPolygon, PackedPolygon, PathCommand, SplitPolygon};

use atlas_extra::clip::clip_geometry;
use atlas_extra::wkt::{parse_wkt, rings_from_commands, to_wkt};

use atlas_tests::{nested_fixture, packed_fixture, split_fixture};

fn commands(geometry: &Geometry) -> Vec<PathCommand> {
    geometry.cursor().unwrap().commands().collect()
}

#[test]
fn every_layout_of_a_parsed_fixture_tells_the_same_story() {
    let fixture = "POLYGON ((0 0, 100 0, 100 100, 0 100, 0 0), (50 50, 75 50, 75 75, 50 75, 50 50))";
    let split = match parse_wkt(fixture).unwrap() {
        Geometry::SplitPolygon(polygon) => polygon,
        other => panic!("unexpected fixture shape: {:?}", other),
    };

    let rings: Vec<_> = split.rings().map(<[Point]>::to_vec).collect();
    let packed = Geometry::PackedPolygon(PackedPolygon::from_rings(rings.clone()));
    let nested = Geometry::NestedPolygon(NestedPolygon::from_rings(rings));
    let split = Geometry::SplitPolygon(split);

    let without_close: Vec<PathCommand> = commands(&packed)
        .into_iter()
        .filter(|command| !command.is_close())
        .collect();
    assert_eq!(without_close, commands(&nested));
    assert_eq!(without_close, commands(&split));

    // The reference stream for the square-with-hole shape.
    assert_eq!(
        commands(&split),
        vec![
            PathCommand::MoveTo(point(0.0, 0.0)),
            PathCommand::LineTo(point(100.0, 0.0)),
            PathCommand::LineTo(point(100.0, 100.0)),
            PathCommand::LineTo(point(0.0, 100.0)),
            PathCommand::LineTo(point(0.0, 0.0)),
            PathCommand::MoveTo(point(50.0, 50.0)),
            PathCommand::LineTo(point(75.0, 50.0)),
            PathCommand::LineTo(point(75.0, 75.0)),
            PathCommand::LineTo(point(50.0, 75.0)),
            PathCommand::LineTo(point(50.0, 50.0)),
        ]
    );

    // And the serializer sees the same rings through every layout.
    let from_packed = rings_from_commands(commands(&packed));
    let from_split = rings_from_commands(commands(&split));
    assert_eq!(from_packed, from_split);
    assert_eq!(from_packed.len(), 2);
}

#[test]
fn layout_footprints_diverge_for_the_same_shape() {
    let num_rings = 8;
    let num_points = 128;

    let packed = packed_fixture(num_rings, num_points).footprint();
    let nested = nested_fixture(num_rings, num_points).footprint();
    let split = split_fixture(num_rings, num_points).footprint();

    assert_eq!(packed.allocations, 2);
    assert_eq!(nested.allocations, num_rings + 1);
    assert_eq!(split.allocations, num_rings + 1);
    assert!(packed.bytes > 0);
}

#[test]
fn clipped_fixtures_serialize_to_closed_rings() {
    let fixture = "POLYGON ((50 250, 400 250, 150 50, 50 250))";
    let geometry = parse_wkt(fixture).unwrap();
    let window = box2d(100.0, 100.0, 175.0, 175.0);

    let clipped = clip_geometry(&window, &geometry);
    assert!(!clipped.is_empty());

    for result in &clipped {
        let text = to_wkt(result).unwrap();
        let reparsed = parse_wkt(&text).unwrap();
        match reparsed {
            Geometry::SplitPolygon(polygon) => {
                assert_eq!(polygon.exterior.first(), polygon.exterior.last());
                assert!(polygon.exterior.len() >= 4);
            }
            other => panic!("expected a polygon back, got {:?}", other),
        }
    }
}

#[test]
fn parsed_multi_polygons_walk_member_by_member() {
    let fixture = "MULTIPOLYGON (((0 0, 10 0, 0 10, 0 0)), ((20 20, 30 20, 20 30, 20 20)))";
    let geometry = parse_wkt(fixture).unwrap();

    let stream = commands(&geometry);
    let move_tos = stream
        .iter()
        .filter(|command| matches!(command, PathCommand::MoveTo(_)))
        .count();
    assert_eq!(move_tos, 2);
    assert_eq!(stream.len(), 8);

    let rings = rings_from_commands(stream);
    assert_eq!(rings.len(), 2);
    assert_eq!(rings[1][0], point(20.0, 20.0));
}

#[test]
fn split_polygon_from_wkt_matches_hand_built() {
    let parsed = parse_wkt("POLYGON ((0 0, 4 0, 4 4, 0 0))").unwrap();

    let mut built = SplitPolygon::new();
    built.set_exterior(vec![
        point(0.0, 0.0),
        point(4.0, 0.0),
        point(4.0, 4.0),
        point(0.0, 0.0),
    ]);

    assert_eq!(parsed, Geometry::SplitPolygon(built));
}
