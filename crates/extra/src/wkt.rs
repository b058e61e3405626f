//! Minimal WKT reading and writing.
//!
//! The reader exists to turn fixture strings into [`Geometry`] values;
//! it is not a general-purpose WKT implementation. Polygons parse into
//! the split layout, matching what the clipping side produces. The
//! writer is a consumer of the command stream only: it groups points
//! between `MoveTo` boundaries into rings and emits them as
//! parenthesized coordinate lists, propagating sink failures unchanged.

use geometry::cursor::{PathCursor, SplitPolygonCursor};
use geometry::math::point;
use geometry::rings::{FromRings, PolygonSource};
use geometry::{Geometry, GeometryError, LineString, MultiPolygon, PathCommand, Ring, SplitPolygon};

use std::fmt;

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("column {column}: expected a number, got {src:?}")]
    Number { src: String, column: usize },
    #[error("column {column}: expected {expected:?}")]
    Expected { expected: char, column: usize },
    #[error("column {column}: unknown keyword {keyword:?}")]
    Keyword { keyword: String, column: usize },
}

/// Failure serializing: the sink rejected a write, or the geometry's
/// encoding was invalid.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum WriteError {
    #[error("the output sink rejected a write")]
    Sink(#[from] fmt::Error),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

// A cursor over the source characters keeping track of the column for
// error reporting. Commas separate coordinates and rings in WKT but
// carry no information of their own, so they count as whitespace.
struct Source<'l> {
    chars: std::str::Chars<'l>,
    current: Option<char>,
    column: usize,
}

impl<'l> Source<'l> {
    fn new(src: &'l str) -> Self {
        let mut chars = src.chars();
        let current = chars.next();
        Source {
            chars,
            current,
            column: 0,
        }
    }

    fn advance(&mut self) {
        self.current = self.chars.next();
        self.column += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current {
            if !c.is_whitespace() && c != ',' {
                break;
            }
            self.advance();
        }
    }

    fn keyword(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.current {
            if !c.is_ascii_alphabetic() {
                break;
            }
            word.push(c.to_ascii_uppercase());
            self.advance();
        }
        word
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        if self.current == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::Expected {
                expected,
                column: self.column,
            })
        }
    }

    fn number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let column = self.column;
        let mut src = String::new();
        while let Some(c) = self.current {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                src.push(c);
                self.advance();
            } else {
                break;
            }
        }
        src.parse().map_err(|_| ParseError::Number { src, column })
    }

    // Consumes an `EMPTY` keyword if one follows.
    fn take_empty(&mut self) -> Result<bool, ParseError> {
        self.skip_whitespace();
        match self.current {
            Some(c) if c.is_ascii_alphabetic() => {
                let column = self.column;
                let word = self.keyword();
                if word == "EMPTY" {
                    Ok(true)
                } else {
                    Err(ParseError::Keyword {
                        keyword: word,
                        column,
                    })
                }
            }
            _ => Ok(false),
        }
    }
}

fn points(source: &mut Source) -> Result<Ring, ParseError> {
    source.expect('(')?;
    let mut ring = Ring::new();
    loop {
        source.skip_whitespace();
        if source.current == Some(')') {
            break;
        }
        let x = source.number()?;
        let y = source.number()?;
        ring.push(point(x, y));
    }
    source.expect(')')?;
    Ok(ring)
}

fn rings(source: &mut Source) -> Result<Vec<Ring>, ParseError> {
    source.expect('(')?;
    let mut rings = Vec::new();
    loop {
        source.skip_whitespace();
        if source.current != Some('(') {
            break;
        }
        rings.push(points(source)?);
    }
    source.expect(')')?;
    Ok(rings)
}

/// Parses one WKT geometry.
///
/// Supports `POINT`, `LINESTRING`, `POLYGON` and `MULTIPOLYGON`
/// (plus `EMPTY` bodies); polygons come back in the split layout.
pub fn parse_wkt(src: &str) -> Result<Geometry, ParseError> {
    let mut source = Source::new(src);
    source.skip_whitespace();
    let column = source.column;
    let keyword = source.keyword();
    match keyword.as_str() {
        "POINT" => {
            source.expect('(')?;
            let x = source.number()?;
            let y = source.number()?;
            source.expect(')')?;
            Ok(Geometry::Point(point(x, y)))
        }
        "LINESTRING" => {
            if source.take_empty()? {
                return Ok(Geometry::LineString(LineString::new()));
            }
            Ok(Geometry::LineString(LineString::from(points(&mut source)?)))
        }
        "POLYGON" => {
            if source.take_empty()? {
                return Ok(Geometry::SplitPolygon(SplitPolygon::new()));
            }
            let rings = rings(&mut source)?;
            Ok(Geometry::SplitPolygon(SplitPolygon::from_rings(rings)))
        }
        "MULTIPOLYGON" => {
            if source.take_empty()? {
                return Ok(Geometry::MultiPolygon(MultiPolygon::new()));
            }
            source.expect('(')?;
            let mut polygons = Vec::new();
            loop {
                source.skip_whitespace();
                if source.current != Some('(') {
                    break;
                }
                polygons.push(SplitPolygon::from_rings(rings(&mut source)?));
            }
            source.expect(')')?;
            Ok(Geometry::MultiPolygon(MultiPolygon { polygons }))
        }
        _ => Err(ParseError::Keyword { keyword, column }),
    }
}

/// Collects a command stream into rings: `MoveTo` starts a ring,
/// `Close` and `End` are markers only and carry no points.
pub fn rings_from_commands<I>(commands: I) -> Vec<Ring>
where
    I: IntoIterator<Item = PathCommand>,
{
    let mut rings = Vec::new();
    let mut ring = Ring::new();
    for command in commands {
        match command {
            PathCommand::MoveTo(position) => {
                if !ring.is_empty() {
                    rings.push(ring);
                }
                ring = vec![position];
            }
            PathCommand::LineTo(position) => ring.push(position),
            PathCommand::Close | PathCommand::End => {}
        }
    }
    if !ring.is_empty() {
        rings.push(ring);
    }
    rings
}

/// Streams the ring-grouped body of a command stream into the sink:
/// `(x y, x y), (x y, …)`.
pub fn write_body<W, I>(sink: &mut W, commands: I) -> Result<(), WriteError>
where
    W: fmt::Write,
    I: IntoIterator<Item = PathCommand>,
{
    let mut open = false;
    for command in commands {
        match command {
            PathCommand::MoveTo(position) => {
                if open {
                    sink.write_str("), ")?;
                }
                sink.write_str("(")?;
                write!(sink, "{} {}", position.x, position.y)?;
                open = true;
            }
            PathCommand::LineTo(position) => {
                write!(sink, ", {} {}", position.x, position.y)?;
            }
            PathCommand::Close | PathCommand::End => {}
        }
    }
    if open {
        sink.write_str(")")?;
    }
    Ok(())
}

fn write_polygon_body<W, P>(sink: &mut W, polygon: &P, geometry: &Geometry) -> Result<(), WriteError>
where
    W: fmt::Write,
    P: PolygonSource,
{
    if polygon.rings().all(|ring| ring.is_empty()) {
        sink.write_str("EMPTY")?;
        return Ok(());
    }
    let mut cursor = geometry.cursor()?;
    sink.write_str("(")?;
    write_body(sink, cursor.commands())?;
    sink.write_str(")")?;
    Ok(())
}

/// Serializes a whole geometry as WKT.
pub fn write_wkt<W: fmt::Write>(sink: &mut W, geometry: &Geometry) -> Result<(), WriteError> {
    match geometry {
        Geometry::Point(_) => {
            sink.write_str("POINT ")?;
            let mut cursor = geometry.cursor()?;
            write_body(sink, cursor.commands())
        }
        Geometry::LineString(line) => {
            sink.write_str("LINESTRING ")?;
            if line.points.is_empty() {
                sink.write_str("EMPTY")?;
                return Ok(());
            }
            let mut cursor = geometry.cursor()?;
            write_body(sink, cursor.commands())
        }
        Geometry::PackedPolygon(polygon) => {
            sink.write_str("POLYGON ")?;
            write_polygon_body(sink, polygon, geometry)
        }
        Geometry::NestedPolygon(polygon) => {
            sink.write_str("POLYGON ")?;
            write_polygon_body(sink, polygon, geometry)
        }
        Geometry::SplitPolygon(polygon) => {
            sink.write_str("POLYGON ")?;
            write_polygon_body(sink, polygon, geometry)
        }
        Geometry::MultiPolygon(multi) => {
            sink.write_str("MULTIPOLYGON ")?;
            if multi.polygons.is_empty() {
                sink.write_str("EMPTY")?;
                return Ok(());
            }
            sink.write_str("(")?;
            for (index, member) in multi.polygons.iter().enumerate() {
                if index > 0 {
                    sink.write_str(", ")?;
                }
                let mut cursor = SplitPolygonCursor::new(member);
                sink.write_str("(")?;
                write_body(sink, cursor.commands())?;
                sink.write_str(")")?;
            }
            sink.write_str(")")?;
            Ok(())
        }
    }
}

/// Serializes a whole geometry into a fresh string.
pub fn to_wkt(geometry: &Geometry) -> Result<String, WriteError> {
    let mut out = String::new();
    write_wkt(&mut out, geometry)?;
    Ok(out)
}

#[cfg(test)]
use geometry::math::Point;
#[cfg(test)]
use geometry::PackedPolygon;

#[test]
fn parse_point_and_line_string() {
    assert_eq!(
        parse_wkt("POINT (100 200)"),
        Ok(Geometry::Point(point(100.0, 200.0)))
    );
    assert_eq!(
        parse_wkt("LINESTRING (0 0, 10 0, 10 10)"),
        Ok(Geometry::LineString(LineString::from(vec![
            point(0.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
        ])))
    );
    assert_eq!(
        parse_wkt("LINESTRING EMPTY"),
        Ok(Geometry::LineString(LineString::new()))
    );
}

#[test]
fn parse_polygon_with_hole() {
    let geometry =
        parse_wkt("POLYGON ((0 0, 100 0, 100 100, 0 0), (10 10, 20 10, 10 20, 10 10))").unwrap();
    match geometry {
        Geometry::SplitPolygon(polygon) => {
            assert_eq!(polygon.exterior.len(), 4);
            assert_eq!(polygon.holes.len(), 1);
            assert_eq!(polygon.holes[0][1], point(20.0, 10.0));
        }
        other => panic!("expected a split polygon, got {:?}", other),
    }
}

#[test]
fn parse_multi_polygon() {
    let geometry = parse_wkt(
        "MULTIPOLYGON (((0 0, 10 0, 0 10, 0 0)), ((20 20, 30 20, 20 30, 20 20), (22 22, 24 22, 22 24, 22 22)))",
    )
    .unwrap();
    match geometry {
        Geometry::MultiPolygon(multi) => {
            assert_eq!(multi.num_polygons(), 2);
            assert_eq!(multi.polygons[0].holes.len(), 0);
            assert_eq!(multi.polygons[1].holes.len(), 1);
        }
        other => panic!("expected a multi polygon, got {:?}", other),
    }
}

#[test]
fn parse_failures() {
    assert_eq!(
        parse_wkt("TRIANGLE (0 0, 1 1)"),
        Err(ParseError::Keyword {
            keyword: "TRIANGLE".into(),
            column: 0,
        })
    );
    assert!(matches!(
        parse_wkt("POINT (a b)"),
        Err(ParseError::Number { .. })
    ));
    assert!(matches!(
        parse_wkt("POLYGON (0 0, 1 1)"),
        Err(ParseError::Expected { expected: ')', .. })
    ));
}

#[test]
fn ring_grouping_ignores_close_markers() {
    let mut polygon = PackedPolygon::new();
    polygon.add_ring(&[point(0.0, 0.0), point(5.0, 0.0), point(0.0, 5.0), point(0.0, 0.0)]);
    polygon.add_ring(&[point(1.0, 1.0), point(2.0, 1.0), point(1.0, 2.0), point(1.0, 1.0)]);
    let geometry = Geometry::PackedPolygon(polygon);

    let mut cursor = geometry.cursor().unwrap();
    let rings = rings_from_commands(cursor.commands());
    assert_eq!(rings.len(), 2);
    assert_eq!(rings[0].len(), 4);
    assert_eq!(rings[0].first(), rings[0].last());
    assert_eq!(rings[1][0], point(1.0, 1.0));
}

#[test]
fn write_simple_geometries() {
    let geometry = Geometry::Point(point(100.0, 200.0));
    assert_eq!(to_wkt(&geometry).unwrap(), "POINT (100 200)");

    let geometry = Geometry::SplitPolygon(SplitPolygon::new());
    assert_eq!(to_wkt(&geometry).unwrap(), "POLYGON EMPTY");

    let geometry = parse_wkt("POLYGON ((0 0, 100 0, 100 100, 0 0))").unwrap();
    assert_eq!(
        to_wkt(&geometry).unwrap(),
        "POLYGON ((0 0, 100 0, 100 100, 0 0))"
    );
}

#[test]
fn wkt_round_trips_through_the_writer() {
    let fixtures = [
        "POINT (1 2)",
        "LINESTRING (0 0, 10 0, 10 10)",
        "POLYGON ((0 0, 100 0, 100 100, 0 0), (10 10, 20 10, 10 20, 10 10))",
        "MULTIPOLYGON (((0 0, 10 0, 0 10, 0 0)), ((20 20, 30 20, 20 30, 20 20)))",
    ];
    for fixture in fixtures.iter() {
        let parsed = parse_wkt(fixture).unwrap();
        let written = to_wkt(&parsed).unwrap();
        assert_eq!(parse_wkt(&written), Ok(parsed), "{}", fixture);
    }
}

#[test]
fn packed_and_split_serialize_identically() {
    let split = match parse_wkt("POLYGON ((0 0, 8 0, 8 8, 0 0), (2 2, 4 2, 2 4, 2 2))").unwrap() {
        Geometry::SplitPolygon(polygon) => polygon,
        _ => unreachable!(),
    };
    let packed = PackedPolygon::from_rings(split.rings().map(<[Point]>::to_vec));

    let split_text = to_wkt(&Geometry::SplitPolygon(split)).unwrap();
    let packed_text = to_wkt(&Geometry::PackedPolygon(packed)).unwrap();
    assert_eq!(split_text, packed_text);
}
