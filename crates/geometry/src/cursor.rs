//! One cursor state machine per storage layout, plus the dispatching
//! wrapper that selects the right one for a `Geometry` value.
//!
//! Every cursor is a small position-bookkeeping struct borrowing from an
//! immutable shape. `reset` restores the initial state and may be called
//! any number of times; `advance` walks the shape and keeps returning
//! [`PathCommand::End`] once exhausted. Empty rings and empty shapes
//! produce no commands at all.

use crate::command::PathCommand;
use crate::geometry::{
    Geometry, GeometryError, LineString, MultiPolygon, NestedPolygon, PackedPolygon, Ring,
    SplitPolygon,
};
use crate::iterator::{Commands, Positions};
use crate::math::Point;
use crate::GeometryKind;

/// A restartable forward reader turning a stored shape into drawing
/// commands.
pub trait PathCursor {
    /// Returns the cursor to its initial state. Idempotent.
    fn reset(&mut self);

    /// Produces the next command. `End` is terminal until `reset`.
    fn advance(&mut self) -> PathCommand;

    /// Resets, then iterates the commands lazily. The iterator finishes
    /// right before `End` would be produced; `End` itself is never
    /// yielded. Calling `commands` again restarts from the beginning.
    fn commands(&mut self) -> Commands<'_, Self>
    where
        Self: Sized,
    {
        self.reset();
        Commands::new(self)
    }

    /// Resets, then iterates the positions carried by `MoveTo` and
    /// `LineTo` commands.
    fn positions(&mut self) -> Positions<'_, Self>
    where
        Self: Sized,
    {
        self.reset();
        Positions::new(self)
    }
}

/// Cursor over a single point: one `MoveTo`, then `End`.
#[derive(Clone)]
pub struct PointCursor<'l> {
    position: &'l Point,
    done: bool,
}

impl<'l> PointCursor<'l> {
    pub fn new(position: &'l Point) -> Self {
        PointCursor {
            position,
            done: false,
        }
    }
}

impl<'l> PathCursor for PointCursor<'l> {
    fn reset(&mut self) {
        self.done = false;
    }

    fn advance(&mut self) -> PathCommand {
        if self.done {
            return PathCommand::End;
        }
        self.done = true;
        PathCommand::MoveTo(*self.position)
    }
}

/// Cursor over an open path: `MoveTo`, `LineTo`s, `End`. Never `Close`.
#[derive(Clone)]
pub struct LineStringCursor<'l> {
    points: &'l [Point],
    index: usize,
}

impl<'l> LineStringCursor<'l> {
    pub fn new(line: &'l LineString) -> Self {
        LineStringCursor {
            points: &line.points,
            index: 0,
        }
    }
}

impl<'l> PathCursor for LineStringCursor<'l> {
    fn reset(&mut self) {
        self.index = 0;
    }

    fn advance(&mut self) -> PathCommand {
        if self.index == self.points.len() {
            return PathCommand::End;
        }
        let position = self.points[self.index];
        let command = if self.index == 0 {
            PathCommand::MoveTo(position)
        } else {
            PathCommand::LineTo(position)
        };
        self.index += 1;
        command
    }
}

/// Cursor over the shared-buffer layout.
///
/// The only cursor that emits `Close`: one after the final vertex of
/// every ring, including the last. Spans with `count == 0` contribute
/// nothing and do not disturb their neighbors.
#[derive(Clone)]
pub struct PackedPolygonCursor<'l> {
    polygon: &'l PackedPolygon,
    next_ring: usize,
    cursor: usize,
    ring_end: usize,
    start_ring: bool,
    close_pending: bool,
}

impl<'l> PackedPolygonCursor<'l> {
    /// Validates the ring table before handing out a cursor, so `advance`
    /// never reads out of bounds.
    pub fn new(polygon: &'l PackedPolygon) -> Result<Self, GeometryError> {
        polygon.validate()?;
        Ok(PackedPolygonCursor {
            polygon,
            next_ring: 0,
            cursor: 0,
            ring_end: 0,
            start_ring: false,
            close_pending: false,
        })
    }
}

impl<'l> PathCursor for PackedPolygonCursor<'l> {
    fn reset(&mut self) {
        self.next_ring = 0;
        self.cursor = 0;
        self.ring_end = 0;
        self.start_ring = false;
        self.close_pending = false;
    }

    fn advance(&mut self) -> PathCommand {
        if self.cursor == self.ring_end {
            if self.close_pending {
                self.close_pending = false;
                return PathCommand::Close;
            }
            loop {
                match self.polygon.rings.get(self.next_ring) {
                    None => return PathCommand::End,
                    Some(span) if span.count == 0 => self.next_ring += 1,
                    Some(span) => {
                        self.cursor = span.offset as usize;
                        self.ring_end = self.cursor + span.count as usize;
                        self.next_ring += 1;
                        self.start_ring = true;
                        break;
                    }
                }
            }
        }
        let position = self.polygon.points[self.cursor];
        self.cursor += 1;
        if self.cursor == self.ring_end {
            self.close_pending = true;
        }
        if self.start_ring {
            self.start_ring = false;
            return PathCommand::MoveTo(position);
        }
        PathCommand::LineTo(position)
    }
}

/// Cursor over the per-ring layout. Rolls straight from the last vertex
/// of a ring into the next ring's `MoveTo`; no `Close` is emitted.
#[derive(Clone)]
pub struct NestedPolygonCursor<'l> {
    rings: &'l [Ring],
    ring: usize,
    index: usize,
}

impl<'l> NestedPolygonCursor<'l> {
    pub fn new(polygon: &'l NestedPolygon) -> Self {
        NestedPolygonCursor {
            rings: &polygon.rings,
            ring: 0,
            index: 0,
        }
    }
}

impl<'l> PathCursor for NestedPolygonCursor<'l> {
    fn reset(&mut self) {
        self.ring = 0;
        self.index = 0;
    }

    fn advance(&mut self) -> PathCommand {
        while let Some(ring) = self.rings.get(self.ring) {
            if self.index < ring.len() {
                let position = ring[self.index];
                let command = if self.index == 0 {
                    PathCommand::MoveTo(position)
                } else {
                    PathCommand::LineTo(position)
                };
                self.index += 1;
                return command;
            }
            self.ring += 1;
            self.index = 0;
        }
        PathCommand::End
    }
}

/// Cursor over the split layout: exterior first, then each hole in
/// order. Same command stream as [`NestedPolygonCursor`].
#[derive(Clone)]
pub struct SplitPolygonCursor<'l> {
    polygon: &'l SplitPolygon,
    ring: usize,
    index: usize,
}

impl<'l> SplitPolygonCursor<'l> {
    pub fn new(polygon: &'l SplitPolygon) -> Self {
        SplitPolygonCursor {
            polygon,
            ring: 0,
            index: 0,
        }
    }
}

impl<'l> PathCursor for SplitPolygonCursor<'l> {
    fn reset(&mut self) {
        self.ring = 0;
        self.index = 0;
    }

    fn advance(&mut self) -> PathCommand {
        while let Some(ring) = self.polygon.ring(self.ring) {
            if self.index < ring.len() {
                let position = ring[self.index];
                let command = if self.index == 0 {
                    PathCommand::MoveTo(position)
                } else {
                    PathCommand::LineTo(position)
                };
                self.index += 1;
                return command;
            }
            self.ring += 1;
            self.index = 0;
        }
        PathCommand::End
    }
}

/// Concatenates the member polygons' cursors in order; ring and point
/// state restart per member.
#[derive(Clone)]
pub struct MultiPolygonCursor<'l> {
    polygons: &'l [SplitPolygon],
    member: usize,
    inner: Option<SplitPolygonCursor<'l>>,
}

impl<'l> MultiPolygonCursor<'l> {
    pub fn new(multi: &'l MultiPolygon) -> Self {
        MultiPolygonCursor {
            polygons: &multi.polygons,
            member: 0,
            inner: None,
        }
    }
}

impl<'l> PathCursor for MultiPolygonCursor<'l> {
    fn reset(&mut self) {
        self.member = 0;
        self.inner = None;
    }

    fn advance(&mut self) -> PathCommand {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                match inner.advance() {
                    PathCommand::End => self.inner = None,
                    command => return command,
                }
            } else if let Some(polygon) = self.polygons.get(self.member) {
                self.member += 1;
                self.inner = Some(SplitPolygonCursor::new(polygon));
            } else {
                return PathCommand::End;
            }
        }
    }
}

/// The cursor for any [`Geometry`], selected from the value's active
/// variant.
///
/// Adding a new storage layout means adding a cursor type and an arm in
/// [`GeometryCursor::new`]; the exhaustive matches below are the single
/// registration point.
#[derive(Clone)]
pub enum GeometryCursor<'l> {
    Point(PointCursor<'l>),
    LineString(LineStringCursor<'l>),
    PackedPolygon(PackedPolygonCursor<'l>),
    NestedPolygon(NestedPolygonCursor<'l>),
    SplitPolygon(SplitPolygonCursor<'l>),
    MultiPolygon(MultiPolygonCursor<'l>),
}

impl<'l> GeometryCursor<'l> {
    /// Builds the cursor matching `geometry`'s variant.
    ///
    /// Only the packed arm can fail: its ring table is checked against
    /// the point buffer and inconsistent encodings are rejected instead
    /// of read. Nothing is allocated beyond the cursor's own state.
    pub fn new(geometry: &'l Geometry) -> Result<Self, GeometryError> {
        Ok(match geometry {
            Geometry::Point(position) => GeometryCursor::Point(PointCursor::new(position)),
            Geometry::LineString(line) => {
                GeometryCursor::LineString(LineStringCursor::new(line))
            }
            Geometry::PackedPolygon(polygon) => {
                GeometryCursor::PackedPolygon(PackedPolygonCursor::new(polygon)?)
            }
            Geometry::NestedPolygon(polygon) => {
                GeometryCursor::NestedPolygon(NestedPolygonCursor::new(polygon))
            }
            Geometry::SplitPolygon(polygon) => {
                GeometryCursor::SplitPolygon(SplitPolygonCursor::new(polygon))
            }
            Geometry::MultiPolygon(multi) => {
                GeometryCursor::MultiPolygon(MultiPolygonCursor::new(multi))
            }
        })
    }

    /// Broad classification of the source shape.
    pub fn kind(&self) -> GeometryKind {
        match self {
            GeometryCursor::Point(_) => GeometryKind::Point,
            GeometryCursor::LineString(_) => GeometryKind::LineString,
            GeometryCursor::PackedPolygon(_)
            | GeometryCursor::NestedPolygon(_)
            | GeometryCursor::SplitPolygon(_)
            | GeometryCursor::MultiPolygon(_) => GeometryKind::Polygon,
        }
    }
}

impl<'l> PathCursor for GeometryCursor<'l> {
    fn reset(&mut self) {
        match self {
            GeometryCursor::Point(cursor) => cursor.reset(),
            GeometryCursor::LineString(cursor) => cursor.reset(),
            GeometryCursor::PackedPolygon(cursor) => cursor.reset(),
            GeometryCursor::NestedPolygon(cursor) => cursor.reset(),
            GeometryCursor::SplitPolygon(cursor) => cursor.reset(),
            GeometryCursor::MultiPolygon(cursor) => cursor.reset(),
        }
    }

    fn advance(&mut self) -> PathCommand {
        match self {
            GeometryCursor::Point(cursor) => cursor.advance(),
            GeometryCursor::LineString(cursor) => cursor.advance(),
            GeometryCursor::PackedPolygon(cursor) => cursor.advance(),
            GeometryCursor::NestedPolygon(cursor) => cursor.advance(),
            GeometryCursor::SplitPolygon(cursor) => cursor.advance(),
            GeometryCursor::MultiPolygon(cursor) => cursor.advance(),
        }
    }
}

#[cfg(test)]
use crate::geometry::RingSpan;
#[cfg(test)]
use crate::math::point;
#[cfg(test)]
use crate::command::PathCommand::{Close, End, LineTo, MoveTo};

#[cfg(test)]
fn square() -> Ring {
    vec![
        point(0.0, 0.0),
        point(100.0, 0.0),
        point(100.0, 100.0),
        point(0.0, 100.0),
        point(0.0, 0.0),
    ]
}

#[cfg(test)]
fn square_hole() -> Ring {
    vec![
        point(50.0, 50.0),
        point(75.0, 50.0),
        point(75.0, 75.0),
        point(50.0, 75.0),
        point(50.0, 50.0),
    ]
}

#[cfg(test)]
fn drain<C: PathCursor>(cursor: &mut C) -> Vec<PathCommand> {
    cursor.reset();
    let mut commands = Vec::new();
    loop {
        match cursor.advance() {
            End => return commands,
            command => commands.push(command),
        }
    }
}

#[test]
fn point_cursor() {
    let position = point(100.0, 200.0);
    let mut cursor = PointCursor::new(&position);

    assert_eq!(cursor.advance(), MoveTo(point(100.0, 200.0)));
    assert_eq!(cursor.advance(), End);
    assert_eq!(cursor.advance(), End);

    cursor.reset();
    assert_eq!(cursor.advance(), MoveTo(point(100.0, 200.0)));
}

#[test]
fn line_string_cursor() {
    let line = LineString::from(vec![point(0.0, 0.0), point(1.0, 1.0), point(2.0, 0.0)]);
    let mut cursor = LineStringCursor::new(&line);

    assert_eq!(
        drain(&mut cursor),
        vec![
            MoveTo(point(0.0, 0.0)),
            LineTo(point(1.0, 1.0)),
            LineTo(point(2.0, 0.0)),
        ]
    );
    assert_eq!(cursor.advance(), End);

    let empty = LineString::new();
    let mut cursor = LineStringCursor::new(&empty);
    assert_eq!(cursor.advance(), End);
}

#[test]
fn packed_cursor_emits_close_per_ring() {
    let mut polygon = PackedPolygon::new();
    polygon.add_ring(&square());
    polygon.add_ring(&square_hole());

    let mut cursor = PackedPolygonCursor::new(&polygon).unwrap();
    assert_eq!(
        drain(&mut cursor),
        vec![
            MoveTo(point(0.0, 0.0)),
            LineTo(point(100.0, 0.0)),
            LineTo(point(100.0, 100.0)),
            LineTo(point(0.0, 100.0)),
            LineTo(point(0.0, 0.0)),
            Close,
            MoveTo(point(50.0, 50.0)),
            LineTo(point(75.0, 50.0)),
            LineTo(point(75.0, 75.0)),
            LineTo(point(50.0, 75.0)),
            LineTo(point(50.0, 50.0)),
            Close,
        ]
    );
    assert_eq!(cursor.advance(), End);
    assert_eq!(cursor.advance(), End);
}

#[test]
fn per_ring_cursors_roll_into_the_next_ring() {
    let expected = vec![
        MoveTo(point(0.0, 0.0)),
        LineTo(point(100.0, 0.0)),
        LineTo(point(100.0, 100.0)),
        LineTo(point(0.0, 100.0)),
        LineTo(point(0.0, 0.0)),
        MoveTo(point(50.0, 50.0)),
        LineTo(point(75.0, 50.0)),
        LineTo(point(75.0, 75.0)),
        LineTo(point(50.0, 75.0)),
        LineTo(point(50.0, 50.0)),
    ];

    let mut nested = NestedPolygon::new();
    nested.add_ring(square());
    nested.add_ring(square_hole());
    assert_eq!(drain(&mut NestedPolygonCursor::new(&nested)), expected);

    let mut split = SplitPolygon::new();
    split.set_exterior(square());
    split.add_hole(square_hole());
    assert_eq!(drain(&mut SplitPolygonCursor::new(&split)), expected);
}

#[test]
fn all_layouts_agree_modulo_close() {
    let mut packed = PackedPolygon::new();
    packed.add_ring(&square());
    packed.add_ring(&square_hole());

    let mut nested = NestedPolygon::new();
    nested.add_ring(square());
    nested.add_ring(square_hole());

    let mut split = SplitPolygon::new();
    split.set_exterior(square());
    split.add_hole(square_hole());

    let mut packed_cursor = PackedPolygonCursor::new(&packed).unwrap();
    let packed_stream: Vec<_> = drain(&mut packed_cursor)
        .into_iter()
        .filter(|command| !command.is_close())
        .collect();

    assert_eq!(packed_stream, drain(&mut NestedPolygonCursor::new(&nested)));
    assert_eq!(packed_stream, drain(&mut SplitPolygonCursor::new(&split)));
}

#[test]
fn reset_replays_the_same_stream() {
    let mut nested = NestedPolygon::new();
    nested.add_ring(square());
    nested.add_ring(square_hole());
    let geometry = Geometry::NestedPolygon(nested);

    let mut cursor = geometry.cursor().unwrap();
    let first = drain(&mut cursor);
    for _ in 0..3 {
        assert_eq!(drain(&mut cursor), first);
    }

    // reset is idempotent.
    cursor.reset();
    cursor.reset();
    assert_eq!(drain(&mut cursor), first);
}

#[test]
fn empty_rings_contribute_nothing() {
    // An empty ring wedged between two real ones.
    let mut nested = NestedPolygon::new();
    nested.add_ring(square());
    nested.add_ring(Ring::new());
    nested.add_ring(square_hole());

    let mut with_gap = NestedPolygonCursor::new(&nested);

    let mut dense = NestedPolygon::new();
    dense.add_ring(square());
    dense.add_ring(square_hole());
    let mut without_gap = NestedPolygonCursor::new(&dense);

    assert_eq!(drain(&mut with_gap), drain(&mut without_gap));

    // Same story for a zero-count span in a packed ring table.
    let mut packed = PackedPolygon::new();
    packed.add_ring(&square());
    packed.rings.push(RingSpan {
        offset: packed.points.len() as u32,
        count: 0,
    });
    packed.add_ring(&square_hole());
    assert!(packed.validate().is_ok());

    let mut reference = PackedPolygon::new();
    reference.add_ring(&square());
    reference.add_ring(&square_hole());

    let mut gap_cursor = PackedPolygonCursor::new(&packed).unwrap();
    let mut reference_cursor = PackedPolygonCursor::new(&reference).unwrap();
    assert_eq!(drain(&mut gap_cursor), drain(&mut reference_cursor));
}

#[test]
fn empty_shapes_yield_no_commands() {
    assert_eq!(
        drain(&mut NestedPolygonCursor::new(&NestedPolygon::new())),
        vec![]
    );
    assert_eq!(
        drain(&mut SplitPolygonCursor::new(&SplitPolygon::new())),
        vec![]
    );
    assert_eq!(
        drain(&mut MultiPolygonCursor::new(&MultiPolygon::new())),
        vec![]
    );
    let empty = PackedPolygon::new();
    assert_eq!(
        drain(&mut PackedPolygonCursor::new(&empty).unwrap()),
        vec![]
    );
}

#[test]
fn multi_polygon_concatenates_members() {
    let mut first = SplitPolygon::new();
    first.set_exterior(square());
    first.add_hole(square_hole());

    let mut second = SplitPolygon::new();
    second.set_exterior(vec![
        point(200.0, 200.0),
        point(300.0, 200.0),
        point(200.0, 300.0),
        point(200.0, 200.0),
    ]);

    let mut multi = MultiPolygon::new();
    multi.push(first.clone());
    multi.push(second.clone());

    let mut expected = drain(&mut SplitPolygonCursor::new(&first));
    expected.extend(drain(&mut SplitPolygonCursor::new(&second)));

    let mut cursor = MultiPolygonCursor::new(&multi);
    assert_eq!(drain(&mut cursor), expected);
    assert_eq!(cursor.advance(), End);
}

#[test]
fn factory_dispatches_on_the_variant() {
    let geometry = Geometry::Point(point(1.0, 2.0));
    let mut cursor = geometry.cursor().unwrap();
    assert_eq!(cursor.kind(), GeometryKind::Point);
    assert_eq!(cursor.advance(), MoveTo(point(1.0, 2.0)));
    assert_eq!(cursor.advance(), End);

    let geometry = Geometry::LineString(LineString::from(vec![point(0.0, 0.0)]));
    assert_eq!(geometry.cursor().unwrap().kind(), GeometryKind::LineString);

    let geometry = Geometry::MultiPolygon(MultiPolygon::new());
    assert_eq!(geometry.cursor().unwrap().kind(), GeometryKind::Polygon);
}

#[test]
fn malformed_packed_polygons_are_rejected_at_construction() {
    let polygon = PackedPolygon {
        points: vec![point(0.0, 0.0), point(1.0, 1.0)],
        rings: vec![RingSpan { offset: 0, count: 5 }],
    };
    let geometry = Geometry::PackedPolygon(polygon);
    assert_eq!(
        geometry.cursor().err(),
        Some(GeometryError::RingOutOfBounds {
            index: 0,
            offset: 0,
            count: 5,
            buffer_len: 2,
        })
    );
}
