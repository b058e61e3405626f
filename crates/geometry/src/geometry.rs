//! In-memory storage layouts for points, paths and polygons.
//!
//! Three polygon layouts represent the same logical shape in different
//! ways on purpose: [`PackedPolygon`] amortizes one point buffer across
//! all rings, [`NestedPolygon`] pays one allocation per ring, and
//! [`SplitPolygon`] stores the exterior ring in its own field so the
//! common "give me the exterior" query skips a bounds check. All of them
//! are plain owned value types; cursors borrow from them and never copy
//! point data.

use crate::cursor::GeometryCursor;
use crate::math::{Box2D, Point};
use crate::GeometryKind;

use std::mem;
use std::ops::Range;

use thiserror::Error;

/// One boundary loop of a polygon, stored as a plain point vector.
///
/// Well-formed rings keep their first and last points equal. That is a
/// producer contract: nothing in this crate enforces or repairs it, and
/// cursors iterate whatever is stored.
pub type Ring = Vec<Point>;

/// Rejection of a storage encoding whose internal bookkeeping is
/// inconsistent, detected when a cursor is requested.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum GeometryError {
    #[error("ring {index} spans points {offset}..+{count}, outside a buffer of {buffer_len}")]
    RingOutOfBounds {
        index: usize,
        offset: u32,
        count: u32,
        buffer_len: usize,
    },
    #[error("ring table covers {covered} points but the buffer holds {buffer_len}")]
    RingCoverage { covered: usize, buffer_len: usize },
}

/// Location of one ring inside a [`PackedPolygon`]'s shared point buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct RingSpan {
    pub offset: u32,
    pub count: u32,
}

impl RingSpan {
    /// The index range this span covers in the point buffer.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.count as usize
    }
}

/// An open sequence of points.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineString {
    pub points: Vec<Point>,
}

impl LineString {
    #[inline]
    pub fn new() -> Self {
        LineString { points: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(num_points: usize) -> Self {
        LineString {
            points: Vec::with_capacity(num_points),
        }
    }

    #[inline]
    pub fn push(&mut self, position: Point) {
        self.points.push(position);
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn footprint(&self) -> Footprint {
        buffer_footprint(&self.points)
    }
}

impl From<Vec<Point>> for LineString {
    fn from(points: Vec<Point>) -> Self {
        LineString { points }
    }
}

/// Polygon stored as one shared point buffer plus a ring table.
///
/// `rings[0]` is the exterior, the rest are holes. All rings live in a
/// single allocation, so building N rings costs two buffers instead of
/// N + 1. Invariant: the spans cover the buffer exactly
/// (`sum(count) == points.len()`, each span in bounds). The fields are
/// public so producers can fill them directly; [`PackedPolygon::validate`]
/// runs when a cursor is requested and rejects inconsistent tables.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct PackedPolygon {
    pub points: Vec<Point>,
    pub rings: Vec<RingSpan>,
}

impl PackedPolygon {
    #[inline]
    pub fn new() -> Self {
        PackedPolygon {
            points: Vec::new(),
            rings: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(num_points: usize, num_rings: usize) -> Self {
        PackedPolygon {
            points: Vec::with_capacity(num_points),
            rings: Vec::with_capacity(num_rings),
        }
    }

    /// Copies a ring into the shared buffer. Empty rings are dropped.
    pub fn add_ring(&mut self, ring: &[Point]) {
        if ring.is_empty() {
            return;
        }
        let offset = self.points.len() as u32;
        self.points.extend_from_slice(ring);
        self.rings.push(RingSpan {
            offset,
            count: ring.len() as u32,
        });
    }

    #[inline]
    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    /// The points of ring `index`, `None` past the last ring or when the
    /// span does not fit the buffer.
    pub fn ring(&self, index: usize) -> Option<&[Point]> {
        let span = self.rings.get(index)?;
        self.points.get(span.range())
    }

    /// Checks that the ring table is consistent with the point buffer.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let mut covered = 0;
        for (index, span) in self.rings.iter().enumerate() {
            let end = span.offset as usize + span.count as usize;
            if end > self.points.len() {
                return Err(GeometryError::RingOutOfBounds {
                    index,
                    offset: span.offset,
                    count: span.count,
                    buffer_len: self.points.len(),
                });
            }
            covered += span.count as usize;
        }
        if covered != self.points.len() {
            return Err(GeometryError::RingCoverage {
                covered,
                buffer_len: self.points.len(),
            });
        }
        Ok(())
    }

    pub fn footprint(&self) -> Footprint {
        buffer_footprint(&self.points) + buffer_footprint(&self.rings)
    }
}

/// Polygon stored as one point vector per ring.
///
/// `rings[0]` is the exterior, the rest are holes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct NestedPolygon {
    pub rings: Vec<Ring>,
}

impl NestedPolygon {
    #[inline]
    pub fn new() -> Self {
        NestedPolygon { rings: Vec::new() }
    }

    /// Takes ownership of a ring buffer. One allocation per ring is the
    /// cost this layout trades for independent ring growth.
    #[inline]
    pub fn add_ring(&mut self, ring: Ring) {
        self.rings.push(ring);
    }

    #[inline]
    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn ring(&self, index: usize) -> Option<&[Point]> {
        self.rings.get(index).map(Vec::as_slice)
    }

    pub fn footprint(&self) -> Footprint {
        let mut footprint = buffer_footprint(&self.rings);
        for ring in &self.rings {
            footprint = footprint + buffer_footprint(ring);
        }
        footprint
    }
}

/// Polygon with the exterior ring in a distinct field.
///
/// Same semantics as [`NestedPolygon`]; the layout removes a branch from
/// the exterior query at the cost of an asymmetric insertion API.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SplitPolygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl SplitPolygon {
    #[inline]
    pub fn new() -> Self {
        SplitPolygon {
            exterior: Ring::new(),
            holes: Vec::new(),
        }
    }

    #[inline]
    pub fn set_exterior(&mut self, ring: Ring) {
        self.exterior = ring;
    }

    #[inline]
    pub fn add_hole(&mut self, ring: Ring) {
        self.holes.push(ring);
    }

    /// The exterior counts as a ring even when it is empty.
    #[inline]
    pub fn num_rings(&self) -> usize {
        1 + self.holes.len()
    }

    /// Ring 0 is the exterior, ring `i + 1` is hole `i`.
    pub fn ring(&self, index: usize) -> Option<&[Point]> {
        if index == 0 {
            Some(&self.exterior)
        } else {
            self.holes.get(index - 1).map(Vec::as_slice)
        }
    }

    pub fn footprint(&self) -> Footprint {
        let mut footprint = buffer_footprint(&self.exterior) + buffer_footprint(&self.holes);
        for hole in &self.holes {
            footprint = footprint + buffer_footprint(hole);
        }
        footprint
    }
}

/// An ordered sequence of split-layout polygons.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct MultiPolygon {
    pub polygons: Vec<SplitPolygon>,
}

impl MultiPolygon {
    #[inline]
    pub fn new() -> Self {
        MultiPolygon {
            polygons: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, polygon: SplitPolygon) {
        self.polygons.push(polygon);
    }

    #[inline]
    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    pub fn footprint(&self) -> Footprint {
        let mut footprint = buffer_footprint(&self.polygons);
        for polygon in &self.polygons {
            footprint = footprint + polygon.footprint();
        }
        footprint
    }
}

/// Closed sum of every supported shape representation.
///
/// A `Geometry` owns its payload and the payload owns its buffers; the
/// whole structure is tree-shaped and moved rather than aliased. Cursors
/// borrow from it and cannot outlive it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    PackedPolygon(PackedPolygon),
    NestedPolygon(NestedPolygon),
    SplitPolygon(SplitPolygon),
    MultiPolygon(MultiPolygon),
}

impl Geometry {
    /// Builds the cursor matching this value's variant.
    ///
    /// Packed ring tables are validated here; see
    /// [`GeometryCursor::new`].
    #[inline]
    pub fn cursor(&self) -> Result<GeometryCursor, GeometryError> {
        GeometryCursor::new(self)
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::PackedPolygon(_)
            | Geometry::NestedPolygon(_)
            | Geometry::SplitPolygon(_)
            | Geometry::MultiPolygon(_) => GeometryKind::Polygon,
        }
    }

    /// Heap cost of the stored shape, for layout comparisons.
    pub fn footprint(&self) -> Footprint {
        match self {
            Geometry::Point(_) => Footprint::default(),
            Geometry::LineString(line) => line.footprint(),
            Geometry::PackedPolygon(polygon) => polygon.footprint(),
            Geometry::NestedPolygon(polygon) => polygon.footprint(),
            Geometry::SplitPolygon(polygon) => polygon.footprint(),
            Geometry::MultiPolygon(multi) => multi.footprint(),
        }
    }

    /// Smallest axis-aligned box containing every stored point, `None`
    /// for empty shapes.
    pub fn bounding_box(&self) -> Option<Box2D> {
        let mut bounds = None;
        match self {
            Geometry::Point(position) => extend_bounds(&mut bounds, std::slice::from_ref(position)),
            Geometry::LineString(line) => extend_bounds(&mut bounds, &line.points),
            Geometry::PackedPolygon(polygon) => extend_bounds(&mut bounds, &polygon.points),
            Geometry::NestedPolygon(polygon) => {
                for ring in &polygon.rings {
                    extend_bounds(&mut bounds, ring);
                }
            }
            Geometry::SplitPolygon(polygon) => {
                extend_bounds(&mut bounds, &polygon.exterior);
                for hole in &polygon.holes {
                    extend_bounds(&mut bounds, hole);
                }
            }
            Geometry::MultiPolygon(multi) => {
                for polygon in &multi.polygons {
                    extend_bounds(&mut bounds, &polygon.exterior);
                    for hole in &polygon.holes {
                        extend_bounds(&mut bounds, hole);
                    }
                }
            }
        }
        bounds
    }
}

impl From<Point> for Geometry {
    fn from(position: Point) -> Self {
        Geometry::Point(position)
    }
}

impl From<LineString> for Geometry {
    fn from(line: LineString) -> Self {
        Geometry::LineString(line)
    }
}

impl From<PackedPolygon> for Geometry {
    fn from(polygon: PackedPolygon) -> Self {
        Geometry::PackedPolygon(polygon)
    }
}

impl From<NestedPolygon> for Geometry {
    fn from(polygon: NestedPolygon) -> Self {
        Geometry::NestedPolygon(polygon)
    }
}

impl From<SplitPolygon> for Geometry {
    fn from(polygon: SplitPolygon) -> Self {
        Geometry::SplitPolygon(polygon)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(multi: MultiPolygon) -> Self {
        Geometry::MultiPolygon(multi)
    }
}

/// Heap cost of one stored shape.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Footprint {
    /// Number of live heap buffers.
    pub allocations: usize,
    /// Total capacity of those buffers, in bytes.
    pub bytes: usize,
}

impl std::ops::Add for Footprint {
    type Output = Footprint;

    fn add(self, rhs: Footprint) -> Footprint {
        Footprint {
            allocations: self.allocations + rhs.allocations,
            bytes: self.bytes + rhs.bytes,
        }
    }
}

fn buffer_footprint<T>(buffer: &Vec<T>) -> Footprint {
    Footprint {
        allocations: if buffer.capacity() == 0 { 0 } else { 1 },
        bytes: buffer.capacity() * mem::size_of::<T>(),
    }
}

fn extend_bounds(bounds: &mut Option<Box2D>, points: &[Point]) {
    for position in points {
        match bounds {
            None => {
                *bounds = Some(Box2D {
                    min: *position,
                    max: *position,
                })
            }
            Some(bounds) => {
                bounds.min.x = bounds.min.x.min(position.x);
                bounds.min.y = bounds.min.y.min(position.y);
                bounds.max.x = bounds.max.x.max(position.x);
                bounds.max.y = bounds.max.y.max(position.y);
            }
        }
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn packed_add_ring_packs_the_buffer() {
    let mut polygon = PackedPolygon::new();
    polygon.add_ring(&[point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)]);
    polygon.add_ring(&[point(5.0, 5.0), point(6.0, 5.0)]);
    polygon.add_ring(&[]);

    assert_eq!(polygon.num_rings(), 2);
    assert_eq!(polygon.points.len(), 5);
    assert_eq!(polygon.rings[1], RingSpan { offset: 3, count: 2 });
    assert_eq!(
        polygon.ring(1),
        Some(&[point(5.0, 5.0), point(6.0, 5.0)][..])
    );
    assert_eq!(polygon.ring(2), None);
    assert!(polygon.validate().is_ok());
}

#[test]
fn packed_validation_rejects_bad_tables() {
    let out_of_bounds = PackedPolygon {
        points: vec![point(0.0, 0.0), point(1.0, 1.0)],
        rings: vec![RingSpan { offset: 1, count: 2 }],
    };
    assert_eq!(
        out_of_bounds.validate(),
        Err(GeometryError::RingOutOfBounds {
            index: 0,
            offset: 1,
            count: 2,
            buffer_len: 2,
        })
    );

    let under_covered = PackedPolygon {
        points: vec![point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)],
        rings: vec![RingSpan { offset: 0, count: 2 }],
    };
    assert_eq!(
        under_covered.validate(),
        Err(GeometryError::RingCoverage {
            covered: 2,
            buffer_len: 3,
        })
    );
}

#[test]
fn split_ring_indexing() {
    let mut polygon = SplitPolygon::new();
    polygon.set_exterior(vec![point(0.0, 0.0), point(4.0, 0.0), point(0.0, 0.0)]);
    polygon.add_hole(vec![point(1.0, 1.0), point(2.0, 1.0), point(1.0, 1.0)]);

    assert_eq!(polygon.num_rings(), 2);
    assert_eq!(polygon.ring(0).map(<[Point]>::len), Some(3));
    assert_eq!(polygon.ring(1), Some(&polygon.holes[0][..]));
    assert_eq!(polygon.ring(2), None);
}

#[test]
fn footprints_tell_the_layouts_apart() {
    let rings: Vec<Ring> = vec![
        vec![point(0.0, 0.0), point(4.0, 0.0), point(4.0, 4.0), point(0.0, 0.0)],
        vec![point(1.0, 1.0), point(2.0, 1.0), point(1.0, 2.0), point(1.0, 1.0)],
    ];

    let mut packed = PackedPolygon::new();
    let mut nested = NestedPolygon::new();
    for ring in &rings {
        packed.add_ring(ring);
        nested.add_ring(ring.clone());
    }

    // Shared buffer: point data plus the ring table. Per-ring: one buffer
    // per ring plus the outer vector.
    assert_eq!(packed.footprint().allocations, 2);
    assert_eq!(nested.footprint().allocations, 3);
}

#[test]
fn bounding_boxes() {
    use crate::math::box2d;

    let mut polygon = NestedPolygon::new();
    polygon.add_ring(vec![point(2.0, 3.0), point(10.0, 3.0), point(2.0, 8.0)]);
    let geometry = Geometry::NestedPolygon(polygon);
    assert_eq!(geometry.bounding_box(), Some(box2d(2.0, 3.0, 10.0, 8.0)));

    assert_eq!(Geometry::LineString(LineString::new()).bounding_box(), None);
}
