//! Uniform, zero-copy read access to polygon rings, independent of the
//! storage layout.
//!
//! The clip collaborator consumes these views (exterior plus holes, each
//! a slice with random access by index) and hands back loose rings;
//! [`FromRings`] rebuilds those rings in whatever encoding the input
//! used, so clipping never converts between layouts.

use crate::geometry::{NestedPolygon, PackedPolygon, Ring, SplitPolygon};
use crate::math::Point;

/// Read access to the rings of one polygon-like shape.
pub trait PolygonSource {
    /// The exterior ring; empty when the polygon stores no rings.
    fn exterior(&self) -> &[Point];

    /// Number of interior rings.
    fn num_interiors(&self) -> usize;

    /// Interior ring by index, `None` past the end.
    fn interior(&self, index: usize) -> Option<&[Point]>;

    /// Exterior first, then every interior ring in order.
    fn rings(&self) -> Rings<'_, Self>
    where
        Self: Sized,
    {
        Rings {
            source: self,
            index: 0,
        }
    }
}

/// Iterator over all rings of a [`PolygonSource`].
pub struct Rings<'l, P> {
    source: &'l P,
    index: usize,
}

impl<'l, P: PolygonSource> Iterator for Rings<'l, P> {
    type Item = &'l [Point];

    fn next(&mut self) -> Option<&'l [Point]> {
        let index = self.index;
        self.index += 1;
        if index == 0 {
            Some(self.source.exterior())
        } else {
            self.source.interior(index - 1)
        }
    }
}

/// Rebuilds a polygon of a given layout from loose rings
/// (first = exterior, rest = holes).
pub trait FromRings: Sized {
    fn from_rings<I>(rings: I) -> Self
    where
        I: IntoIterator<Item = Ring>;
}

impl PolygonSource for PackedPolygon {
    fn exterior(&self) -> &[Point] {
        self.ring(0).unwrap_or(&[])
    }

    fn num_interiors(&self) -> usize {
        self.num_rings().saturating_sub(1)
    }

    fn interior(&self, index: usize) -> Option<&[Point]> {
        self.ring(index + 1)
    }
}

impl PolygonSource for NestedPolygon {
    fn exterior(&self) -> &[Point] {
        self.ring(0).unwrap_or(&[])
    }

    fn num_interiors(&self) -> usize {
        self.num_rings().saturating_sub(1)
    }

    fn interior(&self, index: usize) -> Option<&[Point]> {
        self.ring(index + 1)
    }
}

impl PolygonSource for SplitPolygon {
    fn exterior(&self) -> &[Point] {
        &self.exterior
    }

    fn num_interiors(&self) -> usize {
        self.holes.len()
    }

    fn interior(&self, index: usize) -> Option<&[Point]> {
        self.holes.get(index).map(Vec::as_slice)
    }
}

impl FromRings for PackedPolygon {
    fn from_rings<I>(rings: I) -> Self
    where
        I: IntoIterator<Item = Ring>,
    {
        let mut polygon = PackedPolygon::new();
        for ring in rings {
            polygon.add_ring(&ring);
        }
        polygon
    }
}

impl FromRings for NestedPolygon {
    fn from_rings<I>(rings: I) -> Self
    where
        I: IntoIterator<Item = Ring>,
    {
        NestedPolygon {
            rings: rings.into_iter().collect(),
        }
    }
}

impl FromRings for SplitPolygon {
    fn from_rings<I>(rings: I) -> Self
    where
        I: IntoIterator<Item = Ring>,
    {
        let mut rings = rings.into_iter();
        let exterior = rings.next().unwrap_or_default();
        SplitPolygon {
            exterior,
            holes: rings.collect(),
        }
    }
}

#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn sample_rings() -> Vec<Ring> {
    vec![
        vec![
            point(0.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
            point(0.0, 0.0),
        ],
        vec![
            point(2.0, 2.0),
            point(4.0, 2.0),
            point(2.0, 4.0),
            point(2.0, 2.0),
        ],
        vec![
            point(6.0, 6.0),
            point(8.0, 6.0),
            point(6.0, 8.0),
            point(6.0, 6.0),
        ],
    ]
}

#[test]
fn views_agree_across_layouts() {
    let rings = sample_rings();
    let packed = PackedPolygon::from_rings(rings.clone());
    let nested = NestedPolygon::from_rings(rings.clone());
    let split = SplitPolygon::from_rings(rings.clone());

    assert_eq!(packed.exterior(), &rings[0][..]);
    assert_eq!(nested.exterior(), &rings[0][..]);
    assert_eq!(split.exterior(), &rings[0][..]);

    assert_eq!(packed.num_interiors(), 2);
    assert_eq!(nested.num_interiors(), 2);
    assert_eq!(split.num_interiors(), 2);

    assert_eq!(packed.interior(1), Some(&rings[2][..]));
    assert_eq!(nested.interior(1), Some(&rings[2][..]));
    assert_eq!(split.interior(1), Some(&rings[2][..]));
    assert_eq!(split.interior(2), None);

    let collected: Vec<_> = packed.rings().map(<[Point]>::to_vec).collect();
    assert_eq!(collected, rings);
}

#[test]
fn from_rings_round_trips_the_views() {
    let rings = sample_rings();
    let split = SplitPolygon::from_rings(rings.clone());
    let rebuilt = NestedPolygon::from_rings(split.rings().map(<[Point]>::to_vec));
    assert_eq!(rebuilt.rings, rings);
}

#[test]
fn empty_sources() {
    let packed = PackedPolygon::new();
    assert_eq!(packed.exterior(), &[] as &[Point]);
    assert_eq!(packed.num_interiors(), 0);
    assert_eq!(packed.interior(0), None);
}
