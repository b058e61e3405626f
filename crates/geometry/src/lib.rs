#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Storage layouts and path cursors for 2D map geometries.
//!
//! Several in-memory layouts of the same logical shapes coexist in this
//! crate so that their footprint and iteration cost can be compared:
//! a shared-buffer polygon ([`PackedPolygon`]), a per-ring polygon
//! ([`NestedPolygon`]) and a split exterior/holes polygon
//! ([`SplitPolygon`]). Every layout is walked through the same
//! [`PathCursor`] protocol, which turns stored points into a canonical
//! stream of [`PathCommand`]s regardless of how they are laid out.
//!
//! # Examples
//!
//! ```
//! use atlas_geometry::geometry::{Geometry, SplitPolygon};
//! use atlas_geometry::cursor::PathCursor;
//! use atlas_geometry::math::point;
//!
//! let mut polygon = SplitPolygon::new();
//! polygon.set_exterior(vec![
//!     point(0.0, 0.0),
//!     point(10.0, 0.0),
//!     point(10.0, 10.0),
//!     point(0.0, 0.0),
//! ]);
//!
//! let geometry = Geometry::SplitPolygon(polygon);
//! let mut cursor = geometry.cursor().unwrap();
//!
//! for command in cursor.commands() {
//!     println!("{:?}", command);
//! }
//! ```

pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod command;
pub mod cursor;
pub mod geometry;
pub mod iterator;
pub mod rings;

#[doc(inline)]
pub use crate::command::PathCommand;
#[doc(inline)]
pub use crate::cursor::{GeometryCursor, PathCursor};
#[doc(inline)]
pub use crate::geometry::{
    Footprint, Geometry, GeometryError, LineString, MultiPolygon, NestedPolygon, PackedPolygon,
    Ring, RingSpan, SplitPolygon,
};

pub mod traits {
    //! The crate's traits reexported here for convenience.

    pub use crate::cursor::PathCursor;
    pub use crate::rings::{FromRings, PolygonSource};
}

pub mod math {
    //! f64 versions of the euclid types used everywhere in this crate.

    /// Alias for `euclid::default::Point2D<f64>`.
    pub type Point = euclid::default::Point2D<f64>;

    /// Alias for `euclid::default::Vector2D<f64>`.
    pub type Vector = euclid::default::Vector2D<f64>;

    /// Alias for `euclid::default::Box2D<f64>`.
    pub type Box2D = euclid::default::Box2D<f64>;

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Box2D { min: point(min_x, min_y), max: point(max_x, max_y) }`.
    #[inline]
    pub fn box2d(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Box2D {
        Box2D {
            min: point(min_x, min_y),
            max: point(max_x, max_y),
        }
    }
}

/// Broad classification of a shape, independent of its storage layout.
///
/// All three polygon layouts (and multi-polygons) answer `Polygon`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}
