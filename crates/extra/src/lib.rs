#![deny(bare_trait_objects)]

//! Optional companions to `atlas_geometry`: WKT fixture parsing and
//! writing, and the rectangle-clip bridge to the `geo` crate.
//!
//! Everything here is a consumer of the core's cursor and ring-view
//! contracts; nothing reaches into a specific storage layout beyond
//! choosing which one to build.

extern crate atlas_geometry as geometry;

pub use geometry::euclid;
pub use geometry::math;

pub mod clip;
pub mod wkt;
