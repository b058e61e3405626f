//! Lazy adapters exposing a cursor's command stream through `Iterator`.
//!
//! The adapters are obtained from [`PathCursor::commands`] and
//! [`PathCursor::positions`], which reset the cursor first; constructing
//! a new adapter from the same cursor therefore restarts the walk.
//! Nothing is materialized: each `next` call performs one `advance`.
//! Because the adapters hold the cursor mutably, two live iterators can
//! never share one cursor's state; independent simultaneous walks over
//! the same geometry take independently constructed cursors.

use crate::command::PathCommand;
use crate::cursor::PathCursor;
use crate::math::Point;

/// Iterator over a cursor's commands.
///
/// `End` is the sentinel: iteration finishes on the call where `End`
/// would have been produced, and `End` itself is never yielded.
pub struct Commands<'l, C> {
    cursor: &'l mut C,
}

impl<'l, C: PathCursor> Commands<'l, C> {
    pub(crate) fn new(cursor: &'l mut C) -> Self {
        Commands { cursor }
    }
}

impl<'l, C: PathCursor> Iterator for Commands<'l, C> {
    type Item = PathCommand;

    fn next(&mut self) -> Option<PathCommand> {
        match self.cursor.advance() {
            PathCommand::End => None,
            command => Some(command),
        }
    }
}

/// Iterator over the positions carried by `MoveTo` and `LineTo`
/// commands; `Close` markers are skipped.
pub struct Positions<'l, C> {
    cursor: &'l mut C,
}

impl<'l, C: PathCursor> Positions<'l, C> {
    pub(crate) fn new(cursor: &'l mut C) -> Self {
        Positions { cursor }
    }
}

impl<'l, C: PathCursor> Iterator for Positions<'l, C> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        loop {
            match self.cursor.advance() {
                PathCommand::End => return None,
                command => {
                    if let Some(position) = command.position() {
                        return Some(position);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
use crate::geometry::{Geometry, PackedPolygon};
#[cfg(test)]
use crate::math::point;

#[test]
fn commands_stop_before_end() {
    let mut polygon = PackedPolygon::new();
    polygon.add_ring(&[point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0), point(0.0, 0.0)]);
    let geometry = Geometry::PackedPolygon(polygon);

    let mut cursor = geometry.cursor().unwrap();
    let commands: Vec<_> = cursor.commands().collect();
    assert_eq!(commands.len(), 5);
    assert!(!commands.iter().any(PathCommand::is_end));
    assert_eq!(commands.last(), Some(&PathCommand::Close));
}

#[test]
fn a_fresh_adapter_restarts_the_walk() {
    let mut polygon = PackedPolygon::new();
    polygon.add_ring(&[point(0.0, 0.0), point(2.0, 0.0), point(0.0, 2.0), point(0.0, 0.0)]);
    let geometry = Geometry::PackedPolygon(polygon);
    let mut cursor = geometry.cursor().unwrap();

    let first: Vec<_> = cursor.commands().collect();

    // Partially drain, then start over; the replay is complete.
    let _ = cursor.commands().take(2).count();
    let replay: Vec<_> = cursor.commands().collect();
    assert_eq!(first, replay);
}

#[test]
fn positions_skip_markers() {
    let mut polygon = PackedPolygon::new();
    polygon.add_ring(&[point(0.0, 0.0), point(3.0, 0.0), point(0.0, 3.0), point(0.0, 0.0)]);
    let geometry = Geometry::PackedPolygon(polygon);
    let mut cursor = geometry.cursor().unwrap();

    let positions: Vec<_> = cursor.positions().collect();
    assert_eq!(
        positions,
        vec![
            point(0.0, 0.0),
            point(3.0, 0.0),
            point(0.0, 3.0),
            point(0.0, 0.0),
        ]
    );
}
