//! The canonical drawing-command stream produced by path cursors.

use crate::math::Point;

/// One step in the stream of commands describing how to trace a shape.
///
/// Every cursor reports a ring's first point as `MoveTo` and each
/// subsequent point of the same ring as `LineTo`. `Close` is an explicit
/// end-of-ring marker that only the shared-buffer polygon cursor emits;
/// the per-ring cursors roll straight into the next ring's `MoveTo`
/// instead. `End` is terminal: once a cursor returns it, it keeps
/// returning it until `reset`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Close,
    End,
}

impl PathCommand {
    /// The coordinates carried by the command, if any.
    #[inline]
    pub fn position(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(position) | PathCommand::LineTo(position) => Some(position),
            PathCommand::Close | PathCommand::End => None,
        }
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, PathCommand::End)
    }

    #[inline]
    pub fn is_close(&self) -> bool {
        matches!(self, PathCommand::Close)
    }
}

#[test]
fn positions() {
    use crate::math::point;

    assert_eq!(
        PathCommand::MoveTo(point(1.0, 2.0)).position(),
        Some(point(1.0, 2.0))
    );
    assert_eq!(
        PathCommand::LineTo(point(3.0, 4.0)).position(),
        Some(point(3.0, 4.0))
    );
    assert_eq!(PathCommand::Close.position(), None);
    assert_eq!(PathCommand::End.position(), None);
    assert!(PathCommand::End.is_end());
    assert!(!PathCommand::Close.is_end());
}
