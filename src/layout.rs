//! The geometry oracle seam between the engine and the host.

use crate::geometry::{BeginEnd, Point, Rect};

/// Read/write geometry access to one container's rendered state.
///
/// The engine never touches the host's element tree directly; everything
/// it needs to measure or mutate goes through this trait. Measurements
/// reflect the *current* visual state, i.e. `item_begin_end` includes any
/// translation previously applied through [`Layout::set_translation`].
///
/// Every method is synchronous and must not fail: a host that cannot
/// produce a reading returns the most recent cached value. Positions and
/// extents are scalars along the container's configured orientation axis.
pub trait Layout {
    /// Number of draggable item slots currently in the container.
    fn item_count(&self) -> usize;

    /// Current visual begin/end band of one item along the axis.
    fn item_begin_end(&self, index: usize) -> BeginEnd;

    /// Extent of one item along the axis.
    fn item_size(&self, index: usize) -> f64;

    /// Begin/end band of the container's visible region.
    fn container_begin_end(&self) -> BeginEnd;

    /// Visible extent of the container along the axis.
    fn container_size(&self) -> f64;

    /// Total scrollable extent; equals [`Layout::container_size`] when
    /// the container does not scroll.
    fn scroll_size(&self) -> f64;

    /// Current scroll offset.
    fn scroll_value(&self) -> f64;

    /// Converts a pointer position into a local scalar position along the
    /// axis, or `None` when the pointer is outside the container's
    /// capture zone.
    fn local_position(&self, position: Point) -> Option<f64>;

    /// Screen rectangle of the placeholder slot spanning `begin..end`.
    fn placeholder_rect(&self, begin: f64, end: f64) -> Rect;

    /// Applies a visual offset to an item along the axis.
    fn set_translation(&mut self, index: usize, offset: f64);

    /// Shows or hides an item.
    fn set_visibility(&mut self, index: usize, visible: bool);

    /// Appends the filler element extending scrollable space by `size`,
    /// replacing any previous filler.
    fn set_stretcher(&mut self, size: f64);

    /// Removes the filler element, if present.
    fn clear_stretcher(&mut self);

    /// Drops cached rectangles; called when the container's box changed.
    fn invalidate_rects(&mut self);
}
