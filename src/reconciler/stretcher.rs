//! Temporary filler extending scrollable space for oversized insertions.

use tracing::debug;

use super::container::DraggableState;
use crate::layout::Layout;

/// Reconciles the filler against the current insertion state. Returns
/// whether the container box changed (filler injected or removed).
///
/// Only pure insertions stretch: a reorder within the same container
/// (`removed` set) frees as much room as it needs. At most one filler
/// exists at a time; it is dropped the moment the insertion withdraws.
pub(crate) fn reconcile(
    layout: &mut dyn Layout,
    draggables: &[DraggableState],
    active: &mut Option<f64>,
    added: Option<usize>,
    removed: Option<usize>,
    element_size: Option<f64>,
) -> bool {
    if removed.is_some() {
        return false;
    }
    if added.is_some() {
        if active.is_some() {
            return false;
        }
        let Some(element_size) = element_size else {
            return false;
        };
        let container = layout.container_begin_end();
        let visible_end = container.begin + layout.container_size();
        let has_scrollbar = layout.scroll_size() > layout.container_size();
        let container_end = if has_scrollbar {
            container.begin + layout.scroll_size() - layout.scroll_value()
        } else {
            visible_end
        };
        // measured bands include applied translations; strip the last
        // item's offset to get its resting end
        let last_end = match draggables.len() {
            0 => container.begin,
            n => layout.item_begin_end(n - 1).end - draggables[n - 1].translation,
        };
        if last_end + element_size > container_end {
            let size = element_size + last_end - container_end;
            debug!(size, "injecting stretcher");
            layout.set_stretcher(size);
            layout.invalidate_rects();
            *active = Some(size);
            return true;
        }
        false
    } else if active.take().is_some() {
        debug!("removing stretcher");
        layout.clear_stretcher();
        layout.invalidate_rects();
        true
    } else {
        false
    }
}
