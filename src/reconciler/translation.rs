//! Sibling offsets that open the insertion gap and close the vacated one.

use super::container::DraggableState;
use crate::layout::Layout;

/// Translation recomputation with pair-change hysteresis: offsets are
/// rewritten only when the (insertion, vacated) index pair moved since
/// the previous call.
#[derive(Debug, Default)]
pub(crate) struct TranslationState {
    prev_added: Option<usize>,
    prev_removed: Option<usize>,
}

impl TranslationState {
    /// Recomputes every sibling's offset; returns whether anything was
    /// rewritten. The vacated item itself is never translated (it is
    /// hidden instead).
    pub(crate) fn update(
        &mut self,
        added: Option<usize>,
        removed: Option<usize>,
        element_size: Option<f64>,
        layout: &mut dyn Layout,
        draggables: &mut [DraggableState],
    ) -> bool {
        if added == self.prev_added && removed == self.prev_removed {
            return false;
        }
        let removed_size = removed.map(|index| layout.item_size(index)).unwrap_or(0.0);
        let element_size = element_size.unwrap_or(0.0);
        for (index, draggable) in draggables.iter_mut().enumerate() {
            if Some(index) == removed {
                continue;
            }
            let mut translate = 0.0;
            if let Some(removed) = removed
                && removed < index
            {
                translate -= removed_size;
            }
            if let Some(added) = added
                && added <= index
            {
                translate += element_size;
            }
            draggable.translation = translate;
            layout.set_translation(index, translate);
        }
        self.prev_added = added;
        self.prev_removed = removed;
        true
    }
}
