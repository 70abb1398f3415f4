//! Placeholder ("shadow") bounds for the predicted drop slot.

use serde::{Deserialize, Serialize};

use super::pipeline::DragResult;
use crate::geometry::Rect;
use crate::layout::Layout;

/// Backward bias applied by the one-shot first-insert correction, in
/// axis units. Empirically tuned for visual smoothness; do not derive it
/// from geometry.
pub(crate) const FIRST_INSERT_BIAS: f64 = 5.0;

/// The placeholder band along the axis plus its screen rectangle.
///
/// `begin_adjustment` is a transient backward extension of the soft
/// `begin` edge, produced once per fresh insertion when the pointer
/// enters ahead of the shadow, and cleared the next time the insertion
/// index moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadowBounds {
    pub begin: f64,
    pub end: f64,
    pub rect: Rect,
    pub begin_adjustment: f64,
}

/// Outcome of one shadow computation.
pub(crate) enum ShadowPatch {
    /// Prior bounds stay valid; nothing to merge.
    Keep,
    Set(Option<ShadowBounds>),
}

/// Shadow recomputation with index-change hysteresis: bounds are only
/// rebuilt when the candidate insertion index moved or an explicit
/// invalidation was requested, so small pointer motion inside the
/// current slot never thrashes the placeholder.
#[derive(Debug, Default)]
pub(crate) struct ShadowState {
    prev_added: Option<usize>,
}

impl ShadowState {
    pub(crate) fn compute(
        &mut self,
        layout: &dyn Layout,
        item_count: usize,
        result: &DragResult,
        force: bool,
    ) -> ShadowPatch {
        if result.pos.is_none() {
            self.prev_added = None;
            return ShadowPatch::Set(None);
        }
        let (Some(added), Some(element_size)) = (result.added_index, result.element_size) else {
            return ShadowPatch::Keep;
        };
        if !force && self.prev_added == Some(added) {
            return ShadowPatch::Keep;
        }
        self.prev_added = Some(added);
        let removed = result.removed_index;

        // the slot vacated by the source item is skipped as a neighbor
        let mut before = added.checked_sub(1);
        if before.is_some() && before == removed {
            before = before.and_then(|i| i.checked_sub(1));
        }
        let begin = match before {
            Some(index) => {
                let bounds = layout.item_begin_end(index);
                let size = layout.item_size(index);
                if element_size < size {
                    // keep the shadow centered in the gap it would create
                    bounds.end - (size - element_size) / 2.0
                } else {
                    bounds.end
                }
            }
            None => layout.container_begin_end().begin,
        };

        let mut after = added;
        if Some(after) == removed {
            after += 1;
        }
        let end = if after < item_count {
            let bounds = layout.item_begin_end(after);
            let size = layout.item_size(after);
            if element_size < size {
                bounds.begin + (size - element_size) / 2.0
            } else {
                bounds.begin
            }
        } else {
            layout.container_begin_end().end
        };

        let begin_adjustment = result.shadow.map_or(0.0, |s| s.begin_adjustment);
        ShadowPatch::Set(Some(ShadowBounds {
            begin,
            end,
            rect: layout.placeholder_rect(begin, end),
            begin_adjustment,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;
    use crate::reconciler::sim::SimLayout;

    fn result(added: Option<usize>, removed: Option<usize>, size: f64) -> DragResult {
        DragResult {
            added_index: added,
            removed_index: removed,
            pos: Some(1.0),
            element_size: Some(size),
            ..Default::default()
        }
    }

    #[test]
    fn bounds_from_neighbor_edges_for_equal_sizes() {
        let layout = SimLayout::vertical(&[30.0, 30.0, 30.0]);
        let mut state = ShadowState::default();
        let ShadowPatch::Set(Some(shadow)) =
            state.compute(&layout, 3, &result(Some(2), None, 30.0), false)
        else {
            panic!("expected fresh shadow");
        };
        assert_eq!(shadow.begin, 60.0);
        assert_eq!(shadow.end, 60.0);
    }

    #[test]
    fn smaller_dragged_item_biases_toward_gap_center() {
        let layout = SimLayout::vertical(&[40.0, 40.0]);
        let mut state = ShadowState::default();
        let ShadowPatch::Set(Some(shadow)) =
            state.compute(&layout, 2, &result(Some(1), None, 20.0), false)
        else {
            panic!("expected fresh shadow");
        };
        // neighbors are 40 wide, dragged item 20: both edges pull in by 10
        assert_eq!(shadow.begin, 30.0);
        assert_eq!(shadow.end, 50.0);
    }

    #[test]
    fn missing_neighbors_fall_back_to_container_edges() {
        let layout = SimLayout::vertical(&[30.0, 30.0]);
        let mut state = ShadowState::default();
        let ShadowPatch::Set(Some(at_front)) =
            state.compute(&layout, 2, &result(Some(0), None, 30.0), false)
        else {
            panic!("expected fresh shadow");
        };
        assert_eq!(at_front.begin, 0.0);

        let mut state = ShadowState::default();
        let ShadowPatch::Set(Some(at_back)) =
            state.compute(&layout, 2, &result(Some(2), None, 30.0), false)
        else {
            panic!("expected fresh shadow");
        };
        assert_eq!(at_back.end, layout.container_begin_end().end);
    }

    #[test]
    fn vacated_slot_is_skipped_as_neighbor() {
        let layout = SimLayout::vertical(&[30.0, 30.0, 30.0]);
        let mut state = ShadowState::default();
        // inserting right after the vacated slot 1: the before-neighbor
        // steps past it to item 0
        let ShadowPatch::Set(Some(shadow)) =
            state.compute(&layout, 3, &result(Some(2), Some(1), 30.0), false)
        else {
            panic!("expected fresh shadow");
        };
        assert_eq!(shadow.begin, 30.0);
        assert_eq!(shadow.end, 60.0);
    }

    #[test]
    fn unchanged_index_keeps_prior_bounds() {
        let layout = SimLayout::vertical(&[30.0, 30.0, 30.0]);
        let mut state = ShadowState::default();
        let r = result(Some(1), None, 30.0);
        assert!(matches!(state.compute(&layout, 3, &r, false), ShadowPatch::Set(Some(_))));
        assert!(matches!(state.compute(&layout, 3, &r, false), ShadowPatch::Keep));
        // explicit invalidation recomputes even for the same index
        assert!(matches!(state.compute(&layout, 3, &r, true), ShadowPatch::Set(Some(_))));
    }

    #[test]
    fn lost_position_clears_shadow_and_hysteresis() {
        let layout = SimLayout::vertical(&[30.0, 30.0, 30.0]);
        let mut state = ShadowState::default();
        let r = result(Some(1), None, 30.0);
        assert!(matches!(state.compute(&layout, 3, &r, false), ShadowPatch::Set(Some(_))));

        let outside = DragResult { pos: None, ..r.clone() };
        assert!(matches!(state.compute(&layout, 3, &outside, false), ShadowPatch::Set(None)));
        // re-entry at the same index recomputes from scratch
        assert!(matches!(state.compute(&layout, 3, &r, false), ShadowPatch::Set(Some(_))));
    }

    #[test]
    fn adjustment_carries_over_between_recomputes() {
        let layout = SimLayout::new(Orientation::Vertical, &[30.0, 30.0, 30.0]);
        let mut state = ShadowState::default();
        let mut r = result(Some(1), None, 30.0);
        let ShadowPatch::Set(shadow) = state.compute(&layout, 3, &r, false) else {
            panic!("expected fresh shadow");
        };
        r.shadow = shadow;
        if let Some(s) = r.shadow.as_mut() {
            s.begin_adjustment = -7.5;
        }
        let ShadowPatch::Set(Some(recomputed)) = state.compute(&layout, 3, &r, true) else {
            panic!("expected forced recompute");
        };
        assert_eq!(recomputed.begin_adjustment, -7.5);
    }
}
