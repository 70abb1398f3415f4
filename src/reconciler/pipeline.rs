//! The per-pointer-update reconciliation pipeline.
//!
//! Each pointer update threads one accumulating [`DragResult`] through an
//! ordered chain of small stateful stages. Stages only patch the result
//! and push cross-container effects; the engine drains effects after the
//! run, in the same call stack.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::container::ContainerState;
use super::engine::ContainerId;
use super::locator::{self, SlotBias};
use super::shadow::{FIRST_INSERT_BIAS, ShadowBounds, ShadowPatch, ShadowState};
use super::stretcher;
use super::translation::TranslationState;
use crate::common::config::{Behaviour, ContainerOptions};
use crate::geometry::{Point, Rect};
use crate::layout::Layout;

/// Accumulated output of one container's pipeline for the current
/// pointer update. Mutated in place across updates within a drag; reset
/// to all-null when the container is re-armed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DragResult {
    /// Slot the dragged item would occupy if dropped now; `None` exactly
    /// when `pos` is `None`.
    pub added_index: Option<usize>,
    /// Slot vacated by the source item when this container is the source
    /// and the drag moves rather than copies. Fixed for the life of the
    /// drag once established.
    pub removed_index: Option<usize>,
    /// Local scalar pointer position, `None` outside the capture zone or
    /// while a descendant container owns the position.
    pub pos: Option<f64>,
    /// Extent of the dragged item along this container's axis, measured
    /// once per entry.
    pub element_size: Option<f64>,
    pub shadow: Option<ShadowBounds>,
    /// Transient: the pointer left this container on this update.
    #[serde(skip)]
    pub drag_left: bool,
    /// Transient: a stretcher was injected or removed on this update, so
    /// the host should re-measure.
    #[serde(skip)]
    pub container_box_changed: bool,
}

/// Payload-erased view of the dispatcher's floating drag record, built
/// per pipeline run; claim changes are copied back afterwards.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DragContext {
    pub source: ContainerId,
    pub source_index: usize,
    pub position: Point,
    pub ghost: Rect,
    pub invalidate_shadow: bool,
    pub target: Option<ContainerId>,
}

/// Cross-container side effects emitted by stages, drained by the engine
/// synchronously after each run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Effect {
    Enter {
        container: ContainerId,
    },
    Leave {
        container: ContainerId,
    },
    DropReady {
        container: ContainerId,
        added_index: usize,
        removed_index: Option<usize>,
    },
    /// This container's interior (itself or a descendant) gained or lost
    /// ownership of the pointer position.
    ChildCapture {
        parent: ContainerId,
        captured: bool,
    },
}

pub(crate) struct StageCtx<'a> {
    pub id: ContainerId,
    pub options: &'a ContainerOptions,
    pub layout: &'a mut dyn Layout,
    pub state: &'a mut ContainerState,
    pub drag: &'a mut DragContext,
    pub effects: &'a mut Vec<Effect>,
}

#[enum_dispatch]
pub(crate) trait DragStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult);
}

#[enum_dispatch(DragStage)]
pub(crate) enum StageKind {
    RemovedItem(RemovedItemStage),
    HideRemoved(HideRemovedStage),
    CapturePosition(CapturePositionStage),
    NotifyParent(NotifyParentStage),
    MeasureElement(MeasureElementStage),
    ClaimTarget(ClaimTargetStage),
    DropZoneIndex(DropZoneIndexStage),
    DropZoneShadow(DropZoneShadowStage),
    InvalidateShadow(InvalidateShadowStage),
    ResolveIndex(ResolveIndexStage),
    ResetAdjustment(ResetAdjustmentStage),
    Stretcher(StretcherStage),
    Translations(TranslationsStage),
    Shadow(ShadowStage),
    FirstInsert(FirstInsertStage),
    EnterLeave(EnterLeaveStage),
    DropReady(DropReadyStage),
}

/// The ordered stage chain for one container, constructed per behaviour
/// at registration and rebuilt (resetting all stage state) whenever the
/// container is re-armed after a drag.
pub(crate) struct DragPipeline {
    stages: Vec<StageKind>,
}

impl DragPipeline {
    pub(crate) fn new(behaviour: Behaviour) -> Self {
        let mut stages = vec![
            StageKind::RemovedItem(RemovedItemStage::default()),
            StageKind::HideRemoved(HideRemovedStage),
            StageKind::CapturePosition(CapturePositionStage),
            StageKind::NotifyParent(NotifyParentStage::default()),
            StageKind::MeasureElement(MeasureElementStage::default()),
            StageKind::ClaimTarget(ClaimTargetStage),
        ];
        match behaviour {
            Behaviour::DropZone => {
                stages.push(StageKind::DropZoneIndex(DropZoneIndexStage));
                stages.push(StageKind::DropZoneShadow(DropZoneShadowStage::default()));
            }
            Behaviour::Move | Behaviour::Copy => {
                stages.push(StageKind::InvalidateShadow(InvalidateShadowStage::default()));
                stages.push(StageKind::ResolveIndex(ResolveIndexStage));
                stages.push(StageKind::ResetAdjustment(ResetAdjustmentStage::default()));
                stages.push(StageKind::Stretcher(StretcherStage));
                stages.push(StageKind::Translations(TranslationsStage::default()));
                stages.push(StageKind::Shadow(ShadowStage::default()));
                stages.push(StageKind::FirstInsert(FirstInsertStage::default()));
            }
        }
        stages.push(StageKind::EnterLeave(EnterLeaveStage::default()));
        stages.push(StageKind::DropReady(DropReadyStage::default()));
        DragPipeline { stages }
    }

    pub(crate) fn run(&mut self, mut ctx: StageCtx<'_>, result: &mut DragResult) {
        result.drag_left = false;
        result.container_box_changed = false;
        for stage in &mut self.stages {
            stage.apply(&mut ctx, result);
        }
    }
}

/// Fixes the vacated slot the first time the drag's source container
/// matches this one (and the behaviour moves rather than copies); the
/// index then never changes for the life of the drag.
#[derive(Default)]
pub(crate) struct RemovedItemStage {
    fixed: Option<usize>,
}

impl DragStage for RemovedItemStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        if self.fixed.is_none()
            && ctx.drag.source == ctx.id
            && ctx.options.behaviour != Behaviour::Copy
        {
            self.fixed = Some(ctx.drag.source_index);
        }
        result.removed_index = self.fixed;
    }
}

/// Keeps the vacated item hidden for as long as the drag is alive.
pub(crate) struct HideRemovedStage;

impl DragStage for HideRemovedStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        if let Some(index) = result.removed_index
            && let Some(draggable) = ctx.state.draggables.get_mut(index)
            && draggable.visible
        {
            draggable.visible = false;
            ctx.layout.set_visibility(index, false);
        }
    }
}

/// Converts the pointer into a local scalar position, unless a
/// descendant container currently owns it.
pub(crate) struct CapturePositionStage;

impl DragStage for CapturePositionStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        result.pos = if ctx.state.pos_in_child {
            None
        } else {
            ctx.layout.local_position(ctx.drag.position)
        };
    }
}

/// Tells the parent container when this container's interior (itself or
/// a descendant) gains or loses ownership of the pointer position.
#[derive(Default)]
pub(crate) struct NotifyParentStage {
    interior: bool,
}

impl DragStage for NotifyParentStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        let Some(parent) = ctx.state.parent else {
            return;
        };
        let interior = result.pos.is_some() || ctx.state.pos_in_child;
        if interior != self.interior {
            self.interior = interior;
            ctx.effects.push(Effect::ChildCapture { parent, captured: interior });
        }
    }
}

/// Measures the dragged item's extent along this container's axis, once
/// per entry into the container.
#[derive(Default)]
pub(crate) struct MeasureElementStage {
    size: Option<f64>,
}

impl DragStage for MeasureElementStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        if result.pos.is_none() {
            self.size = None;
            result.element_size = None;
            return;
        }
        let size = *self
            .size
            .get_or_insert_with(|| ctx.options.orientation.extent_of(ctx.drag.ghost.size));
        result.element_size = Some(size);
    }
}

/// Claims the drag's prospective drop target while the position is
/// captured; releases idempotently when it is lost.
pub(crate) struct ClaimTargetStage;

impl DragStage for ClaimTargetStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        if result.pos.is_some() {
            if ctx.drag.target != Some(ctx.id) {
                trace!(container = ?ctx.id, "claimed drop target");
            }
            ctx.drag.target = Some(ctx.id);
        } else if ctx.drag.target == Some(ctx.id) {
            trace!(container = ?ctx.id, "released drop target");
            ctx.drag.target = None;
        }
    }
}

/// Drop zones have a single slot: inside means index 0.
pub(crate) struct DropZoneIndexStage;

impl DragStage for DropZoneIndexStage {
    fn apply(&mut self, _ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        result.added_index = result.pos.map(|_| 0);
    }
}

/// A drop zone's shadow is the whole zone, recomputed only when the
/// insertion state flips.
#[derive(Default)]
pub(crate) struct DropZoneShadowStage {
    prev_added: Option<usize>,
}

impl DragStage for DropZoneShadowStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        if result.added_index == self.prev_added {
            return;
        }
        self.prev_added = result.added_index;
        result.shadow = result.added_index.map(|_| {
            let zone = ctx.layout.container_begin_end();
            ShadowBounds {
                begin: zone.begin,
                end: zone.end,
                rect: ctx.layout.placeholder_rect(zone.begin, zone.end),
                begin_adjustment: 0.0,
            }
        });
    }
}

/// Recomputes cached shadow bounds when the dispatcher requested it
/// (scroll, container box change, re-entry). Holds its own hysteresis
/// state, independent of [`ShadowStage`].
#[derive(Default)]
pub(crate) struct InvalidateShadowStage {
    calc: ShadowState,
}

impl DragStage for InvalidateShadowStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        if !ctx.drag.invalidate_shadow {
            return;
        }
        let count = ctx.state.draggables.len();
        if let ShadowPatch::Set(shadow) = self.calc.compute(ctx.layout, count, result, true) {
            result.shadow = shadow;
        }
    }
}

/// Resolves the candidate insertion index from the pointer position,
/// keeping the previous index while the pointer sits inside the current
/// shadow (the positional hysteresis device).
pub(crate) struct ResolveIndexStage;

impl DragStage for ResolveIndexStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        let Some(pos) = result.pos else {
            result.added_index = None;
            return;
        };
        let count = ctx.state.draggables.len();
        let layout = &*ctx.layout;
        let bounds = |index: usize| layout.item_begin_end(index);
        let candidate = match &result.shadow {
            None => {
                Some(locator::find_slot(count, pos, SlotBias::Midpoint, &bounds).unwrap_or(count))
            }
            Some(shadow) => {
                let soft_begin = shadow.begin + shadow.begin_adjustment;
                if soft_begin <= pos && pos <= shadow.end {
                    // inside the shadow itself: keep the current index
                    None
                } else if pos < soft_begin {
                    locator::find_slot(count, pos, SlotBias::Edge, &bounds)
                } else if pos > shadow.end {
                    Some(
                        locator::find_slot(count, pos, SlotBias::Edge, &bounds)
                            .map_or(count, |index| index + 1),
                    )
                } else {
                    Some(count)
                }
            }
        };
        result.added_index = candidate.or(result.added_index);
    }
}

/// Clears the one-shot begin adjustment the next time the insertion
/// index moves after it was applied.
#[derive(Default)]
pub(crate) struct ResetAdjustmentStage {
    last_added: Option<usize>,
}

impl DragStage for ResetAdjustmentStage {
    fn apply(&mut self, _ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        if result.added_index != self.last_added
            && self.last_added.is_some()
            && let Some(shadow) = result.shadow.as_mut()
        {
            shadow.begin_adjustment = 0.0;
        }
        self.last_added = result.added_index;
    }
}

pub(crate) struct StretcherStage;

impl DragStage for StretcherStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        let state = &mut *ctx.state;
        let changed = stretcher::reconcile(
            ctx.layout,
            &state.draggables,
            &mut state.stretcher,
            result.added_index,
            result.removed_index,
            result.element_size,
        );
        if changed {
            result.container_box_changed = true;
        }
    }
}

#[derive(Default)]
pub(crate) struct TranslationsStage {
    calc: TranslationState,
}

impl DragStage for TranslationsStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        let changed = self.calc.update(
            result.added_index,
            result.removed_index,
            result.element_size,
            ctx.layout,
            &mut ctx.state.draggables,
        );
        if changed {
            trace!(
                added = ?result.added_index,
                removed = ?result.removed_index,
                "sibling translations recomputed"
            );
        }
    }
}

#[derive(Default)]
pub(crate) struct ShadowStage {
    calc: ShadowState,
}

impl DragStage for ShadowStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        let count = ctx.state.draggables.len();
        let force = ctx.drag.invalidate_shadow;
        if let ShadowPatch::Set(shadow) = self.calc.compute(ctx.layout, count, result, force) {
            result.shadow = shadow;
        }
    }
}

/// One-shot begin correction for a pointer that established its first
/// insertion while still ahead of the shadow's begin edge, so a
/// fast-entering drag is not momentarily rejected.
#[derive(Default)]
pub(crate) struct FirstInsertStage {
    last_added: Option<usize>,
}

impl DragStage for FirstInsertStage {
    fn apply(&mut self, _ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        let Some(pos) = result.pos else {
            self.last_added = None;
            return;
        };
        if let Some(added) = result.added_index
            && self.last_added.is_none()
        {
            if let Some(shadow) = result.shadow.as_mut()
                && pos < shadow.begin
            {
                shadow.begin_adjustment = pos - shadow.begin - FIRST_INSERT_BIAS;
            }
            self.last_added = Some(added);
        }
    }
}

#[derive(Default)]
pub(crate) struct EnterLeaveStage {
    inside: bool,
}

impl DragStage for EnterLeaveStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        let inside = result.pos.is_some();
        if inside == self.inside {
            return;
        }
        self.inside = inside;
        if inside {
            ctx.effects.push(Effect::Enter { container: ctx.id });
        } else {
            ctx.effects.push(Effect::Leave { container: ctx.id });
            result.drag_left = true;
        }
    }
}

/// Announces each distinct candidate outcome once, with the insertion
/// index adjusted the way the eventual splice will see it.
#[derive(Default)]
pub(crate) struct DropReadyStage {
    last_added: Option<usize>,
}

impl DragStage for DropReadyStage {
    fn apply(&mut self, ctx: &mut StageCtx<'_>, result: &mut DragResult) {
        if let Some(added) = result.added_index
            && self.last_added != Some(added)
        {
            self.last_added = Some(added);
            let adjusted = match result.removed_index {
                Some(removed) if added > removed => added - 1,
                _ => added,
            };
            ctx.effects.push(Effect::DropReady {
                container: ctx.id,
                added_index: adjusted,
                removed_index: result.removed_index,
            });
        }
    }
}
