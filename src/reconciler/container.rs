//! Per-container drag state, callbacks, and visual-reset plumbing.

use std::time::Instant;

use super::engine::{Anchor, ContainerId};
use super::pipeline::{DragPipeline, DragResult};
use crate::common::config::ContainerOptions;
use crate::layout::Layout;

/// Visual bookkeeping for one draggable slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct DraggableState {
    pub translation: f64,
    pub visible: bool,
}

impl DraggableState {
    pub(crate) fn new() -> Self {
        DraggableState { translation: 0.0, visible: true }
    }
}

/// Mutable container state shared across pipeline stages. Hierarchy
/// links are drag-scoped: `parent` is resolved from the anchor chain by
/// `prepare_drag` and cleared when the container re-arms.
#[derive(Debug, Default)]
pub(crate) struct ContainerState {
    pub draggables: Vec<DraggableState>,
    pub parent: Option<ContainerId>,
    /// A descendant container currently owns the pointer position.
    pub pos_in_child: bool,
    /// Extent of the live stretcher filler, if one is injected.
    pub stretcher: Option<f64>,
}

/// Candidate or final splice of a completed drag. `added_index` is
/// already adjusted for the vacated slot, so the consumer can remove
/// then insert without further arithmetic.
#[derive(Clone, Debug, PartialEq)]
pub struct DropOutcome<P> {
    pub removed_index: Option<usize>,
    pub added_index: Option<usize>,
    pub payload: P,
}

/// Host-supplied hooks, all optional. `should_accept_drop` vetoes
/// participation per drag before any geometry is consulted.
pub struct ContainerCallbacks<P> {
    pub on_drag_enter: Option<Box<dyn FnMut()>>,
    pub on_drag_leave: Option<Box<dyn FnMut()>>,
    pub on_drop_ready: Option<Box<dyn FnMut(&DropOutcome<P>)>>,
    pub on_drop: Option<Box<dyn FnMut(&DropOutcome<P>)>>,
    pub should_accept_drop: Option<Box<dyn Fn(&ContainerOptions, &P) -> bool>>,
}

impl<P> Default for ContainerCallbacks<P> {
    fn default() -> Self {
        ContainerCallbacks {
            on_drag_enter: None,
            on_drag_leave: None,
            on_drop_ready: None,
            on_drop: None,
            should_accept_drop: None,
        }
    }
}

/// One registered container: its options, oracle, callbacks, and the
/// drag machinery the dispatcher drives.
pub(crate) struct Container<P> {
    pub options: ContainerOptions,
    pub callbacks: ContainerCallbacks<P>,
    pub layout: Box<dyn Layout>,
    pub anchor: Option<Anchor>,
    pub state: ContainerState,
    pub pipeline: DragPipeline,
    pub drag_result: DragResult,
    /// The current drag is still live for this container (set on the
    /// first pipeline run, cleared by drop or end-of-drag).
    pub active_drag: bool,
    /// Pending deferred visual reset after the drag left the container.
    pub exit_reset: Option<Instant>,
}

impl<P> Container<P> {
    pub(crate) fn new(
        options: ContainerOptions,
        callbacks: ContainerCallbacks<P>,
        layout: Box<dyn Layout>,
        anchor: Option<Anchor>,
    ) -> Self {
        let pipeline = DragPipeline::new(options.behaviour);
        Container {
            options,
            callbacks,
            layout,
            anchor,
            state: ContainerState::default(),
            pipeline,
            drag_result: DragResult::default(),
            active_drag: false,
            exit_reset: None,
        }
    }

    /// Returns every slot to rest: zero translations, full visibility,
    /// no stretcher. Unconditional so it also serves as the safety net
    /// when a drag ends in an unexpected state.
    pub(crate) fn reset_visuals(&mut self) {
        for (index, draggable) in self.state.draggables.iter_mut().enumerate() {
            if draggable.translation != 0.0 {
                draggable.translation = 0.0;
                self.layout.set_translation(index, 0.0);
            }
            if !draggable.visible {
                draggable.visible = true;
                self.layout.set_visibility(index, true);
            }
        }
        if self.state.stretcher.take().is_some() {
            self.layout.clear_stretcher();
            self.layout.invalidate_rects();
        }
    }

    /// Re-arms for the next drag: fresh pipeline (dropping all stage
    /// hysteresis), null result, cleared hierarchy links and flags.
    pub(crate) fn rearm(&mut self) {
        self.pipeline = DragPipeline::new(self.options.behaviour);
        self.drag_result = DragResult::default();
        self.active_drag = false;
        self.exit_reset = None;
        self.state.pos_in_child = false;
        self.state.parent = None;
    }
}
