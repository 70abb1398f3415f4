//! Container registry and drag dispatcher.
//!
//! The engine owns every registered container and threads one floating
//! drag record ([`DraggableInfo`]) through their pipelines as the host
//! reports pointer updates. Cross-container effects (enter/leave hooks,
//! drop-ready announcements, position ownership handoffs between nested
//! containers) are drained synchronously after each update.

use std::time::{Duration, Instant};

use slotmap::SlotMap;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::container::{Container, ContainerCallbacks, DraggableState, DropOutcome};
use super::pipeline::{DragContext, DragResult, Effect, StageCtx};
use super::translation::TranslationState;
use crate::common::collections::HashSet;
use crate::common::config::{Behaviour, ContainerOptions, OptionsError};
use crate::geometry::{Point, Rect};
use crate::layout::Layout;

slotmap::new_key_type! {
    pub struct ContainerId;
}

/// Where a container lives inside another container's draggable, for
/// nested drag-and-drop. The chain of anchors stands in for structural
/// ancestry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub parent: ContainerId,
    pub index: usize,
}

/// The floating record describing the item being dragged. Created by
/// the host when a drag starts and passed to every pointer update;
/// `target` is claimed and released by the containers themselves.
#[derive(Clone, Debug)]
pub struct DraggableInfo<P> {
    /// Container the drag started from.
    pub source: ContainerId,
    /// Slot the dragged item occupied in `source`.
    pub source_index: usize,
    /// Pointer position in screen coordinates.
    pub position: Point,
    /// Screen rectangle of the dragged ghost, used for axis sizing.
    pub ghost: Rect,
    pub payload: P,
    /// Forces shadow recomputation on the next update (scroll, layout
    /// change, programmatic refresh).
    pub invalidate_shadow: bool,
    /// The container currently claiming the drop, if any.
    pub target: Option<ContainerId>,
}

impl<P> DraggableInfo<P> {
    pub fn new(
        source: ContainerId,
        source_index: usize,
        position: Point,
        ghost: Rect,
        payload: P,
    ) -> Self {
        DraggableInfo {
            source,
            source_index,
            position,
            ghost,
            payload,
            invalidate_shadow: false,
            target: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error(transparent)]
    InvalidOptions(#[from] OptionsError),
    #[error("anchor parent container is not registered")]
    UnknownAnchorParent,
}

/// Delay before sibling translations settle after the drag leaves a
/// container, giving a fast re-entry a chance to supersede the reset.
pub(crate) const EXIT_RESET_DELAY: Duration = Duration::from_millis(20);

pub struct Engine<P> {
    containers: SlotMap<ContainerId, Container<P>>,
    effects: Vec<Effect>,
}

impl<P> Default for Engine<P> {
    fn default() -> Self {
        Engine { containers: SlotMap::with_key(), effects: Vec::new() }
    }
}

impl<P: Clone> Engine<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a container. The anchor, when given, must point at an
    /// already-registered parent.
    pub fn register(
        &mut self,
        options: ContainerOptions,
        callbacks: ContainerCallbacks<P>,
        layout: Box<dyn Layout>,
        anchor: Option<Anchor>,
    ) -> Result<ContainerId, RegisterError> {
        options.validate()?;
        if let Some(anchor) = anchor
            && !self.containers.contains_key(anchor.parent)
        {
            return Err(RegisterError::UnknownAnchorParent);
        }
        let mut container = Container::new(options, callbacks, layout, anchor);
        let count = container.layout.item_count();
        container.state.draggables = vec![DraggableState::new(); count];
        let id = self.containers.insert(container);
        debug!(container = ?id, items = count, "container registered");
        Ok(id)
    }

    pub fn remove(&mut self, id: ContainerId) -> bool {
        let removed = self.containers.remove(id).is_some();
        if removed {
            debug!(container = ?id, "container removed");
        }
        removed
    }

    pub fn container_options(&self, id: ContainerId) -> Option<&ContainerOptions> {
        self.containers.get(id).map(|c| &c.options)
    }

    pub fn drag_result(&self, id: ContainerId) -> Option<&DragResult> {
        self.containers.get(id).map(|c| &c.drag_result)
    }

    /// Resyncs the per-slot side table with the oracle's current item
    /// count, after the host's list changed outside a drag.
    pub fn sync_items(&mut self, id: ContainerId) {
        if let Some(container) = self.containers.get_mut(id) {
            let count = container.layout.item_count();
            container.state.draggables = vec![DraggableState::new(); count];
            container.layout.invalidate_rects();
        }
    }

    /// Whether `id` participates in a drag out of `source`. The
    /// container's `should_accept_drop` veto overrides every other rule;
    /// otherwise copy-only containers never accept, containers hosted
    /// inside the dragged item are excluded, and the rest match on the
    /// source container itself or a shared group name.
    pub fn is_drag_relevant(
        &self,
        id: ContainerId,
        source: ContainerId,
        source_index: usize,
        payload: &P,
    ) -> bool {
        let (Some(candidate), Some(source_container)) =
            (self.containers.get(id), self.containers.get(source))
        else {
            return false;
        };
        if let Some(veto) = candidate.callbacks.should_accept_drop.as_ref() {
            return veto(&source_container.options, payload);
        }
        if candidate.options.behaviour == Behaviour::Copy {
            return false;
        }
        if self.hosted_in_dragged_item(id, source, source_index) {
            return false;
        }
        if id == source {
            return true;
        }
        match (&source_container.options.group_name, &candidate.options.group_name) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Every registered container relevant to a drag out of `source`.
    pub fn relevant_containers(
        &self,
        source: ContainerId,
        source_index: usize,
        payload: &P,
    ) -> HashSet<ContainerId> {
        self.containers
            .keys()
            .filter(|&id| self.is_drag_relevant(id, source, source_index, payload))
            .collect()
    }

    /// Walks `id`'s anchor chain; true when it passes through the
    /// dragged slot itself (a container cannot be dropped into).
    fn hosted_in_dragged_item(
        &self,
        id: ContainerId,
        source: ContainerId,
        source_index: usize,
    ) -> bool {
        let mut anchor = self.containers.get(id).and_then(|c| c.anchor);
        while let Some(hop) = anchor {
            if hop.parent == source {
                return hop.index == source_index;
            }
            anchor = self.containers.get(hop.parent).and_then(|c| c.anchor);
        }
        false
    }

    /// Arms every relevant container for a fresh drag: re-built slot
    /// tables, fresh pipelines, and parent links resolved through the
    /// anchor chains (each container links to its nearest relevant
    /// ancestor).
    pub fn prepare_drag(&mut self, relevant: &HashSet<ContainerId>) {
        let ids: Vec<ContainerId> =
            relevant.iter().copied().filter(|&id| self.containers.contains_key(id)).collect();
        for &id in &ids {
            let Some(container) = self.containers.get_mut(id) else { continue };
            container.rearm();
            let count = container.layout.item_count();
            container.state.draggables = vec![DraggableState::new(); count];
            container.layout.invalidate_rects();
        }
        for &id in &ids {
            let Some(mut hop) = self.containers.get(id).and_then(|c| c.anchor) else { continue };
            let host = loop {
                if relevant.contains(&hop.parent) {
                    break Some(hop);
                }
                match self.containers.get(hop.parent).and_then(|c| c.anchor) {
                    Some(next) => hop = next,
                    None => break None,
                }
            };
            let Some(host) = host else { continue };
            if let Some(container) = self.containers.get_mut(id) {
                container.state.parent = Some(host.parent);
            }
            if let Some(parent) = self.containers.get(host.parent)
                && host.index >= parent.state.draggables.len()
            {
                warn!(
                    container = ?id,
                    parent = ?host.parent,
                    index = host.index,
                    "anchor index out of range"
                );
            }
        }
        debug!(containers = ids.len(), "drag prepared");
    }

    /// Processes one pointer update for `id` and returns the updated
    /// result. Claims or releases `info.target`, fires callbacks, and
    /// schedules the deferred translation settle when the drag left a
    /// sortable container.
    pub fn handle_drag(&mut self, id: ContainerId, info: &mut DraggableInfo<P>) -> Option<DragResult> {
        if !self.containers.contains_key(id) {
            warn!(container = ?id, "drag update for unknown container");
            return None;
        }
        self.run_pipeline(id, info);
        self.drain_effects(info);
        let container = self.containers.get_mut(id)?;
        if container.drag_result.drag_left && container.options.behaviour != Behaviour::DropZone {
            container.exit_reset = Some(Instant::now() + EXIT_RESET_DELAY);
            trace!(container = ?id, "exit settle scheduled");
        }
        Some(container.drag_result.clone())
    }

    /// Re-runs the last update with shadow invalidation forced, after a
    /// scroll or container box change.
    pub fn refresh(&mut self, id: ContainerId, info: &mut DraggableInfo<P>) -> Option<DragResult> {
        info.invalidate_shadow = true;
        let result = self.handle_drag(id, info);
        info.invalidate_shadow = false;
        result
    }

    /// Completes the drag for `id`: visuals reset unconditionally, and
    /// when a drop target exists (or the container flushes items dropped
    /// outside) the final splice is reported through `on_drop` with the
    /// insertion index pre-adjusted for the vacated slot.
    pub fn handle_drop(&mut self, id: ContainerId, info: &DraggableInfo<P>) {
        let Some(container) = self.containers.get_mut(id) else { return };
        container.reset_visuals();
        let result = std::mem::take(&mut container.drag_result);
        if info.target.is_some() || container.options.remove_on_drop_out {
            let added_index = result.added_index.map(|added| match result.removed_index {
                Some(removed) if removed < added => added - 1,
                _ => added,
            });
            if (added_index.is_some() || result.removed_index.is_some())
                && let Some(hook) = container.callbacks.on_drop.as_mut()
            {
                let outcome = DropOutcome {
                    removed_index: result.removed_index,
                    added_index,
                    payload: info.payload.clone(),
                };
                debug!(container = ?id, added = ?outcome.added_index, removed = ?outcome.removed_index, "drop");
                hook(&outcome);
            }
        }
        container.rearm();
    }

    /// Cancels the drag for `id` without reporting a drop.
    pub fn end_drag(&mut self, id: ContainerId) {
        if let Some(container) = self.containers.get_mut(id) {
            container.reset_visuals();
            container.rearm();
        }
    }

    /// Fires due deferred work. The exit settle re-applies translations
    /// through a fresh calculator so only the vacated slot's gap stays
    /// closed; a drag that re-entered meanwhile has already superseded
    /// the task.
    pub fn tick(&mut self, now: Instant) {
        for (id, container) in self.containers.iter_mut() {
            let Some(deadline) = container.exit_reset else { continue };
            if deadline > now {
                continue;
            }
            container.exit_reset = None;
            if container.drag_result.pos.is_some() {
                continue;
            }
            trace!(container = ?id, "exit settle fired");
            let removed = container.drag_result.removed_index;
            TranslationState::default().update(
                None,
                removed,
                None,
                container.layout.as_mut(),
                &mut container.state.draggables,
            );
        }
    }

    fn run_pipeline(&mut self, id: ContainerId, info: &mut DraggableInfo<P>) {
        let Some(container) = self.containers.get_mut(id) else { return };
        container.active_drag = true;
        container.exit_reset = None;
        let mut drag = DragContext {
            source: info.source,
            source_index: info.source_index,
            position: info.position,
            ghost: info.ghost,
            invalidate_shadow: info.invalidate_shadow,
            target: info.target,
        };
        let ctx = StageCtx {
            id,
            options: &container.options,
            layout: container.layout.as_mut(),
            state: &mut container.state,
            drag: &mut drag,
            effects: &mut self.effects,
        };
        container.pipeline.run(ctx, &mut container.drag_result);
        info.target = drag.target;
    }

    /// Applies queued effects, in batches so that a parent pipeline
    /// re-run triggered by a position handoff can append its own.
    fn drain_effects(&mut self, info: &mut DraggableInfo<P>) {
        while !self.effects.is_empty() {
            let batch = std::mem::take(&mut self.effects);
            for effect in batch {
                match effect {
                    Effect::Enter { container } => {
                        if let Some(c) = self.containers.get_mut(container)
                            && let Some(hook) = c.callbacks.on_drag_enter.as_mut()
                        {
                            hook();
                        }
                    }
                    Effect::Leave { container } => {
                        if let Some(c) = self.containers.get_mut(container)
                            && let Some(hook) = c.callbacks.on_drag_leave.as_mut()
                        {
                            hook();
                        }
                    }
                    Effect::DropReady { container, added_index, removed_index } => {
                        if let Some(c) = self.containers.get_mut(container)
                            && let Some(hook) = c.callbacks.on_drop_ready.as_mut()
                        {
                            let outcome = DropOutcome {
                                removed_index,
                                added_index: Some(added_index),
                                payload: info.payload.clone(),
                            };
                            hook(&outcome);
                        }
                    }
                    Effect::ChildCapture { parent, captured } => {
                        let rerun = match self.containers.get_mut(parent) {
                            Some(c) => {
                                c.state.pos_in_child = captured;
                                c.active_drag
                            }
                            None => false,
                        };
                        if rerun {
                            self.run_pipeline(parent, info);
                        }
                    }
                }
            }
        }
    }
}
