//! Headless drag-and-drop reconciliation for sortable, nestable
//! containers.
//!
//! The crate turns a stream of pointer updates into per-container visual
//! state: which slot the dragged item would occupy, which sibling items
//! slide aside, where the drop placeholder sits, and what splice to
//! apply when the drag completes. It owns no rendering and no event
//! loop; a host feeds it pointer positions through
//! [`reconciler::Engine`] and mirrors its decisions through the
//! [`layout::Layout`] oracle it implements for each container.

pub mod common;
pub mod geometry;
pub mod layout;
pub mod reconciler;

pub use common::config::{Behaviour, ContainerOptions, OptionsError};
pub use geometry::{BeginEnd, Orientation, Point, Rect, Size};
pub use layout::Layout;
pub use reconciler::{
    Anchor, ContainerCallbacks, ContainerId, DragResult, DraggableInfo, DropOutcome, Engine,
    RegisterError, ShadowBounds,
};
