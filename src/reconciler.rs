pub mod container;
pub mod engine;
pub(crate) mod locator;
pub(crate) mod pipeline;
pub(crate) mod shadow;
pub(crate) mod stretcher;
pub(crate) mod translation;

pub use container::{ContainerCallbacks, DropOutcome};
pub use engine::{Anchor, ContainerId, DraggableInfo, Engine, RegisterError};
pub use pipeline::DragResult;
pub use shadow::ShadowBounds;

#[cfg(test)]
pub(crate) mod sim;
