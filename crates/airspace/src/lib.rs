//! Interactive authoring of airspace volumes and their reconciliation with a
//! USS conflict service.

pub mod annotations;
pub mod controller;
pub mod geo;
pub mod input;
pub mod notice;
pub mod reconcile;
pub mod tools;
pub mod volume;

#[cfg(test)]
mod fixtures;

pub use controller::{MapController, QueryError};
pub use input::InputEvent;
pub use tools::{SubmitError, ToolKind, VolumeTool};
