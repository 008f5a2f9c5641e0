//! Drawing tools. Each tool owns its draft, its committed volumes and its
//! labels; the controller decides which one receives input.

mod cylinder;
mod polygon;

pub use cylinder::*;
pub use polygon::*;

use std::time::Instant;

use foundation::time::TimeWindow;
use scene::SceneEngine;
use scene::components::Primitive;
use scene::entity::EntityId;
use thiserror::Error;
use uss::{AreaOfInterest, FlightPlanResponse, UssError};

use crate::input::InputEvent;
use crate::notice::NoticeBus;

/// Body message the USS sends with a created operational intent.
pub const ACCEPTED_MESSAGE: &str = "Operational intent created successfully";

/// Message shown for a 409 without a `detail.message`.
pub const DEFAULT_CONFLICT_MESSAGE: &str =
    "Flight plan conflicts with existing constraints or operational intents";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Navigation only; no authoring input is handled.
    Select,
    Cylinder,
    Polygon,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("No volume data available")]
    NoVolumes,
    #[error("No polygon regions available to submit.")]
    NoRegions,
    #[error("No draft model available to submit.")]
    NoDraftVolume,
    #[error("no drawing tool is active")]
    NoActiveTool,
    #[error("a submission is already in flight for this tool")]
    InFlight,
    #[error("submission was started by the {expected:?} tool")]
    WrongTool { expected: ToolKind },
    #[error("Unexpected response format from server")]
    UnexpectedResponse { status: u16 },
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: UssError,
    },
}

impl SubmitError {
    /// Builds the operator-facing rejection: a 409 shows the server's own
    /// message, anything else the error text.
    pub fn rejected(source: UssError) -> Self {
        let message = if source.is_conflict() {
            source
                .detail_message()
                .unwrap_or(DEFAULT_CONFLICT_MESSAGE)
                .to_string()
        } else {
            source.to_string()
        };
        SubmitError::Rejected { message, source }
    }
}

/// A request built by [`VolumeTool::begin_submission`] and not yet answered.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub tool: ToolKind,
    pub aoi: AreaOfInterest,
    pub(crate) index: usize,
}

impl PendingSubmission {
    /// Position of the submitted volume in the tool's committed list.
    pub fn volume_index(&self) -> usize {
        self.index
    }
}

/// Lifecycle shared by the cylinder and polygon tools.
///
/// ```text
/// [Inactive] --activate()--> [Active] --deactivate()--> [Inactive]
/// ```
///
/// Only an active tool handles input. Deactivation discards the draft and
/// every draft entity before returning.
pub trait VolumeTool {
    fn kind(&self) -> ToolKind;

    fn active(&self) -> bool;

    /// Returns `false` when the tool was already active.
    fn activate(&mut self) -> bool;

    /// Returns `false` when the tool was already inactive.
    fn deactivate(&mut self, scene: &mut dyn SceneEngine) -> bool;

    fn handle(&mut self, scene: &mut dyn SceneEngine, event: InputEvent);

    fn has_draft(&self) -> bool;

    /// Number of volumes committed so far.
    fn committed_len(&self) -> usize;

    /// Picks the volume to submit, marks it `Requested` and builds its request.
    fn begin_submission(
        &mut self,
        scene: &mut dyn SceneEngine,
        window: &TimeWindow,
    ) -> Result<PendingSubmission, SubmitError>;

    /// Applies the service verdict to the submitted volume.
    fn complete_submission(
        &mut self,
        scene: &mut dyn SceneEngine,
        notices: &mut NoticeBus,
        pending: PendingSubmission,
        result: Result<FlightPlanResponse, UssError>,
    ) -> Result<(), SubmitError>;

    /// Releases a submission that will never be completed: the volume goes
    /// back to `Draft` and the tool accepts a new submission.
    fn abort_submission(
        &mut self,
        scene: &mut dyn SceneEngine,
        pending: PendingSubmission,
    ) -> Result<(), SubmitError>;

    fn submission_in_flight(&self) -> bool;

    /// Expires transient labels.
    fn tick(&mut self, scene: &mut dyn SceneEngine, now: Instant);
}

/// Replaces `slot` with a freshly added primitive, removing the old entity first.
pub(crate) fn swap_entity(
    scene: &mut dyn SceneEngine,
    slot: &mut Option<EntityId>,
    primitive: Primitive,
) -> EntityId {
    remove_entity(scene, slot);
    let id = scene.add_entity(primitive);
    *slot = Some(id);
    id
}

pub(crate) fn remove_entity(scene: &mut dyn SceneEngine, slot: &mut Option<EntityId>) {
    if let Some(old) = slot.take() {
        scene.remove_entity(old);
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_CONFLICT_MESSAGE, SubmitError};
    use serde_json::json;
    use uss::UssError;

    #[test]
    fn conflict_without_detail_uses_default_message() {
        let err = SubmitError::rejected(UssError::UnexpectedStatus {
            expected: 201,
            status: 409,
            payload: Some(json!({ "detail": "nope" })),
        });
        assert_eq!(err.to_string(), DEFAULT_CONFLICT_MESSAGE);
    }

    #[test]
    fn other_failures_use_error_text() {
        let err = SubmitError::rejected(UssError::UnexpectedStatus {
            expected: 201,
            status: 500,
            payload: None,
        });
        assert_eq!(err.to_string(), "Expected status 201, but got 500");
    }
}
