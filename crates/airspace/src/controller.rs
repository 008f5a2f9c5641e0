use std::sync::Arc;
use std::time::Instant;

use foundation::time::TimeWindow;
use scene::SceneEngine;
use thiserror::Error;
use tracing::{debug, error, info};
use uss::{AreaOfInterest, ConflictService, FlightPlanResponse, UssError, Volume};

use crate::geo;
use crate::input::InputEvent;
use crate::notice::{Notice, NoticeBus, NoticeKind};
use crate::reconcile::ConflictLayer;
use crate::tools::{
    CylinderTool, PendingSubmission, PolygonTool, SubmitError, ToolKind, VolumeTool,
};

/// Radius of the conflict query around the camera.
pub const QUERY_RADIUS_M: f64 = 10_000.0;
/// Height of the conflict query band above the terrain under the camera.
pub const QUERY_BAND_M: f64 = 1_000.0;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("camera position is unknown")]
    NoCamera,
    #[error(transparent)]
    Service(#[from] UssError),
}

/// Owns the scene and both drawing tools, and keeps exactly one mode active.
pub struct MapController<S> {
    scene: S,
    cylinder: CylinderTool,
    polygon: PolygonTool,
    conflicts: ConflictLayer,
    notices: NoticeBus,
    service: Arc<dyn ConflictService>,
    mode: ToolKind,
}

impl<S: SceneEngine> MapController<S> {
    /// Starts with the cylinder tool active.
    pub fn new(scene: S, service: Arc<dyn ConflictService>) -> Self {
        let mut cylinder = CylinderTool::new();
        cylinder.activate();
        Self {
            scene,
            cylinder,
            polygon: PolygonTool::new(),
            conflicts: ConflictLayer::new(),
            notices: NoticeBus::new(),
            service,
            mode: ToolKind::Cylinder,
        }
    }

    pub fn mode(&self) -> ToolKind {
        self.mode
    }

    /// Deactivates the current tool, discarding its draft, then activates `kind`.
    pub fn select_tool(&mut self, kind: ToolKind) {
        self.with_tool(self.mode, |tool, scene, _| tool.deactivate(scene));
        self.mode = kind;
        self.with_tool(kind, |tool, _, _| tool.activate());
        debug!(?kind, "tool selected");
    }

    pub fn handle(&mut self, event: InputEvent) {
        self.with_tool(self.mode, |tool, scene, _| tool.handle(scene, event));
    }

    pub fn begin_submission(
        &mut self,
        window: &TimeWindow,
    ) -> Result<PendingSubmission, SubmitError> {
        self.with_tool(self.mode, |tool, scene, _| {
            tool.begin_submission(scene, window)
        })
        .unwrap_or(Err(SubmitError::NoActiveTool))
    }

    /// Hands the verdict back to the tool that started the submission, even
    /// if another tool has been selected since.
    pub fn complete_submission(
        &mut self,
        pending: PendingSubmission,
        result: Result<FlightPlanResponse, UssError>,
    ) -> Result<(), SubmitError> {
        let kind = pending.tool;
        let outcome = self
            .with_tool(kind, |tool, scene, notices| {
                tool.complete_submission(scene, notices, pending, result)
            })
            .unwrap_or(Err(SubmitError::NoActiveTool));
        if outcome.is_ok() {
            self.notices
                .emit(NoticeKind::Info, "Volume request submitted successfully");
        }
        outcome
    }

    /// Releases a submission whose verdict will never arrive.
    pub fn abort_submission(&mut self, pending: PendingSubmission) -> Result<(), SubmitError> {
        let kind = pending.tool;
        self.with_tool(kind, |tool, scene, _| tool.abort_submission(scene, pending))
            .unwrap_or(Err(SubmitError::NoActiveTool))
    }

    /// Submits the active tool's volume and applies the verdict.
    ///
    /// Dropping the returned future before it resolves aborts the submission.
    pub async fn submit(&mut self, window: &TimeWindow) -> Result<(), SubmitError> {
        let pending = self.begin_submission(window)?;
        let service = Arc::clone(&self.service);
        let aoi = pending.aoi.clone();
        let guard = InFlight {
            controller: self,
            pending: Some(pending),
        };
        let result = service.submit_flight_plan(aoi).await;
        guard.complete(result)
    }

    /// Cylinder around the camera's ground position, from the terrain up
    /// [`QUERY_BAND_M`].
    pub fn conflict_query_area(&self, window: &TimeWindow) -> Result<AreaOfInterest, QueryError> {
        let camera = self.scene.camera_position().ok_or(QueryError::NoCamera)?;
        let ground = self
            .scene
            .terrain_height(camera.lat_rad, camera.lon_rad)
            .unwrap_or(0.0);
        let volume = Volume::circle(
            geo::to_lng_lat(camera),
            QUERY_RADIUS_M,
            ground,
            ground + QUERY_BAND_M,
        );
        Ok(AreaOfInterest::new(volume, window))
    }

    /// Queries conflicts around the camera and redraws them. Returns the
    /// number of regions drawn.
    pub async fn query_conflicts(&mut self, window: &TimeWindow) -> Result<usize, QueryError> {
        let aoi = self.conflict_query_area(window)?;
        let service = Arc::clone(&self.service);
        match service.query_conflicts(aoi).await {
            Ok(resp) => {
                self.conflicts.redraw(&mut self.scene, &resp);
                info!(regions = self.conflicts.len(), "conflicts drawn");
                Ok(self.conflicts.len())
            }
            Err(err) => {
                error!(error = %err, "conflict query failed");
                Err(err.into())
            }
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.cylinder.tick(&mut self.scene, now);
        self.polygon.tick(&mut self.scene, now);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn cylinder(&self) -> &CylinderTool {
        &self.cylinder
    }

    pub fn polygon(&self) -> &PolygonTool {
        &self.polygon
    }

    pub fn conflicts(&self) -> &ConflictLayer {
        &self.conflicts
    }

    /// Shared handle to the backend, for callers that drive
    /// `begin_submission` / `complete_submission` themselves.
    pub fn service(&self) -> Arc<dyn ConflictService> {
        Arc::clone(&self.service)
    }

    fn with_tool<R>(
        &mut self,
        kind: ToolKind,
        f: impl FnOnce(&mut dyn VolumeTool, &mut dyn SceneEngine, &mut NoticeBus) -> R,
    ) -> Option<R> {
        let tool: &mut dyn VolumeTool = match kind {
            ToolKind::Select => return None,
            ToolKind::Cylinder => &mut self.cylinder,
            ToolKind::Polygon => &mut self.polygon,
        };
        Some(f(tool, &mut self.scene, &mut self.notices))
    }
}

/// Aborts the wrapped submission on drop unless it was completed.
struct InFlight<'a, S: SceneEngine> {
    controller: &'a mut MapController<S>,
    pending: Option<PendingSubmission>,
}

impl<S: SceneEngine> InFlight<'_, S> {
    fn complete(
        mut self,
        result: Result<FlightPlanResponse, UssError>,
    ) -> Result<(), SubmitError> {
        let Some(pending) = self.pending.take() else {
            return Err(SubmitError::NoActiveTool);
        };
        self.controller.complete_submission(pending, result)
    }
}

impl<S: SceneEngine> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(tool = ?pending.tool, "submission dropped before its verdict");
            if let Err(err) = self.controller.abort_submission(pending) {
                error!(error = %err, "failed to abort submission");
            }
        }
    }
}
