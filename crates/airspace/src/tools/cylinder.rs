use std::mem;
use std::time::Instant;

use foundation::math::Ecef;
use foundation::time::TimeWindow;
use scene::SceneEngine;
use scene::components::{Color, CylinderShape, PointMarker, Primitive};
use scene::entity::EntityId;
use scene::picking::ScreenPos;
use tracing::{debug, info, trace, warn};
use uss::{AreaOfInterest, FlightPlanResponse, UssError};

use super::{
    ACCEPTED_MESSAGE, PendingSubmission, SubmitError, ToolKind, VolumeTool, remove_entity,
    swap_entity,
};
use crate::annotations::{Annotations, height_text, readout_label};
use crate::geo::{self, GeoPoint};
use crate::input::InputEvent;
use crate::notice::NoticeBus;
use crate::volume::{CylinderVolume, VolumeState, cylinder_primitive};

pub const DEFAULT_RADIUS: f64 = 50.0;
pub const WHEEL_STEP: f64 = 1.0;
pub const MIN_RADIUS: f64 = 1.0;
/// Length of the invisible cylinder the pointer is picked against.
pub const GUIDE_LENGTH: f64 = 120.0;
/// The guide is slightly wider than the draft so its wall stays pickable.
pub const GUIDE_MARGIN: f64 = 1.0;

const MARKER_PIXELS: f32 = 10.0;
const GUIDE_ALPHA: f32 = 0.01;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CylinderPhase {
    Idle,
    PlacingBase,
    SettingHeight,
}

#[derive(Debug)]
struct CylinderDraft {
    ground: GeoPoint,
    radius: f64,
    ground_marker: Option<EntityId>,
    floating_marker: Option<EntityId>,
    guide: Option<EntityId>,
    cylinder: Option<EntityId>,
    label: Option<EntityId>,
}

impl CylinderDraft {
    fn redraw_guide(&mut self, scene: &mut dyn SceneEngine) {
        let guide = Primitive::Cylinder(CylinderShape {
            position: geo::to_ecef(self.ground),
            length: GUIDE_LENGTH,
            radius: self.radius + GUIDE_MARGIN,
            fill: Color::YELLOW.with_alpha(GUIDE_ALPHA),
            outline: None,
        });
        swap_entity(scene, &mut self.guide, guide);
    }

    fn redraw_cylinder(&mut self, scene: &mut dyn SceneEngine, height: f64) {
        let draft = cylinder_primitive(self.ground, self.radius, height, VolumeState::Draft.fill());
        swap_entity(scene, &mut self.cylinder, draft);
    }

    fn clear(&mut self, scene: &mut dyn SceneEngine) {
        for slot in [
            &mut self.ground_marker,
            &mut self.floating_marker,
            &mut self.guide,
            &mut self.cylinder,
            &mut self.label,
        ] {
            remove_entity(scene, slot);
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    PlacingBase(CylinderDraft),
    SettingHeight { draft: CylinderDraft, height: f64 },
}

fn marker(position: Ecef) -> Primitive {
    Primitive::Point(PointMarker {
        position,
        color: Color::RED,
        pixel_size: MARKER_PIXELS,
    })
}

/// Draws a cylinder in three gestures: click the ground for the center,
/// scroll for the radius, move along the guide for the height and click again
/// to commit.
#[derive(Debug)]
pub struct CylinderTool {
    active: bool,
    phase: Phase,
    volumes: Vec<CylinderVolume>,
    annotations: Annotations,
    in_flight: bool,
}

impl Default for CylinderTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CylinderTool {
    pub fn new() -> Self {
        Self {
            active: false,
            phase: Phase::Idle,
            volumes: Vec::new(),
            annotations: Annotations::new(),
            in_flight: false,
        }
    }

    pub fn phase(&self) -> CylinderPhase {
        match self.phase {
            Phase::Idle => CylinderPhase::Idle,
            Phase::PlacingBase(_) => CylinderPhase::PlacingBase,
            Phase::SettingHeight { .. } => CylinderPhase::SettingHeight,
        }
    }

    /// Radius of the draft, or the radius the next draft starts with.
    pub fn radius(&self) -> f64 {
        match &self.phase {
            Phase::Idle => DEFAULT_RADIUS,
            Phase::PlacingBase(d) | Phase::SettingHeight { draft: d, .. } => d.radius,
        }
    }

    /// Height picked so far for the draft.
    pub fn height(&self) -> Option<f64> {
        match self.phase {
            Phase::SettingHeight { height, .. } => Some(height),
            _ => None,
        }
    }

    pub fn volumes(&self) -> &[CylinderVolume] {
        &self.volumes
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    fn on_primary_click(&mut self, scene: &mut dyn SceneEngine, pos: ScreenPos) {
        match self.phase {
            Phase::Idle => self.start(scene, pos),
            Phase::PlacingBase(_) => trace!("cylinder height not set yet; click ignored"),
            Phase::SettingHeight { .. } => self.finish(scene),
        }
    }

    fn start(&mut self, scene: &mut dyn SceneEngine, pos: ScreenPos) {
        let Some(hit) = scene.pick_ground(pos) else {
            trace!(x = pos.x, y = pos.y, "no terrain under pointer");
            return;
        };

        let mut draft = CylinderDraft {
            ground: geo::from_ecef(hit),
            radius: DEFAULT_RADIUS,
            ground_marker: Some(scene.add_entity(marker(hit))),
            floating_marker: Some(scene.add_entity(marker(hit))),
            guide: None,
            cylinder: None,
            label: None,
        };
        draft.redraw_guide(scene);
        draft.redraw_cylinder(scene, 0.0);
        scene.set_wheel_zoom(false);

        debug!(
            lng = draft.ground.lon_deg(),
            lat = draft.ground.lat_deg(),
            "cylinder base placed"
        );
        self.phase = Phase::PlacingBase(draft);
    }

    fn on_wheel(&mut self, scene: &mut dyn SceneEngine, delta: f64) {
        if delta == 0.0 {
            return;
        }
        let (draft, height) = match &mut self.phase {
            Phase::Idle => return,
            Phase::PlacingBase(d) => (d, 0.0),
            Phase::SettingHeight { draft, height } => (draft, *height),
        };
        draft.radius = (draft.radius + delta.signum() * WHEEL_STEP).max(MIN_RADIUS);
        draft.redraw_guide(scene);
        draft.redraw_cylinder(scene, height);
    }

    fn on_pointer_move(&mut self, scene: &mut dyn SceneEngine, pos: ScreenPos) {
        let draft = match &self.phase {
            Phase::Idle => return,
            Phase::PlacingBase(d) | Phase::SettingHeight { draft: d, .. } => d,
        };
        let Some(hit) = scene.pick_entity(pos) else {
            return;
        };
        if Some(hit.entity) != draft.guide {
            return;
        }

        // The cylinder is centered on the ground point, so the picked offset
        // is half its length.
        let picked = geo::from_ecef(hit.position);
        let height = (2.0 * (picked.alt_m - draft.ground.alt_m)).max(0.0);

        let mut draft = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::PlacingBase(d) | Phase::SettingHeight { draft: d, .. } => d,
            Phase::Idle => return,
        };
        swap_entity(
            scene,
            &mut draft.label,
            readout_label(hit.position, height_text(height)),
        );
        draft.redraw_cylinder(scene, height);
        swap_entity(scene, &mut draft.floating_marker, marker(hit.position));
        self.phase = Phase::SettingHeight { draft, height };
    }

    fn finish(&mut self, scene: &mut dyn SceneEngine) {
        let (mut draft, height) = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::SettingHeight { draft, height } => (draft, height),
            other => {
                self.phase = other;
                return;
            }
        };

        let volume = CylinderVolume {
            center: draft.ground,
            radius: draft.radius,
            height,
            state: VolumeState::Draft,
            entity: draft.cylinder.take(),
        };
        draft.clear(scene);
        scene.set_wheel_zoom(true);

        info!(
            radius = volume.radius,
            height = volume.height,
            "cylinder committed"
        );
        self.volumes.push(volume);
    }

    fn annotate_height(&mut self, scene: &mut dyn SceneEngine, pos: ScreenPos) {
        if !scene.supports_pick_position() {
            return;
        }
        let Some(hit) = scene.pick_entity(pos) else {
            return;
        };
        let height = geo::from_ecef(hit.position).alt_m;
        self.annotations
            .add_readout(scene, hit.position, height_text(height));
    }

    fn discard_draft(&mut self, scene: &mut dyn SceneEngine) {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::PlacingBase(mut d) | Phase::SettingHeight { draft: mut d, .. } => {
                d.clear(scene);
                scene.set_wheel_zoom(true);
                debug!("cylinder draft discarded");
            }
        }
    }
}

fn redraw(scene: &mut dyn SceneEngine, volume: &mut CylinderVolume) {
    if volume.entity.is_some() {
        let primitive = volume.primitive();
        swap_entity(scene, &mut volume.entity, primitive);
    }
}

impl VolumeTool for CylinderTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Cylinder
    }

    fn active(&self) -> bool {
        self.active
    }

    fn activate(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        true
    }

    fn deactivate(&mut self, scene: &mut dyn SceneEngine) -> bool {
        if !self.active {
            return false;
        }
        self.discard_draft(scene);
        self.active = false;
        true
    }

    fn handle(&mut self, scene: &mut dyn SceneEngine, event: InputEvent) {
        if !self.active {
            return;
        }
        match event {
            InputEvent::PrimaryClick(pos) => self.on_primary_click(scene, pos),
            InputEvent::SecondaryClick(pos) => self.annotate_height(scene, pos),
            InputEvent::PointerMove(pos) => self.on_pointer_move(scene, pos),
            InputEvent::Wheel(delta) => self.on_wheel(scene, delta),
        }
    }

    fn has_draft(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    fn committed_len(&self) -> usize {
        self.volumes.len()
    }

    /// Submits the most recently committed cylinder.
    fn begin_submission(
        &mut self,
        scene: &mut dyn SceneEngine,
        window: &TimeWindow,
    ) -> Result<PendingSubmission, SubmitError> {
        if self.in_flight {
            return Err(SubmitError::InFlight);
        }
        let index = self
            .volumes
            .len()
            .checked_sub(1)
            .ok_or(SubmitError::NoVolumes)?;
        let volume = &mut self.volumes[index];

        let aoi = AreaOfInterest::new(volume.to_wire(), window);
        volume.state = VolumeState::Requested;
        redraw(scene, volume);
        self.in_flight = true;

        Ok(PendingSubmission {
            tool: ToolKind::Cylinder,
            aoi,
            index,
        })
    }

    fn complete_submission(
        &mut self,
        scene: &mut dyn SceneEngine,
        notices: &mut NoticeBus,
        pending: PendingSubmission,
        result: Result<FlightPlanResponse, UssError>,
    ) -> Result<(), SubmitError> {
        if pending.tool != ToolKind::Cylinder {
            return Err(SubmitError::WrongTool {
                expected: pending.tool,
            });
        }
        self.in_flight = false;
        let volume = self
            .volumes
            .get_mut(pending.index)
            .ok_or(SubmitError::NoVolumes)?;

        let verdict = match result {
            Ok(resp) if resp.status == 201 && resp.message == ACCEPTED_MESSAGE => Ok(resp),
            Ok(resp) => Err(SubmitError::UnexpectedResponse {
                status: resp.status,
            }),
            Err(err) => Err(SubmitError::rejected(err)),
        };

        match verdict {
            Ok(resp) => {
                volume.state = VolumeState::Accepted;
                redraw(scene, volume);
                info!(message = %resp.message, "cylinder accepted");
                Ok(())
            }
            Err(err) => {
                volume.state = VolumeState::Error;
                redraw(scene, volume);
                let message = err.to_string();
                self.annotations
                    .add_error(scene, geo::to_ecef(volume.center), &message);
                notices.alert(format!("Error: {message}"));
                warn!(error = %message, "cylinder submission failed");
                Err(err)
            }
        }
    }

    fn abort_submission(
        &mut self,
        scene: &mut dyn SceneEngine,
        pending: PendingSubmission,
    ) -> Result<(), SubmitError> {
        if pending.tool != ToolKind::Cylinder {
            return Err(SubmitError::WrongTool {
                expected: pending.tool,
            });
        }
        self.in_flight = false;
        if let Some(volume) = self.volumes.get_mut(pending.index) {
            if volume.state == VolumeState::Requested {
                volume.state = VolumeState::Draft;
                redraw(scene, volume);
            }
        }
        debug!(index = pending.index, "cylinder submission aborted");
        Ok(())
    }

    fn submission_in_flight(&self) -> bool {
        self.in_flight
    }

    fn tick(&mut self, scene: &mut dyn SceneEngine, now: Instant) {
        self.annotations.tick(scene, now);
    }
}
