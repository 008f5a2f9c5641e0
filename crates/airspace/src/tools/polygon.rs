use std::mem;
use std::time::Instant;

use foundation::time::TimeWindow;
use scene::SceneEngine;
use scene::components::{Color, PolygonShape, Primitive};
use scene::entity::EntityId;
use scene::picking::ScreenPos;
use tracing::{debug, info, trace, warn};
use uss::{AreaOfInterest, FlightPlanResponse, UssError};

use super::{PendingSubmission, SubmitError, ToolKind, VolumeTool, remove_entity, swap_entity};
use crate::annotations::{Annotations, height_text, readout_label};
use crate::geo::{self, GeoPoint};
use crate::input::InputEvent;
use crate::notice::NoticeBus;
use crate::volume::{PolygonVolume, VolumeState, extruded_primitive};

pub const DEFAULT_HEIGHT: f64 = 50.0;
/// Height of the invisible extrusion the pointer is picked against.
pub const GUIDE_HEIGHT: f64 = 120.0;
pub const MIN_VERTICES: usize = 3;
pub const TOO_FEW_VERTICES: &str = "At least 3 points are required to form a polygon.";

const GUIDE_ALPHA: f32 = 0.01;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PolygonPhase {
    Idle,
    DrawingBase,
    SettingHeight,
}

#[derive(Debug)]
struct PolygonDraft {
    base: Vec<GeoPoint>,
    height: f64,
    footprint: Option<EntityId>,
    guide: Option<EntityId>,
    label: Option<EntityId>,
}

impl PolygonDraft {
    fn new(first: GeoPoint) -> Self {
        Self {
            base: vec![first],
            height: DEFAULT_HEIGHT,
            footprint: None,
            guide: None,
            label: None,
        }
    }

    fn min_height(&self) -> f64 {
        geo::min_height(&self.base)
    }

    /// Flat footprint through the base, plus `cursor` when previewing.
    fn redraw_flat(&mut self, scene: &mut dyn SceneEngine, cursor: Option<GeoPoint>) {
        let vertices = self
            .base
            .iter()
            .copied()
            .chain(cursor)
            .map(geo::to_ecef)
            .collect();
        let flat = PolygonShape::flat(vertices, VolumeState::Draft.fill()).with_outline(Color::BLACK, 1.0);
        swap_entity(scene, &mut self.footprint, Primitive::Polygon(flat));
    }

    fn redraw_extruded(&mut self, scene: &mut dyn SceneEngine) {
        let solid = extruded_primitive(&self.base, self.height, VolumeState::Draft.fill());
        swap_entity(scene, &mut self.footprint, solid);
    }

    fn draw_guide(&mut self, scene: &mut dyn SceneEngine) {
        let bottom = self.min_height();
        let guide = PolygonShape::extruded(
            self.base.iter().copied().map(geo::to_ecef).collect(),
            bottom,
            bottom + GUIDE_HEIGHT,
            Color::GREY.with_alpha(GUIDE_ALPHA),
        );
        swap_entity(scene, &mut self.guide, Primitive::Polygon(guide));
    }

    fn clear(&mut self, scene: &mut dyn SceneEngine) {
        for slot in [&mut self.footprint, &mut self.guide, &mut self.label] {
            remove_entity(scene, slot);
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    DrawingBase(PolygonDraft),
    SettingHeight(PolygonDraft),
}

/// Draws an extruded polygon: click the vertices, secondary-click to close
/// the footprint, move along the guide for the height and click to commit.
#[derive(Debug)]
pub struct PolygonTool {
    active: bool,
    phase: Phase,
    regions: Vec<PolygonVolume>,
    annotations: Annotations,
    in_flight: bool,
}

impl Default for PolygonTool {
    fn default() -> Self {
        Self::new()
    }
}

impl PolygonTool {
    pub fn new() -> Self {
        Self {
            active: false,
            phase: Phase::Idle,
            regions: Vec::new(),
            annotations: Annotations::new(),
            in_flight: false,
        }
    }

    pub fn phase(&self) -> PolygonPhase {
        match self.phase {
            Phase::Idle => PolygonPhase::Idle,
            Phase::DrawingBase(_) => PolygonPhase::DrawingBase,
            Phase::SettingHeight(_) => PolygonPhase::SettingHeight,
        }
    }

    /// Vertices of the draft footprint.
    pub fn draft_base(&self) -> &[GeoPoint] {
        match &self.phase {
            Phase::Idle => &[],
            Phase::DrawingBase(d) | Phase::SettingHeight(d) => &d.base,
        }
    }

    pub fn draft_height(&self) -> Option<f64> {
        match &self.phase {
            Phase::Idle => None,
            Phase::DrawingBase(d) | Phase::SettingHeight(d) => Some(d.height),
        }
    }

    pub fn regions(&self) -> &[PolygonVolume] {
        &self.regions
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    fn on_primary_click(&mut self, scene: &mut dyn SceneEngine, pos: ScreenPos) {
        match &mut self.phase {
            Phase::Idle => {
                let Some(point) = ground(scene, pos) else {
                    return;
                };
                debug!(lng = point.lon_deg(), lat = point.lat_deg(), "polygon started");
                self.phase = Phase::DrawingBase(PolygonDraft::new(point));
            }
            Phase::DrawingBase(draft) => {
                let Some(point) = ground(scene, pos) else {
                    return;
                };
                draft.base.push(point);
                draft.redraw_flat(scene, None);
            }
            Phase::SettingHeight(_) => self.finish(scene),
        }
    }

    fn close_base(&mut self, scene: &mut dyn SceneEngine) {
        let draft = match &mut self.phase {
            Phase::DrawingBase(d) => d,
            _ => return,
        };
        if draft.base.len() < MIN_VERTICES {
            if let Some(center) = geo::centroid(&draft.base) {
                self.annotations
                    .add_error(scene, geo::to_ecef(center), TOO_FEW_VERTICES);
            }
            debug!(vertices = draft.base.len(), "polygon close rejected");
            return;
        }

        let Phase::DrawingBase(mut draft) = mem::replace(&mut self.phase, Phase::Idle) else {
            return;
        };
        draft.redraw_extruded(scene);
        draft.draw_guide(scene);
        debug!(vertices = draft.base.len(), "polygon footprint closed");
        self.phase = Phase::SettingHeight(draft);
    }

    fn on_pointer_move(&mut self, scene: &mut dyn SceneEngine, pos: ScreenPos) {
        match &mut self.phase {
            Phase::Idle => {}
            Phase::DrawingBase(draft) => {
                if let Some(cursor) = ground(scene, pos) {
                    draft.redraw_flat(scene, Some(cursor));
                }
            }
            Phase::SettingHeight(draft) => {
                let Some(hit) = scene.pick_entity(pos) else {
                    return;
                };
                if Some(hit.entity) != draft.guide && Some(hit.entity) != draft.footprint {
                    return;
                }
                let picked = geo::from_ecef(hit.position);
                draft.height = (picked.alt_m - draft.min_height()).max(0.0);
                swap_entity(
                    scene,
                    &mut draft.label,
                    readout_label(hit.position, height_text(draft.height)),
                );
                draft.redraw_extruded(scene);
            }
        }
    }

    fn finish(&mut self, scene: &mut dyn SceneEngine) {
        let mut draft = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::SettingHeight(d) => d,
            other => {
                self.phase = other;
                return;
            }
        };
        if draft.base.len() < MIN_VERTICES {
            if let Some(center) = geo::centroid(&draft.base) {
                self.annotations
                    .add_error(scene, geo::to_ecef(center), TOO_FEW_VERTICES);
            }
            self.phase = Phase::SettingHeight(draft);
            return;
        }

        let entity = draft.footprint.take();
        draft.clear(scene);
        let volume = PolygonVolume {
            base: mem::take(&mut draft.base),
            height: draft.height,
            state: VolumeState::Draft,
            entity,
        };
        info!(
            vertices = volume.base.len(),
            height = volume.height,
            "polygon committed"
        );
        self.regions.push(volume);
    }

    fn discard_draft(&mut self, scene: &mut dyn SceneEngine) {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::DrawingBase(mut d) | Phase::SettingHeight(mut d) => {
                d.clear(scene);
                debug!("polygon draft discarded");
            }
        }
    }
}

fn ground(scene: &dyn SceneEngine, pos: ScreenPos) -> Option<GeoPoint> {
    let hit = scene.pick_ground(pos);
    if hit.is_none() {
        trace!(x = pos.x, y = pos.y, "no terrain under pointer");
    }
    hit.map(geo::from_ecef)
}

fn redraw(scene: &mut dyn SceneEngine, volume: &mut PolygonVolume) {
    if volume.entity.is_some() {
        let primitive = volume.primitive();
        swap_entity(scene, &mut volume.entity, primitive);
    }
}

impl VolumeTool for PolygonTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Polygon
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
            InputEvent::SecondaryClick(_) => self.close_base(scene),
            InputEvent::PointerMove(pos) => self.on_pointer_move(scene, pos),
            InputEvent::Wheel(_) => {}
        }
    }

    fn has_draft(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    fn committed_len(&self) -> usize {
        self.regions.len()
    }

    /// Submits the first committed polygon still in draft.
    fn begin_submission(
        &mut self,
        scene: &mut dyn SceneEngine,
        window: &TimeWindow,
    ) -> Result<PendingSubmission, SubmitError> {
        if self.in_flight {
            return Err(SubmitError::InFlight);
        }
        if self.regions.is_empty() {
            return Err(SubmitError::NoRegions);
        }
        let index = self
            .regions
            .iter()
            .position(|r| r.state == VolumeState::Draft)
            .ok_or(SubmitError::NoDraftVolume)?;
        let volume = &mut self.regions[index];

        let aoi = AreaOfInterest::new(volume.to_wire(), window);
        volume.state = VolumeState::Requested;
        redraw(scene, volume);
        self.in_flight = true;

        Ok(PendingSubmission {
            tool: ToolKind::Polygon,
            aoi,
            index,
        })
    }

    fn complete_submission(
        &mut self,
        scene: &mut dyn SceneEngine,
        _notices: &mut NoticeBus,
        pending: PendingSubmission,
        result: Result<FlightPlanResponse, UssError>,
    ) -> Result<(), SubmitError> {
        if pending.tool != ToolKind::Polygon {
            return Err(SubmitError::WrongTool {
                expected: pending.tool,
            });
        }
        self.in_flight = false;
        let volume = self
            .regions
            .get_mut(pending.index)
            .ok_or(SubmitError::NoRegions)?;

        match result {
            Ok(resp) => {
                volume.state = VolumeState::Accepted;
                redraw(scene, volume);
                info!(message = %resp.message, "polygon accepted");
                Ok(())
            }
            Err(err) => {
                volume.state = VolumeState::Error;
                redraw(scene, volume);
                let err = SubmitError::rejected(err);
                let message = err.to_string();
                if let Some(center) = geo::centroid(&volume.base) {
                    self.annotations
                        .add_error(scene, geo::to_ecef(center), &message);
                }
                warn!(error = %message, "polygon submission failed");
                Err(err)
            }
        }
    }

    fn abort_submission(
        &mut self,
        scene: &mut dyn SceneEngine,
        pending: PendingSubmission,
    ) -> Result<(), SubmitError> {
        if pending.tool != ToolKind::Polygon {
            return Err(SubmitError::WrongTool {
                expected: pending.tool,
            });
        }
        self.in_flight = false;
        if let Some(volume) = self.regions.get_mut(pending.index) {
            if volume.state == VolumeState::Requested {
                volume.state = VolumeState::Draft;
                redraw(scene, volume);
            }
        }
        debug!(index = pending.index, "polygon submission aborted");
        Ok(())
    }

    fn submission_in_flight(&self) -> bool {
        self.in_flight
    }

    fn tick(&mut self, scene: &mut dyn SceneEngine, now: Instant) {
        self.annotations.tick(scene, now);
    }
}
