use std::collections::HashMap;

use foundation::math::{Ecef, Geodetic, geodetic_to_ecef};
use tracing::trace;

use crate::World;
use crate::components::Primitive;
use crate::engine::SceneEngine;
use crate::entity::EntityId;
use crate::picking::{PickHit, ScreenPos};

/// Containment slack for entity picks, in meters.
const PICK_TOLERANCE_M: f64 = 1e-3;

/// Scene without a renderer.
///
/// The terrain is flat at `terrain_height`. The pointer is resolved through
/// aim targets: each screen position maps to one world point, registered
/// ahead of time by a test or a replay script.
#[derive(Debug)]
pub struct HeadlessScene {
    world: World,
    terrain_height: f64,
    aims: HashMap<(i64, i64), Geodetic>,
    camera: Option<Geodetic>,
    wheel_zoom: bool,
    pick_position_supported: bool,
}

impl HeadlessScene {
    pub fn new(terrain_height: f64) -> Self {
        Self {
            world: World::new(),
            terrain_height,
            aims: HashMap::new(),
            camera: None,
            wheel_zoom: true,
            pick_position_supported: true,
        }
    }

    /// Points the screen position `pos` at `target`.
    pub fn aim(&mut self, pos: ScreenPos, target: Geodetic) {
        self.aims.insert(key(pos), target);
    }

    pub fn clear_aim(&mut self, pos: ScreenPos) {
        self.aims.remove(&key(pos));
    }

    pub fn set_camera(&mut self, camera: Geodetic) {
        self.camera = Some(camera);
    }

    pub fn set_pick_position_supported(&mut self, supported: bool) {
        self.pick_position_supported = supported;
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new(0.0)
    }
}

fn key(pos: ScreenPos) -> (i64, i64) {
    (pos.x.round() as i64, pos.y.round() as i64)
}

impl SceneEngine for HeadlessScene {
    fn pick_ground(&self, pos: ScreenPos) -> Option<Ecef> {
        let aim = self.aims.get(&key(pos))?;
        Some(geodetic_to_ecef(aim.with_alt(self.terrain_height)))
    }

    fn pick_entity(&self, pos: ScreenPos) -> Option<PickHit> {
        let aim = *self.aims.get(&key(pos))?;
        let hit = self
            .world
            .topmost_first()
            .into_iter()
            .find(|(_, primitive)| primitive.contains(aim, PICK_TOLERANCE_M))
            .map(|(entity, _)| PickHit {
                entity,
                position: geodetic_to_ecef(aim),
            });
        if hit.is_none() {
            trace!(x = pos.x, y = pos.y, "pick missed every entity");
        }
        hit
    }

    fn supports_pick_position(&self) -> bool {
        self.pick_position_supported
    }

    fn add_entity(&mut self, primitive: Primitive) -> EntityId {
        self.world.spawn(primitive)
    }

    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.world.despawn(entity)
    }

    fn set_wheel_zoom(&mut self, enabled: bool) {
        self.wheel_zoom = enabled;
    }

    fn wheel_zoom_enabled(&self) -> bool {
        self.wheel_zoom
    }

    fn camera_position(&self) -> Option<Geodetic> {
        self.camera
    }

    fn terrain_height(&self, _lat_rad: f64, _lon_rad: f64) -> Option<f64> {
        Some(self.terrain_height)
    }
}

#[cfg(test)]
mod tests {
    use super::HeadlessScene;
    use crate::components::{Color, CylinderShape, PointMarker, Primitive};
    use crate::engine::SceneEngine;
    use crate::picking::ScreenPos;
    use foundation::math::{Geodetic, ecef_to_geodetic, geodetic_to_ecef, offset_geodetic};

    fn site() -> Geodetic {
        Geodetic::from_degrees(-45.87, -23.21, 600.0)
    }

    fn cylinder(radius: f64, length: f64) -> Primitive {
        Primitive::Cylinder(CylinderShape {
            position: geodetic_to_ecef(site()),
            length,
            radius,
            fill: Color::YELLOW,
            outline: None,
        })
    }

    #[test]
    fn ground_pick_lands_on_terrain() {
        let mut scene = HeadlessScene::new(600.0);
        let pos = ScreenPos::new(10.0, 20.0);
        assert!(scene.pick_ground(pos).is_none());

        scene.aim(pos, site().with_alt(900.0));
        let ground = scene.pick_ground(pos).expect("aimed");
        assert!(ground.distance(geodetic_to_ecef(site())) < 1e-6);
        assert!((ecef_to_geodetic(ground).alt_m - 600.0).abs() < 1e-6);

        scene.clear_aim(pos);
        assert!(scene.pick_ground(pos).is_none());
    }

    #[test]
    fn entity_pick_prefers_latest_volume() {
        let mut scene = HeadlessScene::new(600.0);
        let pos = ScreenPos::new(1.0, 1.0);
        scene.aim(pos, offset_geodetic(site(), 10.0, 0.0, 20.0));

        let wide = scene.add_entity(cylinder(51.0, 120.0));
        let narrow = scene.add_entity(cylinder(50.0, 120.0));
        assert_eq!(scene.pick_entity(pos).map(|h| h.entity), Some(narrow));

        scene.remove_entity(narrow);
        assert_eq!(scene.pick_entity(pos).map(|h| h.entity), Some(wide));
    }

    #[test]
    fn markers_are_not_pickable() {
        let mut scene = HeadlessScene::new(600.0);
        let pos = ScreenPos::new(1.0, 1.0);
        scene.aim(pos, site());
        scene.add_entity(Primitive::Point(PointMarker {
            position: geodetic_to_ecef(site()),
            color: Color::RED,
            pixel_size: 10.0,
        }));
        assert!(scene.pick_entity(pos).is_none());
    }
}
