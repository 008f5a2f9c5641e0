use foundation::math::{Ecef, Geodetic};

use crate::components::Primitive;
use crate::entity::EntityId;
use crate::picking::{PickHit, ScreenPos};

/// Capabilities the airspace tools need from a 3-D globe renderer.
pub trait SceneEngine {
    /// World point on the terrain under the pointer.
    fn pick_ground(&self, pos: ScreenPos) -> Option<Ecef>;

    /// Topmost entity under the pointer, with the hit point on its surface.
    fn pick_entity(&self, pos: ScreenPos) -> Option<PickHit>;

    /// Whether `pick_entity` reports meaningful positions.
    fn supports_pick_position(&self) -> bool;

    fn add_entity(&mut self, primitive: Primitive) -> EntityId;

    /// Returns `false` when the entity was already gone.
    fn remove_entity(&mut self, entity: EntityId) -> bool;

    fn set_wheel_zoom(&mut self, enabled: bool);
    fn wheel_zoom_enabled(&self) -> bool;

    fn camera_position(&self) -> Option<Geodetic>;

    /// Terrain height in meters at the given position (radians).
    fn terrain_height(&self, lat_rad: f64, lon_rad: f64) -> Option<f64>;
}
