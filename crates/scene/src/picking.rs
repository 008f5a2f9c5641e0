use foundation::math::Ecef;

use crate::entity::EntityId;

/// Pointer position in window pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Entity under the pointer and the world point where it was hit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub position: Ecef,
}
