use scene::components::{Color, CylinderShape, PolygonShape, Primitive};
use scene::entity::EntityId;
use uss::Volume;

use crate::geo::{self, GeoPoint};

pub const VOLUME_ALPHA: f32 = 0.5;
pub const OUTLINE_WIDTH: f32 = 5.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VolumeState {
    Draft,
    Accepted,
    Error,
    /// Submitted, verdict pending.
    Requested,
}

impl VolumeState {
    pub fn color(self) -> Color {
        match self {
            VolumeState::Draft => Color::YELLOW,
            VolumeState::Accepted => Color::GREEN,
            VolumeState::Error => Color::RED,
            VolumeState::Requested => Color::GREY,
        }
    }

    pub fn fill(self) -> Color {
        self.color().with_alpha(VOLUME_ALPHA)
    }
}

/// Vertical cylinder standing on `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderVolume {
    pub center: GeoPoint,
    pub radius: f64,
    pub height: f64,
    pub state: VolumeState,
    pub entity: Option<EntityId>,
}

impl CylinderVolume {
    pub fn primitive(&self) -> Primitive {
        cylinder_primitive(self.center, self.radius, self.height, self.state.fill())
    }

    pub fn to_wire(&self) -> Volume {
        Volume::circle(
            geo::to_lng_lat(self.center),
            self.radius,
            self.center.alt_m,
            self.center.alt_m + self.height,
        )
    }
}

/// Cylinder at `position` with length `height`, black outline.
pub fn cylinder_primitive(position: GeoPoint, radius: f64, height: f64, fill: Color) -> Primitive {
    Primitive::Cylinder(CylinderShape {
        position: geo::to_ecef(position),
        length: height,
        radius,
        fill,
        outline: Some(Color::BLACK),
    })
}

/// Footprint extruded upward from its lowest vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonVolume {
    pub base: Vec<GeoPoint>,
    pub height: f64,
    pub state: VolumeState,
    pub entity: Option<EntityId>,
}

impl PolygonVolume {
    pub fn min_height(&self) -> f64 {
        geo::min_height(&self.base)
    }

    pub fn primitive(&self) -> Primitive {
        extruded_primitive(&self.base, self.height, self.state.fill())
    }

    pub fn to_wire(&self) -> Volume {
        let lower = self.min_height();
        Volume::polygon(
            self.base.iter().copied().map(geo::to_lng_lat).collect(),
            lower,
            lower + self.height,
        )
    }
}

pub fn extruded_primitive(base: &[GeoPoint], height: f64, fill: Color) -> Primitive {
    let bottom = geo::min_height(base);
    Primitive::Polygon(
        PolygonShape::extruded(
            base.iter().copied().map(geo::to_ecef).collect(),
            bottom,
            bottom + height,
            fill,
        )
        .with_outline(Color::BLACK, OUTLINE_WIDTH),
    )
}
