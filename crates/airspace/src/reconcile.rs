//! Foreign volumes returned by a conflict query, drawn read-only.

use scene::SceneEngine;
use scene::components::{Color, CylinderShape, PolygonShape, Primitive};
use scene::entity::EntityId;
use tracing::debug;
use uss::{AreaOfInterest, Outline, QueryConflictsResponse, ShapeKind};

use crate::geo;
use crate::volume::{VOLUME_ALPHA, VolumeState};

#[derive(Debug, Clone, PartialEq)]
pub struct ConflictRegion {
    pub entity: EntityId,
    pub kind: ShapeKind,
    pub lower: f64,
    pub upper: f64,
    /// Always `Error`: foreign volumes are obstacles.
    pub state: VolumeState,
}

#[derive(Debug, Default)]
pub struct ConflictLayer {
    regions: Vec<ConflictRegion>,
}

impl ConflictLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every drawn region with the volumes in `response`.
    pub fn redraw(&mut self, scene: &mut dyn SceneEngine, response: &QueryConflictsResponse) {
        self.clear(scene);
        for aoi in response.foreign_volumes() {
            let region = draw_region(scene, aoi);
            self.regions.push(region);
        }
        debug!(regions = self.regions.len(), "conflict regions redrawn");
    }

    pub fn clear(&mut self, scene: &mut dyn SceneEngine) {
        for region in self.regions.drain(..) {
            scene.remove_entity(region.entity);
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> &[ConflictRegion] {
        &self.regions
    }
}

fn draw_region(scene: &mut dyn SceneEngine, aoi: &AreaOfInterest) -> ConflictRegion {
    let lower = aoi.volume.altitude_lower.value;
    let upper = aoi.volume.altitude_upper.value;
    let fill = Color::GREY.with_alpha(VOLUME_ALPHA);

    let primitive = match &aoi.volume.outline {
        Outline::Circle(circle) => Primitive::Cylinder(CylinderShape {
            position: geo::to_ecef(geo::from_lng_lat(circle.center, (lower + upper) * 0.5)),
            length: upper - lower,
            radius: circle.radius.value,
            fill,
            outline: Some(Color::RED),
        }),
        Outline::Polygon(polygon) => Primitive::Polygon(
            PolygonShape::extruded(
                polygon
                    .vertices
                    .iter()
                    .map(|v| geo::to_ecef(geo::from_lng_lat(*v, lower)))
                    .collect(),
                lower,
                upper,
                fill,
            )
            .with_outline(Color::RED, 1.0),
        ),
    };

    ConflictRegion {
        entity: scene.add_entity(primitive),
        kind: aoi.volume.shape_kind(),
        lower,
        upper,
        state: VolumeState::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::ConflictLayer;
    use crate::fixtures::{scene, window};
    use pretty_assertions::assert_eq;
    use scene::components::{Color, PrimitiveKind};
    use uss::{AreaOfInterest, ConflictData, LngLat, QueryConflictsResponse, Volume};

    fn circle(lng: f64) -> AreaOfInterest {
        AreaOfInterest::new(
            Volume::circle(LngLat { lng, lat: -23.2 }, 30.0, 600.0, 700.0),
            &window(),
        )
    }

    fn triangle() -> AreaOfInterest {
        AreaOfInterest::new(
            Volume::polygon(
                vec![
                    LngLat { lng: -45.87, lat: -23.21 },
                    LngLat { lng: -45.86, lat: -23.21 },
                    LngLat { lng: -45.87, lat: -23.20 },
                ],
                610.0,
                730.0,
            ),
            &window(),
        )
    }

    fn response(constraints: Vec<AreaOfInterest>, intents: Vec<AreaOfInterest>) -> QueryConflictsResponse {
        QueryConflictsResponse {
            status: 200,
            message: "ok".to_string(),
            data: ConflictData {
                constraints,
                operational_intents: intents,
            },
        }
    }

    #[test]
    fn second_redraw_replaces_first() {
        let mut scene = scene();
        let mut layer = ConflictLayer::new();

        layer.redraw(&mut scene, &response(vec![circle(-45.87), triangle()], vec![circle(-45.86)]));
        assert_eq!(layer.len(), 3);

        let second = response(vec![], vec![triangle()]);
        layer.redraw(&mut scene, &second);
        assert_eq!(
            layer.len(),
            second.data.constraints.len() + second.data.operational_intents.len()
        );
        assert_eq!(scene.world().len(), 1);
        assert_eq!(scene.world().count_by_kind(PrimitiveKind::Polygon), 1);
    }

    #[test]
    fn regions_are_grey_with_red_outline_between_altitudes() {
        let mut scene = scene();
        let mut layer = ConflictLayer::new();
        layer.redraw(&mut scene, &response(vec![circle(-45.87)], vec![]));

        let region = &layer.regions()[0];
        let shape = scene
            .world()
            .get(region.entity)
            .and_then(|p| p.as_cylinder().copied())
            .expect("cylinder");
        assert!(shape.fill.same_hue(Color::GREY));
        assert_eq!(shape.outline, Some(Color::RED));
        assert_eq!(shape.length, 100.0);
        let (bottom, top) = shape.altitude_band();
        assert!((bottom - 600.0).abs() < 1e-6);
        assert!((top - 700.0).abs() < 1e-6);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut scene = scene();
        let mut layer = ConflictLayer::new();
        layer.clear(&mut scene);
        layer.redraw(&mut scene, &response(vec![triangle()], vec![]));
        layer.clear(&mut scene);
        layer.clear(&mut scene);
        assert!(layer.is_empty());
        assert!(scene.world().is_empty());
    }
}
