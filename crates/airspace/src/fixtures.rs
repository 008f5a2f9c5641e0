//! Shared test scaffolding: a headless scene over flat terrain near São José
//! dos Campos, where every screen position is aimed explicitly.

use foundation::math::offset_geodetic;
use foundation::time::TimeWindow;
use scene::HeadlessScene;
use scene::picking::ScreenPos;
use serde_json::json;
use uss::{FlightPlanResponse, UssError};

use crate::geo::GeoPoint;

pub const GROUND_M: f64 = 600.0;

pub fn site() -> GeoPoint {
    GeoPoint::from_degrees(-45.873938, -23.212619, GROUND_M)
}

pub fn scene() -> HeadlessScene {
    HeadlessScene::new(GROUND_M)
}

/// Aims screen column `x` at the point `east`/`north`/`up` meters from the site.
pub fn aim(scene: &mut HeadlessScene, x: f64, east: f64, north: f64, up: f64) -> ScreenPos {
    let pos = ScreenPos::new(x, 0.0);
    scene.aim(pos, offset_geodetic(site(), east, north, up));
    pos
}

/// A screen position nothing is aimed at.
pub fn nowhere() -> ScreenPos {
    ScreenPos::new(-1.0, -1.0)
}

pub fn window() -> TimeWindow {
    TimeWindow::parse("2025-03-01T10:00:00Z", "2025-03-01T11:00:00Z").expect("valid window")
}

pub fn accepted() -> Result<FlightPlanResponse, UssError> {
    Ok(FlightPlanResponse {
        status: 201,
        message: crate::tools::ACCEPTED_MESSAGE.to_string(),
        data: json!({}),
    })
}

pub fn conflict(message: &str) -> Result<FlightPlanResponse, UssError> {
    Err(UssError::UnexpectedStatus {
        expected: 201,
        status: 409,
        payload: Some(json!({ "detail": { "message": message } })),
    })
}

pub fn label_texts(scene: &HeadlessScene) -> Vec<String> {
    scene
        .world()
        .iter()
        .filter_map(|(_, p)| p.as_label().map(|l| l.text.clone()))
        .collect()
}
