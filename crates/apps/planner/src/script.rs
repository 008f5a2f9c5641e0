use std::path::Path;

use airspace::notice::Notice;
use airspace::{InputEvent, MapController, ToolKind};
use foundation::math::Geodetic;
use foundation::time::TimeWindow;
use scene::HeadlessScene;
use scene::picking::ScreenPos;
use serde::Deserialize;
use tracing::{info, warn};

/// A recorded pointer session replayed against a headless scene.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub terrain_height: f64,
    #[serde(default)]
    pub camera: Option<Position>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Copy, Clone, Deserialize)]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
    #[serde(default)]
    pub alt: f64,
}

impl Position {
    fn geodetic(self) -> Geodetic {
        Geodetic::from_degrees(self.lng, self.lat, self.alt)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    Select,
    Cylinder,
    Polygon,
}

impl From<ToolName> for ToolKind {
    fn from(name: ToolName) -> Self {
        match name {
            ToolName::Select => ToolKind::Select,
            ToolName::Cylinder => ToolKind::Cylinder,
            ToolName::Polygon => ToolKind::Polygon,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Tool { tool: ToolName },
    Camera { lng: f64, lat: f64, alt: f64 },
    /// Binds a screen position to the world point the pointer would hit there.
    Aim { x: f64, y: f64, lng: f64, lat: f64, alt: f64 },
    Click { x: f64, y: f64 },
    RightClick { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Wheel { delta: f64 },
    Submit,
    Query,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn scene(&self) -> HeadlessScene {
        let mut scene = HeadlessScene::new(self.terrain_height);
        if let Some(camera) = self.camera {
            scene.set_camera(camera.geodetic());
        }
        scene
    }
}

/// What a replay left behind.
#[derive(Debug, Default)]
pub struct Outcome {
    pub steps: usize,
    pub submissions: usize,
    pub rejected: usize,
    pub notices: Vec<Notice>,
}

/// Feeds every step to the controller. Failed submissions and queries are
/// logged and the replay carries on, as an operator would.
pub async fn replay(
    controller: &mut MapController<HeadlessScene>,
    steps: &[Step],
    window: &TimeWindow,
) -> Outcome {
    let mut outcome = Outcome::default();
    for step in steps {
        match step {
            Step::Tool { tool } => controller.select_tool((*tool).into()),
            Step::Camera { lng, lat, alt } => controller
                .scene_mut()
                .set_camera(Geodetic::from_degrees(*lng, *lat, *alt)),
            Step::Aim { x, y, lng, lat, alt } => controller
                .scene_mut()
                .aim(ScreenPos::new(*x, *y), Geodetic::from_degrees(*lng, *lat, *alt)),
            Step::Click { x, y } => {
                controller.handle(InputEvent::PrimaryClick(ScreenPos::new(*x, *y)))
            }
            Step::RightClick { x, y } => {
                controller.handle(InputEvent::SecondaryClick(ScreenPos::new(*x, *y)))
            }
            Step::Move { x, y } => {
                controller.handle(InputEvent::PointerMove(ScreenPos::new(*x, *y)))
            }
            Step::Wheel { delta } => controller.handle(InputEvent::Wheel(*delta)),
            Step::Submit => {
                outcome.submissions += 1;
                if let Err(err) = controller.submit(window).await {
                    warn!(error = %err, "submission failed");
                    outcome.rejected += 1;
                }
            }
            Step::Query => match controller.query_conflicts(window).await {
                Ok(count) => info!(count, "conflicts drawn"),
                Err(err) => warn!(error = %err, "conflict query failed"),
            },
        }
        outcome.steps += 1;
    }
    outcome.notices = controller.drain_notices();
    outcome
}
