mod script;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use airspace::MapController;
use airspace::notice::NoticeKind;
use airspace::reconcile::ConflictRegion;
use clap::{Parser, Subcommand};
use foundation::math::Geodetic;
use foundation::time::{TimeWindow, TimeWindowError};
use scene::HeadlessScene;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uss::{ConflictService, SubmitEndpoint, UssClient, UssConfig};

use crate::script::Script;

#[derive(Parser, Debug)]
#[command(author, version, about = "Airspace volume planner backed by a USS")]
struct Args {
    /// USS base URL (default: $USS_BASE_URL or http://localhost:8000)
    #[arg(long)]
    base_url: Option<String>,

    /// Submission route: plain or with_conflict
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded pointer session and submit what it draws
    Run {
        /// JSON session file
        #[arg(long)]
        script: PathBuf,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Draw the foreign volumes around a camera position
    Query {
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Terrain height under the camera (meters)
        #[arg(long, default_value_t = 0.0)]
        ground: f64,

        #[command(flatten)]
        window: WindowArgs,
    },
}

#[derive(clap::Args, Debug)]
struct WindowArgs {
    /// RFC 3339 start of the time window
    #[arg(long, requires = "end")]
    start: Option<String>,

    /// RFC 3339 end of the time window
    #[arg(long, requires = "start")]
    end: Option<String>,

    /// Window length from now when no explicit bounds are given
    #[arg(long, default_value_t = 60)]
    minutes: i64,
}

impl WindowArgs {
    fn resolve(&self) -> Result<TimeWindow, TimeWindowError> {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => TimeWindow::parse(start, end),
            _ => TimeWindow::starting_now(self.minutes),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = UssConfig::from_env();
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(endpoint) = args.endpoint.as_deref() {
        let endpoint = SubmitEndpoint::parse(endpoint).ok_or_else(|| {
            format!("unknown endpoint {endpoint:?}; expected plain or with_conflict")
        })?;
        config = config.with_submit_endpoint(endpoint);
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    let service: Arc<dyn ConflictService> = Arc::new(UssClient::new(&config)?);
    info!(
        base_url = %config.base_url,
        endpoint = config.submit_endpoint.path(),
        "USS configured"
    );

    match args.command {
        Command::Run { script, window } => {
            let window = window.resolve()?;
            let script = Script::load(&script)?;
            let mut controller = MapController::new(script.scene(), service);

            let outcome = script::replay(&mut controller, &script.steps, &window).await;

            println!(
                "replayed {} steps, {} submissions ({} rejected)",
                outcome.steps, outcome.submissions, outcome.rejected
            );
            for volume in controller.cylinder().volumes() {
                println!(
                    "cylinder\t{:?}\tlng={:.6} lat={:.6} radius={:.2} height={:.2}",
                    volume.state,
                    volume.center.lon_deg(),
                    volume.center.lat_deg(),
                    volume.radius,
                    volume.height
                );
            }
            for region in controller.polygon().regions() {
                println!(
                    "polygon\t{:?}\tvertices={} height={:.2}",
                    region.state,
                    region.base.len(),
                    region.height
                );
            }
            print_conflicts(controller.conflicts().regions());
            for notice in outcome.notices {
                let tag = match notice.kind {
                    NoticeKind::Alert => "alert",
                    NoticeKind::Info => "info",
                };
                println!("{tag}: {}", notice.message);
            }
        }
        Command::Query {
            lng,
            lat,
            ground,
            window,
        } => {
            let window = window.resolve()?;
            let mut scene = HeadlessScene::new(ground);
            scene.set_camera(Geodetic::from_degrees(lng, lat, ground));
            let mut controller = MapController::new(scene, service);

            let count = controller.query_conflicts(&window).await?;
            println!("{count} conflicting volumes");
            print_conflicts(controller.conflicts().regions());
        }
    }

    Ok(())
}

fn print_conflicts(regions: &[ConflictRegion]) {
    for region in regions {
        println!(
            "conflict\t{:?}\t{:.2}..{:.2} m",
            region.kind, region.lower, region.upper
        );
    }
}
