use tracing_subscriber::EnvFilter;

use transit_planner::planner::{PlannerConfig, RoutePlanner};
use transit_planner::snapshot::PlanningInput;
use transit_planner::walking::{
    DistanceMatrixClient, DistanceMatrixConfig, WalkCacheConfig, WalkTimes,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: transit-planner <planning-input.json>");
        std::process::exit(2);
    });

    // Without a key every walk is a straight-line estimate
    let api_key = std::env::var("GOOGLE_MAPS_API_KEY").ok();
    if api_key.is_none() {
        tracing::warn!("GOOGLE_MAPS_API_KEY not set, walking times will be estimated");
    }

    let input = PlanningInput::from_path(&path).expect("Failed to load planning input");
    let parts = input.into_parts(PlannerConfig::default());

    let client = DistanceMatrixClient::new(DistanceMatrixConfig::new(api_key))
        .expect("Failed to create Distance Matrix client");
    let walks = WalkTimes::new(
        client,
        parts.config.walking_speed_mps,
        &WalkCacheConfig::default(),
    );

    let planner = RoutePlanner::new(&parts.timetable, &walks, &parts.config);
    let plans = planner.plan_all(&parts.request, &parts.events).await;

    let json = serde_json::to_string_pretty(&plans).expect("Failed to serialize plans");
    println!("{json}");
}
