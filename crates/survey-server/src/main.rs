//! Survey Server - coverage planning and mission waypoint storage

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use survey_server::{api, config::Config, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("survey_server=debug".parse()?)
            .add_directive("survey_core=info".parse()?))
        .init();

    tracing::info!("Starting Survey Server...");

    let config = Config::from_env();
    let port = config.server_port;
    tracing::info!(
        default_altitude_m = config.default_altitude_m,
        max_waypoints = config.max_waypoints,
        "Loaded configuration"
    );
    let state = Arc::new(AppState::new(config.clone()));

    // Build the app
    let app = api::routes(&config)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
