//! API routes for the survey server.

pub mod plans;
pub mod request_id;
mod routes;
pub mod waypoints;

use crate::config::Config;
use axum::Router;

pub fn routes(config: &Config) -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router(config)
}
