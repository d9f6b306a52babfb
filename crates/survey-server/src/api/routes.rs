//! REST API routes.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{plans, request_id, waypoints};
use crate::config::Config;
use crate::state::AppState;

/// Rough JSON size of one waypoint, used to bound request bodies.
const BYTES_PER_WAYPOINT: usize = 256;

/// Create the API router.
pub fn create_router(config: &Config) -> Router<Arc<AppState>> {
    let body_limit = config.max_waypoints.saturating_mul(BYTES_PER_WAYPOINT).max(2 * 1024 * 1024);

    let plan_routes = Router::new()
        .route("/v1/plans", post(plans::create_plan))
        .route("/v1/missions/:mission_id/plan", post(plans::plan_mission));

    let waypoint_routes = Router::new().route(
        "/v1/missions/:mission_id/waypoints",
        get(waypoints::get_waypoints)
            .put(waypoints::replace_waypoints)
            .delete(waypoints::delete_waypoints),
    );

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(plan_routes)
        .merge(waypoint_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(request_id::ensure_request_id))
}
