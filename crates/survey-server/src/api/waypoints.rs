//! Mission waypoint endpoints.
//!
//! A mission's waypoints are always written as a whole set: a request either
//! replaces every stored waypoint or leaves the previous set untouched.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::plans::{bad_request, ApiError};
use crate::state::AppState;
use survey_core::{MissionWaypoints, Waypoint, WaypointInput};

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceWaypointsRequest {
    pub waypoints: Vec<WaypointInput>,
}

/// Validate a submitted set and return it ordered by sequence number.
///
/// Missing sequence numbers take the entry's 1-based position and missing
/// altitudes take `default_altitude_m`. Violations are reported per index.
pub fn validate_waypoints(
    inputs: &[WaypointInput],
    default_altitude_m: f64,
    max_waypoints: usize,
) -> Result<Vec<Waypoint>, Vec<Value>> {
    if inputs.is_empty() {
        return Err(vec![json!({
            "message": "Waypoints must be a non-empty array"
        })]);
    }
    if inputs.len() > max_waypoints {
        return Err(vec![json!({
            "message": format!(
                "{} waypoints exceed the limit of {}",
                inputs.len(),
                max_waypoints
            )
        })]);
    }

    let mut violations = Vec::new();
    let mut waypoints = Vec::with_capacity(inputs.len());

    for (idx, input) in inputs.iter().enumerate() {
        if !input.latitude.is_finite() || !(-90.0..=90.0).contains(&input.latitude) {
            violations.push(json!({
                "point_index": idx,
                "field": "latitude",
                "message": "Invalid latitude value"
            }));
        }
        if !input.longitude.is_finite() || !(-180.0..=180.0).contains(&input.longitude) {
            violations.push(json!({
                "point_index": idx,
                "field": "longitude",
                "message": "Invalid longitude value"
            }));
        }
        let altitude = input.altitude.unwrap_or(default_altitude_m);
        if !altitude.is_finite() || altitude < 0.0 {
            violations.push(json!({
                "point_index": idx,
                "field": "altitude",
                "message": "Invalid altitude value"
            }));
        }

        waypoints.push(Waypoint {
            sequence_number: input.sequence_number.unwrap_or(idx as u32 + 1),
            latitude: input.latitude,
            longitude: input.longitude,
            altitude,
        });
    }

    waypoints.sort_by_key(|waypoint| waypoint.sequence_number);
    let contiguous = waypoints
        .iter()
        .enumerate()
        .all(|(idx, waypoint)| waypoint.sequence_number as usize == idx + 1);
    if !contiguous {
        violations.push(json!({
            "field": "sequence_number",
            "message": format!(
                "Sequence numbers must run 1..{} without gaps or repeats",
                waypoints.len()
            )
        }));
    }

    if violations.is_empty() {
        Ok(waypoints)
    } else {
        Err(violations)
    }
}

/// Replace every waypoint of a mission.
pub async fn replace_waypoints(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<String>,
    Json(req): Json<ReplaceWaypointsRequest>,
) -> Result<Json<MissionWaypoints>, ApiError> {
    let config = state.config();
    let waypoints = validate_waypoints(
        &req.waypoints,
        config.default_altitude_m,
        config.max_waypoints,
    )
    .map_err(|violations| {
        tracing::debug!(
            "Rejected waypoint set for mission {} ({} violations)",
            mission_id,
            violations.len()
        );
        bad_request("Invalid waypoints", Value::Array(violations))
    })?;

    let mission = state.replace_waypoints(&mission_id, waypoints, None);
    tracing::info!(
        "Replaced waypoints for mission {} ({} points)",
        mission_id,
        mission.waypoints.len()
    );
    Ok(Json(mission))
}

/// Get a mission's waypoints in sequence order.
pub async fn get_waypoints(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<String>,
) -> Result<Json<MissionWaypoints>, StatusCode> {
    state
        .get_waypoints(&mission_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Delete all waypoints of a mission.
pub async fn delete_waypoints(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<String>,
) -> StatusCode {
    if state.remove_waypoints(&mission_id) {
        tracing::info!("Deleted waypoints for mission {}", mission_id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
