//! Coverage planning endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;
use survey_core::{
    plan_named, Containment, CoveragePlan, FlightLine, MissionWaypoints, Pattern, PlanOptions,
    PlanOutcome, PlanSummary, SensorFootprint, Spacing, SurveyArea, Waypoint,
};

pub type ApiError = (StatusCode, Json<Value>);

pub(crate) fn bad_request(error: &str, details: Value) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": error, "details": details })),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    /// `[[lon, lat], ...]` or a GeoJSON Feature/Polygon. Absent means nothing drawn yet.
    #[serde(default)]
    pub area: Option<Value>,
    pub pattern: String,
    /// Line spacing in coordinate degrees
    pub spacing_deg: Option<f64>,
    /// Line spacing in meters on the ground
    pub spacing_m: Option<f64>,
    /// Derive spacing from camera swath and side overlap
    pub sensor: Option<SensorFootprint>,
    #[serde(default)]
    pub containment: Containment,
    pub flight_altitude_m: Option<f64>,
}

impl PlanRequest {
    /// At most one of `sensor`, `spacing_m` and `spacing_deg` may be given.
    pub fn options(&self) -> Result<PlanOptions, ApiError> {
        let given: Vec<&str> = [
            ("sensor", self.sensor.is_some()),
            ("spacing_m", self.spacing_m.is_some()),
            ("spacing_deg", self.spacing_deg.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();
        if given.len() > 1 {
            return Err(bad_request(
                "Conflicting spacing fields",
                json!({ "fields": given }),
            ));
        }

        let spacing = if let Some(sensor) = self.sensor {
            Spacing::Sensor(sensor)
        } else if let Some(value) = self.spacing_m {
            Spacing::Meters { value }
        } else {
            Spacing::from(self.spacing_deg)
        };
        Ok(PlanOptions {
            spacing,
            containment: self.containment,
        })
    }

    fn survey_area(&self) -> Result<Option<SurveyArea>, ApiError> {
        match &self.area {
            None | Some(Value::Null) => Ok(None),
            Some(value) => SurveyArea::from_geojson(value)
                .map(Some)
                .map_err(|err| bad_request("Invalid survey area", json!([err.to_string()]))),
        }
    }

    fn altitude(&self, default_altitude_m: f64) -> Result<f64, ApiError> {
        let altitude = self.flight_altitude_m.unwrap_or(default_altitude_m);
        if !altitude.is_finite() || altitude <= 0.0 {
            return Err(bad_request(
                "Invalid flight altitude value",
                json!({ "flight_altitude_m": altitude }),
            ));
        }
        Ok(altitude)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub ok: bool,
    pub outcome: PlanOutcome,
    pub pattern: Option<Pattern>,
    pub lines: Vec<FlightLine>,
    pub waypoints: Vec<Waypoint>,
    pub summary: Option<PlanSummary>,
    pub errors: Vec<String>,
}

impl PlanResponse {
    fn new(plan: CoveragePlan, altitude_m: f64, pattern_name: &str) -> Self {
        let waypoints = plan.waypoints(altitude_m);
        let errors = match plan.outcome {
            PlanOutcome::Planned => Vec::new(),
            PlanOutcome::UnknownPattern => vec![format!(
                "{}: '{}'",
                PlanOutcome::UnknownPattern.describe(),
                pattern_name
            )],
            outcome => vec![outcome.describe().to_string()],
        };
        Self {
            ok: plan.outcome.is_planned() && !plan.lines.is_empty(),
            outcome: plan.outcome,
            pattern: plan.pattern,
            lines: plan.lines,
            waypoints,
            summary: plan.summary,
            errors,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionPlanResponse {
    pub mission: MissionWaypoints,
    pub outcome: PlanOutcome,
    pub lines: Vec<FlightLine>,
    pub summary: Option<PlanSummary>,
}

fn run_plan(state: &AppState, req: &PlanRequest) -> Result<PlanResponse, ApiError> {
    let area = req.survey_area()?;
    let altitude = req.altitude(state.config().default_altitude_m)?;
    let options = req.options()?;
    let plan = plan_named(area.as_ref(), &req.pattern, &options);
    Ok(PlanResponse::new(plan, altitude, &req.pattern))
}

/// Plan coverage without storing anything.
///
/// An empty plan is still a 200: `ok` and `outcome` say why it is empty.
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let response = run_plan(&state, &req)?;
    tracing::debug!(
        pattern = %req.pattern,
        outcome = ?response.outcome,
        waypoints = response.waypoints.len(),
        "plan requested"
    );
    Ok(Json(response))
}

/// Plan coverage and store the resulting waypoints against a mission.
pub async fn plan_mission(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<String>,
    Json(req): Json<PlanRequest>,
) -> Result<(StatusCode, Json<MissionPlanResponse>), ApiError> {
    let response = run_plan(&state, &req)?;
    if !response.ok {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "Nothing to plan",
                "outcome": response.outcome,
                "details": response.errors,
            })),
        ));
    }

    let max = state.config().max_waypoints;
    if response.waypoints.len() > max {
        return Err(bad_request(
            "Plan exceeds the waypoint limit",
            json!({ "waypoints": response.waypoints.len(), "max_waypoints": max }),
        ));
    }

    let mission = state.replace_waypoints(&mission_id, response.waypoints, response.pattern);
    tracing::info!(
        "Stored {} planned waypoints for mission {}",
        mission.waypoints.len(),
        mission_id
    );

    Ok((
        StatusCode::CREATED,
        Json(MissionPlanResponse {
            mission,
            outcome: response.outcome,
            lines: response.lines,
            summary: response.summary,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Value) -> PlanRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn single_spacing_field_selects_the_mode() {
        let req = request(json!({
            "pattern": "grid",
            "sensor": { "altitude_m": 80.0, "fov_deg": 70.0, "overlap": 0.7 }
        }));
        assert!(matches!(req.options().unwrap().spacing, Spacing::Sensor(_)));

        let req = request(json!({ "pattern": "grid", "spacing_m": 40.0 }));
        assert_eq!(req.options().unwrap().spacing, Spacing::Meters { value: 40.0 });

        let req = request(json!({ "pattern": "grid", "spacing_deg": 0.001 }));
        assert_eq!(req.options().unwrap().spacing, Spacing::Degrees { value: 0.001 });

        let req = request(json!({ "pattern": "grid" }));
        assert_eq!(req.options().unwrap().spacing, Spacing::Auto);
    }

    #[test]
    fn conflicting_spacing_fields_are_rejected() {
        let req = request(json!({ "pattern": "grid", "spacing_deg": 0.001, "spacing_m": 40.0 }));
        let (status, Json(body)) = req.options().unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["fields"], json!(["spacing_m", "spacing_deg"]));

        let req = request(json!({
            "pattern": "grid",
            "spacing_m": 40.0,
            "sensor": { "altitude_m": 80.0, "fov_deg": 70.0, "overlap": 0.7 }
        }));
        assert!(req.options().is_err());
    }

    #[test]
    fn containment_defaults_to_clip() {
        let req = request(json!({ "pattern": "grid" }));
        assert_eq!(req.containment, Containment::Clip);
        let req = request(json!({ "pattern": "grid", "containment": "bounding_box" }));
        assert_eq!(req.containment, Containment::BoundingBox);
    }

    #[test]
    fn non_positive_altitude_is_rejected() {
        let req = request(json!({ "pattern": "grid", "flight_altitude_m": 0.0 }));
        let (status, _) = req.altitude(50.0).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(request(json!({ "pattern": "grid" })).altitude(50.0).unwrap(), 50.0);
    }
}
