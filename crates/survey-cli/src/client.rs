//! HTTP client for the survey server's waypoint API.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use survey_core::{MissionWaypoints, Waypoint, WaypointInput};

#[derive(Debug, Serialize)]
struct ReplaceWaypointsRequest {
    waypoints: Vec<WaypointInput>,
}

/// Blocking client for storing planned waypoints against a mission.
pub struct SurveyClient {
    client: Client,
    base_url: String,
}

impl SurveyClient {
    /// Create a client for a server such as "http://localhost:3000".
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn waypoints_url(&self, mission_id: &str) -> String {
        format!("{}/v1/missions/{}/waypoints", self.base_url, mission_id)
    }

    /// Replace the mission's stored waypoints with `waypoints`.
    pub fn submit_waypoints(
        &self,
        mission_id: &str,
        waypoints: &[Waypoint],
    ) -> Result<MissionWaypoints> {
        let request = ReplaceWaypointsRequest {
            waypoints: waypoints.iter().map(WaypointInput::from).collect(),
        };

        let response = self
            .client
            .put(self.waypoints_url(mission_id))
            .json(&request)
            .send()
            .context("Failed to send waypoints")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("Server rejected waypoints ({}): {}", status, body);
        }
        response
            .json::<MissionWaypoints>()
            .context("Failed to parse stored waypoints")
    }
}
