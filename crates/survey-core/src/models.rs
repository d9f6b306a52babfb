//! Core data models for survey planning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlannerError;

/// Coverage pattern flown over a survey area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Horizontal back-and-forth sweeps
    Grid,
    /// Horizontal sweeps followed by vertical sweeps
    Crosshatch,
    /// The boundary ring only
    Perimeter,
}

impl Pattern {
    pub const ALL: [Pattern; 3] = [Pattern::Grid, Pattern::Crosshatch, Pattern::Perimeter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Grid => "grid",
            Pattern::Crosshatch => "crosshatch",
            Pattern::Perimeter => "perimeter",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pattern {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "grid" => Ok(Pattern::Grid),
            "crosshatch" => Ok(Pattern::Crosshatch),
            "perimeter" => Ok(Pattern::Perimeter),
            _ => Err(PlannerError::UnknownPattern(value.to_string())),
        }
    }
}

/// One point of a flight line, in (longitude, latitude) order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub lon: f64,
    pub lat: f64,
    /// Per-point override of the mission flight altitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_m: Option<f64>,
}

impl LinePoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            altitude_m: None,
        }
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }

    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for LinePoint {
    fn from(value: [f64; 2]) -> Self {
        LinePoint::new(value[0], value[1])
    }
}

/// One continuous sweep segment of a coverage plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLine {
    pub points: Vec<LinePoint>,
}

impl FlightLine {
    pub fn new(points: Vec<LinePoint>) -> Self {
        Self { points }
    }

    pub fn segment(start: [f64; 2], end: [f64; 2]) -> Self {
        Self::new(vec![start.into(), end.into()])
    }

    pub fn first(&self) -> Option<&LinePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&LinePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn reversed(mut self) -> Self {
        self.points.reverse();
        self
    }

    pub fn lon_lat(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(LinePoint::lon_lat).collect()
    }
}

/// A sequenced waypoint ready to be stored against a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// 1-based position in the mission sequence
    pub sequence_number: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Waypoint as submitted by a client; sequence and altitude may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointInput {
    #[serde(default)]
    pub sequence_number: Option<u32>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
}

impl From<&Waypoint> for WaypointInput {
    fn from(value: &Waypoint) -> Self {
        Self {
            sequence_number: Some(value.sequence_number),
            latitude: value.latitude,
            longitude: value.longitude,
            altitude: Some(value.altitude),
        }
    }
}

/// The full waypoint list stored for one mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionWaypoints {
    pub mission_id: String,
    pub waypoints: Vec<Waypoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
    pub updated_at: DateTime<Utc>,
}

/// Why a plan did or did not produce flight lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOutcome {
    /// Flight lines were generated
    Planned,
    /// Nothing drawn yet
    NoArea,
    /// Fewer than 3 distinct vertices
    InsufficientVertices,
    /// Zero-area or collinear ring
    DegenerateArea,
    /// Non-finite or out-of-range coordinates
    InvalidCoordinates,
    /// Ring crosses itself
    SelfIntersecting,
    /// Pattern name not recognized
    UnknownPattern,
    /// Spacing not positive and finite
    InvalidSpacing,
    /// Spacing so fine the sweep would exceed the line cap
    TooManyLines,
    /// Ring has more vertices than the planner accepts
    TooManyVertices,
}

impl PlanOutcome {
    pub fn is_planned(&self) -> bool {
        matches!(self, PlanOutcome::Planned)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            PlanOutcome::Planned => "plan generated",
            PlanOutcome::NoArea => "no survey area supplied",
            PlanOutcome::InsufficientVertices => "survey area needs at least 3 distinct vertices",
            PlanOutcome::DegenerateArea => "survey area has zero area",
            PlanOutcome::InvalidCoordinates => "survey area has invalid coordinates",
            PlanOutcome::SelfIntersecting => "survey area boundary crosses itself",
            PlanOutcome::UnknownPattern => "unknown coverage pattern",
            PlanOutcome::InvalidSpacing => "line spacing must be positive and finite",
            PlanOutcome::TooManyLines => "line spacing too fine for the survey area",
            PlanOutcome::TooManyVertices => "survey area has too many vertices",
        }
    }
}

impl fmt::Display for PlanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}
