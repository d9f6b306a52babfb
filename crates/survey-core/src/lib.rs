//! Survey coverage planning: turn a drawn survey polygon and a coverage
//! pattern into ordered flight lines and sequenced waypoints.

pub mod area;
pub mod error;
pub mod models;
pub mod planner;
pub mod spacing;
pub mod spatial;
pub mod strategy;

pub use area::{AreaDefect, BoundingBox, SurveyArea, MAX_AREA_VERTICES};
pub use error::PlannerError;
pub use models::{
    FlightLine, LinePoint, MissionWaypoints, Pattern, PlanOutcome, Waypoint, WaypointInput,
};
pub use planner::{flatten, plan, plan_coverage, plan_named, CoveragePlan, PlanOptions, PlanSummary};
pub use spacing::{resolve_spacing, ResolvedSpacing, SensorFootprint, Spacing};
pub use spatial::haversine_distance;
pub use strategy::{strategy_for, Containment, CoverageStrategy};
