//! Loading survey areas from disk and rendering plans for the terminal.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::json;
use std::fmt::Write as _;
use std::path::Path;
use survey_core::{CoveragePlan, SurveyArea, Waypoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

/// Read an area file holding a coordinate array or GeoJSON Polygon/Feature.
pub fn load_area(path: &Path) -> Result<SurveyArea> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read area file {}", path.display()))?;
    parse_area(&raw).with_context(|| format!("Invalid area in {}", path.display()))
}

pub fn parse_area(raw: &str) -> Result<SurveyArea> {
    let value: serde_json::Value = serde_json::from_str(raw).context("Area is not valid JSON")?;
    Ok(SurveyArea::from_geojson(&value)?)
}

pub fn render(plan: &CoveragePlan, waypoints: &[Waypoint], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(plan, waypoints),
        OutputFormat::Table => Ok(render_table(plan, waypoints)),
    }
}

fn render_json(plan: &CoveragePlan, waypoints: &[Waypoint]) -> Result<String> {
    let body = json!({
        "outcome": plan.outcome,
        "pattern": plan.pattern,
        "summary": plan.summary,
        "lines": plan.lines,
        "waypoints": waypoints,
    });
    Ok(serde_json::to_string_pretty(&body)?)
}

fn render_table(plan: &CoveragePlan, waypoints: &[Waypoint]) -> String {
    let mut out = String::new();
    let pattern = plan
        .pattern
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "pattern: {}  outcome: {}", pattern, plan.outcome);
    if let Some(summary) = &plan.summary {
        let _ = writeln!(
            out,
            "lines: {}  waypoints: {}  path: {:.0} m  area: {:.0} m2",
            summary.line_count, summary.waypoint_count, summary.path_length_m, summary.area_m2
        );
    }
    let _ = writeln!(out, "{:>5}  {:>12}  {:>13}  {:>8}", "seq", "latitude", "longitude", "alt_m");
    for waypoint in waypoints {
        let _ = writeln!(
            out,
            "{:>5}  {:>12.7}  {:>13.7}  {:>8.1}",
            waypoint.sequence_number, waypoint.latitude, waypoint.longitude, waypoint.altitude
        );
    }
    out
}
