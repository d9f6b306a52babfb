//! Plan a coverage pattern over a survey area file.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use survey_cli::{load_area, render, OutputFormat, SurveyClient};
use survey_core::{plan_named, Containment, PlanOptions, Spacing};

/// Plan drone survey coverage (grid, crosshatch or perimeter)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Area file: coordinate array or GeoJSON Polygon/Feature, [lon, lat] order
    #[arg(long)]
    area: PathBuf,

    /// Coverage pattern
    #[arg(long, default_value = "grid")]
    pattern: String,

    /// Line spacing in degrees
    #[arg(long, conflicts_with = "spacing_m")]
    spacing_deg: Option<f64>,

    /// Line spacing in meters
    #[arg(long)]
    spacing_m: Option<f64>,

    /// Mission altitude in meters
    #[arg(long, default_value_t = 50.0)]
    altitude: f64,

    /// Sweep the whole bounding box instead of clipping to the polygon
    #[arg(long)]
    bbox: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Survey server URL to store the waypoints on
    #[arg(long, requires = "mission")]
    submit_url: Option<String>,

    /// Mission id used with --submit-url
    #[arg(long)]
    mission: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if !args.altitude.is_finite() || args.altitude <= 0.0 {
        bail!("Altitude must be a positive number of meters");
    }

    let area = load_area(&args.area)?;
    let spacing = match args.spacing_m {
        Some(value) => Spacing::Meters { value },
        None => Spacing::from(args.spacing_deg),
    };
    let options = PlanOptions {
        spacing,
        containment: if args.bbox {
            Containment::BoundingBox
        } else {
            Containment::Clip
        },
    };

    let plan = plan_named(Some(&area), &args.pattern, &options);
    let waypoints = plan.waypoints(args.altitude);
    println!("{}", render(&plan, &waypoints, args.format)?);

    if waypoints.is_empty() {
        bail!("No waypoints planned for '{}': {}", args.pattern, plan.outcome.describe());
    }

    if let (Some(url), Some(mission)) = (args.submit_url, args.mission) {
        let client = SurveyClient::new(url);
        let stored = client.submit_waypoints(&mission, &waypoints)?;
        eprintln!(
            "Stored {} waypoints for mission {}",
            stored.waypoints.len(),
            stored.mission_id
        );
    }

    Ok(())
}
