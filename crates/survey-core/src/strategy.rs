//! Line generation for each coverage pattern.

use serde::{Deserialize, Serialize};

use crate::area::SurveyArea;
use crate::models::{FlightLine, LinePoint, Pattern, PlanOutcome};
use crate::spacing::ResolvedSpacing;

/// Upper bound on sweep rows per axis.
pub const MAX_SWEEP_LINES: usize = 20_000;

/// Upper bound on resampled perimeter points.
pub const MAX_PERIMETER_POINTS: usize = 200_000;

/// How sweep lines are fitted to the survey area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Containment {
    /// Trim every sweep to the parts inside the polygon
    #[default]
    Clip,
    /// Sweep the full bounding box, over-covering non-rectangular areas
    BoundingBox,
}

/// Shared interface of the coverage patterns.
pub trait CoverageStrategy {
    fn pattern(&self) -> Pattern;

    /// Ordered flight lines for a validated area.
    fn flight_lines(
        &self,
        area: &SurveyArea,
        spacing: &ResolvedSpacing,
        containment: Containment,
    ) -> Result<Vec<FlightLine>, PlanOutcome>;
}

/// Horizontal boustrophedon sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridSweep;

/// Horizontal sweep followed by a vertical sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosshatchSweep;

/// Boundary ring, resampled at the line spacing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerimeterTrace;

pub fn strategy_for(pattern: Pattern) -> &'static dyn CoverageStrategy {
    match pattern {
        Pattern::Grid => &GridSweep,
        Pattern::Crosshatch => &CrosshatchSweep,
        Pattern::Perimeter => &PerimeterTrace,
    }
}

impl CoverageStrategy for GridSweep {
    fn pattern(&self) -> Pattern {
        Pattern::Grid
    }

    fn flight_lines(
        &self,
        area: &SurveyArea,
        spacing: &ResolvedSpacing,
        containment: Containment,
    ) -> Result<Vec<FlightLine>, PlanOutcome> {
        horizontal_sweep(area, spacing.lat_step_deg, containment)
    }
}

impl CoverageStrategy for CrosshatchSweep {
    fn pattern(&self) -> Pattern {
        Pattern::Crosshatch
    }

    fn flight_lines(
        &self,
        area: &SurveyArea,
        spacing: &ResolvedSpacing,
        containment: Containment,
    ) -> Result<Vec<FlightLine>, PlanOutcome> {
        let mut lines = horizontal_sweep(area, spacing.lat_step_deg, containment)?;
        lines.extend(vertical_sweep(area, spacing.lon_step_deg, containment)?);
        Ok(lines)
    }
}

impl CoverageStrategy for PerimeterTrace {
    fn pattern(&self) -> Pattern {
        Pattern::Perimeter
    }

    fn flight_lines(
        &self,
        area: &SurveyArea,
        spacing: &ResolvedSpacing,
        _containment: Containment,
    ) -> Result<Vec<FlightLine>, PlanOutcome> {
        let ring = area.closed_ring();
        let Some(start) = ring.first().copied() else {
            return Ok(Vec::new());
        };

        let parts: Vec<usize> = ring
            .windows(2)
            .map(|edge| {
                let length = spacing.normalized_length(edge[0], edge[1]);
                if length > 1.0 {
                    length.ceil().min(MAX_PERIMETER_POINTS as f64) as usize
                } else {
                    1
                }
            })
            .collect();
        let total: usize = parts.iter().sum();
        if total >= MAX_PERIMETER_POINTS {
            return Err(PlanOutcome::TooManyLines);
        }

        let mut points = Vec::with_capacity(total + 1);
        for (edge, count) in ring.windows(2).zip(parts) {
            let (a, b) = (edge[0], edge[1]);
            for k in 0..count {
                let t = k as f64 / count as f64;
                points.push(LinePoint::new(
                    a[0] + t * (b[0] - a[0]),
                    a[1] + t * (b[1] - a[1]),
                ));
            }
        }
        points.push(start.into());

        Ok(vec![FlightLine::new(points)])
    }
}

/// West-east rows stepping north from the bbox floor, alternating direction
/// on every row that produced at least one line.
fn horizontal_sweep(
    area: &SurveyArea,
    step_deg: f64,
    containment: Containment,
) -> Result<Vec<FlightLine>, PlanOutcome> {
    let bbox = area
        .bounding_box()
        .ok_or(PlanOutcome::InsufficientVertices)?;
    let rows = row_count(bbox.min_lat, bbox.max_lat, step_deg)?;

    let mut lines = Vec::new();
    let mut eastward = true;
    for row in 0..rows {
        // Integer stepping keeps rows free of accumulated drift.
        let lat = (bbox.min_lat + row as f64 * step_deg).min(bbox.max_lat);
        let intervals = match containment {
            Containment::BoundingBox => vec![(bbox.min_lon, bbox.max_lon)],
            Containment::Clip => area.row_intervals(lat),
        };
        if intervals.is_empty() {
            continue;
        }

        let segments = intervals
            .into_iter()
            .map(|(west, east)| FlightLine::segment([west, lat], [east, lat]));
        if eastward {
            lines.extend(segments);
        } else {
            lines.extend(segments.rev().map(FlightLine::reversed));
        }
        eastward = !eastward;
    }
    Ok(lines)
}

/// South-north columns stepping east, first column flown northward.
fn vertical_sweep(
    area: &SurveyArea,
    step_deg: f64,
    containment: Containment,
) -> Result<Vec<FlightLine>, PlanOutcome> {
    let transposed = horizontal_sweep(&area.transposed(), step_deg, containment)?;
    Ok(transposed
        .into_iter()
        .map(|line| {
            FlightLine::new(
                line.points
                    .into_iter()
                    .map(|point| LinePoint {
                        lon: point.lat,
                        lat: point.lon,
                        altitude_m: point.altitude_m,
                    })
                    .collect(),
            )
        })
        .collect())
}

fn row_count(min: f64, max: f64, step: f64) -> Result<usize, PlanOutcome> {
    if !(step.is_finite() && step > 0.0) {
        return Err(PlanOutcome::InvalidSpacing);
    }
    let rows = ((max - min) / step + 1e-9).floor() + 1.0;
    if !rows.is_finite() || rows > MAX_SWEEP_LINES as f64 {
        return Err(PlanOutcome::TooManyLines);
    }
    Ok(rows as usize)
}
