//! Coverage planning entry points.
//!
//! Planning is a pure function of `(area, pattern, options)`: no state is
//! kept between calls, so callers may re-plan on every edit of the area or
//! pattern and memoize results if they want to.

use serde::{Deserialize, Serialize};

use crate::area::{BoundingBox, SurveyArea};
use crate::models::{FlightLine, Pattern, PlanOutcome, Waypoint};
use crate::spacing::{resolve_spacing, ResolvedSpacing, Spacing};
use crate::spatial::path_length_m;
use crate::strategy::{strategy_for, Containment};

/// Knobs for a planning call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanOptions {
    #[serde(default)]
    pub spacing: Spacing,
    #[serde(default)]
    pub containment: Containment,
}

impl PlanOptions {
    pub fn with_spacing(spacing: Spacing) -> Self {
        Self {
            spacing,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub line_count: usize,
    pub waypoint_count: usize,
    /// Flown distance through every point in order, transits included
    pub path_length_m: f64,
    pub area_m2: f64,
    pub spacing: ResolvedSpacing,
    pub bounding_box: BoundingBox,
}

/// Result of a planning call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveragePlan {
    pub outcome: PlanOutcome,
    pub pattern: Option<Pattern>,
    pub lines: Vec<FlightLine>,
    pub summary: Option<PlanSummary>,
}

impl CoveragePlan {
    fn empty(outcome: PlanOutcome, pattern: Option<Pattern>) -> Self {
        Self {
            outcome,
            pattern,
            lines: Vec::new(),
            summary: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.lines.iter().map(FlightLine::len).sum()
    }

    /// Sequenced waypoints at the mission altitude.
    pub fn waypoints(&self, mission_altitude_m: f64) -> Vec<Waypoint> {
        flatten(&self.lines, mission_altitude_m)
    }
}

/// Plan coverage of `area` with `pattern`.
///
/// Never fails: missing or unusable input yields an empty plan whose
/// `outcome` says why.
pub fn plan(area: Option<&SurveyArea>, pattern: Pattern, options: &PlanOptions) -> CoveragePlan {
    let Some(area) = area else {
        return CoveragePlan::empty(PlanOutcome::NoArea, Some(pattern));
    };
    if let Err(defect) = area.validate() {
        let outcome = PlanOutcome::from(defect);
        tracing::debug!(%pattern, ?outcome, "survey area rejected");
        return CoveragePlan::empty(outcome, Some(pattern));
    }
    let Some(bounding_box) = area.bounding_box() else {
        return CoveragePlan::empty(PlanOutcome::InsufficientVertices, Some(pattern));
    };

    let spacing = match resolve_spacing(area, &options.spacing) {
        Ok(spacing) => spacing,
        Err(outcome) => {
            tracing::debug!(%pattern, ?outcome, spacing = ?options.spacing, "spacing rejected");
            return CoveragePlan::empty(outcome, Some(pattern));
        }
    };

    let lines = match strategy_for(pattern).flight_lines(area, &spacing, options.containment) {
        Ok(lines) => lines,
        Err(outcome) => {
            tracing::debug!(%pattern, ?outcome, ?spacing, "line generation stopped");
            return CoveragePlan::empty(outcome, Some(pattern));
        }
    };

    let points: Vec<[f64; 2]> = lines.iter().flat_map(FlightLine::lon_lat).collect();
    let summary = PlanSummary {
        line_count: lines.len(),
        waypoint_count: points.len(),
        path_length_m: path_length_m(&points),
        area_m2: area.area_m2(),
        spacing,
        bounding_box,
    };
    tracing::debug!(
        %pattern,
        lines = summary.line_count,
        waypoints = summary.waypoint_count,
        "coverage planned"
    );

    CoveragePlan {
        outcome: PlanOutcome::Planned,
        pattern: Some(pattern),
        lines,
        summary: Some(summary),
    }
}

/// Plan with a pattern name as received from a client. An unrecognized name
/// yields an empty plan with [`PlanOutcome::UnknownPattern`].
pub fn plan_named(
    area: Option<&SurveyArea>,
    pattern_name: &str,
    options: &PlanOptions,
) -> CoveragePlan {
    match pattern_name.parse::<Pattern>() {
        Ok(pattern) => plan(area, pattern, options),
        Err(err) => {
            tracing::debug!(%err, "pattern rejected");
            CoveragePlan::empty(PlanOutcome::UnknownPattern, None)
        }
    }
}

/// Flight lines for `area`, with `spacing_hint` in coordinate degrees.
/// Returns no lines when there is nothing to plan.
pub fn plan_coverage(
    area: Option<&SurveyArea>,
    pattern: Pattern,
    spacing_hint: Option<f64>,
) -> Vec<FlightLine> {
    plan(
        area,
        pattern,
        &PlanOptions::with_spacing(Spacing::from(spacing_hint)),
    )
    .lines
}

/// Concatenate every point of `lines` in order into sequenced waypoints.
///
/// Sequence numbers run 1..=N without gaps. A point's own altitude override
/// wins over `mission_altitude_m`.
pub fn flatten(lines: &[FlightLine], mission_altitude_m: f64) -> Vec<Waypoint> {
    lines
        .iter()
        .flat_map(|line| line.points.iter())
        .enumerate()
        .map(|(index, point)| Waypoint {
            sequence_number: index as u32 + 1,
            latitude: point.lat,
            longitude: point.lon,
            altitude: point.altitude_m.unwrap_or(mission_altitude_m),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinePoint;

    fn square() -> SurveyArea {
        SurveyArea::new(vec![[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]])
    }

    #[test]
    fn missing_area_plans_nothing() {
        for pattern in Pattern::ALL {
            let result = plan(None, pattern, &PlanOptions::default());
            assert_eq!(result.outcome, PlanOutcome::NoArea);
            assert!(result.is_empty());
            assert!(result.summary.is_none());
        }
    }

    #[test]
    fn unknown_pattern_name_is_distinguishable() {
        let area = square();
        let result = plan_named(Some(&area), "zigzag", &PlanOptions::default());
        assert_eq!(result.outcome, PlanOutcome::UnknownPattern);
        assert_eq!(result.pattern, None);
        assert!(result.is_empty());

        let grid = plan_named(Some(&area), "grid", &PlanOptions::default());
        assert_eq!(grid.outcome, PlanOutcome::Planned);
        assert_eq!(grid.pattern, Some(Pattern::Grid));
    }

    #[test]
    fn summary_counts_lines_and_points() {
        let area = square();
        let result = plan(
            Some(&area),
            Pattern::Grid,
            &PlanOptions::with_spacing(Spacing::Degrees { value: 5.0 }),
        );
        let summary = result.summary.as_ref().unwrap();
        assert_eq!(summary.line_count, 3);
        assert_eq!(summary.waypoint_count, 6);
        assert_eq!(result.point_count(), 6);
        assert!(summary.path_length_m > 0.0);
        assert!(summary.area_m2 > 0.0);
    }

    #[test]
    fn fine_spacing_is_capped() {
        let area = square();
        let result = plan(
            Some(&area),
            Pattern::Grid,
            &PlanOptions::with_spacing(Spacing::Degrees { value: 1e-7 }),
        );
        assert_eq!(result.outcome, PlanOutcome::TooManyLines);
        assert!(result.is_empty());
    }

    #[test]
    fn flatten_prefers_point_override() {
        let lines = vec![FlightLine::new(vec![
            LinePoint::new(1.0, 2.0),
            LinePoint::new(3.0, 4.0).with_altitude(120.0),
        ])];
        let waypoints = flatten(&lines, 60.0);
        assert_eq!(waypoints[0].altitude, 60.0);
        assert_eq!(waypoints[1].altitude, 120.0);
        assert_eq!(waypoints[1].latitude, 4.0);
        assert_eq!(waypoints[1].longitude, 3.0);
    }

    #[test]
    fn flatten_of_nothing_is_empty() {
        assert!(flatten(&[], 50.0).is_empty());
    }
}
