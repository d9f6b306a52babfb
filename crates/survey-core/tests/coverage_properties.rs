//! End-to-end properties of coverage planning.
//!
//! Run with: cargo test -p survey-core --test coverage_properties

use survey_core::{
    flatten, plan, plan_coverage, plan_named, Containment, Pattern, PlanOptions, PlanOutcome,
    Spacing, SurveyArea,
};

fn square() -> SurveyArea {
    SurveyArea::new(vec![[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]])
}

/// Field near Irvine with a notch cut into its northern edge.
fn notched_field() -> SurveyArea {
    SurveyArea::new(vec![
        [-117.8300, 33.6800],
        [-117.8200, 33.6800],
        [-117.8200, 33.6900],
        [-117.8230, 33.6900],
        [-117.8230, 33.6840],
        [-117.8270, 33.6840],
        [-117.8270, 33.6900],
        [-117.8300, 33.6900],
        [-117.8300, 33.6800],
    ])
}

#[test]
fn test_planning_is_idempotent() {
    let area = notched_field();
    for pattern in Pattern::ALL {
        let first = plan_coverage(Some(&area), pattern, None);
        let second = plan_coverage(Some(&area), pattern, None);
        assert!(!first.is_empty(), "{pattern} produced no lines");
        assert_eq!(first, second);
    }
}

#[test]
fn test_empty_input_plans_nothing() {
    let two_vertices = SurveyArea::new(vec![[0.0, 0.0], [1.0, 1.0]]);
    for pattern in Pattern::ALL {
        assert!(plan_coverage(None, pattern, None).is_empty());
        assert!(plan_coverage(Some(&two_vertices), pattern, Some(0.5)).is_empty());
    }
}

#[test]
fn test_waypoint_sequence_is_contiguous() {
    let area = notched_field();
    for pattern in Pattern::ALL {
        let lines = plan_coverage(Some(&area), pattern, None);
        let total: usize = lines.iter().map(|line| line.len()).sum();
        let waypoints = flatten(&lines, 50.0);
        assert_eq!(waypoints.len(), total);
        for (index, waypoint) in waypoints.iter().enumerate() {
            assert_eq!(waypoint.sequence_number as usize, index + 1);
        }
    }
}

#[test]
fn test_grid_alternates_direction() {
    let lines = plan_coverage(Some(&square()), Pattern::Grid, Some(5.0));
    assert_eq!(lines.len(), 3);
    for pair in lines.windows(2) {
        let a_east = pair[0].first().unwrap().lon < pair[0].last().unwrap().lon;
        let b_east = pair[1].first().unwrap().lon < pair[1].last().unwrap().lon;
        assert_ne!(a_east, b_east);
    }
    assert_eq!(lines[0].first().unwrap().lon, 0.0);
    assert_eq!(lines[0].last().unwrap().lon, 10.0);
    assert_eq!(lines[1].first().unwrap().lon, 10.0);
}

#[test]
fn test_crosshatch_adds_vertical_set() {
    let area = square();
    let grid = plan_coverage(Some(&area), Pattern::Grid, Some(5.0));
    let crosshatch = plan_coverage(Some(&area), Pattern::Crosshatch, Some(5.0));
    // Three columns at lon 0, 5 and 10.
    assert_eq!(crosshatch.len(), grid.len() + 3);
    assert_eq!(&crosshatch[..grid.len()], &grid[..]);

    let vertical = &crosshatch[grid.len()..];
    assert!(vertical
        .iter()
        .all(|line| line.first().unwrap().lon == line.last().unwrap().lon));
}

#[test]
fn test_crosshatch_count_holds_for_concave_area() {
    let area = notched_field();
    let spacing = Spacing::Meters { value: 60.0 };
    let options = PlanOptions::with_spacing(spacing);
    let grid = plan(Some(&area), Pattern::Grid, &options);
    let crosshatch = plan(Some(&area), Pattern::Crosshatch, &options);
    assert!(crosshatch.lines.len() > grid.lines.len());
    assert_eq!(&crosshatch.lines[..grid.lines.len()], &grid.lines[..]);
}

#[test]
fn test_perimeter_closes_the_loop() {
    let area = notched_field();
    let lines = plan_coverage(Some(&area), Pattern::Perimeter, None);
    assert_eq!(lines.len(), 1);
    let start = area.vertices()[0];
    let first = lines[0].first().unwrap();
    let last = lines[0].last().unwrap();
    assert_eq!(first.lon_lat(), start);
    assert!((last.lon - start[0]).abs() < 1e-12 && (last.lat - start[1]).abs() < 1e-12);
    assert!(lines[0].len() > area.vertices().len() + 1);
}

#[test]
fn test_mission_altitude_propagates() {
    let lines = plan_coverage(Some(&square()), Pattern::Crosshatch, Some(2.0));
    let waypoints = flatten(&lines, 75.0);
    assert!(!waypoints.is_empty());
    assert!(waypoints.iter().all(|waypoint| waypoint.altitude == 75.0));
}

#[test]
fn test_clipped_grid_stays_inside_concave_area() {
    let area = notched_field();
    let options = PlanOptions::with_spacing(Spacing::Meters { value: 50.0 });
    let result = plan(Some(&area), Pattern::Grid, &options);
    assert_eq!(result.outcome, PlanOutcome::Planned);

    for line in &result.lines {
        for point in &line.points {
            assert!(area.contains(point.lon, point.lat), "{point:?} outside");
        }
        let first = line.first().unwrap();
        let last = line.last().unwrap();
        let mid_lon = (first.lon + last.lon) / 2.0;
        assert!(area.contains(mid_lon, first.lat));
    }

    // Rows above the notch floor split into a west and an east line.
    let notch_lat = 33.6880;
    let rows_at_notch: Vec<_> = result
        .lines
        .iter()
        .filter(|line| (line.first().unwrap().lat - notch_lat).abs() < 4e-4)
        .collect();
    assert!(rows_at_notch.len() >= 2);
}

#[test]
fn test_bounding_box_mode_over_covers_concave_area() {
    let area = notched_field();
    let options = PlanOptions {
        spacing: Spacing::Meters { value: 50.0 },
        containment: Containment::BoundingBox,
    };
    let result = plan(Some(&area), Pattern::Grid, &options);
    let clipped = plan(
        Some(&area),
        Pattern::Grid,
        &PlanOptions::with_spacing(Spacing::Meters { value: 50.0 }),
    );
    assert!(result.lines.len() < clipped.lines.len());
    assert!(result.lines.iter().all(|line| line.len() == 2));
}

#[test]
fn test_degenerate_and_unknown_inputs_are_signalled() {
    let collinear = SurveyArea::new(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [0.0, 0.0]]);
    let result = plan(Some(&collinear), Pattern::Grid, &PlanOptions::default());
    assert_eq!(result.outcome, PlanOutcome::DegenerateArea);
    assert!(result.is_empty());

    let result = plan_named(Some(&square()), "lawnmower", &PlanOptions::default());
    assert_eq!(result.outcome, PlanOutcome::UnknownPattern);
    assert!(result.is_empty());
}
