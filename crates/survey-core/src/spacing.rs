//! Line spacing: explicit, sensor-driven, or derived from the area extent.

use serde::{Deserialize, Serialize};

use crate::area::SurveyArea;
use crate::models::PlanOutcome;
use crate::spatial::{meters_to_lat, meters_to_lon};

/// Density constant of the area-derived fallback: `sqrt(extent_m2) / 1000`
/// scaled into degrees.
const AUTO_SPACING_DEG_PER_ROOT_M: f64 = 1e-3 * 1e-4;

/// Camera swath used to derive line spacing from image overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorFootprint {
    /// Height above ground the survey is flown at
    pub altitude_m: f64,
    /// Cross-track field of view of the sensor
    pub fov_deg: f64,
    /// Side overlap between neighbouring swaths, as a fraction in [0, 1)
    pub overlap: f64,
}

impl SensorFootprint {
    /// Ground width covered by one swath.
    pub fn swath_width_m(&self) -> f64 {
        2.0 * self.altitude_m * (self.fov_deg.to_radians() / 2.0).tan()
    }

    /// Distance between adjacent flight lines for the requested overlap.
    pub fn line_spacing_m(&self) -> Option<f64> {
        let valid = self.altitude_m.is_finite()
            && self.altitude_m > 0.0
            && self.fov_deg.is_finite()
            && self.fov_deg > 0.0
            && self.fov_deg < 180.0
            && self.overlap.is_finite()
            && (0.0..1.0).contains(&self.overlap);
        if !valid {
            return None;
        }
        Some(self.swath_width_m() * (1.0 - self.overlap))
    }
}

/// How far apart sweep lines are placed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Spacing {
    /// Placeholder density derived from the bounding-box extent. Use an
    /// explicit or sensor spacing when ground sample distance matters.
    #[default]
    Auto,
    /// Spacing in coordinate degrees
    Degrees { value: f64 },
    /// Ground spacing in meters
    Meters { value: f64 },
    /// Spacing from sensor swath and side overlap
    Sensor(SensorFootprint),
}

impl From<Option<f64>> for Spacing {
    fn from(hint: Option<f64>) -> Self {
        match hint {
            Some(value) => Spacing::Degrees { value },
            None => Spacing::Auto,
        }
    }
}

/// Spacing in degrees along each axis for a particular area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSpacing {
    /// Step between horizontal sweep rows
    pub lat_step_deg: f64,
    /// Step between vertical sweep columns
    pub lon_step_deg: f64,
}

impl ResolvedSpacing {
    pub fn uniform(step_deg: f64) -> Self {
        Self {
            lat_step_deg: step_deg,
            lon_step_deg: step_deg,
        }
    }

    /// Edge length measured in spacing units.
    pub fn normalized_length(&self, a: [f64; 2], b: [f64; 2]) -> f64 {
        let dx = (b[0] - a[0]) / self.lon_step_deg;
        let dy = (b[1] - a[1]) / self.lat_step_deg;
        dx.hypot(dy)
    }
}

/// Turn a spacing request into per-axis degree steps for `area`.
///
/// The area must already have passed [`SurveyArea::validate`]; a zero extent
/// is still guarded here before it reaches a square root or a divisor.
pub fn resolve_spacing(
    area: &SurveyArea,
    spacing: &Spacing,
) -> Result<ResolvedSpacing, PlanOutcome> {
    let bbox = area.bounding_box().ok_or(PlanOutcome::InsufficientVertices)?;
    let ref_lat = bbox.center()[1];

    let resolved = match *spacing {
        Spacing::Auto => {
            let extent_m2 = bbox.extent_m2();
            if !(extent_m2.is_finite() && extent_m2 > 0.0) {
                return Err(PlanOutcome::DegenerateArea);
            }
            ResolvedSpacing::uniform(extent_m2.sqrt() * AUTO_SPACING_DEG_PER_ROOT_M)
        }
        Spacing::Degrees { value } => ResolvedSpacing::uniform(value),
        Spacing::Meters { value } => from_meters(value, ref_lat),
        Spacing::Sensor(footprint) => {
            let meters = footprint
                .line_spacing_m()
                .ok_or(PlanOutcome::InvalidSpacing)?;
            from_meters(meters, ref_lat)
        }
    };

    let valid = |step: f64| step.is_finite() && step > 0.0;
    if valid(resolved.lat_step_deg) && valid(resolved.lon_step_deg) {
        Ok(resolved)
    } else {
        Err(PlanOutcome::InvalidSpacing)
    }
}

fn from_meters(meters: f64, ref_lat: f64) -> ResolvedSpacing {
    if !(meters.is_finite() && meters > 0.0) {
        return ResolvedSpacing::uniform(f64::NAN);
    }
    ResolvedSpacing {
        lat_step_deg: meters_to_lat(meters, ref_lat),
        lon_step_deg: meters_to_lon(meters, ref_lat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_km(lat: f64) -> SurveyArea {
        let d_lat = meters_to_lat(1000.0, lat);
        let d_lon = meters_to_lon(1000.0, lat);
        SurveyArea::new(vec![
            [0.0, lat],
            [d_lon, lat],
            [d_lon, lat + d_lat],
            [0.0, lat + d_lat],
        ])
    }

    #[test]
    fn hint_maps_to_degree_spacing() {
        assert_eq!(Spacing::from(Some(5.0)), Spacing::Degrees { value: 5.0 });
        assert_eq!(Spacing::from(None), Spacing::Auto);
    }

    #[test]
    fn auto_spacing_scales_with_root_of_extent() {
        let area = area_km(10.0);
        let resolved = resolve_spacing(&area, &Spacing::Auto).unwrap();
        // sqrt(1e6 m2) = 1000 -> 1000 / 1000 * 1e-4 degrees
        assert!((resolved.lat_step_deg - 1e-4).abs() < 1e-6);
        assert_eq!(resolved.lat_step_deg, resolved.lon_step_deg);
    }

    #[test]
    fn zero_extent_is_guarded() {
        let flat = SurveyArea::new(vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        assert_eq!(
            resolve_spacing(&flat, &Spacing::Auto),
            Err(PlanOutcome::DegenerateArea)
        );
    }

    #[test]
    fn invalid_explicit_spacing_is_rejected() {
        let area = area_km(0.0);
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                resolve_spacing(&area, &Spacing::Degrees { value }),
                Err(PlanOutcome::InvalidSpacing)
            );
            assert_eq!(
                resolve_spacing(&area, &Spacing::Meters { value }),
                Err(PlanOutcome::InvalidSpacing)
            );
        }
    }

    #[test]
    fn meter_spacing_is_latitude_aware() {
        let area = area_km(60.0);
        let resolved = resolve_spacing(&area, &Spacing::Meters { value: 50.0 }).unwrap();
        // A degree of longitude is roughly half as long at 60 degrees north.
        let ratio = resolved.lon_step_deg / resolved.lat_step_deg;
        assert!((ratio - 2.0).abs() < 0.05, "ratio {ratio}");
    }

    #[test]
    fn sensor_spacing_uses_swath_and_overlap() {
        let footprint = SensorFootprint {
            altitude_m: 100.0,
            fov_deg: 90.0,
            overlap: 0.5,
        };
        assert!((footprint.swath_width_m() - 200.0).abs() < 1e-9);
        assert!((footprint.line_spacing_m().unwrap() - 100.0).abs() < 1e-9);

        let bad = SensorFootprint {
            overlap: 1.0,
            ..footprint
        };
        assert_eq!(bad.line_spacing_m(), None);
        assert_eq!(
            resolve_spacing(&area_km(0.0), &Spacing::Sensor(bad)),
            Err(PlanOutcome::InvalidSpacing)
        );
    }
}
