//! Survey area polygon: normalization, validation and containment.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlannerError, Result};
use crate::models::PlanOutcome;
use crate::spatial::{lat_to_meters, lon_to_meters, project_local, segments_intersect_2d};

/// Tolerance in degrees for boundary and collinearity tests (~0.1 mm).
pub const BOUNDARY_EPS_DEG: f64 = 1e-9;

/// Relative tolerance for the zero-area check (shoelace area vs. bbox area).
const DEGENERATE_AREA_RATIO: f64 = 1e-9;

/// Largest ring accepted for planning; validation is quadratic in vertices.
pub const MAX_AREA_VERTICES: usize = 10_000;

/// Axis-aligned bounds of a survey area in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn width_deg(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height_deg(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Centre as (lon, lat).
    pub fn center(&self) -> [f64; 2] {
        [
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        ]
    }

    /// Planar extent in square meters, scaled at the centre latitude.
    pub fn extent_m2(&self) -> f64 {
        let ref_lat = self.center()[1];
        let width_m = lon_to_meters(self.width_deg(), ref_lat);
        let height_m = lat_to_meters(self.height_deg(), ref_lat);
        width_m * height_m
    }
}

/// Ways a survey area can be unusable for planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaDefect {
    InsufficientVertices,
    InvalidCoordinates,
    Degenerate,
    SelfIntersecting,
    TooManyVertices,
}

impl From<AreaDefect> for PlanOutcome {
    fn from(value: AreaDefect) -> Self {
        match value {
            AreaDefect::InsufficientVertices => PlanOutcome::InsufficientVertices,
            AreaDefect::InvalidCoordinates => PlanOutcome::InvalidCoordinates,
            AreaDefect::Degenerate => PlanOutcome::DegenerateArea,
            AreaDefect::SelfIntersecting => PlanOutcome::SelfIntersecting,
            AreaDefect::TooManyVertices => PlanOutcome::TooManyVertices,
        }
    }
}

/// A single-ring polygon in (longitude, latitude) order.
///
/// The ring is stored open: consecutive duplicate vertices and the closing
/// vertex are dropped on construction, so `vertices()[0]` is the start vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct SurveyArea {
    ring: Vec<[f64; 2]>,
}

impl From<Vec<[f64; 2]>> for SurveyArea {
    fn from(value: Vec<[f64; 2]>) -> Self {
        SurveyArea::new(value)
    }
}

impl From<SurveyArea> for Vec<[f64; 2]> {
    fn from(value: SurveyArea) -> Self {
        value.closed_ring()
    }
}

impl SurveyArea {
    pub fn new(vertices: Vec<[f64; 2]>) -> Self {
        let mut ring: Vec<[f64; 2]> = Vec::with_capacity(vertices.len());
        for vertex in vertices {
            if ring.last().is_some_and(|last| same_vertex(*last, vertex)) {
                continue;
            }
            ring.push(vertex);
        }
        while ring.len() > 1 && same_vertex(ring[0], ring[ring.len() - 1]) {
            ring.pop();
        }
        Self { ring }
    }

    /// Parse a bare `[[lon, lat], ...]` ring, a GeoJSON `Polygon` geometry or
    /// a GeoJSON `Feature` wrapping one. Only the outer ring is used.
    pub fn from_geojson(value: &Value) -> Result<Self> {
        match value {
            Value::Array(_) => parse_ring(value),
            Value::Object(object) => match object.get("type").and_then(Value::as_str) {
                Some("Feature") => {
                    let geometry = object.get("geometry").ok_or_else(|| {
                        PlannerError::InvalidArea("feature has no geometry".to_string())
                    })?;
                    Self::from_geojson(geometry)
                }
                Some("Polygon") => {
                    let outer = object
                        .get("coordinates")
                        .and_then(Value::as_array)
                        .and_then(|rings| rings.first())
                        .ok_or_else(|| {
                            PlannerError::InvalidArea("polygon has no outer ring".to_string())
                        })?;
                    parse_ring(outer)
                }
                Some(other) => Err(PlannerError::InvalidArea(format!(
                    "unsupported geometry type '{}'",
                    other
                ))),
                None => Err(PlannerError::InvalidArea(
                    "object has no GeoJSON type".to_string(),
                )),
            },
            _ => Err(PlannerError::InvalidArea(
                "expected a coordinate array or GeoJSON object".to_string(),
            )),
        }
    }

    /// Open ring vertices.
    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.ring
    }

    /// Ring with the start vertex repeated at the end.
    pub fn closed_ring(&self) -> Vec<[f64; 2]> {
        let mut ring = self.ring.clone();
        if let Some(first) = self.ring.first() {
            ring.push(*first);
        }
        ring
    }

    pub fn edges(&self) -> impl Iterator<Item = ([f64; 2], [f64; 2])> + '_ {
        let n = self.ring.len();
        (0..n).map(move |i| (self.ring[i], self.ring[(i + 1) % n]))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.ring.first()?;
        let mut bbox = BoundingBox {
            min_lon: first[0],
            min_lat: first[1],
            max_lon: first[0],
            max_lat: first[1],
        };
        for vertex in &self.ring[1..] {
            bbox.min_lon = bbox.min_lon.min(vertex[0]);
            bbox.min_lat = bbox.min_lat.min(vertex[1]);
            bbox.max_lon = bbox.max_lon.max(vertex[0]);
            bbox.max_lat = bbox.max_lat.max(vertex[1]);
        }
        Some(bbox)
    }

    /// Check the ring can be planned over.
    pub fn validate(&self) -> std::result::Result<(), AreaDefect> {
        let coordinates_ok = self.ring.iter().all(|[lon, lat]| {
            lon.is_finite()
                && lat.is_finite()
                && (-180.0..=180.0).contains(lon)
                && (-90.0..=90.0).contains(lat)
        });
        if !coordinates_ok {
            return Err(AreaDefect::InvalidCoordinates);
        }
        if self.ring.len() < 3 {
            return Err(AreaDefect::InsufficientVertices);
        }
        if self.ring.len() > MAX_AREA_VERTICES {
            return Err(AreaDefect::TooManyVertices);
        }
        let Some(bbox) = self.bounding_box() else {
            return Err(AreaDefect::InsufficientVertices);
        };
        let bbox_area = bbox.width_deg() * bbox.height_deg();
        if bbox_area <= 0.0 {
            return Err(AreaDefect::Degenerate);
        }
        if self.self_intersects() {
            return Err(AreaDefect::SelfIntersecting);
        }
        if self.signed_area_deg2().abs() <= DEGENERATE_AREA_RATIO * bbox_area {
            return Err(AreaDefect::Degenerate);
        }
        Ok(())
    }

    /// Shoelace area in square degrees, positive for counter-clockwise rings.
    pub fn signed_area_deg2(&self) -> f64 {
        let Some(origin) = self.ring.first() else {
            return 0.0;
        };
        let twice: f64 = self
            .edges()
            .map(|(a, b)| {
                let (ax, ay) = (a[0] - origin[0], a[1] - origin[1]);
                let (bx, by) = (b[0] - origin[0], b[1] - origin[1]);
                ax * by - bx * ay
            })
            .sum();
        twice / 2.0
    }

    /// Enclosed area in square meters on a local plane at the bbox centre.
    pub fn area_m2(&self) -> f64 {
        let Some(bbox) = self.bounding_box() else {
            return 0.0;
        };
        let origin = bbox.center();
        let projected: Vec<(f64, f64)> = self
            .ring
            .iter()
            .map(|vertex| project_local(*vertex, origin))
            .collect();
        let n = projected.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let (ax, ay) = projected[i];
                let (bx, by) = projected[(i + 1) % n];
                ax * by - bx * ay
            })
            .sum();
        (twice / 2.0).abs()
    }

    /// True when two non-adjacent edges touch or cross.
    pub fn self_intersects(&self) -> bool {
        let n = self.ring.len();
        if n < 4 {
            return false;
        }
        let Some(bbox) = self.bounding_box() else {
            return false;
        };
        let origin = bbox.center();
        let projected: Vec<(f64, f64)> = self
            .ring
            .iter()
            .map(|vertex| project_local(*vertex, origin))
            .collect();

        for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                if segments_intersect_2d(
                    projected[i],
                    projected[(i + 1) % n],
                    projected[j],
                    projected[(j + 1) % n],
                ) {
                    return true;
                }
            }
        }
        false
    }

    /// Point-in-polygon test. Points on the boundary count as inside.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let n = self.ring.len();
        if n < 3 || !lon.is_finite() || !lat.is_finite() {
            return false;
        }
        if self.on_boundary(lon, lat) {
            return true;
        }

        // Ray casting: count crossings of a ray heading east.
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let [xi, yi] = self.ring[i];
            let [xj, yj] = self.ring[j];
            if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn on_boundary(&self, lon: f64, lat: f64) -> bool {
        self.edges().any(|(a, b)| point_on_segment([lon, lat], a, b))
    }

    /// Inside intervals `(start_lon, end_lon)` of the horizontal line at `lat`,
    /// sorted west to east. Boundary edges lying on the line are included.
    pub(crate) fn row_intervals(&self, lat: f64) -> Vec<(f64, f64)> {
        let mut crossings = Vec::new();
        let mut spans = Vec::new();

        for (a, b) in self.edges() {
            if (a[1] - lat).abs() <= BOUNDARY_EPS_DEG && (b[1] - lat).abs() <= BOUNDARY_EPS_DEG {
                spans.push((a[0].min(b[0]), a[0].max(b[0])));
            }
            // Half-open rule: a vertex exactly on the line is counted once,
            // and an edge lying exactly on the line adds no crossing.
            if (a[1] > lat) != (b[1] > lat) {
                let t = (lat - a[1]) / (b[1] - a[1]);
                crossings.push(a[0] + t * (b[0] - a[0]));
            }
        }

        crossings.sort_by(f64::total_cmp);
        spans.extend(crossings.chunks_exact(2).map(|pair| (pair[0], pair[1])));
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(spans.len());
        for (start, end) in spans {
            match merged.last_mut() {
                Some(last) if start <= last.1 + BOUNDARY_EPS_DEG => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }

        merged
            .into_iter()
            .filter(|(start, end)| {
                end - start > BOUNDARY_EPS_DEG && self.contains((start + end) / 2.0, lat)
            })
            .collect()
    }

    /// Same polygon with longitude and latitude swapped.
    pub(crate) fn transposed(&self) -> SurveyArea {
        SurveyArea {
            ring: self.ring.iter().map(|[lon, lat]| [*lat, *lon]).collect(),
        }
    }
}

fn same_vertex(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() <= BOUNDARY_EPS_DEG && (a[1] - b[1]).abs() <= BOUNDARY_EPS_DEG
}

fn point_on_segment(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> bool {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let (px, py) = (p[0] - a[0], p[1] - a[1]);
    let len = dx.hypot(dy);
    if len <= BOUNDARY_EPS_DEG {
        return px.hypot(py) <= BOUNDARY_EPS_DEG;
    }
    let cross = px * dy - py * dx;
    if cross.abs() / len > BOUNDARY_EPS_DEG {
        return false;
    }
    let dot = px * dx + py * dy;
    dot >= -BOUNDARY_EPS_DEG * len && dot <= len * len + BOUNDARY_EPS_DEG * len
}

fn parse_ring(value: &Value) -> Result<SurveyArea> {
    let items = value
        .as_array()
        .ok_or_else(|| PlannerError::InvalidArea("ring is not an array".to_string()))?;
    let mut vertices = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let pair = item.as_array().ok_or_else(|| PlannerError::InvalidVertex {
            index,
            reason: "not an array".to_string(),
        })?;
        if pair.len() < 2 {
            return Err(PlannerError::InvalidVertex {
                index,
                reason: format!("expected 2 numbers, got {}", pair.len()),
            });
        }
        let lon = pair[0].as_f64();
        let lat = pair[1].as_f64();
        match (lon, lat) {
            (Some(lon), Some(lat)) => vertices.push([lon, lat]),
            _ => {
                return Err(PlannerError::InvalidVertex {
                    index,
                    reason: "coordinates must be numbers".to_string(),
                })
            }
        }
    }
    Ok(SurveyArea::new(vertices))
}
