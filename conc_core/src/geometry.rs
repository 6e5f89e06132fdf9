//! # Geometry
//!
//! The neutral-axis line and the handful of polygon operations the capacity
//! computation needs, built on the `geo` crate:
//!
//! - line construction from angle + y-intercept ([`NeutralAxis`])
//! - above/below classification of points (`angle·x + b − y ≤ 0` ⇒ above)
//! - perpendicular distance and orthogonal projection onto the line
//! - polygon/line split ([`split_by_line`])
//! - furthest vertex from a line, point-in-zone tests, area and centroid
//!
//! Zones are [`MultiPolygon`]s: splitting a non-convex outline by a line can
//! leave several disjoint pieces on the same side, and an empty multipolygon
//! is the natural "no zone".

use geo::{Area, BooleanOps, BoundingRect, Centroid, Contains, CoordsIter};
use geo::{Coord, LineString, MultiPolygon, Point, Polygon, Rect};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// A region of the section, possibly empty, possibly in several pieces.
pub type Zone = MultiPolygon<f64>;

/// Distance (mm) within which a vertex counts as lying on a line
pub const LINE_TOLERANCE: f64 = 1e-9;

/// Polygons smaller than this (mm²) left over from clipping are dropped
pub const AREA_TOLERANCE: f64 = 1e-6;

/// An infinite straight line `y = tan(angle)·x + y_intercept`.
///
/// Angles are in degrees and normalized to [-90, 90). Vertical lines cannot
/// be written in this form and are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeutralAxis {
    /// Inclination to the x-axis (degrees)
    pub angle_deg: f64,
    /// Intersection with the y-axis (mm)
    pub y_intercept: f64,
}

impl NeutralAxis {
    /// Create an inclined neutral axis.
    pub fn new(angle_deg: f64, y_intercept: f64) -> CalcResult<Self> {
        if !angle_deg.is_finite() || !y_intercept.is_finite() {
            return Err(CalcError::invalid_input(
                "neutral_axis",
                format!("angle={angle_deg}, y_intercept={y_intercept}"),
                "Neutral axis parameters must be finite",
            ));
        }
        let normalized = (angle_deg + 90.0).rem_euclid(180.0) - 90.0;
        if (normalized.abs() - 90.0).abs() < 1e-9 {
            return Err(CalcError::UnsupportedOrientation { angle_deg });
        }
        Ok(NeutralAxis {
            angle_deg: normalized,
            y_intercept,
        })
    }

    /// Horizontal neutral axis at height `y`
    pub fn horizontal(y: f64) -> Self {
        NeutralAxis {
            angle_deg: 0.0,
            y_intercept: y,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.angle_deg == 0.0
    }

    pub fn slope(&self) -> f64 {
        self.angle_deg.to_radians().tan()
    }

    /// Unit vector along the line (positive x component)
    pub fn direction(&self) -> Coord {
        let a = self.angle_deg.to_radians();
        Coord { x: a.cos(), y: a.sin() }
    }

    /// Unit normal pointing to the "above" side
    pub fn normal(&self) -> Coord {
        let a = self.angle_deg.to_radians();
        Coord { x: -a.sin(), y: a.cos() }
    }

    /// Implicit line equation `slope·x + b − y`; ≤ 0 means above
    pub fn evaluate(&self, p: Coord) -> f64 {
        self.slope() * p.x + self.y_intercept - p.y
    }

    /// Points on the line count as above
    pub fn is_above(&self, p: Coord) -> bool {
        self.evaluate(p) <= 0.0
    }

    /// Perpendicular distance, positive above the line
    pub fn signed_distance(&self, p: Coord) -> f64 {
        -self.evaluate(p) * self.angle_deg.to_radians().cos()
    }

    /// Perpendicular distance
    pub fn distance(&self, p: Coord) -> f64 {
        self.signed_distance(p).abs()
    }

    /// Orthogonal projection of a point onto the line
    pub fn project(&self, p: Coord) -> Coord {
        let d = self.signed_distance(p);
        let n = self.normal();
        Coord {
            x: p.x - d * n.x,
            y: p.y - d * n.y,
        }
    }

    /// The same line moved by the vector (dx, dy)
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        NeutralAxis {
            angle_deg: self.angle_deg,
            y_intercept: self.y_intercept + dy - self.slope() * dx,
        }
    }
}

impl std::fmt::Display for NeutralAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_horizontal() {
            write!(f, "y = {}", self.y_intercept)
        } else {
            write!(f, "y = tan({} deg)·x + {}", self.angle_deg, self.y_intercept)
        }
    }
}

/// Wrap a single polygon as a zone
pub fn zone_from_polygon(polygon: Polygon<f64>) -> Zone {
    MultiPolygon::new(vec![polygon])
}

/// The empty zone
pub fn empty_zone() -> Zone {
    MultiPolygon::new(Vec::new())
}

pub fn is_empty_zone(zone: &Zone) -> bool {
    zone.0.is_empty() || zone.unsigned_area() < AREA_TOLERANCE
}

pub fn zone_area(zone: &Zone) -> f64 {
    zone.unsigned_area()
}

pub fn zone_centroid(zone: &Zone) -> Option<Coord> {
    zone.centroid().map(|p| p.0)
}

pub fn zone_bounds(zone: &Zone) -> Option<Rect<f64>> {
    zone.bounding_rect()
}

/// True when the line has zone vertices strictly on both sides.
///
/// A line that only touches the boundary does not cross.
pub fn crosses(zone: &Zone, axis: &NeutralAxis) -> bool {
    let mut above = false;
    let mut below = false;
    for c in zone.exterior_coords_iter() {
        let d = axis.signed_distance(c);
        above |= d > LINE_TOLERANCE;
        below |= d < -LINE_TOLERANCE;
        if above && below {
            return true;
        }
    }
    false
}

/// Zone vertex with the largest perpendicular distance to the line.
///
/// Returns `None` for an empty zone. Ties keep the first vertex.
pub fn furthest_vertex(zone: &Zone, axis: &NeutralAxis) -> Option<(Coord, f64)> {
    zone.exterior_coords_iter().fold(None, |best, c| {
        let d = axis.distance(c);
        match best {
            Some((_, best_d)) if d <= best_d => best,
            _ => Some((c, d)),
        }
    })
}

/// Strict point-in-zone test for each point (boundary points are outside)
pub fn points_in_zone(points: &[Coord], zone: &Zone) -> Vec<bool> {
    points.iter().map(|&c| zone.contains(&Point::from(c))).collect()
}

/// Half-plane on one side of `axis`, as a polygon large enough to cover `extent`
fn half_plane(axis: &NeutralAxis, extent: &Rect<f64>, above: bool) -> Zone {
    let width = extent.width();
    let height = extent.height();
    let diagonal = (width * width + height * height).sqrt();
    let centre = extent.center();
    let reach = 4.0 * (diagonal + axis.distance(centre) + 1.0);

    let a = axis.project(centre);
    let u = axis.direction();
    let n = axis.normal();
    let side = if above { 1.0 } else { -1.0 };

    let p = |s: f64, t: f64| Coord {
        x: a.x + s * reach * u.x + t * side * reach * n.x,
        y: a.y + s * reach * u.y + t * side * reach * n.y,
    };

    // Counter-clockwise for either side
    let ring = if above {
        vec![p(-1.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(-1.0, 1.0), p(-1.0, 0.0)]
    } else {
        vec![p(-1.0, 1.0), p(1.0, 1.0), p(1.0, 0.0), p(-1.0, 0.0), p(-1.0, 1.0)]
    };
    zone_from_polygon(Polygon::new(LineString::from(ring), vec![]))
}

fn drop_slivers(zone: Zone) -> Zone {
    MultiPolygon::new(
        zone.0
            .into_iter()
            .filter(|p| p.unsigned_area() >= AREA_TOLERANCE)
            .collect(),
    )
}

/// Split a zone by a line into the parts above and below it.
///
/// Either part may be empty when the line misses the zone. Clipped vertices
/// are exact to about 1e-6 mm.
pub fn split_by_line(zone: &Zone, axis: &NeutralAxis) -> (Zone, Zone) {
    let Some(extent) = zone.bounding_rect() else {
        return (empty_zone(), empty_zone());
    };
    let above = drop_slivers(zone.intersection(&half_plane(axis, &extent, true)));
    let below = drop_slivers(zone.intersection(&half_plane(axis, &extent, false)));
    (above, below)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::polygon;

    fn rectangle(width: f64, height: f64) -> Zone {
        zone_from_polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: width, y: 0.0),
            (x: width, y: height),
            (x: 0.0, y: height),
        ])
    }

    #[test]
    fn test_evaluate_points() {
        let axis = NeutralAxis::horizontal(2.0);
        let ys = [-3.0, 0.0, 3.0, 6.0, 9.0];
        let above: Vec<bool> = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| axis.is_above(Coord { x: i as f64, y }))
            .collect();
        assert_eq!(above, vec![false, false, true, true, true]);
    }

    #[test]
    fn test_evaluate_points_negative() {
        let axis = NeutralAxis::horizontal(-60.0);
        assert!(axis.is_above(Coord { x: 175.0, y: -30.0 }));
        assert!(!axis.is_above(Coord { x: 175.0, y: -255.0 }));
    }

    #[test]
    fn test_point_on_line_counts_as_above() {
        let axis = NeutralAxis::horizontal(10.0);
        assert!(axis.is_above(Coord { x: -4.0, y: 10.0 }));
    }

    #[test]
    fn test_vertical_axis_rejected() {
        assert!(matches!(
            NeutralAxis::new(90.0, 0.0),
            Err(CalcError::UnsupportedOrientation { .. })
        ));
        assert!(NeutralAxis::new(-270.0, 0.0).is_err());
        assert!(NeutralAxis::new(45.0, 0.0).is_ok());
    }

    #[test]
    fn test_angle_normalization() {
        let axis = NeutralAxis::new(180.0, 5.0).unwrap();
        assert_relative_eq!(axis.angle_deg, 0.0);
        let axis = NeutralAxis::new(135.0, 0.0).unwrap();
        assert_relative_eq!(axis.angle_deg, -45.0);
    }

    #[test]
    fn test_distance_and_projection_inclined() {
        let axis = NeutralAxis::new(45.0, 0.0).unwrap();
        let p = Coord { x: 0.0, y: 2.0 };
        assert_relative_eq!(axis.signed_distance(p), 2.0_f64.sqrt(), epsilon = 1e-12);
        let q = axis.project(p);
        assert_relative_eq!(q.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(q.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_translation() {
        let axis = NeutralAxis::horizontal(300.0).translated(5.0, 40.0);
        assert_relative_eq!(axis.y_intercept, 340.0);
        let inclined = NeutralAxis::new(45.0, 0.0).unwrap().translated(1.0, 0.0);
        assert_relative_eq!(inclined.y_intercept, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distances_to_rebars() {
        let axis = NeutralAxis::horizontal(300.0);
        let xs = [40.0, 125.0, 210.0, 40.0, 210.0];
        let ys = [40.0, 40.0, 40.0, 460.0, 460.0];
        let d: Vec<f64> = xs
            .iter()
            .zip(ys)
            .map(|(&x, y)| axis.distance(Coord { x, y }))
            .collect();
        assert_eq!(d, vec![260.0, 260.0, 260.0, 160.0, 160.0]);
    }

    #[test]
    fn test_points_in_zone() {
        let zone = rectangle(250.0, 300.0);
        let points: Vec<Coord> = [(40.0, 40.0), (125.0, 40.0), (210.0, 40.0), (40.0, 460.0), (210.0, 460.0)]
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect();
        assert_eq!(points_in_zone(&points, &zone), vec![true, true, true, false, false]);
    }

    #[test]
    fn test_split_rectangle() {
        let zone = rectangle(250.0, 500.0);
        let (above, below) = split_by_line(&zone, &NeutralAxis::horizontal(300.0));
        assert_relative_eq!(zone_area(&above), 250.0 * 200.0, max_relative = 1e-9);
        assert_relative_eq!(zone_area(&below), 250.0 * 300.0, max_relative = 1e-9);
        assert_relative_eq!(zone_centroid(&above).unwrap().y, 400.0, max_relative = 1e-9);
    }

    #[test]
    fn test_split_missing_line() {
        let zone = rectangle(250.0, 500.0);
        let (above, below) = split_by_line(&zone, &NeutralAxis::horizontal(600.0));
        assert!(is_empty_zone(&above));
        assert_relative_eq!(zone_area(&below), 125_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_split_non_convex_gives_several_pieces() {
        // U-shape: two legs joined at the bottom
        let zone = zone_from_polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 300.0, y: 0.0),
            (x: 300.0, y: 400.0),
            (x: 200.0, y: 400.0),
            (x: 200.0, y: 100.0),
            (x: 100.0, y: 100.0),
            (x: 100.0, y: 400.0),
            (x: 0.0, y: 400.0),
        ]);
        let (above, below) = split_by_line(&zone, &NeutralAxis::horizontal(250.0));
        assert_eq!(above.0.len(), 2);
        assert_eq!(below.0.len(), 1);
        assert_relative_eq!(
            zone_area(&above) + zone_area(&below),
            zone_area(&zone),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_crosses() {
        let zone = rectangle(100.0, 100.0);
        assert!(crosses(&zone, &NeutralAxis::horizontal(50.0)));
        assert!(!crosses(&zone, &NeutralAxis::horizontal(100.0)));
        assert!(!crosses(&zone, &NeutralAxis::horizontal(-1.0)));
    }

    #[test]
    fn test_furthest_vertex() {
        let zone = rectangle(350.0, 450.0);
        let (p, d) = furthest_vertex(&zone, &NeutralAxis::horizontal(390.0)).unwrap();
        assert_relative_eq!(d, 390.0);
        assert_relative_eq!(p.y, 0.0);
        assert!(furthest_vertex(&empty_zone(), &NeutralAxis::horizontal(0.0)).is_none());
    }
}
