//! # Reinforced Concrete Section
//!
//! A [`Section`] is an arbitrary (possibly non-convex) polygonal concrete
//! outline with point rebars and the two design materials. It is validated
//! once at construction, caches all derived geometry, and is never mutated
//! afterwards, so one instance can be shared by any number of sweeps.
//!
//! ## Example
//!
//! ```rust
//! use conc_core::materials::{ConcreteMaterial, ReinforcingSteel};
//! use conc_core::section::{Rebar, Section, SectionInput};
//!
//! let input = SectionInput {
//!     label: "Column C1".to_string(),
//!     vertices: vec![[0.0, 0.0], [350.0, 0.0], [350.0, 450.0], [0.0, 450.0]],
//!     rebars: vec![
//!         Rebar::new(60.0, 60.0, 25.0),
//!         Rebar::new(290.0, 60.0, 25.0),
//!         Rebar::new(60.0, 390.0, 32.0),
//!         Rebar::new(290.0, 390.0, 32.0),
//!     ],
//!     concrete: ConcreteMaterial::new(25.0).with_alpha_cc(0.85),
//!     steel: ReinforcingSteel::new(500.0),
//!     cover_mm: 45.0,
//! };
//!
//! let section = Section::new(input).unwrap();
//! let pc = section.plastic_centroid();
//! assert_eq!((pc.x.round(), pc.y.round()), (175.0, 238.0));
//! ```

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, BoundingRect, Centroid, Closest, ClosestPoint, Contains, Translate};
use geo::{Coord, LineString, Point, Polygon, Rect};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::geometry::{self, Zone, AREA_TOLERANCE};
use crate::materials::{ConcreteMaterial, ReinforcingSteel};
use crate::units::SquareMillimeters;

/// A single reinforcing bar, treated as a point with an area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rebar {
    /// x-coordinate of the bar centre (mm)
    pub x: f64,
    /// y-coordinate of the bar centre (mm)
    pub y: f64,
    /// Bar diameter (mm)
    pub diameter: f64,
}

impl Rebar {
    pub fn new(x: f64, y: f64, diameter: f64) -> Self {
        Rebar { x, y, diameter }
    }

    /// Steel area π·d²/4
    pub fn area(&self) -> SquareMillimeters {
        SquareMillimeters(std::f64::consts::PI * self.diameter * self.diameter / 4.0)
    }

    pub fn position(&self) -> Coord {
        Coord { x: self.x, y: self.y }
    }
}

fn default_cover() -> f64 {
    45.0
}

/// Raw section definition as supplied by a user or a project file.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Column C1",
///   "vertices": [[0, 0], [350, 0], [350, 450], [0, 450]],
///   "rebars": [
///     { "x": 60, "y": 60, "diameter": 25 },
///     { "x": 290, "y": 390, "diameter": 32 }
///   ],
///   "concrete": { "fck_mpa": 25.0, "alpha_cc": 0.85 },
///   "steel": { "fyk_mpa": 500.0 },
///   "cover_mm": 45.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionInput {
    /// User label (e.g., "C1", "Wall pier")
    #[serde(default)]
    pub label: String,

    /// Outline vertices in order, closing vertex optional (mm)
    pub vertices: Vec<[f64; 2]>,

    /// Reinforcing bars
    #[serde(default)]
    pub rebars: Vec<Rebar>,

    /// Concrete design parameters
    pub concrete: ConcreteMaterial,

    /// Reinforcing steel design parameters
    pub steel: ReinforcingSteel,

    /// Nominal concrete cover to the bar surface (mm)
    #[serde(default = "default_cover")]
    pub cover_mm: f64,
}

/// A rebar whose clear cover is below the nominal cover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverViolation {
    /// Index of the bar in the section's rebar list
    pub index: usize,
    pub rebar: Rebar,
    /// Distance from bar surface to the nearest concrete edge (negative outside)
    pub clear_cover_mm: f64,
    /// Nominal cover of the section
    pub required_mm: f64,
    /// Whether the bar centre lies inside the concrete
    pub inside: bool,
}

/// Validated reinforced concrete section with cached derived quantities.
///
/// Serializes as its [`SectionInput`]; deserialization re-runs validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SectionInput", into = "SectionInput")]
pub struct Section {
    input: SectionInput,
    outline: Polygon<f64>,
    shape: Zone,
    rebar_positions: Vec<Coord>,
    area: f64,
    centroid: Coord,
    bounds: Rect<f64>,
    steel_area: f64,
    plastic_centroid: Coord,
}

impl Section {
    /// Validate the input and compute all derived quantities.
    pub fn new(input: SectionInput) -> CalcResult<Self> {
        input.concrete.validate()?;
        input.steel.validate()?;

        let coords = outline_coords(&input.vertices)?;
        validate_simple(&coords)?;
        validate_rebars(&input.rebars)?;
        if !(input.cover_mm >= 0.0) {
            return Err(CalcError::invalid_input(
                "cover_mm",
                input.cover_mm.to_string(),
                "Cover cannot be negative",
            ));
        }

        let outline = Polygon::new(LineString::from(coords), vec![]);
        let area = outline.unsigned_area();
        if area < AREA_TOLERANCE {
            return Err(CalcError::invalid_input(
                "vertices",
                format!("{} vertices", input.vertices.len()),
                "Outline encloses no area",
            ));
        }

        let centroid = outline.centroid().map(|p| p.0).ok_or_else(|| CalcError::Internal {
            message: "centroid of a non-degenerate outline".to_string(),
        })?;
        let bounds = outline.bounding_rect().ok_or_else(|| CalcError::Internal {
            message: "bounds of a non-degenerate outline".to_string(),
        })?;

        let rebar_positions: Vec<Coord> = input.rebars.iter().map(Rebar::position).collect();
        let steel_area: f64 = input.rebars.iter().map(|r| r.area().0).sum();
        let plastic_centroid = plastic_centroid(&input, area, centroid);

        tracing::debug!(
            label = %input.label,
            area,
            centroid_x = centroid.x,
            centroid_y = centroid.y,
            plastic_x = plastic_centroid.x,
            plastic_y = plastic_centroid.y,
            rebars = input.rebars.len(),
            "section constructed"
        );

        Ok(Section {
            shape: geometry::zone_from_polygon(outline.clone()),
            outline,
            rebar_positions,
            area,
            centroid,
            bounds,
            steel_area,
            plastic_centroid,
            input,
        })
    }

    /// Build a section from separate coordinate arrays.
    ///
    /// `xs`/`ys` are the outline vertices, `rebar_xs`/`rebar_ys`/`diameters`
    /// the bars. Arrays that belong together must have equal length.
    pub fn from_arrays(
        xs: &[f64],
        ys: &[f64],
        rebar_xs: &[f64],
        rebar_ys: &[f64],
        diameters: &[f64],
        concrete: ConcreteMaterial,
        steel: ReinforcingSteel,
    ) -> CalcResult<Self> {
        if xs.len() != ys.len() {
            return Err(CalcError::invalid_input(
                "vertices",
                format!("{} x-coordinates, {} y-coordinates", xs.len(), ys.len()),
                "Vertex coordinate arrays must have equal length",
            ));
        }
        if rebar_xs.len() != rebar_ys.len() || rebar_xs.len() != diameters.len() {
            return Err(CalcError::invalid_input(
                "rebars",
                format!(
                    "{} x-coordinates, {} y-coordinates, {} diameters",
                    rebar_xs.len(),
                    rebar_ys.len(),
                    diameters.len()
                ),
                "Rebar coordinate and diameter arrays must have equal length",
            ));
        }

        let vertices = xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect();
        let rebars = rebar_xs
            .iter()
            .zip(rebar_ys)
            .zip(diameters)
            .map(|((&x, &y), &d)| Rebar::new(x, y, d))
            .collect();

        Section::new(SectionInput {
            label: String::new(),
            vertices,
            rebars,
            concrete,
            steel,
            cover_mm: default_cover(),
        })
    }

    /// Same section with a new label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.input.label = label.into();
        self
    }

    /// A copy of this section moved by (dx, dy).
    pub fn translated(&self, dx: f64, dy: f64) -> CalcResult<Self> {
        let moved = self.outline.translate(dx, dy);
        let mut input = self.input.clone();
        input.vertices = moved.exterior().coords().map(|c| [c.x, c.y]).collect();
        for rebar in &mut input.rebars {
            rebar.x += dx;
            rebar.y += dy;
        }
        Section::new(input)
    }

    pub fn label(&self) -> &str {
        &self.input.label
    }

    pub fn input(&self) -> &SectionInput {
        &self.input
    }

    pub fn outline(&self) -> &Polygon<f64> {
        &self.outline
    }

    /// The outline as a zone, ready for splitting
    pub fn shape(&self) -> &Zone {
        &self.shape
    }

    pub fn rebars(&self) -> &[Rebar] {
        &self.input.rebars
    }

    pub fn rebar_positions(&self) -> &[Coord] {
        &self.rebar_positions
    }

    pub fn concrete(&self) -> &ConcreteMaterial {
        &self.input.concrete
    }

    pub fn steel(&self) -> &ReinforcingSteel {
        &self.input.steel
    }

    pub fn cover_mm(&self) -> f64 {
        self.input.cover_mm
    }

    /// Gross concrete area (mm²)
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Geometric centroid of the concrete outline
    pub fn centroid(&self) -> Coord {
        self.centroid
    }

    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    pub fn min_y(&self) -> f64 {
        self.bounds.min().y
    }

    pub fn max_y(&self) -> f64 {
        self.bounds.max().y
    }

    /// Total reinforcement area (mm²)
    pub fn steel_area(&self) -> f64 {
        self.steel_area
    }

    /// Reinforcement ratio As / Ac
    pub fn reinforcement_ratio(&self) -> f64 {
        self.steel_area / self.area
    }

    /// Force-weighted centroid of the fully plastic section; moment reference point
    pub fn plastic_centroid(&self) -> Coord {
        self.plastic_centroid
    }

    /// Rebars whose clear cover is below [`Section::cover_mm`] or that lie outside the concrete.
    pub fn cover_violations(&self) -> Vec<CoverViolation> {
        let required = self.input.cover_mm;
        self.input
            .rebars
            .iter()
            .enumerate()
            .filter_map(|(index, rebar)| {
                let centre = Point::from(rebar.position());
                let inside = self.outline.contains(&centre);
                let edge_distance = distance_to_boundary(&self.outline, centre);
                let radius = rebar.diameter / 2.0;
                let clear_cover_mm = if inside {
                    edge_distance - radius
                } else {
                    -(edge_distance + radius)
                };
                (!inside || clear_cover_mm < required - 1e-9).then_some(CoverViolation {
                    index,
                    rebar: *rebar,
                    clear_cover_mm,
                    required_mm: required,
                    inside,
                })
            })
            .collect()
    }
}

impl TryFrom<SectionInput> for Section {
    type Error = CalcError;

    fn try_from(input: SectionInput) -> CalcResult<Self> {
        Section::new(input)
    }
}

impl From<Section> for SectionInput {
    fn from(section: Section) -> Self {
        section.input
    }
}

/// Force-weighted centroid of concrete at αcc·fcd and steel at fyd
fn plastic_centroid(input: &SectionInput, area: f64, centroid: Coord) -> Coord {
    let fc = input.concrete.design_stress().0 * area;
    let fyd = input.steel.fyd().0;
    let (fs, fs_x, fs_y) = input.rebars.iter().fold((0.0, 0.0, 0.0), |(f, fx, fy), r| {
        let force = r.area().0 * fyd;
        (f + force, fx + force * r.x, fy + force * r.y)
    });
    Coord {
        x: (fc * centroid.x + fs_x) / (fc + fs),
        y: (fc * centroid.y + fs_y) / (fc + fs),
    }
}

fn distance_to_boundary(outline: &Polygon<f64>, p: Point<f64>) -> f64 {
    outline
        .exterior()
        .lines()
        .filter_map(|line| match line.closest_point(&p) {
            Closest::Intersection(q) | Closest::SinglePoint(q) => Some((q.x() - p.x()).hypot(q.y() - p.y())),
            Closest::Indeterminate => None,
        })
        .fold(f64::INFINITY, f64::min)
}

/// Outline coordinates with the optional closing vertex removed
fn outline_coords(vertices: &[[f64; 2]]) -> CalcResult<Vec<Coord>> {
    let mut coords: Vec<Coord> = vertices.iter().map(|&[x, y]| Coord { x, y }).collect();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    if coords.len() < 3 {
        return Err(CalcError::invalid_input(
            "vertices",
            format!("{} vertices", coords.len()),
            "An outline needs at least 3 distinct vertices",
        ));
    }
    if let Some(bad) = coords.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(CalcError::invalid_input(
            "vertices",
            format!("({}, {})", bad.x, bad.y),
            "Vertex coordinates must be finite",
        ));
    }
    Ok(coords)
}

/// Reject outlines whose edges cross or overlap each other
fn validate_simple(coords: &[Coord]) -> CalcResult<()> {
    let n = coords.len();
    let edges: Vec<geo::Line<f64>> = (0..n)
        .map(|i| geo::Line::new(coords[i], coords[(i + 1) % n]))
        .collect();

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            let hit = line_intersection(edges[i], edges[j]);
            let invalid = match hit {
                None => false,
                Some(LineIntersection::Collinear { .. }) => true,
                Some(LineIntersection::SinglePoint { .. }) => !adjacent,
            };
            if invalid {
                return Err(CalcError::invalid_input(
                    "vertices",
                    format!("edges {} and {}", i, j),
                    "Outline is not a simple polygon (edges intersect)",
                ));
            }
        }
    }
    Ok(())
}

fn validate_rebars(rebars: &[Rebar]) -> CalcResult<()> {
    for (i, rebar) in rebars.iter().enumerate() {
        if !rebar.x.is_finite() || !rebar.y.is_finite() {
            return Err(CalcError::invalid_input(
                format!("rebars[{}]", i),
                format!("({}, {})", rebar.x, rebar.y),
                "Rebar coordinates must be finite",
            ));
        }
        if !(rebar.diameter > 0.0) || !rebar.diameter.is_finite() {
            return Err(CalcError::invalid_input(
                format!("rebars[{}].diameter", i),
                rebar.diameter.to_string(),
                "Rebar diameter must be positive",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_input() -> SectionInput {
        SectionInput {
            label: "Example 4.10".to_string(),
            vertices: vec![[0.0, 0.0], [350.0, 0.0], [350.0, 450.0], [0.0, 450.0]],
            rebars: vec![
                Rebar::new(60.0, 60.0, 25.0),
                Rebar::new(290.0, 60.0, 25.0),
                Rebar::new(60.0, 390.0, 32.0),
                Rebar::new(290.0, 390.0, 32.0),
            ],
            concrete: ConcreteMaterial::new(25.0).with_alpha_cc(0.85),
            steel: ReinforcingSteel::new(500.0),
            cover_mm: 45.0,
        }
    }

    #[test]
    fn test_derived_quantities() {
        let section = Section::new(reference_input()).unwrap();
        assert_relative_eq!(section.area(), 157_500.0, max_relative = 1e-12);
        assert_relative_eq!(section.centroid().x, 175.0, max_relative = 1e-12);
        assert_relative_eq!(section.centroid().y, 225.0, max_relative = 1e-12);
        assert_eq!(section.min_y(), 0.0);
        assert_eq!(section.max_y(), 450.0);
        assert_relative_eq!(
            section.steel_area(),
            std::f64::consts::PI / 4.0 * (2.0 * 25.0 * 25.0 + 2.0 * 32.0 * 32.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_plastic_centroid_reference() {
        let section = Section::new(reference_input()).unwrap();
        let pc = section.plastic_centroid();
        assert_eq!(pc.x.round(), 175.0);
        assert_eq!(pc.y.round(), 238.0);
    }

    #[test]
    fn test_plastic_centroid_without_rebars() {
        let mut input = reference_input();
        input.rebars.clear();
        let section = Section::new(input).unwrap();
        assert_relative_eq!(section.plastic_centroid().y, 225.0, max_relative = 1e-12);
    }

    #[test]
    fn test_closing_vertex_accepted() {
        let mut input = reference_input();
        input.vertices.push([0.0, 0.0]);
        let section = Section::new(input).unwrap();
        assert_eq!(section.outline().exterior().0.len(), 5);
    }

    #[test]
    fn test_self_intersecting_outline_rejected() {
        let mut input = reference_input();
        // Bow-tie
        input.vertices = vec![[0.0, 0.0], [350.0, 450.0], [350.0, 0.0], [0.0, 450.0]];
        let err = Section::new(input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_too_few_vertices_rejected() {
        let mut input = reference_input();
        input.vertices.truncate(2);
        assert!(Section::new(input).is_err());
    }

    #[test]
    fn test_non_positive_diameter_rejected() {
        let mut input = reference_input();
        input.rebars[2].diameter = 0.0;
        assert!(Section::new(input).is_err());
    }

    #[test]
    fn test_from_arrays_mismatched_lengths() {
        let c = ConcreteMaterial::new(25.0);
        let s = ReinforcingSteel::new(500.0);
        let outline_x = [0.0, 350.0, 350.0, 0.0];
        let outline_y = [0.0, 0.0, 450.0, 450.0];

        let result = Section::from_arrays(&outline_x, &outline_y, &[60.0, 290.0], &[60.0], &[25.0, 25.0], c, s);
        assert!(matches!(result, Err(CalcError::InvalidInput { ref field, .. }) if field == "rebars"));

        let result = Section::from_arrays(&outline_x, &outline_y[..3], &[], &[], &[], c, s);
        assert!(matches!(result, Err(CalcError::InvalidInput { ref field, .. }) if field == "vertices"));

        let ok = Section::from_arrays(&outline_x, &outline_y, &[60.0], &[60.0], &[25.0], c, s).unwrap();
        assert_eq!(ok.rebars().len(), 1);
    }

    #[test]
    fn test_cover_violations() {
        let mut input = reference_input();
        input.cover_mm = 40.0;
        input.rebars.push(Rebar::new(20.0, 225.0, 20.0));
        input.rebars.push(Rebar::new(400.0, 225.0, 20.0));
        let section = Section::new(input).unwrap();
        let violations = section.cover_violations();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].index, 4);
        assert!(violations[0].inside);
        assert_relative_eq!(violations[0].clear_cover_mm, 10.0, epsilon = 1e-9);
        assert_eq!(violations[1].index, 5);
        assert!(!violations[1].inside);
        assert!(violations[1].clear_cover_mm < 0.0);
    }

    #[test]
    fn test_reference_bars_respect_cover() {
        // 60 - 32/2 = 44 < 45 for the top bars, 60 - 12.5 = 47.5 for the bottom bars
        let section = Section::new(reference_input()).unwrap();
        let violations = section.cover_violations();
        assert_eq!(violations.iter().map(|v| v.index).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_translated() {
        let section = Section::new(reference_input()).unwrap();
        let moved = section.translated(100.0, -50.0).unwrap();
        assert_relative_eq!(moved.plastic_centroid().x, section.plastic_centroid().x + 100.0, epsilon = 1e-9);
        assert_relative_eq!(moved.plastic_centroid().y, section.plastic_centroid().y - 50.0, epsilon = 1e-9);
        assert_relative_eq!(moved.area(), section.area(), max_relative = 1e-12);
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let section = Section::new(reference_input()).unwrap();
        let json = serde_json::to_string(&section).unwrap();
        let roundtrip: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(section, roundtrip);

        let bad = r#"{ "vertices": [[0, 0], [1, 1]], "concrete": { "fck_mpa": 25 }, "steel": { "fyk_mpa": 500 } }"#;
        assert!(serde_json::from_str::<Section>(bad).is_err());
    }
}
