//! # Capacity Diagram Driver
//!
//! Sweeps the neutral axis across (and beyond) a section for both
//! compression sides and collects one [`CapacityPoint`] per location.
//!
//! ## Sweep
//!
//! ```text
//! AwaitingLocations ─► Sweeping(Above) ─► Sweeping(Below) ─► Done
//! ```
//!
//! Explicit locations in [`DiagramSettings::neutral_axis_locations`] are used
//! for both sides. Otherwise `n_locations / 2` intercepts are spread over the
//! section extent, widened by `margin_mm` below (compression above) or above
//! (compression below), and the two end values are replaced by `∓sentinel`
//! to represent an axis at infinity.
//!
//! Each location is independent; with the `parallel` feature the locations
//! of one side are evaluated on the rayon thread pool. Output order does not
//! depend on the feature.
//!
//! Any classification or split failure aborts the whole diagram.
//!
//! ## Example
//!
//! ```rust
//! use conc_core::calculations::diagram::{capacity_diagram, DiagramSettings};
//! use conc_core::materials::{ConcreteMaterial, ReinforcingSteel};
//! use conc_core::section::Section;
//!
//! let section = Section::from_arrays(
//!     &[0.0, 350.0, 350.0, 0.0],
//!     &[0.0, 0.0, 450.0, 450.0],
//!     &[60.0, 290.0, 60.0, 290.0],
//!     &[60.0, 60.0, 390.0, 390.0],
//!     &[25.0, 25.0, 32.0, 32.0],
//!     ConcreteMaterial::new(25.0).with_alpha_cc(0.85),
//!     ReinforcingSteel::new(500.0),
//! ).unwrap();
//!
//! let diagram = capacity_diagram(&section, &DiagramSettings::default()).unwrap();
//! assert_eq!(diagram.points.len(), 60);
//! println!("Max compression: {:.0} kN", diagram.max_compression().unwrap().normal_force_kn);
//! ```

use geo::{Coord, CoordsIter};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::force_moment::{evaluate, CapacityPoint};
use super::zones::CompressionSide;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::NeutralAxis;
use crate::section::Section;
use crate::sectiongen::{neutral_axis_locations, DEFAULT_SENTINEL};

fn default_n_locations() -> usize {
    60
}

fn default_margin() -> f64 {
    1000.0
}

fn default_sentinel() -> f64 {
    DEFAULT_SENTINEL
}

/// Sweep configuration.
///
/// ## JSON Example
///
/// ```json
/// { "n_locations": 40, "neutral_axis_locations": [390, 292, 209, 60, 0, -99999] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSettings {
    /// Total number of generated locations over both sides
    #[serde(default = "default_n_locations")]
    pub n_locations: usize,

    /// Extension of the sweep beyond the section edge (mm)
    #[serde(default = "default_margin")]
    pub margin_mm: f64,

    /// Magnitude of the end locations standing in for an axis at infinity (mm)
    #[serde(default = "default_sentinel")]
    pub sentinel_mm: f64,

    /// Inclination of the neutral axis (degrees)
    #[serde(default)]
    pub angle_deg: f64,

    /// Explicit y-intercepts, used as given for both sides
    #[serde(default)]
    pub neutral_axis_locations: Option<Vec<f64>>,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        DiagramSettings {
            n_locations: default_n_locations(),
            margin_mm: default_margin(),
            sentinel_mm: default_sentinel(),
            angle_deg: 0.0,
            neutral_axis_locations: None,
        }
    }
}

impl DiagramSettings {
    /// Settings with explicit neutral axis locations
    pub fn with_locations(locations: Vec<f64>) -> Self {
        DiagramSettings {
            neutral_axis_locations: Some(locations),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        match &self.neutral_axis_locations {
            Some(locations) => {
                if locations.is_empty() {
                    return Err(CalcError::invalid_input(
                        "neutral_axis_locations",
                        "[]",
                        "At least one location is required",
                    ));
                }
                if let Some(bad) = locations.iter().find(|y| !y.is_finite()) {
                    return Err(CalcError::invalid_input(
                        "neutral_axis_locations",
                        bad.to_string(),
                        "Locations must be finite",
                    ));
                }
            }
            None => {
                if self.n_locations < 4 {
                    return Err(CalcError::invalid_input(
                        "n_locations",
                        self.n_locations.to_string(),
                        "At least 4 locations are needed (2 per side)",
                    ));
                }
            }
        }
        if !(self.margin_mm >= 0.0) {
            return Err(CalcError::invalid_input(
                "margin_mm",
                self.margin_mm.to_string(),
                "Margin cannot be negative",
            ));
        }
        if !(self.sentinel_mm > 0.0) {
            return Err(CalcError::invalid_input(
                "sentinel_mm",
                self.sentinel_mm.to_string(),
                "Sentinel must be positive",
            ));
        }
        // Rejects vertical axes up front
        NeutralAxis::new(self.angle_deg, 0.0)?;
        Ok(())
    }
}

/// Progress of a diagram computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    AwaitingLocations,
    Sweeping(CompressionSide),
    Done,
}

impl SweepState {
    pub fn next(self) -> SweepState {
        match self {
            SweepState::AwaitingLocations => SweepState::Sweeping(CompressionSide::Above),
            SweepState::Sweeping(CompressionSide::Above) => SweepState::Sweeping(CompressionSide::Below),
            SweepState::Sweeping(CompressionSide::Below) | SweepState::Done => SweepState::Done,
        }
    }
}

/// Ordered capacity points of one section, compression above first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityDiagram {
    pub label: String,
    /// Moment reference point
    pub plastic_centroid: Coord,
    pub points: Vec<CapacityPoint>,
}

impl CapacityDiagram {
    pub fn normal_forces(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.normal_force_kn).collect()
    }

    pub fn moments(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.moment_knm).collect()
    }

    /// (N, M) pairs in sweep order
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.normal_force_kn, p.moment_knm)).collect()
    }

    pub fn for_side(&self, side: CompressionSide) -> impl Iterator<Item = &CapacityPoint> {
        self.points.iter().filter(move |p| p.compression_side == side)
    }

    /// Point with the most negative axial force
    pub fn max_compression(&self) -> Option<&CapacityPoint> {
        self.points.iter().min_by(|a, b| a.normal_force_kn.total_cmp(&b.normal_force_kn))
    }

    /// Point with the most positive axial force
    pub fn max_tension(&self) -> Option<&CapacityPoint> {
        self.points.iter().max_by(|a, b| a.normal_force_kn.total_cmp(&b.normal_force_kn))
    }

    pub fn max_moment(&self) -> Option<&CapacityPoint> {
        self.points.iter().max_by(|a, b| a.moment_knm.total_cmp(&b.moment_knm))
    }

    pub fn min_moment(&self) -> Option<&CapacityPoint> {
        self.points.iter().min_by(|a, b| a.moment_knm.total_cmp(&b.moment_knm))
    }
}

/// Compute the N–M capacity diagram of a section.
pub fn capacity_diagram(section: &Section, settings: &DiagramSettings) -> CalcResult<CapacityDiagram> {
    settings.validate()?;

    let mut points = Vec::new();
    let mut state = SweepState::AwaitingLocations;
    while state != SweepState::Done {
        if let SweepState::Sweeping(side) = state {
            let locations = sweep_locations(section, settings, side)?;
            tracing::debug!(label = section.label(), %side, n = locations.len(), "sweeping neutral axis");
            points.extend(sweep(section, settings.angle_deg, side, &locations)?);
        }
        state = state.next();
    }

    Ok(CapacityDiagram {
        label: section.label().to_string(),
        plastic_centroid: section.plastic_centroid(),
        points,
    })
}

/// Neutral axis intercepts swept for one compression side
pub fn sweep_locations(section: &Section, settings: &DiagramSettings, side: CompressionSide) -> CalcResult<Vec<f64>> {
    if let Some(locations) = &settings.neutral_axis_locations {
        return Ok(locations.clone());
    }

    let (lower, upper) = intercept_range(section, settings.angle_deg)?;
    let margin = settings.margin_mm;
    let bounds = match side {
        CompressionSide::Above => (lower - margin, upper),
        CompressionSide::Below => (lower, upper + margin),
    };
    let sentinel = settings
        .sentinel_mm
        .max(10.0 * (lower.abs() + upper.abs() + margin));

    neutral_axis_locations(bounds, settings.n_locations / 2, true, sentinel)
}

/// Range of y-intercepts of lines at `angle_deg` through the section's vertices
fn intercept_range(section: &Section, angle_deg: f64) -> CalcResult<(f64, f64)> {
    let slope = NeutralAxis::new(angle_deg, 0.0)?.slope();
    Ok(section
        .outline()
        .exterior_coords_iter()
        .map(|c| c.y - slope * c.x)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| (lo.min(b), hi.max(b))))
}

fn sweep(section: &Section, angle_deg: f64, side: CompressionSide, locations: &[f64]) -> CalcResult<Vec<CapacityPoint>> {
    let axes = locations
        .iter()
        .map(|&y| NeutralAxis::new(angle_deg, y))
        .collect::<CalcResult<Vec<_>>>()?;

    let step = |axis: &NeutralAxis| -> CalcResult<CapacityPoint> {
        let point = evaluate(section, axis, side)?;
        tracing::debug!(
            neutral_axis = %axis,
            %side,
            state = %point.state,
            n_kn = point.normal_force_kn,
            m_knm = point.moment_knm,
            "capacity point"
        );
        Ok(point)
    };

    #[cfg(feature = "parallel")]
    return axes.par_iter().map(step).collect();
    #[cfg(not(feature = "parallel"))]
    return axes.iter().map(step).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::force_moment::SectionState;
    use crate::materials::{ConcreteMaterial, ReinforcingSteel};
    use crate::section::{Rebar, SectionInput};

    fn section() -> Section {
        Section::new(SectionInput {
            label: "R1".to_string(),
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
        })
        .unwrap()
    }

    #[test]
    fn test_sweep_state_sequence() {
        let mut state = SweepState::AwaitingLocations;
        let mut seen = vec![state];
        while state != SweepState::Done {
            state = state.next();
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                SweepState::AwaitingLocations,
                SweepState::Sweeping(CompressionSide::Above),
                SweepState::Sweeping(CompressionSide::Below),
                SweepState::Done,
            ]
        );
    }

    #[test]
    fn test_auto_locations() {
        let settings = DiagramSettings {
            n_locations: 10,
            ..Default::default()
        };
        let above = sweep_locations(&section(), &settings, CompressionSide::Above).unwrap();
        assert_eq!(above.len(), 5);
        assert_eq!(above[0], -1.0e5);
        assert_eq!(above[1], -1000.0 + 1450.0 / 4.0);
        assert_eq!(above[4], 1.0e5);

        let below = sweep_locations(&section(), &settings, CompressionSide::Below).unwrap();
        assert_eq!(below[1], 1450.0 / 4.0);
    }

    #[test]
    fn test_sentinel_scales_with_section() {
        let settings = DiagramSettings {
            sentinel_mm: 10.0,
            ..Default::default()
        };
        let locations = sweep_locations(&section(), &settings, CompressionSide::Above).unwrap();
        assert_eq!(locations[0], -14_500.0);
    }

    #[test]
    fn test_explicit_locations_used_for_both_sides() {
        let settings = DiagramSettings::with_locations(vec![100.0, 200.0, 300.0]);
        let diagram = capacity_diagram(&section(), &settings).unwrap();
        assert_eq!(diagram.points.len(), 6);
        assert_eq!(diagram.for_side(CompressionSide::Above).count(), 3);
        assert_eq!(diagram.points[0].compression_side, CompressionSide::Above);
        assert_eq!(diagram.points[3].compression_side, CompressionSide::Below);
        assert_eq!(diagram.points[3].neutral_axis.y_intercept, 100.0);
    }

    #[test]
    fn test_default_diagram_ends() {
        let diagram = capacity_diagram(&section(), &DiagramSettings::default()).unwrap();
        assert_eq!(diagram.points.len(), 60);
        assert_eq!(diagram.points[0].state, SectionState::FullCompression);
        assert_eq!(diagram.points[29].state, SectionState::FullTension);
        assert_eq!(diagram.points[30].state, SectionState::FullTension);
        assert_eq!(diagram.points[59].state, SectionState::FullCompression);
    }

    #[test]
    fn test_queries() {
        let diagram = capacity_diagram(&section(), &DiagramSettings::default()).unwrap();
        let max_c = diagram.max_compression().unwrap();
        let max_t = diagram.max_tension().unwrap();
        assert!(max_c.normal_force_kn < 0.0);
        assert!(max_t.normal_force_kn > 0.0);
        assert!(diagram.max_moment().unwrap().moment_knm > 0.0);
        assert!(diagram.min_moment().unwrap().moment_knm < 0.0);
        assert_eq!(diagram.pairs().len(), diagram.normal_forces().len());
    }

    #[test]
    fn test_invalid_settings() {
        let section = section();
        let settings = DiagramSettings {
            n_locations: 2,
            ..Default::default()
        };
        assert!(capacity_diagram(&section, &settings).is_err());

        let settings = DiagramSettings::with_locations(vec![]);
        assert!(capacity_diagram(&section, &settings).is_err());

        let settings = DiagramSettings {
            angle_deg: 90.0,
            ..Default::default()
        };
        assert!(matches!(
            capacity_diagram(&section, &settings),
            Err(CalcError::UnsupportedOrientation { .. })
        ));
    }

    #[test]
    fn test_settings_json_defaults() {
        let settings: DiagramSettings = serde_json::from_str(r#"{ "n_locations": 40 }"#).unwrap();
        assert_eq!(settings.n_locations, 40);
        assert_eq!(settings.margin_mm, 1000.0);
        assert!(settings.neutral_axis_locations.is_none());
    }
}
