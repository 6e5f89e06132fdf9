//! # Force/Moment Accumulator
//!
//! Computes the axial force N and bending moment M carried by a section for
//! one neutral axis position, from the rectangular concrete stress block and
//! strain compatibility in the reinforcement.
//!
//! ## Sign Convention
//!
//! - Compression is negative: concrete forces, compression-side rebar
//!   distances, strains and stresses.
//! - Moments are taken about the plastic centroid with arm `y_pl − y`, so a
//!   section compressed on its upper side has a positive moment.
//!
//! ## States
//!
//! | State | Concrete | Rebar distances | Failure reference |
//! |-------|----------|-----------------|-------------------|
//! | Full compression | stress block | all negative | extreme fibre, `eps_cu` or interpolated `eps_c` |
//! | Full tension | none | all positive | farthest rebar, `eps_su` |
//! | Mixed | stress block | positive inside tension zone | extreme fibre, `eps_cu` |
//!
//! ## Example
//!
//! ```rust
//! use conc_core::calculations::force_moment::evaluate;
//! use conc_core::calculations::zones::CompressionSide;
//! use conc_core::geometry::NeutralAxis;
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
//! let point = evaluate(&section, &NeutralAxis::horizontal(209.0), CompressionSide::Above).unwrap();
//! assert_eq!(point.normal_force_kn.round(), -1230.0);
//! assert_eq!(point.moment_knm.round(), 292.0);
//! ```

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::compression_block::{split_block, CompressionBlock};
use super::zones::{classify, CompressionSide, Zones};
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{self, NeutralAxis, Zone, LINE_TOLERANCE};
use crate::section::Section;
use crate::units::{Kilonewtons, Millimeters, SquareMillimeters};

/// Stress state of the whole section for one neutral axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    FullCompression,
    FullTension,
    Mixed,
}

impl SectionState {
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionState::FullCompression => "full compression",
            SectionState::FullTension => "full tension",
            SectionState::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for SectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Classified zones, one variant per state
#[derive(Debug, Clone, Copy)]
pub enum ZoneState<'a> {
    FullCompression { compression: &'a Zone },
    FullTension { tension: &'a Zone },
    Mixed { compression: &'a Zone, tension: &'a Zone },
}

impl<'a> ZoneState<'a> {
    /// Select the state from zone emptiness. Two empty zones are an error.
    pub fn of(zones: &'a Zones) -> CalcResult<Self> {
        match (zones.compression_is_empty(), zones.tension_is_empty()) {
            (false, true) => Ok(ZoneState::FullCompression {
                compression: &zones.compression,
            }),
            (true, false) => Ok(ZoneState::FullTension {
                tension: &zones.tension,
            }),
            (false, false) => Ok(ZoneState::Mixed {
                compression: &zones.compression,
                tension: &zones.tension,
            }),
            (true, true) => Err(CalcError::calculation_failed(
                "zone state",
                "both compression and tension zones are empty",
            )),
        }
    }

    pub fn state(&self) -> SectionState {
        match self {
            ZoneState::FullCompression { .. } => SectionState::FullCompression,
            ZoneState::FullTension { .. } => SectionState::FullTension,
            ZoneState::Mixed { .. } => SectionState::Mixed,
        }
    }

    pub fn compression(&self) -> Option<&'a Zone> {
        match *self {
            ZoneState::FullCompression { compression } | ZoneState::Mixed { compression, .. } => Some(compression),
            ZoneState::FullTension { .. } => None,
        }
    }
}

/// What governs failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReference {
    /// Concrete crushing at the extreme compression fibre
    ExtremeFiber,
    /// Steel rupture at the rebar farthest from the axis
    ExtremeRebar,
}

/// Reference point of the linear strain distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FailureCriterion {
    pub reference: FailureReference,
    /// Strain magnitude at the reference point
    pub strain: f64,
    /// Perpendicular distance from the neutral axis to the reference point (mm)
    pub distance_mm: f64,
    pub point: Coord,
}

/// Concrete stress block resultant
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConcreteContribution {
    pub block_area_mm2: f64,
    pub block_centroid: Option<Coord>,
    /// Lever arm `y_pl − y_block` (mm)
    pub arm_mm: f64,
    pub force_kn: f64,
    pub moment_knm: f64,
}

/// Strain compatibility result for one rebar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebarResponse {
    pub index: usize,
    pub position: Coord,
    pub area_mm2: f64,
    /// Signed distance to the neutral axis, negative on the compression side (mm)
    pub distance_mm: f64,
    pub strain: f64,
    pub stress_mpa: f64,
    pub force_kn: f64,
    /// Lever arm `y_pl − y` (mm)
    pub arm_mm: f64,
    pub moment_knm: f64,
}

/// Sum of all rebar responses
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SteelContribution {
    pub rebars: Vec<RebarResponse>,
    pub force_kn: f64,
    pub moment_knm: f64,
}

/// One point of the capacity diagram with everything that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityPoint {
    pub neutral_axis: NeutralAxis,
    pub compression_side: CompressionSide,
    pub state: SectionState,
    pub zones: Zones,
    /// Stress block and remainder, absent in full tension
    pub compression_block: Option<CompressionBlock>,
    /// Absent in full tension without reinforcement
    pub failure: Option<FailureCriterion>,
    pub concrete: ConcreteContribution,
    pub steel: SteelContribution,
    /// Axial force N = Fc + Fs (kN, compression negative)
    pub normal_force_kn: f64,
    /// Bending moment M = Mc + Ms (kNm)
    pub moment_knm: f64,
}

/// Compute (N, M) and its breakdown for one neutral axis.
pub fn evaluate(section: &Section, axis: &NeutralAxis, side: CompressionSide) -> CalcResult<CapacityPoint> {
    let zones = classify(section.shape(), axis, side)?;
    let zone_state = ZoneState::of(&zones)?;
    let state = zone_state.state();

    let compression_block = match zone_state.compression() {
        Some(zone) => Some(split_block(zone, axis, section.concrete().lambda)?),
        None => None,
    };

    let distances = rebar_distances(section, axis, &zone_state);
    let failure = failure_criterion(section, axis, &zone_state, compression_block.as_ref(), &distances);
    let concrete = concrete_contribution(section, compression_block.as_ref().map(|b| &b.block));
    let steel = steel_contribution(section, failure.as_ref(), &distances);

    let normal_force_kn = concrete.force_kn + steel.force_kn;
    let moment_knm = concrete.moment_knm + steel.moment_knm;

    tracing::trace!(
        neutral_axis = %axis,
        %state,
        compression_area = geometry::zone_area(&zones.compression),
        tension_area = geometry::zone_area(&zones.tension),
        failure_strain = failure.map(|f| f.strain),
        "zones evaluated"
    );

    Ok(CapacityPoint {
        neutral_axis: *axis,
        compression_side: side,
        state,
        zones,
        compression_block,
        failure,
        concrete,
        steel,
        normal_force_kn,
        moment_knm,
    })
}

/// Signed rebar distances to the neutral axis (compression negative)
pub fn rebar_distances(section: &Section, axis: &NeutralAxis, zone_state: &ZoneState<'_>) -> Vec<f64> {
    let positions = section.rebar_positions();
    let magnitudes = positions.iter().map(|&p| axis.distance(p));
    match zone_state {
        ZoneState::FullCompression { .. } => magnitudes.map(|d| -d).collect(),
        ZoneState::FullTension { .. } => magnitudes.collect(),
        ZoneState::Mixed { tension, .. } => magnitudes
            .zip(geometry::points_in_zone(positions, tension))
            .map(|(d, in_tension)| if in_tension { d } else { -d })
            .collect(),
    }
}

/// Reference strain and distance of the linear strain distribution.
///
/// A fully compressed section whose neutral axis does not touch it has its
/// extreme-fibre strain scaled so that mid-depth reaches `eps_c`.
pub fn failure_criterion(
    section: &Section,
    axis: &NeutralAxis,
    zone_state: &ZoneState<'_>,
    block: Option<&CompressionBlock>,
    distances: &[f64],
) -> Option<FailureCriterion> {
    let concrete = section.concrete();
    match (zone_state, block) {
        (ZoneState::FullTension { .. }, _) => distances
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &d)| match best {
                Some((_, best_d)) if d.abs() <= best_d => best,
                _ => Some((i, d.abs())),
            })
            .map(|(i, d)| FailureCriterion {
                reference: FailureReference::ExtremeRebar,
                strain: section.steel().eps_su,
                distance_mm: d,
                point: section.rebar_positions()[i],
            }),
        (_, Some(block)) => {
            let strain = match zone_state {
                ZoneState::FullCompression { compression } => {
                    uniform_compression_strain(compression, axis, concrete.eps_c).unwrap_or(concrete.eps_cu)
                }
                _ => concrete.eps_cu,
            };
            Some(FailureCriterion {
                reference: FailureReference::ExtremeFiber,
                strain,
                distance_mm: block.depth,
                point: block.extreme_fiber,
            })
        }
        (_, None) => None,
    }
}

/// `eps_c·d_max/d_mid` when the axis lies clear of the zone, `None` when it touches
fn uniform_compression_strain(zone: &Zone, axis: &NeutralAxis, eps_c: f64) -> Option<f64> {
    use geo::CoordsIter;

    let (d_min, d_max) = zone
        .exterior_coords_iter()
        .map(|c| axis.distance(c))
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), d| (lo.min(d), hi.max(d)));
    if !(d_min > LINE_TOLERANCE) {
        return None;
    }
    let d_mid = (d_min + d_max) / 2.0;
    Some(eps_c * d_max / d_mid)
}

/// Strain at signed distance `d` from the axis, by linear compatibility
pub fn rebar_strain(failure: &FailureCriterion, distance_mm: f64) -> f64 {
    if failure.distance_mm > LINE_TOLERANCE {
        failure.strain * distance_mm / failure.distance_mm
    } else {
        0.0
    }
}

/// Uniform stress `alpha_cc·fcd` over the block, acting at the block centroid
pub fn concrete_contribution(section: &Section, block: Option<&Zone>) -> ConcreteContribution {
    let Some(block) = block else {
        return ConcreteContribution::default();
    };
    let area = geometry::zone_area(block);
    let Some(centroid) = geometry::zone_centroid(block) else {
        return ConcreteContribution::default();
    };

    let force: Kilonewtons = (section.concrete().design_stress() * SquareMillimeters(area)).into();
    let force = force * -1.0;
    let arm = Millimeters(section.plastic_centroid().y - centroid.y);

    ConcreteContribution {
        block_area_mm2: area,
        block_centroid: Some(centroid),
        arm_mm: arm.0,
        force_kn: force.0,
        moment_knm: force.moment_about(arm).0,
    }
}

/// Strain, stress, force and moment of every rebar
pub fn steel_contribution(
    section: &Section,
    failure: Option<&FailureCriterion>,
    distances: &[f64],
) -> SteelContribution {
    let Some(failure) = failure else {
        return SteelContribution::default();
    };
    let steel = section.steel();
    let y_pl = section.plastic_centroid().y;

    let rebars: Vec<RebarResponse> = section
        .rebars()
        .iter()
        .zip(distances)
        .enumerate()
        .map(|(index, (rebar, &distance_mm))| {
            let strain = rebar_strain(failure, distance_mm);
            let stress = steel.stress(strain);
            let area = rebar.area();
            let force: Kilonewtons = (stress * area).into();
            let arm = Millimeters(y_pl - rebar.y);
            RebarResponse {
                index,
                position: rebar.position(),
                area_mm2: area.0,
                distance_mm,
                strain,
                stress_mpa: stress.0,
                force_kn: force.0,
                arm_mm: arm.0,
                moment_knm: force.moment_about(arm).0,
            }
        })
        .collect();

    SteelContribution {
        force_kn: rebars.iter().map(|r| r.force_kn).sum(),
        moment_knm: rebars.iter().map(|r| r.moment_knm).sum(),
        rebars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{ConcreteMaterial, ReinforcingSteel};
    use crate::section::{Rebar, SectionInput};
    use approx::assert_relative_eq;

    fn reference_section() -> Section {
        Section::new(SectionInput {
            label: "reference".to_string(),
            vertices: vec![[0.0, 0.0], [350.0, 0.0], [350.0, 450.0], [0.0, 450.0]],
            rebars: vec![
                Rebar::new(60.0, 60.0, 25.0),
                Rebar::new(290.0, 60.0, 25.0),
                Rebar::new(60.0, 390.0, 32.0),
                Rebar::new(290.0, 390.0, 32.0),
            ],
            concrete: ConcreteMaterial::new(25.0).with_alpha_cc(0.85).with_eps_c(0.0035),
            steel: ReinforcingSteel::new(500.0),
            cover_mm: 45.0,
        })
        .unwrap()
    }

    fn at(y: f64) -> CapacityPoint {
        evaluate(&reference_section(), &NeutralAxis::horizontal(y), CompressionSide::Above).unwrap()
    }

    #[test]
    fn test_mixed_state_values() {
        let point = at(292.0);
        assert_eq!(point.state, SectionState::Mixed);
        assert_eq!(point.normal_force_kn.round(), -898.0);
        assert_eq!(point.moment_knm.round(), 275.0);
    }

    #[test]
    fn test_mixed_rebar_signs() {
        let point = at(209.0);
        let signs: Vec<bool> = point.steel.rebars.iter().map(|r| r.distance_mm > 0.0).collect();
        assert_eq!(signs, vec![true, true, false, false]);
        assert!(point.steel.rebars[0].strain > 0.0);
        assert!(point.steel.rebars[2].strain < 0.0);
    }

    #[test]
    fn test_full_compression_touching_axis() {
        let point = at(0.0);
        assert_eq!(point.state, SectionState::FullCompression);
        let failure = point.failure.unwrap();
        assert_eq!(failure.strain, 0.0035);
        assert_relative_eq!(failure.distance_mm, 450.0);
        assert_eq!(point.normal_force_kn.round(), -2576.0);
        assert_eq!(point.moment_knm.round(), 146.0);
        assert!(point.steel.rebars.iter().all(|r| r.strain <= 0.0));
    }

    #[test]
    fn test_uniform_compression() {
        let point = at(-99_999.0);
        assert_eq!(point.state, SectionState::FullCompression);
        assert_eq!(point.normal_force_kn.round(), -3357.0);
        assert_relative_eq!(point.moment_knm, 0.0, epsilon = 0.5);
        assert!(point.failure.unwrap().strain > 0.0035);
    }

    #[test]
    fn test_full_tension() {
        let point = at(1000.0);
        assert_eq!(point.state, SectionState::FullTension);
        assert_eq!(point.concrete.force_kn, 0.0);
        assert!(point.compression_block.is_none());
        let failure = point.failure.unwrap();
        assert_eq!(failure.reference, FailureReference::ExtremeRebar);
        assert_relative_eq!(failure.distance_mm, 940.0);
        // All bars yield in tension
        let expected = reference_section().steel_area() * ReinforcingSteel::new(500.0).fyd().0 / 1000.0;
        assert_relative_eq!(point.normal_force_kn, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_full_tension_without_rebars() {
        let mut input: SectionInput = reference_section().into();
        input.rebars.clear();
        let section = Section::new(input).unwrap();
        let point = evaluate(&section, &NeutralAxis::horizontal(1000.0), CompressionSide::Above).unwrap();
        assert!(point.failure.is_none());
        assert_eq!(point.normal_force_kn, 0.0);
        assert_eq!(point.moment_knm, 0.0);
    }

    #[test]
    fn test_concrete_force_is_compressive() {
        for y in [400.0, 300.0, 150.0, 10.0] {
            let point = at(y);
            assert!(point.concrete.force_kn < 0.0);
            let block = point.compression_block.unwrap();
            assert!(geometry::zone_area(&block.block) <= geometry::zone_area(&point.zones.compression) + 1e-6);
        }
    }

    #[test]
    fn test_rebar_strain_zero_reference() {
        let failure = FailureCriterion {
            reference: FailureReference::ExtremeRebar,
            strain: 0.0217,
            distance_mm: 0.0,
            point: Coord { x: 0.0, y: 0.0 },
        };
        assert_eq!(rebar_strain(&failure, 10.0), 0.0);
    }

    #[test]
    fn test_below_orientation_mirrors_signs() {
        let point =
            evaluate(&reference_section(), &NeutralAxis::horizontal(100.0), CompressionSide::Below).unwrap();
        assert_eq!(point.state, SectionState::Mixed);
        // Compression at the bottom gives a negative moment
        assert!(point.moment_knm < 0.0);
        assert!(point.concrete.force_kn < 0.0);
    }
}
