// Textbook rectangular column: 350x450, C25/30 with alpha_cc = 0.85, B500,
// 2ø25 at the bottom and 2ø32 at the top, neutral axis measured from the base.

use conc_core::calculations::{capacity_diagram, CompressionSide, DiagramSettings, SectionState};
use conc_core::materials::{ConcreteMaterial, ReinforcingSteel};
use conc_core::section::Section;

const LOCATIONS: [f64; 6] = [390.0, 292.0, 209.0, 60.0, 0.0, -99_999.0];
const EXPECTED_N: [f64; 6] = [189.0, -898.0, -1230.0, -2246.0, -2576.0, -3357.0];
const EXPECTED_M: [f64; 6] = [121.0, 275.0, 292.0, 192.0, 146.0, 0.0];

fn column() -> Section {
    Section::from_arrays(
        &[0.0, 350.0, 350.0, 0.0],
        &[0.0, 0.0, 450.0, 450.0],
        &[60.0, 290.0, 60.0, 290.0],
        &[60.0, 60.0, 390.0, 390.0],
        &[25.0, 25.0, 32.0, 32.0],
        ConcreteMaterial::new(25.0)
            .with_gamma_c(1.5)
            .with_alpha_cc(0.85)
            .with_eps_c(0.0035),
        ReinforcingSteel::new(500.0).with_gamma_s(1.15),
    )
    .unwrap()
}

#[test]
fn test_plastic_centroid() {
    let pc = column().plastic_centroid();
    assert_eq!((pc.x.round(), pc.y.round()), (175.0, 238.0));
}

#[test]
fn test_capacity_points_match_reference() {
    let settings = DiagramSettings::with_locations(LOCATIONS.to_vec());
    let diagram = capacity_diagram(&column(), &settings).unwrap();
    assert_eq!(diagram.points.len(), 12);

    let above: Vec<_> = diagram.for_side(CompressionSide::Above).collect();
    for (i, point) in above.iter().enumerate() {
        assert_eq!(
            point.normal_force_kn.round(),
            EXPECTED_N[i],
            "N at y = {}",
            LOCATIONS[i]
        );
        assert_eq!(
            point.moment_knm.round(),
            EXPECTED_M[i],
            "M at y = {}",
            LOCATIONS[i]
        );
    }
}

#[test]
fn test_reference_states() {
    let settings = DiagramSettings::with_locations(LOCATIONS.to_vec());
    let diagram = capacity_diagram(&column(), &settings).unwrap();
    let states: Vec<SectionState> = diagram
        .for_side(CompressionSide::Above)
        .map(|p| p.state)
        .collect();
    assert_eq!(
        states,
        vec![
            SectionState::Mixed,
            SectionState::Mixed,
            SectionState::Mixed,
            SectionState::Mixed,
            SectionState::FullCompression,
            SectionState::FullCompression,
        ]
    );
}

#[test]
fn test_mirrored_section_mirrors_diagram() {
    // Rotating the section by 180° about its mid-height swaps the sides
    let flipped = Section::from_arrays(
        &[0.0, 350.0, 350.0, 0.0],
        &[0.0, 0.0, 450.0, 450.0],
        &[60.0, 290.0, 60.0, 290.0],
        &[390.0, 390.0, 60.0, 60.0],
        &[25.0, 25.0, 32.0, 32.0],
        ConcreteMaterial::new(25.0).with_alpha_cc(0.85).with_eps_c(0.0035),
        ReinforcingSteel::new(500.0),
    )
    .unwrap();

    let mirrored_locations: Vec<f64> = LOCATIONS.iter().map(|y| 450.0 - y).collect();
    let settings = DiagramSettings::with_locations(mirrored_locations);
    let diagram = capacity_diagram(&flipped, &settings).unwrap();

    for (i, point) in diagram.for_side(CompressionSide::Below).enumerate() {
        assert_eq!(point.normal_force_kn.round(), EXPECTED_N[i]);
        assert!((point.moment_knm + EXPECTED_M[i]).abs() <= 0.5);
    }
}
