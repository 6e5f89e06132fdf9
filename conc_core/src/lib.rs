//! # conc_core - Reinforced Concrete Section Capacity Engine
//!
//! `conc_core` computes the axial force / bending moment (N–M) capacity
//! diagram of reinforced concrete sections with arbitrary polygonal outlines,
//! using the rectangular stress block and strain compatibility of
//! EN 1992-1-1. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over an immutable, validated [`Section`]
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Parallel**: Sweep locations are independent and run on rayon with the
//!   `parallel` feature (default)
//!
//! ## Quick Start
//!
//! ```rust
//! use conc_core::calculations::{capacity_diagram, DiagramSettings};
//! use conc_core::materials::{ConcreteMaterial, ReinforcingSteel};
//! use conc_core::section::{Rebar, Section, SectionInput};
//! use conc_core::sectiongen;
//!
//! let section = Section::new(SectionInput {
//!     label: "C1".to_string(),
//!     vertices: sectiongen::rectangle(350.0, 450.0).unwrap(),
//!     rebars: vec![Rebar::new(60.0, 60.0, 25.0), Rebar::new(290.0, 390.0, 32.0)],
//!     concrete: ConcreteMaterial::new(25.0).with_alpha_cc(0.85),
//!     steel: ReinforcingSteel::new(500.0),
//!     cover_mm: 45.0,
//! })
//! .unwrap();
//!
//! let diagram = capacity_diagram(&section, &DiagramSettings::default()).unwrap();
//! for (n, m) in diagram.pairs() {
//!     println!("N = {n:8.1} kN   M = {m:7.1} kNm");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`section`] - Validated section geometry, rebars and materials
//! - [`sectiongen`] - Outline, rebar layout and sweep location generators
//! - [`calculations`] - Zone classification, stress block, N–M evaluation, diagram sweep
//! - [`geometry`] - Neutral axis line and polygon operations
//! - [`materials`] - Concrete and reinforcing steel
//! - [`project`] - Project container, metadata and settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic JSON saves and versioned loads

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod geometry;
pub mod materials;
pub mod project;
pub mod section;
pub mod sectiongen;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{capacity_diagram, CapacityDiagram, CapacityPoint, CompressionSide, DiagramSettings, SectionState};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_diagram, save_project};
pub use geometry::NeutralAxis;
pub use project::{Project, ProjectMetadata};
pub use section::{Rebar, Section, SectionInput};
