//! # Section Capacity Calculations
//!
//! The N–M capacity computation, leaves first:
//!
//! - [`zones`] - split a section into compression and tension zones
//! - [`compression_block`] - reduce a compression zone to the stress block
//! - [`force_moment`] - concrete and rebar resultants for one neutral axis
//! - [`diagram`] - sweep the neutral axis and collect the capacity diagram
//!
//! Every function is pure: a [`Section`](crate::section::Section) is read,
//! never modified, and results are plain JSON-serializable records.

pub mod compression_block;
pub mod diagram;
pub mod force_moment;
pub mod zones;

// Re-export commonly used types
pub use compression_block::{split_block, CompressionBlock};
pub use diagram::{capacity_diagram, CapacityDiagram, DiagramSettings, SweepState};
pub use force_moment::{evaluate, CapacityPoint, SectionState};
pub use zones::{classify, CompressionSide, Zones};
