//! # Materials
//!
//! Concrete and reinforcing steel definitions for ultimate limit state
//! section analysis per EN 1992-1-1.
//!
//! ## Example
//!
//! ```rust
//! use conc_core::materials::{ConcreteGrade, ConcreteMaterial, ReinforcingSteel};
//!
//! let concrete = ConcreteMaterial::from_grade(ConcreteGrade::C25).with_alpha_cc(0.85);
//! let steel = ReinforcingSteel::new(500.0);
//!
//! println!("fcd = {:.2} MPa, fyd = {:.1} MPa", concrete.fcd().0, steel.fyd().0);
//! ```

pub mod concrete;
pub mod reinforcement;

pub use concrete::{ConcreteGrade, ConcreteMaterial, MAX_NORMAL_STRENGTH_FCK};
pub use reinforcement::ReinforcingSteel;
