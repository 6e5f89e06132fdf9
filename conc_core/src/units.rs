//! # Unit Types
//!
//! Type-safe wrappers for the SI units used in section design. These keep the
//! force and moment scaling explicit instead of scattering `/ 1000.0` through
//! the capacity code.
//!
//! ## Unit System
//!
//! conc_core works in a single consistent system:
//! - Length: millimetres (mm)
//! - Area: square millimetres (mm²)
//! - Stress: megapascals (MPa = N/mm²)
//! - Force: newtons (N) internally, reported in kilonewtons (kN)
//! - Moment: kilonewton-metres (kNm)
//!
//! ## Example
//!
//! ```rust
//! use conc_core::units::{Kilonewtons, Megapascals, Newtons, SquareMillimeters};
//!
//! let force: Newtons = Megapascals(434.8) * SquareMillimeters(490.9);
//! let force_kn: Kilonewtons = force.into();
//! assert!((force_kn.0 - 213.44).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Geometry Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

/// Area in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMillimeters(pub f64);

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megapascals(pub f64);

// ============================================================================
// Force Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons (1 kN = 1000 N)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

impl From<Newtons> for Kilonewtons {
    fn from(n: Newtons) -> Self {
        Kilonewtons(n.0 / 1000.0)
    }
}

impl From<Kilonewtons> for Newtons {
    fn from(kn: Kilonewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kilonewton-millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KilonewtonMillimeters(pub f64);

/// Moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KilonewtonMeters(pub f64);

impl From<KilonewtonMillimeters> for KilonewtonMeters {
    fn from(knmm: KilonewtonMillimeters) -> Self {
        KilonewtonMeters(knmm.0 / 1000.0)
    }
}

impl From<KilonewtonMeters> for KilonewtonMillimeters {
    fn from(knm: KilonewtonMeters) -> Self {
        KilonewtonMillimeters(knm.0 * 1000.0)
    }
}

// ============================================================================
// Cross-unit products
// ============================================================================

impl Mul<SquareMillimeters> for Megapascals {
    type Output = Newtons;
    fn mul(self, rhs: SquareMillimeters) -> Newtons {
        Newtons(self.0 * rhs.0)
    }
}

impl Mul<Millimeters> for Kilonewtons {
    type Output = KilonewtonMillimeters;
    fn mul(self, rhs: Millimeters) -> KilonewtonMillimeters {
        KilonewtonMillimeters(self.0 * rhs.0)
    }
}

impl Kilonewtons {
    /// Moment of this force about a point `arm` away, in kNm
    pub fn moment_about(self, arm: Millimeters) -> KilonewtonMeters {
        (self * arm).into()
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|v| v.0).sum())
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(SquareMillimeters);
impl_arithmetic!(Megapascals);
impl_arithmetic!(Newtons);
impl_arithmetic!(Kilonewtons);
impl_arithmetic!(KilonewtonMillimeters);
impl_arithmetic!(KilonewtonMeters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newtons_to_kilonewtons() {
        let n = Newtons(2_231_250.0);
        let kn: Kilonewtons = n.into();
        assert_eq!(kn.0, 2231.25);
    }

    #[test]
    fn test_stress_times_area() {
        let force = Megapascals(10.0) * SquareMillimeters(250.0);
        assert_eq!(force, Newtons(2500.0));
    }

    #[test]
    fn test_moment_about() {
        // 200 kN at 150 mm = 30 kNm
        let m = Kilonewtons(200.0).moment_about(Millimeters(150.0));
        assert!((m.0 - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Kilonewtons(10.0);
        let b = Kilonewtons(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
        let total: Kilonewtons = vec![a, b, Kilonewtons(-3.0)].into_iter().sum();
        assert_eq!(total.0, 12.0);
    }

    #[test]
    fn test_serialization() {
        let mm = Millimeters(450.0);
        let json = serde_json::to_string(&mm).unwrap();
        assert_eq!(json, "450.0");

        let roundtrip: Millimeters = serde_json::from_str(&json).unwrap();
        assert_eq!(mm, roundtrip);
    }
}
