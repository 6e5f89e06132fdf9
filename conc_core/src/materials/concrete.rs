//! Concrete Materials (EN 1992-1-1 Table 3.1)
//!
//! Design values for normal-strength concrete (fck ≤ 50 MPa) used with the
//! rectangular stress block. High-strength grades need reduced `lambda`,
//! `eta` and failure strains which are not modelled, so they are rejected.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::Megapascals;

/// Highest characteristic strength treated as normal-strength concrete
pub const MAX_NORMAL_STRENGTH_FCK: f64 = 50.0;

/// Strength classes for normal-strength concrete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcreteGrade {
    #[serde(rename = "C12/15")]
    C12,
    #[serde(rename = "C16/20")]
    C16,
    #[serde(rename = "C20/25")]
    C20,
    #[serde(rename = "C25/30")]
    C25,
    #[serde(rename = "C30/37")]
    C30,
    #[serde(rename = "C35/45")]
    C35,
    #[serde(rename = "C40/50")]
    C40,
    #[serde(rename = "C45/55")]
    C45,
    #[serde(rename = "C50/60")]
    C50,
}

impl ConcreteGrade {
    /// All grade variants for selection lists
    pub const ALL: [ConcreteGrade; 9] = [
        ConcreteGrade::C12,
        ConcreteGrade::C16,
        ConcreteGrade::C20,
        ConcreteGrade::C25,
        ConcreteGrade::C30,
        ConcreteGrade::C35,
        ConcreteGrade::C40,
        ConcreteGrade::C45,
        ConcreteGrade::C50,
    ];

    /// Characteristic cylinder strength fck (MPa)
    pub fn fck_mpa(&self) -> f64 {
        match self {
            ConcreteGrade::C12 => 12.0,
            ConcreteGrade::C16 => 16.0,
            ConcreteGrade::C20 => 20.0,
            ConcreteGrade::C25 => 25.0,
            ConcreteGrade::C30 => 30.0,
            ConcreteGrade::C35 => 35.0,
            ConcreteGrade::C40 => 40.0,
            ConcreteGrade::C45 => 45.0,
            ConcreteGrade::C50 => 50.0,
        }
    }

    /// Parse from "C25/30", "c25", "C25-30" and similar spellings
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_uppercase();
        let cylinder = normalized
            .trim_start_matches('C')
            .split(['/', '-'])
            .next()
            .unwrap_or_default()
            .to_string();
        ConcreteGrade::ALL
            .iter()
            .copied()
            .find(|g| format!("{}", g.fck_mpa() as u32) == cylinder)
            .ok_or_else(|| CalcError::invalid_input("concrete_grade", s, "Unknown normal-strength concrete class"))
    }

    /// Display name, e.g. "C25/30"
    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteGrade::C12 => "C12/15",
            ConcreteGrade::C16 => "C16/20",
            ConcreteGrade::C20 => "C20/25",
            ConcreteGrade::C25 => "C25/30",
            ConcreteGrade::C30 => "C30/37",
            ConcreteGrade::C35 => "C35/45",
            ConcreteGrade::C40 => "C40/50",
            ConcreteGrade::C45 => "C45/55",
            ConcreteGrade::C50 => "C50/60",
        }
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn default_gamma_c() -> f64 {
    1.5
}

fn default_alpha_cc() -> f64 {
    1.0
}

fn default_eps_cu() -> f64 {
    0.0035
}

fn default_eps_c() -> f64 {
    0.00175
}

fn default_lambda() -> f64 {
    0.8
}

/// Concrete design parameters for ultimate limit state section analysis.
///
/// ## JSON Example
///
/// ```json
/// { "fck_mpa": 25.0, "gamma_c": 1.5, "alpha_cc": 0.85 }
/// ```
///
/// Omitted fields take the EN 1992-1-1 defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteMaterial {
    /// Characteristic cylinder strength fck (MPa)
    pub fck_mpa: f64,

    /// Partial factor γc
    #[serde(default = "default_gamma_c")]
    pub gamma_c: f64,

    /// Long-term/loading coefficient αcc applied to fcd
    #[serde(default = "default_alpha_cc")]
    pub alpha_cc: f64,

    /// Ultimate strain εcu under combined bending and compression
    #[serde(default = "default_eps_cu")]
    pub eps_cu: f64,

    /// Failure strain εc under pure uniform compression
    #[serde(default = "default_eps_c")]
    pub eps_c: f64,

    /// Stress block depth factor λ (block depth = λ·x)
    #[serde(default = "default_lambda")]
    pub lambda: f64,
}

impl ConcreteMaterial {
    /// Concrete with the given fck and default factors
    pub fn new(fck_mpa: f64) -> Self {
        ConcreteMaterial {
            fck_mpa,
            gamma_c: default_gamma_c(),
            alpha_cc: default_alpha_cc(),
            eps_cu: default_eps_cu(),
            eps_c: default_eps_c(),
            lambda: default_lambda(),
        }
    }

    /// Concrete of a tabulated strength class
    pub fn from_grade(grade: ConcreteGrade) -> Self {
        Self::new(grade.fck_mpa())
    }

    pub fn with_gamma_c(mut self, gamma_c: f64) -> Self {
        self.gamma_c = gamma_c;
        self
    }

    pub fn with_alpha_cc(mut self, alpha_cc: f64) -> Self {
        self.alpha_cc = alpha_cc;
        self
    }

    pub fn with_eps_cu(mut self, eps_cu: f64) -> Self {
        self.eps_cu = eps_cu;
        self
    }

    pub fn with_eps_c(mut self, eps_c: f64) -> Self {
        self.eps_c = eps_c;
        self
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Design compressive strength fcd = fck / γc
    pub fn fcd(&self) -> Megapascals {
        Megapascals(self.fck_mpa / self.gamma_c)
    }

    /// Uniform stress of the rectangular stress block, αcc·fcd
    pub fn design_stress(&self) -> Megapascals {
        self.fcd() * self.alpha_cc
    }

    /// Validate the material parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.fck_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "fck_mpa",
                self.fck_mpa.to_string(),
                "Concrete strength must be positive",
            ));
        }
        if self.fck_mpa > MAX_NORMAL_STRENGTH_FCK {
            return Err(CalcError::invalid_input(
                "fck_mpa",
                self.fck_mpa.to_string(),
                "High-strength concrete (fck > 50 MPa) is not supported",
            ));
        }
        if !(self.gamma_c > 0.0) {
            return Err(CalcError::invalid_input(
                "gamma_c",
                self.gamma_c.to_string(),
                "Partial factor must be positive",
            ));
        }
        if !(self.alpha_cc > 0.0 && self.alpha_cc <= 1.0) {
            return Err(CalcError::invalid_input(
                "alpha_cc",
                self.alpha_cc.to_string(),
                "alpha_cc must be in (0, 1]",
            ));
        }
        if !(self.eps_cu > 0.0) {
            return Err(CalcError::invalid_input(
                "eps_cu",
                self.eps_cu.to_string(),
                "Ultimate strain must be positive",
            ));
        }
        if !(self.eps_c > 0.0) {
            return Err(CalcError::invalid_input(
                "eps_c",
                self.eps_c.to_string(),
                "Uniform compression strain must be positive",
            ));
        }
        if !(self.lambda > 0.0 && self.lambda <= 1.0) {
            return Err(CalcError::invalid_input(
                "lambda",
                self.lambda.to_string(),
                "Stress block factor must be in (0, 1]",
            ));
        }
        Ok(())
    }
}
