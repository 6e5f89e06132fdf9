//! Reinforcing Steel (EN 1992-1-1 Section 3.2)
//!
//! Bilinear elastic - perfectly plastic design curve: σ = clip(ε·Es, −fyd, fyd).

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::Megapascals;

fn default_gamma_s() -> f64 {
    1.15
}

fn default_es() -> f64 {
    200_000.0
}

fn default_eps_su() -> f64 {
    0.0217
}

/// Reinforcing steel design parameters.
///
/// ## JSON Example
///
/// ```json
/// { "fyk_mpa": 500.0, "gamma_s": 1.15 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcingSteel {
    /// Characteristic yield strength fyk (MPa)
    pub fyk_mpa: f64,

    /// Partial factor γs
    #[serde(default = "default_gamma_s")]
    pub gamma_s: f64,

    /// Modulus of elasticity Es (MPa)
    #[serde(default = "default_es")]
    pub es_mpa: f64,

    /// Design ultimate tensile strain εsu, governs a section in full tension
    #[serde(default = "default_eps_su")]
    pub eps_su: f64,
}

impl ReinforcingSteel {
    /// Steel with the given fyk and default factors
    pub fn new(fyk_mpa: f64) -> Self {
        ReinforcingSteel {
            fyk_mpa,
            gamma_s: default_gamma_s(),
            es_mpa: default_es(),
            eps_su: default_eps_su(),
        }
    }

    pub fn with_gamma_s(mut self, gamma_s: f64) -> Self {
        self.gamma_s = gamma_s;
        self
    }

    pub fn with_es(mut self, es_mpa: f64) -> Self {
        self.es_mpa = es_mpa;
        self
    }

    pub fn with_eps_su(mut self, eps_su: f64) -> Self {
        self.eps_su = eps_su;
        self
    }

    /// Design yield strength fyd = fyk / γs
    pub fn fyd(&self) -> Megapascals {
        Megapascals(self.fyk_mpa / self.gamma_s)
    }

    /// Strain at first yield, fyd / Es
    pub fn yield_strain(&self) -> f64 {
        self.fyd().0 / self.es_mpa
    }

    /// Design stress for a strain (compression negative)
    pub fn stress(&self, strain: f64) -> Megapascals {
        let fyd = self.fyd().0;
        Megapascals((strain * self.es_mpa).clamp(-fyd, fyd))
    }

    /// Validate the material parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.fyk_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "fyk_mpa",
                self.fyk_mpa.to_string(),
                "Yield strength must be positive",
            ));
        }
        if !(self.gamma_s > 0.0) {
            return Err(CalcError::invalid_input(
                "gamma_s",
                self.gamma_s.to_string(),
                "Partial factor must be positive",
            ));
        }
        if !(self.es_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "es_mpa",
                self.es_mpa.to_string(),
                "Elastic modulus must be positive",
            ));
        }
        if !(self.eps_su > 0.0) {
            return Err(CalcError::invalid_input(
                "eps_su",
                self.eps_su.to_string(),
                "Ultimate strain must be positive",
            ));
        }
        Ok(())
    }
}
