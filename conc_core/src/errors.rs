//! # Error Types
//!
//! Structured error types for conc_core. Every failure in the capacity
//! computation is a deterministic function of the input geometry, so errors
//! carry enough context to reproduce and fix the offending input.
//!
//! ## Example
//!
//! ```rust
//! use conc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_diameter(d_mm: f64) -> CalcResult<()> {
//!     if d_mm <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "diameter".to_string(),
//!             value: d_mm.to_string(),
//!             reason: "Rebar diameter must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for conc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for section and capacity operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, mismatched lengths, bad geometry)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// The zones on either side of a neutral axis could not be told apart
    #[error("Cannot classify compression/tension zones for neutral axis {neutral_axis}: {reason}")]
    ClassificationFailed { neutral_axis: String, reason: String },

    /// The compression-block split was invoked on an empty compression zone
    #[error("Cannot split an empty compression zone into a compression block")]
    EmptyCompressionZone,

    /// Neutral axis orientation outside what the engine supports
    #[error("Unsupported neutral axis orientation: {angle_deg} deg (vertical axes are not supported)")]
    UnsupportedOrientation { angle_deg: f64 },

    /// Calculation failed for another reason
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ClassificationFailed error
    pub fn classification_failed(neutral_axis: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ClassificationFailed {
            neutral_axis: neutral_axis.into(),
            reason: reason.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Errors caused by the geometry of the input rather than by I/O.
    ///
    /// These reproduce identically on every run with the same input.
    pub fn is_geometric(&self) -> bool {
        matches!(
            self,
            CalcError::ClassificationFailed { .. }
                | CalcError::EmptyCompressionZone
                | CalcError::UnsupportedOrientation { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::ClassificationFailed { .. } => "CLASSIFICATION_FAILED",
            CalcError::EmptyCompressionZone => "EMPTY_COMPRESSION_ZONE",
            CalcError::UnsupportedOrientation { .. } => "UNSUPPORTED_ORIENTATION",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("diameter", "-25", "Rebar diameter must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_unit_variant_serialization() {
        let json = serde_json::to_string(&CalcError::EmptyCompressionZone).unwrap();
        assert!(json.contains("EmptyCompressionZone"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("vertices").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::UnsupportedOrientation { angle_deg: 90.0 }.error_code(),
            "UNSUPPORTED_ORIENTATION"
        );
    }

    #[test]
    fn test_geometric_errors() {
        assert!(CalcError::EmptyCompressionZone.is_geometric());
        assert!(CalcError::classification_failed("y = 10", "both zones above").is_geometric());
        assert!(!CalcError::file_error("open", "a.json", "not found").is_geometric());
    }
}
