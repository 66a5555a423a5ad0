// src/error.rs

//! Error types for cell geometry, atom storage and configuration.

use thiserror::Error;

/// Geometrically invalid or numerically degenerate cell input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A lattice row has (near) zero length, so angles cannot be normalized
    #[error("degenerate lattice vector: row {index} has zero length")]
    DegenerateLatticeVector { index: usize },

    /// sin(gamma) vanishes (gamma at 0 or 180 degrees)
    #[error("degenerate angle γ: sin(γ) is zero")]
    DegenerateGamma,

    /// The c-vector z-component would be imaginary
    #[error("inconsistent cell angles: no real c vector for these lengths and angles")]
    InconsistentAngles,

    /// Basis matrix has no inverse
    #[error("singular unit cell matrix")]
    SingularMatrix,

    /// A lattice row contains an infinite or NaN component
    #[error("lattice vector {index} is not finite")]
    NonFiniteLatticeVector { index: usize },

    /// A conversion was asked to overwrite the representation the caller supplied
    #[error("unit cell input is not {expected}; refusing to overwrite it")]
    InputMismatch { expected: &'static str },

    #[error("cell length {index} must be strictly positive, got {value}")]
    NonPositiveLength { index: usize, value: f64 },

    #[error("cell angle {index} must lie in (0°, 180°), got {degrees}°")]
    AngleOutOfRange { index: usize, degrees: f64 },

    /// Neither lengths/angles nor a matrix were supplied
    #[error("unit cell has no input representation")]
    Unset,
}

/// Errors raised by the atom container when its parallel arrays disagree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtomsError {
    /// A per-atom sequence length doesn't match the atom count
    #[error("length mismatch in {field}: expected {expected}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Pushing a coordinate before choosing a coordinate representation
    #[error("no coordinate representation selected")]
    NoCoordinates,
}

/// Errors while reading or writing the settings file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for cell geometry operations
pub type CellResult<T> = Result<T, DomainError>;

/// Result type for atom container operations
pub type AtomsResult<T> = Result<T, AtomsError>;
