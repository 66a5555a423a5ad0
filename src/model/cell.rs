// src/model/cell.rs

//! Unit cell geometry.
//!
//! A cell is described either by edge lengths and interaxial angles or by a
//! basis matrix whose rows are the lattice vectors a, b, c. Whichever one the
//! caller supplies is authoritative; [`UnitCell::compute_all_info`] derives the
//! other one together with the inverse matrix.
//!
//! Row-vector convention:
//! ```text
//! cartesian  = fractional · matrix
//! fractional = cartesian  · inverse_matrix
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::Tolerances;
use crate::error::{CellResult, DomainError};
use crate::utils::geometry::{angle_between, norm, Vec3};
use crate::utils::linalg::{self, Mat3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

/// Which representation the caller supplied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellInput {
    #[default]
    Unset,
    /// Lengths plus angles in the given unit; the other unit is derived
    LengthsAngles(AngleUnit),
    Matrix,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Uninitialized,
    Resolved,
}

/// Edge lengths (Å) and angles α, β, γ (radians) of the cell spanned by the
/// rows of `matrix`.
///
/// α = ∠(b, c), β = ∠(a, c), γ = ∠(a, b).
pub fn lengths_angles_from_matrix(matrix: &Mat3, tol: &Tolerances) -> CellResult<(Vec3, Vec3)> {
    let [a, b, c] = *matrix;
    let lengths = [norm(a), norm(b), norm(c)];

    for (index, &len) in lengths.iter().enumerate() {
        if !len.is_finite() {
            return Err(DomainError::NonFiniteLatticeVector { index });
        }
    }

    // Relative to the longest row, so uniformly scaled cells behave the same
    let longest = lengths.iter().copied().fold(0.0, f64::max);
    for (index, &len) in lengths.iter().enumerate() {
        if !(len > tol.min_length_ratio * longest) {
            return Err(DomainError::DegenerateLatticeVector { index });
        }
    }

    let angles = [angle_between(b, c), angle_between(a, c), angle_between(a, b)];
    Ok((lengths, angles))
}

/// Basis matrix in the standard crystallographic setting: a along x, b in the
/// xy-plane, c with a non-negative z-component.
///
/// # Formula
/// ```text
/// a_vec = (a, 0, 0)
/// b_vec = (b·cos γ, b·sin γ, 0)
/// c_vec = (c·cos β, c·cy, c·sqrt(1 − cos²β − cy²)),  cy = (cos α − cos γ·cos β) / sin γ
/// ```
pub fn matrix_from_lengths_angles(lengths: Vec3, angles_rad: Vec3, tol: &Tolerances) -> CellResult<Mat3> {
    for (index, &value) in lengths.iter().enumerate() {
        if !(value > 0.0 && value.is_finite()) {
            return Err(DomainError::NonPositiveLength { index, value });
        }
    }

    let [a, b, c] = lengths;
    let [alpha, beta, gamma] = angles_rad;

    let (sin_g, cos_g) = gamma.sin_cos();
    if !(sin_g.abs() > tol.min_sin_gamma) {
        return Err(DomainError::DegenerateGamma);
    }

    for (index, &angle) in angles_rad.iter().enumerate() {
        if !(angle > 0.0 && angle < PI) {
            return Err(DomainError::AngleOutOfRange {
                index,
                degrees: angle.to_degrees(),
            });
        }
    }

    let cos_a = alpha.cos();
    let cos_b = beta.cos();
    let cy = (cos_a - cos_g * cos_b) / sin_g;
    let radicand = 1.0 - cos_b * cos_b - cy * cy;
    if radicand < -tol.radicand_slack {
        return Err(DomainError::InconsistentAngles);
    }
    // Flat cell: rounding noise must not turn into a non-zero height
    let cz = if radicand.abs() <= tol.radicand_slack {
        0.0
    } else {
        radicand.sqrt()
    };

    Ok([
        [a, 0.0, 0.0],
        [b * cos_g, b * sin_g, 0.0],
        [c * cos_b, c * cy, c * cz],
    ])
}

/// Inverse of a cell matrix.
///
/// The matrix is singular when its volume is negligible next to the product
/// of its row lengths, so the check doesn't depend on the cell's scale.
pub fn invert_cell_matrix(matrix: &Mat3, tol: &Tolerances) -> CellResult<Mat3> {
    let scale: f64 = matrix.iter().map(|row| norm(*row)).product();
    let det = linalg::determinant(matrix);
    if !(det.abs() > tol.singular_volume_ratio * scale) {
        return Err(DomainError::SingularMatrix);
    }
    linalg::try_inverse(matrix).ok_or(DomainError::SingularMatrix)
}

fn to_radians(v: Vec3) -> Vec3 {
    v.map(f64::to_radians)
}

fn to_degrees(v: Vec3) -> Vec3 {
    v.map(f64::to_degrees)
}

/// Unit cell in either representation, plus everything derived from it.
///
/// Fields that have not been supplied or derived yet are `None`. Only the
/// input fields are read back on deserialization; everything else is
/// recomputed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredCell")]
pub struct UnitCell {
    input: CellInput,
    lengths: Option<Vec3>,
    angles_deg: Option<Vec3>,
    angles_rad: Option<Vec3>,
    matrix: Option<Mat3>,
    inverse_matrix: Option<Mat3>,
}

/// On-disk form of a cell. Derived fields in the file are ignored.
#[derive(Deserialize)]
struct StoredCell {
    #[serde(default)]
    input: CellInput,
    lengths: Option<Vec3>,
    angles_deg: Option<Vec3>,
    angles_rad: Option<Vec3>,
    matrix: Option<Mat3>,
}

impl From<StoredCell> for UnitCell {
    fn from(stored: StoredCell) -> Self {
        let rebuilt = match stored.input {
            CellInput::LengthsAngles(AngleUnit::Degrees) => stored
                .lengths
                .zip(stored.angles_deg)
                .map(|(lengths, deg)| Self::from_lengths_angles_deg(lengths, deg)),
            CellInput::LengthsAngles(AngleUnit::Radians) => stored
                .lengths
                .zip(stored.angles_rad)
                .map(|(lengths, rad)| Self::from_lengths_angles_rad(lengths, rad)),
            CellInput::Matrix => stored.matrix.map(Self::from_matrix),
            CellInput::Unset => return Self::new(),
        };

        let Some(mut cell) = rebuilt else {
            log::warn!("Stored unit cell with {:?} input is missing its data", stored.input);
            return Self::new();
        };
        // A rejected cell stays Uninitialized; compute_all_info already logged why
        let _ = cell.compute_all_info();
        cell
    }
}

impl UnitCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lengths_angles_deg(lengths: Vec3, angles_deg: Vec3) -> Self {
        let mut cell = Self::new();
        cell.set_lengths_angles_deg(lengths, angles_deg);
        cell
    }

    pub fn from_lengths_angles_rad(lengths: Vec3, angles_rad: Vec3) -> Self {
        let mut cell = Self::new();
        cell.set_lengths_angles_rad(lengths, angles_rad);
        cell
    }

    pub fn from_matrix(matrix: Mat3) -> Self {
        let mut cell = Self::new();
        cell.set_matrix(matrix);
        cell
    }

    /// Builds and resolves a cell in one step
    pub fn resolved_from_lengths_angles_deg(lengths: Vec3, angles_deg: Vec3) -> CellResult<Self> {
        let mut cell = Self::from_lengths_angles_deg(lengths, angles_deg);
        cell.compute_all_info()?;
        Ok(cell)
    }

    pub fn resolved_from_lengths_angles_rad(lengths: Vec3, angles_rad: Vec3) -> CellResult<Self> {
        let mut cell = Self::from_lengths_angles_rad(lengths, angles_rad);
        cell.compute_all_info()?;
        Ok(cell)
    }

    pub fn resolved_from_matrix(matrix: Mat3) -> CellResult<Self> {
        let mut cell = Self::from_matrix(matrix);
        cell.compute_all_info()?;
        Ok(cell)
    }

    // --- Inputs ---
    // Every setter drops derived data; call compute_all_info() again afterwards.

    pub fn set_lengths_angles_deg(&mut self, lengths: Vec3, angles_deg: Vec3) {
        *self = Self {
            input: CellInput::LengthsAngles(AngleUnit::Degrees),
            lengths: Some(lengths),
            angles_deg: Some(angles_deg),
            ..Self::default()
        };
    }

    pub fn set_lengths_angles_rad(&mut self, lengths: Vec3, angles_rad: Vec3) {
        *self = Self {
            input: CellInput::LengthsAngles(AngleUnit::Radians),
            lengths: Some(lengths),
            angles_rad: Some(angles_rad),
            ..Self::default()
        };
    }

    pub fn set_matrix(&mut self, matrix: Mat3) {
        *self = Self {
            input: CellInput::Matrix,
            matrix: Some(matrix),
            ..Self::default()
        };
    }

    // --- Accessors ---

    pub fn input(&self) -> CellInput {
        self.input
    }

    pub fn has_lengths_angles_input(&self) -> bool {
        matches!(self.input, CellInput::LengthsAngles(_))
    }

    pub fn has_matrix_input(&self) -> bool {
        self.input == CellInput::Matrix
    }

    pub fn state(&self) -> CellState {
        let complete = self.input != CellInput::Unset
            && self.lengths.is_some()
            && self.angles_deg.is_some()
            && self.angles_rad.is_some()
            && self.matrix.is_some()
            && self.inverse_matrix.is_some();
        if complete {
            CellState::Resolved
        } else {
            CellState::Uninitialized
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.state() == CellState::Resolved
    }

    pub fn lengths(&self) -> Option<Vec3> {
        self.lengths
    }

    pub fn angles_deg(&self) -> Option<Vec3> {
        self.angles_deg
    }

    pub fn angles_rad(&self) -> Option<Vec3> {
        self.angles_rad
    }

    /// Rows are the lattice vectors a, b, c
    pub fn matrix(&self) -> Option<Mat3> {
        self.matrix
    }

    pub fn inverse_matrix(&self) -> Option<Mat3> {
        self.inverse_matrix
    }

    /// Cell volume in Å³, once the cell is resolved
    pub fn volume(&self) -> Option<f64> {
        if !self.is_resolved() {
            return None;
        }
        self.matrix.map(|m| linalg::determinant(&m).abs())
    }

    // --- Conversions ---

    /// Fills lengths and both angle units from the current matrix.
    ///
    /// Only valid on matrix-input cells; lengths/angles supplied by the
    /// caller are never overwritten.
    pub fn compute_la_from_matrix(&mut self, tol: &Tolerances) -> CellResult<()> {
        if self.input != CellInput::Matrix {
            return Err(DomainError::InputMismatch { expected: "a matrix" });
        }
        let matrix = self.matrix.ok_or(DomainError::Unset)?;
        let (lengths, angles_rad) = lengths_angles_from_matrix(&matrix, tol)?;
        self.lengths = Some(lengths);
        self.angles_rad = Some(angles_rad);
        self.angles_deg = Some(to_degrees(angles_rad));
        Ok(())
    }

    /// Fills the matrix from the current lengths and angles.
    ///
    /// The angle unit the caller supplied is authoritative and the other one
    /// is always re-derived from it. Only valid on lengths/angles-input cells;
    /// a caller-supplied matrix is never overwritten.
    pub fn compute_matrix_from_la(&mut self, tol: &Tolerances) -> CellResult<()> {
        let (lengths, angles_deg, angles_rad) = self.lengths_angles_input()?;
        let matrix = matrix_from_lengths_angles(lengths, angles_rad, tol)?;
        self.angles_deg = Some(angles_deg);
        self.angles_rad = Some(angles_rad);
        self.matrix = Some(matrix);
        self.inverse_matrix = None;
        Ok(())
    }

    /// Derives the missing representation and the inverse matrix with the
    /// default tolerances.
    pub fn compute_all_info(&mut self) -> CellResult<()> {
        self.compute_all_info_with(&Tolerances::default())
    }

    /// Derives the missing representation and the inverse matrix.
    ///
    /// On error the cell is left untouched.
    pub fn compute_all_info_with(&mut self, tol: &Tolerances) -> CellResult<()> {
        let mut resolved = self.clone();
        let result = match self.input {
            CellInput::LengthsAngles(_) => resolved.compute_matrix_from_la(tol),
            CellInput::Matrix => resolved.compute_la_from_matrix(tol),
            CellInput::Unset => Err(DomainError::Unset),
        }
        .and_then(|()| {
            let matrix = resolved.matrix.ok_or(DomainError::Unset)?;
            resolved.inverse_matrix = Some(invert_cell_matrix(&matrix, tol)?);
            Ok(())
        });

        match result {
            Ok(()) => {
                log::debug!(
                    "Unit cell resolved from {:?}: lengths {:?}, angles {:?} deg",
                    self.input,
                    resolved.lengths,
                    resolved.angles_deg
                );
                *self = resolved;
                Ok(())
            }
            Err(e) => {
                log::warn!("Unit cell from {:?} rejected: {}", self.input, e);
                Err(e)
            }
        }
    }

    /// Lengths plus (degrees, radians), derived from whichever unit was supplied
    fn lengths_angles_input(&self) -> CellResult<(Vec3, Vec3, Vec3)> {
        let unit = match self.input {
            CellInput::LengthsAngles(unit) => unit,
            _ => {
                return Err(DomainError::InputMismatch {
                    expected: "lengths and angles",
                })
            }
        };
        let lengths = self.lengths.ok_or(DomainError::Unset)?;
        match unit {
            AngleUnit::Radians => {
                let rad = self.angles_rad.ok_or(DomainError::Unset)?;
                Ok((lengths, to_degrees(rad), rad))
            }
            AngleUnit::Degrees => {
                let deg = self.angles_deg.ok_or(DomainError::Unset)?;
                Ok((lengths, deg, to_radians(deg)))
            }
        }
    }
}
