// src/utils/linalg.rs

use nalgebra::Matrix3;

/// 3x3 matrix stored as rows, e.g. lattice vectors [[ax, ay, az], [bx, by, bz], [cx, cy, cz]]
pub type Mat3 = [[f64; 3]; 3];

pub const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Row-major array -> nalgebra matrix (row i of `m` becomes row i)
pub fn to_matrix3(m: &Mat3) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
  ])
}

pub fn from_matrix3(m: &Matrix3<f64>) -> Mat3 {
  [
    [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
    [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
    [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
  ]
}

pub fn determinant(m: &Mat3) -> f64 {
  to_matrix3(m).determinant()
}

/// Matrix inverse, or None if `m` is singular
///
/// # Formula
/// ```text
/// inverse · m = m · inverse = I
/// ```
pub fn try_inverse(m: &Mat3) -> Option<Mat3> {
  let inv = to_matrix3(m).try_inverse()?;
  let out = from_matrix3(&inv);
  if out.iter().flatten().all(|x| x.is_finite()) {
    Some(out)
  } else {
    None
  }
}

/// Matrix product `a · b`
pub fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
  from_matrix3(&(to_matrix3(a) * to_matrix3(b)))
}

/// Largest absolute element-wise difference between two matrices
pub fn max_abs_diff(a: &Mat3, b: &Mat3) -> f64 {
  a.iter()
    .flatten()
    .zip(b.iter().flatten())
    .map(|(x, y)| (x - y).abs())
    .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_row_layout_preserved() {
    let m = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]];
    assert_eq!(from_matrix3(&to_matrix3(&m)), m);
  }

  #[test]
  fn test_inverse_of_skewed_lattice() {
    let lattice = [[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.5, 0.3, 5.0]];
    let inv = try_inverse(&lattice).unwrap();

    assert!(max_abs_diff(&mat_mul(&inv, &lattice), &IDENTITY) < 1e-12);
    assert!(max_abs_diff(&mat_mul(&lattice, &inv), &IDENTITY) < 1e-12);
  }

  #[test]
  fn test_singular_matrix_has_no_inverse() {
    let flat = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]];
    assert!(try_inverse(&flat).is_none());
    assert_eq!(determinant(&flat), 0.0);
  }

  #[test]
  fn test_determinant_is_cell_volume() {
    let lattice = [[3.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]];
    assert!((determinant(&lattice) - 60.0).abs() < 1e-12);
  }
}
