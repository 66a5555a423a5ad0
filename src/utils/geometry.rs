// src/utils/geometry.rs

/// Plain 3-vector, used for lattice rows and atomic coordinates
pub type Vec3 = [f64; 3];

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean norm
pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Angle between `u` and `v` in radians.
///
/// Both vectors must have non-zero length. The cosine is clamped to [-1, 1]
/// so rounding on (anti)parallel vectors cannot push `acos` out of its domain.
pub fn angle_between(u: Vec3, v: Vec3) -> f64 {
    (dot(u, v) / (norm(u) * norm(v))).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_norm_and_dot() {
        assert_relative_eq!(norm([3.0, 4.0, 0.0]), 5.0);
        assert_relative_eq!(dot([1.0, 2.0, 3.0], [4.0, -5.0, 6.0]), 12.0);
    }

    #[test]
    fn test_angle_between() {
        assert_relative_eq!(angle_between([1.0, 0.0, 0.0], [0.0, 2.0, 0.0]), FRAC_PI_2);
        assert_relative_eq!(angle_between([1.0, 0.0, 0.0], [-2.0, 0.0, 0.0]), PI);

        // Parallel vectors may round to cos > 1 before clamping
        let v = [0.1, 0.2, 0.3];
        let theta = angle_between(v, [0.3, 0.6, 0.9]);
        assert!(!theta.is_nan());
        assert_relative_eq!(theta, 0.0, epsilon = 1e-7);
    }
}
