//! Single-qubit gate matrices
//!
//! Rotation conventions: `Rz(t) = diag(e^{-it/2}, e^{it/2})`,
//! `Rx(t) = [[c, -is], [-is, c]]` and `Ry(t) = [[c, -s], [s, c]]` with
//! `c = cos(t/2)`, `s = sin(t/2)`.

use num_complex::Complex64;

/// Row-major 2x2 complex matrix
pub type Matrix2x2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

pub const IDENTITY: Matrix2x2 = [[ONE, ZERO], [ZERO, ONE]];

pub const HADAMARD: Matrix2x2 = [
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(INV_SQRT2, 0.0)],
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(-INV_SQRT2, 0.0)],
];

pub const PAULI_X: Matrix2x2 = [[ZERO, ONE], [ONE, ZERO]];

pub const PAULI_Y: Matrix2x2 = [[ZERO, NEG_I], [I, ZERO]];

pub const PAULI_Z: Matrix2x2 = [[ONE, ZERO], [ZERO, NEG_ONE]];

pub fn rotation_x(theta: f64) -> Matrix2x2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
        [Complex64::new(0.0, -s), Complex64::new(c, 0.0)],
    ]
}

pub fn rotation_y(theta: f64) -> Matrix2x2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
        [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
    ]
}

pub fn rotation_z(theta: f64) -> Matrix2x2 {
    [
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

/// `U(theta, phi, lambda)`
///
/// `[[cos(t/2), -e^{il} sin(t/2)], [e^{ip} sin(t/2), e^{i(p+l)} cos(t/2)]]`,
/// so `U(t, -pi/2, pi/2)` equals `Rx(t)`.
pub fn generic_unitary(theta: f64, phi: f64, lambda: f64) -> Matrix2x2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
        ],
        [
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        ],
    ]
}

/// `e^{i theta}`
#[inline]
pub fn phase(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, theta)
}

/// Whether `m * m^dagger` is the identity within `tolerance`
pub fn is_unitary(m: &Matrix2x2, tolerance: f64) -> bool {
    (0..2).all(|row| {
        (0..2).all(|col| {
            let entry: Complex64 = (0..2).map(|k| m[row][k] * m[col][k].conj()).sum();
            let expected = if row == col { ONE } else { ZERO };
            (entry - expected).norm() < tolerance
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_matrix_eq(a: &Matrix2x2, b: &Matrix2x2) {
        for row in 0..2 {
            for col in 0..2 {
                assert!(
                    (a[row][col] - b[row][col]).norm() < 1e-12,
                    "entry ({}, {}): {} vs {}",
                    row,
                    col,
                    a[row][col],
                    b[row][col]
                );
            }
        }
    }

    #[test]
    fn test_constant_matrices_are_unitary() {
        for m in [IDENTITY, HADAMARD, PAULI_X, PAULI_Y, PAULI_Z] {
            assert!(is_unitary(&m, 1e-12));
        }
    }

    #[test]
    fn test_parametric_matrices_are_unitary() {
        for theta in [0.0, 0.3, PI / 3.0, PI, 2.5 * PI] {
            assert!(is_unitary(&rotation_x(theta), 1e-12));
            assert!(is_unitary(&rotation_y(theta), 1e-12));
            assert!(is_unitary(&rotation_z(theta), 1e-12));
            assert!(is_unitary(&generic_unitary(theta, 0.7, -1.1), 1e-12));
        }
    }

    #[test]
    fn test_u_reduces_to_rx() {
        let theta = PI / 3.0;
        assert_matrix_eq(&generic_unitary(theta, -PI / 2.0, PI / 2.0), &rotation_x(theta));
    }

    #[test]
    fn test_u_reduces_to_ry() {
        let theta = 1.1;
        assert_matrix_eq(&generic_unitary(theta, 0.0, 0.0), &rotation_y(theta));
    }

    #[test]
    fn test_rotation_by_pi() {
        // Rx(pi) = -iX
        let expected = [[ZERO, NEG_I], [NEG_I, ZERO]];
        assert_matrix_eq(&rotation_x(PI), &expected);
    }
}
