//! 2×2 complex transfer (ABCD) matrix.
//!
//! ```text
//! [V1]   [A B] [V2]
//! [I1] = [C D] [I2]
//! ```
//!
//! Port 1 faces the source, port 2 the load. Cascading two sections is the
//! matrix product in signal-path order.

use std::ops::Mul;

use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Abcd {
    pub a: Complex64,
    pub b: Complex64,
    pub c: Complex64,
    pub d: Complex64,
}

impl Abcd {
    pub const fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { a, b, c, d }
    }

    /// Through connection, the result of cascading nothing.
    pub const fn identity() -> Self {
        Self::new(ONE, ZERO, ZERO, ONE)
    }

    /// Series impedance `z`: [[1, z], [0, 1]].
    pub fn series_impedance(z: Complex64) -> Self {
        Self::new(ONE, z, ZERO, ONE)
    }

    /// Shunt admittance `y`: [[1, 0], [y, 1]].
    pub fn shunt_admittance(y: Complex64) -> Self {
        Self::new(ONE, ZERO, y, ONE)
    }

    pub fn determinant(&self) -> Complex64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse matrix, `None` when the determinant is exactly zero.
    pub fn inverse(&self) -> Option<Abcd> {
        let det = self.determinant();
        if det.norm() == 0.0 {
            return None;
        }
        Some(Self::new(self.d / det, -self.b / det, -self.c / det, self.a / det))
    }

    /// Port-2 voltage and current from port-1 quantities, `[V2; I2] = M⁻¹·[V1; I1]`.
    ///
    /// A singular matrix has no defined port-2 state; it yields `(0, 0)`.
    pub fn output_port(&self, v1: Complex64, i1: Complex64) -> (Complex64, Complex64) {
        match self.inverse() {
            Some(inv) => (inv.a * v1 + inv.b * i1, inv.c * v1 + inv.d * i1),
            None => (ZERO, ZERO),
        }
    }
}

impl Default for Abcd {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Abcd {
    type Output = Abcd;

    /// `self` followed by `rhs` in the signal path.
    fn mul(self, rhs: Abcd) -> Abcd {
        Abcd {
            a: self.a * rhs.a + self.b * rhs.c,
            b: self.a * rhs.b + self.b * rhs.d,
            c: self.c * rhs.a + self.d * rhs.c,
            d: self.c * rhs.b + self.d * rhs.d,
        }
    }
}
