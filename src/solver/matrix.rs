//! Per-component ABCD matrices.
//!
//! A component with a grounded terminal is a shunt admittance across the
//! line; any other component is a series impedance along it.
//!
//! | Kind | Series        | Shunt         |
//! |------|---------------|---------------|
//! | R    | Z = R         | Y = 1/R       |
//! | L    | Z = sL        | Y = 1/(sL)    |
//! | C    | Z = 1/(sC)    | Y = sC        |
//! | G    | Z = 1/G       | Y = G         |
//!
//! The reciprocal of an exact zero is `+∞ + 0j`, so a series capacitor or a
//! shunt inductor at s = 0 gives an infinite entry rather than NaN.

use num_complex::Complex64;

use super::abcd::Abcd;
use super::TransferMatrix;
use crate::ir::{Component, ComponentKind};

fn reciprocal(z: Complex64) -> Complex64 {
    if z.re == 0.0 && z.im == 0.0 {
        Complex64::new(f64::INFINITY, 0.0)
    } else {
        z.inv()
    }
}

/// ABCD matrix of a single component at complex frequency `s`.
pub fn component_matrix(component: &Component, s: Complex64) -> Abcd {
    let value = Complex64::new(component.value, 0.0);
    match (component.kind, component.is_shunt()) {
        (ComponentKind::Resistor, false) => Abcd::series_impedance(value),
        (ComponentKind::Resistor, true) => Abcd::shunt_admittance(reciprocal(value)),
        (ComponentKind::Inductor, false) => Abcd::series_impedance(s * value),
        (ComponentKind::Inductor, true) => Abcd::shunt_admittance(reciprocal(s * value)),
        (ComponentKind::Capacitor, false) => Abcd::series_impedance(reciprocal(s * value)),
        (ComponentKind::Capacitor, true) => Abcd::shunt_admittance(s * value),
        (ComponentKind::Conductance, false) => Abcd::series_impedance(reciprocal(value)),
        (ComponentKind::Conductance, true) => Abcd::shunt_admittance(value),
    }
}

impl TransferMatrix for Component {
    fn abcd(&self, s: Complex64) -> Abcd {
        component_matrix(self, s)
    }
}
