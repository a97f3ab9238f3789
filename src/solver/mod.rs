//! Cascaded two-port solver.

pub mod abcd;
pub mod matrix;
pub mod ordering;
pub mod terminations;

use num_complex::Complex64;

pub use abcd::Abcd;

/// Anything that can be represented as a two-port section at complex frequency `s`.
pub trait TransferMatrix {
    fn abcd(&self, s: Complex64) -> Abcd;
}

/// Overall matrix of `sections` multiplied left to right, in the order given.
///
/// Callers are responsible for signal-path order, see [`ordering::canonical_order`].
/// An empty slice is the identity.
pub fn cascade<T: TransferMatrix>(sections: &[T], s: Complex64) -> Abcd {
    sections
        .iter()
        .fold(Abcd::identity(), |acc, section| acc * section.abcd(s))
}

/// Complex frequency `j·2π·f` for an AC analysis at `frequency` hertz.
pub fn laplace_at(frequency: f64) -> Complex64 {
    Complex64::new(0.0, 2.0 * std::f64::consts::PI * frequency)
}
