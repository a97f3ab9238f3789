//! Analysis engine — frequency sweeps over a parsed circuit.

pub mod sweep;

use num_complex::Complex64;

use crate::ir::{OutputQuantity, OutputRequest};

/// Knobs for a sweep run.
#[derive(Debug, Clone, Copy)]
pub struct SweepOptions {
    /// Evaluate frequency points on the rayon pool. Results keep sweep order
    /// either way.
    pub parallel: bool,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// An output request paired with the quantity its name resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOutput {
    pub request: OutputRequest,
    pub quantity: OutputQuantity,
}

/// Requested output values at one frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    /// Frequency (Hz).
    pub frequency: f64,
    /// One value per entry of `SweepResult::outputs`, in the same order.
    pub values: Vec<Complex64>,
}

/// Frequency sweep results.
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub outputs: Vec<ResolvedOutput>,
    /// Points in sweep order.
    pub points: Vec<SweepPoint>,
}

impl SweepResult {
    pub fn frequencies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.frequency).collect()
    }

    /// Values of the first output named `name` across the sweep.
    pub fn column(&self, name: &str) -> Option<Vec<Complex64>> {
        let index = self.outputs.iter().position(|o| o.request.name == name)?;
        Some(self.points.iter().map(|p| p.values[index]).collect())
    }
}
