//! Source and load termination algebra.
//!
//! With the overall matrix [[A, B], [C, D]], load `RL` and a Thevenin
//! (`VT`, `RS`) or Norton (`IN`, `GS`) source:
//!
//! ```text
//! Zin  = (A·RL + B) / (C·RL + D)
//! Av   = RL / (A·RL + B)        Ai = 1 / (C·RL + D)        Ap = Av·conj(Ai)
//! Vout = Vin·Av                 Iout = Iin·Ai
//! Pin  = Vin·conj(Iin)          Pout = Vout·conj(Iout)
//! ```

use num_complex::Complex64;

use super::abcd::Abcd;
use crate::error::Result;
use crate::ir::{OutputQuantity, Source, Terminations};

/// Every quantity the solver derives at one frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub zin: Complex64,
    pub zout: Complex64,
    pub vin: Complex64,
    pub vout: Complex64,
    pub iin: Complex64,
    pub iout: Complex64,
    pub pin: Complex64,
    pub pout: Complex64,
    pub av: Complex64,
    pub ai: Complex64,
    pub ap: Complex64,
}

impl Solution {
    pub fn get(&self, quantity: OutputQuantity) -> Complex64 {
        match quantity {
            OutputQuantity::Vin => self.vin,
            OutputQuantity::Vout => self.vout,
            OutputQuantity::Iin => self.iin,
            OutputQuantity::Iout => self.iout,
            OutputQuantity::Zin => self.zin,
            OutputQuantity::Zout => self.zout,
            OutputQuantity::Pin => self.pin,
            OutputQuantity::Pout => self.pout,
            OutputQuantity::Av => self.av,
            OutputQuantity::Ai => self.ai,
            OutputQuantity::Ap => self.ap,
        }
    }
}

/// Solve the terminated network for a known load and source.
pub fn solve(m: &Abcd, rl: f64, source: Source) -> Solution {
    let Abcd { a, b, c, d } = *m;
    let one = Complex64::new(1.0, 0.0);

    let zin = (a * rl + b) / (c * rl + d);

    let (zout, vin, iin) = match source {
        Source::Thevenin { vt, rs } => {
            let zout = (d * rs + b) / (c * rs + a);
            let iin = vt / (zin + rs);
            let vin = vt - iin * rs;
            (zout, vin, iin)
        }
        Source::Norton { current, gs } => {
            let zout = (c + a * gs) / (d + b * gs);
            let vin = current * (zin / (one + zin * gs));
            let iin = current - vin * gs;
            (zout, vin, iin)
        }
    };

    let av = rl / (a * rl + b);
    let ai = one / (c * rl + d);
    let ap = av * ai.conj();

    let vout = vin * av;
    let iout = iin * ai;

    Solution {
        zin,
        zout,
        vin,
        vout,
        iin,
        iout,
        pin: vin * iin.conj(),
        pout: vout * iout.conj(),
        av,
        ai,
        ap,
    }
}

/// Solve using the load and source recorded in `terms`.
///
/// Fails with a missing-parameter error when `RL` is absent or the source is
/// not exactly one complete Thevenin or Norton pair.
pub fn solve_terminations(m: &Abcd, terms: &Terminations) -> Result<Solution> {
    let rl = terms.load()?;
    let source = terms.source()?;
    Ok(solve(m, rl, source))
}
