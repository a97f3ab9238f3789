//! Frequency sweep analysis.
//!
//! For each frequency point:
//!   1. Form s = j·2π·f
//!   2. Cascade the canonically ordered component matrices
//!   3. Apply the source/load termination algebra
//!   4. Collect the requested outputs
//!
//! Frequency points come from the TERMS section:
//!   - `Fstart`, `Fend`, `Nfreqs`: linear, endpoints inclusive
//!   - `LFstart`, `LFend`, `Nfreqs`: logarithmic, endpoints inclusive
//!
//! When both sets are complete the linear sweep is used.

use rayon::prelude::*;

use super::{ResolvedOutput, SweepOptions, SweepPoint, SweepResult};
use crate::error::{Result, TwoportError};
use crate::ir::{Circuit, OutputQuantity, Terminations};
use crate::solver::ordering::canonical_order;
use crate::solver::terminations::solve;
use crate::solver::{cascade, laplace_at};
use crate::stats::Stats;

/// How sweep points are spaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepSpacing {
    Linear,
    Logarithmic,
}

/// A validated frequency plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPlan {
    pub spacing: SweepSpacing,
    pub start: f64,
    pub end: f64,
    pub n_points: usize,
}

impl SweepPlan {
    pub fn frequencies(&self) -> Vec<f64> {
        match self.spacing {
            SweepSpacing::Linear => linspace(self.start, self.end, self.n_points),
            SweepSpacing::Logarithmic => logspace(self.start, self.end, self.n_points),
        }
    }
}

/// Largest sweep the driver will allocate for.
pub const MAX_POINTS: usize = 1 << 24;

const LINEAR_KEYS: [&str; 3] = ["Fstart", "Fend", "Nfreqs"];
const LOG_KEYS: [&str; 3] = ["LFstart", "LFend", "Nfreqs"];

/// Check one parameter set, returning the names that are missing or invalid.
fn parameter_set(
    terms: &Terminations,
    keys: [&'static str; 3],
) -> std::result::Result<(f64, f64, usize), Vec<&'static str>> {
    let values = keys.map(|key| terms.get(key).filter(|v| *v > 0.0));
    // Nfreqs is a count; it truncates and must land in 1..=MAX_POINTS.
    let n_points = values[2]
        .filter(|n| *n < (MAX_POINTS + 1) as f64)
        .map(|n| n as usize)
        .filter(|n| *n >= 1);

    match (values[0], values[1], n_points) {
        (Some(start), Some(end), Some(n)) => Ok((start, end, n)),
        _ => {
            let mut bad: Vec<&'static str> = keys
                .iter()
                .zip(values)
                .filter(|(_, v)| v.is_none())
                .map(|(k, _)| *k)
                .collect();
            if values[2].is_some() && n_points.is_none() {
                bad.push(keys[2]);
            }
            Err(bad)
        }
    }
}

/// Work out the sweep from the termination parameters.
pub fn plan(terms: &Terminations) -> Result<SweepPlan> {
    let linear = parameter_set(terms, LINEAR_KEYS);
    let log = parameter_set(terms, LOG_KEYS);

    match (linear, log) {
        (Ok((start, end, n_points)), _) => Ok(SweepPlan {
            spacing: SweepSpacing::Linear,
            start,
            end,
            n_points,
        }),
        (Err(_), Ok((start, end, n_points))) => Ok(SweepPlan {
            spacing: SweepSpacing::Logarithmic,
            start,
            end,
            n_points,
        }),
        (Err(linear_bad), Err(log_bad)) => {
            let mut bad = linear_bad;
            for key in log_bad {
                if !bad.contains(&key) {
                    bad.push(key);
                }
            }
            Err(TwoportError::MissingParameter(format!(
                "Invalid or missing frequency parameters: {}",
                bad.join(", ")
            )))
        }
    }
}

/// Frequencies implied by the termination parameters.
pub fn frequencies(terms: &Terminations) -> Result<Vec<f64>> {
    Ok(plan(terms)?.frequencies())
}

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            points[n - 1] = end;
            points
        }
    }
}

/// `n` logarithmically spaced points from `start` to `end` inclusive.
pub fn logspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let (lo, hi) = (start.log10(), end.log10());
            let step = (hi - lo) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n)
                .map(|i| 10.0_f64.powf(lo + step * i as f64))
                .collect();
            points[0] = start;
            points[n - 1] = end;
            points
        }
    }
}

/// Run the frequency sweep described by the circuit's TERMS section.
///
/// All parameters and output names are validated before the first point is
/// evaluated, so a failure never leaves a partial result behind.
pub fn run(
    circuit: &Circuit,
    options: &SweepOptions,
    mut stats: Option<&mut Stats>,
) -> Result<SweepResult> {
    let sweep_plan = plan(&circuit.terminations)?;
    let rl = circuit.terminations.load()?;
    let source = circuit.terminations.source()?;

    let outputs = circuit
        .outputs
        .iter()
        .map(|request| -> Result<ResolvedOutput> {
            Ok(ResolvedOutput {
                request: request.clone(),
                quantity: request.name.parse::<OutputQuantity>()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let ordered = canonical_order(&circuit.components);
    let frequencies = sweep_plan.frequencies();
    let _span = tracing::info_span!(
        "sweep",
        n_points = frequencies.len(),
        components = ordered.len()
    )
    .entered();
    tracing::debug!(plan = ?sweep_plan, ?source, rl, "sweep plan");

    let evaluate = |&frequency: &f64| {
        let m = cascade(&ordered, laplace_at(frequency));
        let solution = solve(&m, rl, source);
        SweepPoint {
            frequency,
            values: outputs.iter().map(|o| solution.get(o.quantity)).collect(),
        }
    };

    let points: Vec<SweepPoint> = if options.parallel {
        frequencies.par_iter().map(evaluate).collect()
    } else {
        frequencies.iter().map(evaluate).collect()
    };

    if let Some(ref mut s) = stats {
        s.frequency_points += points.len() as u64;
        s.matrix_evaluations += (points.len() * ordered.len()) as u64;
    }

    Ok(SweepResult { outputs, points })
}
