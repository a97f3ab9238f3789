//! File-level driver: `.net` in, `.csv` out.
//!
//! A failed analysis still leaves an (empty) output file behind so that
//! downstream tooling can tell "ran and failed" from "never ran".

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::analysis::{sweep, SweepOptions};
use crate::error::Result;
use crate::output;
use crate::parser;
use crate::stats::Stats;

/// One input network and where its results go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Job {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Results written next to the input, `.net` replaced by `.csv`.
    pub fn beside(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output = input.with_extension("csv");
        Self { input, output }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub sweep: SweepOptions,
    /// Right-align CSV columns before writing.
    pub align: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            sweep: SweepOptions::default(),
            align: true,
        }
    }
}

/// Analyze one network description and write its CSV.
///
/// On any failure the output file is truncated to empty and the error is
/// returned.
pub fn analyze_file(
    input: &Path,
    output: &Path,
    options: &BatchOptions,
    stats: Option<&mut Stats>,
) -> Result<()> {
    match render(input, options, stats) {
        Ok(csv) => {
            fs::write(output, csv)?;
            tracing::info!(input = %input.display(), output = %output.display(), "analysis written");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(input = %input.display(), error = %e, "analysis failed");
            output::write_empty(output)?;
            Err(e)
        }
    }
}

/// Parse, sweep and format one file, returning the CSV text.
fn render(input: &Path, options: &BatchOptions, mut stats: Option<&mut Stats>) -> Result<String> {
    let t = Instant::now();
    let text = fs::read_to_string(input)?;
    let circuit = parser::parse(&text)?;
    if let Some(ref mut s) = stats {
        s.add_phase("parse", t.elapsed());
        s.circuits += 1;
    }

    let t = Instant::now();
    let result = sweep::run(&circuit, &options.sweep, stats.as_deref_mut())?;
    if let Some(ref mut s) = stats {
        s.add_phase("sweep", t.elapsed());
    }

    let t = Instant::now();
    let mut buf = Vec::new();
    output::write_csv(&result, &mut buf)?;
    let csv = String::from_utf8_lossy(&buf).into_owned();
    let csv = if options.align {
        output::align_columns(&csv)
    } else {
        csv
    };
    if let Some(ref mut s) = stats {
        s.add_phase("write", t.elapsed());
    }

    Ok(csv)
}

/// Run every job on the rayon pool. Outcomes come back in job order.
pub fn analyze_all(
    jobs: &[Job],
    options: &BatchOptions,
    stats: Option<&mut Stats>,
) -> Vec<Result<()>> {
    let collect_stats = stats.is_some();
    tracing::info!(jobs = jobs.len(), "starting batch");

    let outcomes: Vec<(Result<()>, Option<Stats>)> = jobs
        .par_iter()
        .map(|job| {
            let mut local = collect_stats.then(Stats::new);
            let outcome = analyze_file(&job.input, &job.output, options, local.as_mut());
            (outcome, local)
        })
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    match stats {
        Some(total) => {
            for (outcome, local) in outcomes {
                if let Some(local) = local {
                    total.merge(&local);
                }
                results.push(outcome);
            }
        }
        None => results.extend(outcomes.into_iter().map(|(outcome, _)| outcome)),
    }
    results
}
