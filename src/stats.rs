//! Performance statistics collection for `--stats` output.

use std::time::{Duration, Instant};

/// Collects phase timings and work counters.
///
/// Created when `--stats` is passed, threaded as `Option<&mut Stats>`.
/// Zero cost when `None`.
pub struct Stats {
    total_start: Instant,
    phases: Vec<(&'static str, Duration)>,
    pub circuits: u32,
    pub frequency_points: u64,
    /// Per-component matrices generated across all sweep points.
    pub matrix_evaluations: u64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            total_start: Instant::now(),
            phases: Vec::new(),
            circuits: 0,
            frequency_points: 0,
            matrix_evaluations: 0,
        }
    }

    /// Record a completed phase with its duration.
    pub fn add_phase(&mut self, name: &'static str, duration: Duration) {
        self.phases.push((name, duration));
    }

    /// Fold another collector into this one. Phases with the same name are
    /// summed.
    pub fn merge(&mut self, other: &Stats) {
        for (name, dur) in &other.phases {
            match self.phases.iter_mut().find(|(n, _)| n == name) {
                Some((_, total)) => *total += *dur,
                None => self.phases.push((*name, *dur)),
            }
        }
        self.circuits += other.circuits;
        self.frequency_points += other.frequency_points;
        self.matrix_evaluations += other.matrix_evaluations;
    }

    pub fn phases(&self) -> &[(&'static str, Duration)] {
        &self.phases
    }

    /// Print the stats table to stderr.
    pub fn display(&self) {
        let total = self.total_start.elapsed();
        eprintln!();
        eprintln!("=== twoport stats ===");

        for (name, dur) in &self.phases {
            eprintln!("  {:<24} {:>8.3}s", name, dur.as_secs_f64());
        }

        eprintln!("  Circuits:               {}", self.circuits);
        eprintln!("  Frequency points:       {}", self.frequency_points);
        eprintln!("  Matrix evaluations:     {}", self.matrix_evaluations);
        eprintln!("  ─────────────────────────────────");
        eprintln!("  Total:                  {:>8.3}s", total.as_secs_f64());
    }
}
