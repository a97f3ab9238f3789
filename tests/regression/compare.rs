use num_complex::Complex64;

use twoport::analysis::SweepResult;

/// Tolerance parameters for comparison.
pub struct Tolerances {
    pub rel_tol: f64,
    pub abs_tol: f64,
}

/// One expected value checked against the sweep.
pub struct PointComparison {
    pub output: String,
    pub frequency: f64,
    pub actual: Complex64,
    pub expected: Complex64,
    pub abs_error: f64,
    pub passed: bool,
}

/// Check if a value is within tolerance of reference.
/// Pass condition: |actual - ref| <= max(rel_tol * |ref|, abs_tol)
pub fn within_tolerance(actual: Complex64, reference: Complex64, tol: &Tolerances) -> bool {
    let err = (actual - reference).norm();
    let limit = (tol.rel_tol * reference.norm()).max(tol.abs_tol);
    err <= limit
}

/// Locate the sweep point at `frequency` (relative match, sweep points are
/// computed and may differ in the last bits).
pub fn find_point(result: &SweepResult, frequency: f64) -> Option<usize> {
    result
        .points
        .iter()
        .position(|p| (p.frequency - frequency).abs() <= 1e-9 * frequency.abs())
}

pub fn compare_point(
    result: &SweepResult,
    output: &str,
    frequency: f64,
    expected: Complex64,
    tol: &Tolerances,
) -> PointComparison {
    let column = result
        .column(output)
        .unwrap_or_else(|| panic!("output '{}' not in sweep result", output));
    let index = find_point(result, frequency)
        .unwrap_or_else(|| panic!("no sweep point at {} Hz", frequency));
    let actual = column[index];

    PointComparison {
        output: output.to_string(),
        frequency,
        actual,
        expected,
        abs_error: (actual - expected).norm(),
        passed: within_tolerance(actual, expected, tol),
    }
}

pub fn format_report(results: &[PointComparison]) -> String {
    let failures: Vec<_> = results.iter().filter(|r| !r.passed).collect();
    if failures.is_empty() {
        return "All points passed.\n".to_string();
    }
    let mut s = String::new();
    s.push_str(&format!(
        "{:<8} {:>12} {:>28} {:>28} {:>12}\n",
        "Output", "Freq", "Actual", "Expected", "Abs Err"
    ));
    s.push_str(&"-".repeat(92));
    s.push('\n');
    for r in &failures {
        s.push_str(&format!(
            "{:<8} {:>12.4e} {:>28} {:>28} {:>12.4e}\n",
            r.output,
            r.frequency,
            format!("{:.6e}", r.actual),
            format!("{:.6e}", r.expected),
            r.abs_error
        ));
    }
    s.push_str(&format!(
        "\n{} of {} points failed.\n",
        failures.len(),
        results.len()
    ));
    s
}
