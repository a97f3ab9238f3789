pub mod compare;

use num_complex::Complex64;
use serde_derive::Deserialize;

use twoport::analysis::{sweep, SweepOptions};
use twoport::parser;

use self::compare::{compare_point, format_report, Tolerances};

// ── Manifest types ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub defaults: Defaults,
    #[serde(rename = "circuit")]
    pub circuits: Vec<CircuitEntry>,
}

#[derive(Debug, Deserialize)]
pub struct Defaults {
    pub rel_tol: f64,
    pub abs_tol: f64,
}

#[derive(Debug, Deserialize)]
pub struct CircuitEntry {
    pub name: String,
    pub file: String,
    /// Output names in the order the OUTPUT section lists them.
    pub outputs: Vec<String>,
    pub rel_tol: Option<f64>,
    pub abs_tol: Option<f64>,
    #[serde(default)]
    pub expect: Vec<Expectation>,
}

#[derive(Debug, Deserialize)]
pub struct Expectation {
    pub output: String,
    pub frequency: f64,
    pub re: f64,
    pub im: f64,
}

// ── Manifest loading ────────────────────────────────────────────

pub fn load_manifest() -> Manifest {
    let content = std::fs::read_to_string("tests/regression/manifest.toml")
        .expect("failed to read tests/regression/manifest.toml");
    toml::from_str(&content).expect("failed to parse manifest.toml")
}

// ── Macro for test generation ───────────────────────────────────

macro_rules! regression_tests {
    ($($name:ident),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                $crate::regression::run_regression_test(stringify!($name));
            }
        )*
    };
}

pub(crate) use regression_tests;

// ── Test runner ─────────────────────────────────────────────────

pub fn run_regression_test(name: &str) {
    let manifest = load_manifest();
    let entry = manifest
        .circuits
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("circuit '{}' not found in manifest", name));

    let net_path = format!("tests/regression/circuits/{}", entry.file);
    let content = std::fs::read_to_string(&net_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", net_path, e));

    let circuit = parser::parse(&content)
        .unwrap_or_else(|e| panic!("parse failed for '{}': {}", entry.name, e));
    let result = sweep::run(&circuit, &SweepOptions::default(), None)
        .unwrap_or_else(|e| panic!("sweep failed for '{}': {}", entry.name, e));

    let names: Vec<&str> = result.outputs.iter().map(|o| o.request.name.as_str()).collect();
    assert_eq!(names, entry.outputs, "output order for '{}'", entry.name);
    assert!(!entry.expect.is_empty(), "no expectations for '{}'", entry.name);

    let tol = Tolerances {
        rel_tol: entry.rel_tol.unwrap_or(manifest.defaults.rel_tol),
        abs_tol: entry.abs_tol.unwrap_or(manifest.defaults.abs_tol),
    };

    let results: Vec<_> = entry
        .expect
        .iter()
        .map(|e| {
            compare_point(
                &result,
                &e.output,
                e.frequency,
                Complex64::new(e.re, e.im),
                &tol,
            )
        })
        .collect();

    if results.iter().any(|r| !r.passed) {
        let report = format_report(&results);
        panic!(
            "\n\nRegression test '{}' FAILED:\n\n{}\n",
            entry.name, report
        );
    }
}
