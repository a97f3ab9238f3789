//! End-to-end tests: network description in, sweep results and CSV out.

use std::f64::consts::{FRAC_PI_4, PI};

use approx::assert_abs_diff_eq;
use num_complex::Complex64;
use twoport::analysis::{sweep, SweepOptions, SweepResult};
use twoport::error::TwoportError;
use twoport::output;
use twoport::parser;

/// Helper: parse + sweep
fn sweep_of(net: &str) -> SweepResult {
    let circuit = parser::parse(net).expect("parse failed");
    sweep::run(&circuit, &SweepOptions::default(), None).expect("sweep failed")
}

/// Helper: parse + sweep, expecting a failure somewhere along the way
fn failure_of(net: &str) -> TwoportError {
    match parser::parse(net) {
        Err(e) => e,
        Ok(circuit) => sweep::run(&circuit, &SweepOptions::default(), None)
            .expect_err("expected analysis to fail"),
    }
}

fn net(circuit: &str, terms: &str, outputs: &str) -> String {
    format!(
        "<CIRCUIT>\n{}\n</CIRCUIT>\n<TERMS>\n{}\n</TERMS>\n<OUTPUT>\n{}\n</OUTPUT>\n",
        circuit, terms, outputs
    )
}

fn only(result: &SweepResult, name: &str) -> Complex64 {
    let column = result.column(name).expect("output missing");
    assert_eq!(column.len(), 1);
    column[0]
}

// ── Resistive networks ────────────────────────────────────────────

#[test]
fn test_resistive_divider() {
    let result = sweep_of(&net(
        "n1=1 n2=2 R=100\nn1=2 n2=0 R=100",
        "VT=10 RS=0 RL=1G\nFstart=1k Fend=1k Nfreqs=1",
        "Vin V\nVout V\nAv\nZin Ohms",
    ));

    // Unloaded divider: half the input appears at the output
    assert_abs_diff_eq!(only(&result, "Vin").re, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(only(&result, "Vout").re, 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(only(&result, "Av").re, 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(only(&result, "Zin").re, 200.0, epsilon = 1e-4);
    assert_abs_diff_eq!(only(&result, "Zin").im, 0.0, epsilon = 1e-12);
}

#[test]
fn test_matched_source_delivers_quarter_power() {
    // 50 Ω series element into 50 Ω load from a 50 Ω, 2 V source:
    // total 150 Ω, I = 2/150, P_load = I²·50
    let result = sweep_of(&net(
        "n1=1 n2=2 R=50",
        "VT=2 RS=50 RL=50\nFstart=10 Fend=10 Nfreqs=1",
        "Pout W\nIout A",
    ));
    let i = 2.0 / 150.0;
    assert_abs_diff_eq!(only(&result, "Iout").re, i, epsilon = 1e-12);
    assert_abs_diff_eq!(only(&result, "Pout").re, i * i * 50.0, epsilon = 1e-12);
    assert_abs_diff_eq!(only(&result, "Pout").im, 0.0, epsilon = 1e-12);
}

// ── Reactive networks ─────────────────────────────────────────────

#[test]
fn test_rc_lowpass_corner() {
    // f_c = 1 / (2π·1k·1u)
    let fc = 1.0 / (2.0 * PI * 1e3 * 1e-6);
    let result = sweep_of(&net(
        "n1=1 n2=2 R=1k\nn1=2 n2=0 C=1u",
        &format!("VT=1 RS=50 RL=1G\nFstart={fc} Fend={fc} Nfreqs=1"),
        "Av",
    ));
    let av = only(&result, "Av");
    assert_abs_diff_eq!(av.norm(), 1.0 / 2f64.sqrt(), epsilon = 1e-5);
    assert_abs_diff_eq!(av.arg(), -FRAC_PI_4, epsilon = 1e-5);
}

#[test]
fn test_rc_lowpass_rolls_off() {
    let result = sweep_of(&net(
        "n1=1 n2=2 R=1k\nn1=2 n2=0 C=1u",
        "VT=1 RS=50 RL=1G\nLFstart=10 LFend=100k Nfreqs=5",
        "Av",
    ));
    let av = result.column("Av").unwrap();
    assert_eq!(av.len(), 5);
    for pair in av.windows(2) {
        assert!(pair[1].norm() < pair[0].norm());
    }
    // Two decades above the corner: about -20 dB per decade
    let f = result.frequencies()[4];
    let expected = 1.0 / (1.0 + (2.0 * PI * f * 1e-3).powi(2)).sqrt();
    assert_abs_diff_eq!(av[4].norm(), expected, epsilon = 1e-6);
}

#[test]
fn test_series_inductor_input_impedance() {
    // Zin = jωL + RL
    let result = sweep_of(&net(
        "n1=1 n2=2 L=1m",
        "VT=1 RS=50 RL=100\nFstart=1k Fend=1k Nfreqs=1",
        "Zin Ohms",
    ));
    let zin = only(&result, "Zin");
    assert_abs_diff_eq!(zin.re, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(zin.im, 2.0 * PI * 1e3 * 1e-3, epsilon = 1e-9);
}

// ── Ordering and source equivalence ───────────────────────────────

#[test]
fn test_component_listing_order_does_not_matter() {
    let ordered = "\
n1=1 n2=0 R=1k
n1=1 n2=2 L=2m
n1=2 n2=0 C=470n
n1=2 n2=3 R=22
n1=3 n2=0 G=5m";
    let shuffled = "\
n1=0 n2=3 G=5m
n1=3 n2=2 R=22
n1=2 n2=1 L=2m
n1=2 n2=0 C=470n
n1=1 n2=0 R=1k";
    let terms = "VT=1 RS=50 RL=75\nLFstart=100 LFend=100k Nfreqs=7";
    let outputs = "Vout V\nIin A\nZout Ohms\nAp";

    let a = sweep_of(&net(ordered, terms, outputs));
    let b = sweep_of(&net(shuffled, terms, outputs));
    assert_eq!(a.points, b.points);
}

#[test]
fn test_norton_equivalent_of_thevenin_source() {
    let circuit = "n1=1 n2=2 R=10\nn1=2 n2=0 C=1u\nn1=2 n2=3 L=5m";
    let sweep = "Fstart=100 Fend=10k Nfreqs=5";
    let outputs = "Vin V\nVout V\nIin A\nIout A\nPout W";

    let thevenin = sweep_of(&net(circuit, &format!("VT=5 RS=50 RL=75\n{sweep}"), outputs));
    let norton = sweep_of(&net(circuit, &format!("IN=100m GS=20m RL=75\n{sweep}"), outputs));

    for (t, n) in thevenin.points.iter().zip(&norton.points) {
        for (tv, nv) in t.values.iter().zip(&n.values) {
            assert_abs_diff_eq!(tv.re, nv.re, epsilon = 1e-12);
            assert_abs_diff_eq!(tv.im, nv.im, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_sequential_matches_parallel() {
    let circuit = parser::parse(&net(
        "n1=1 n2=2 R=1k\nn1=2 n2=0 C=1u",
        "VT=1 RS=50 RL=10k\nLFstart=1 LFend=1M Nfreqs=61",
        "Vout V\nAi",
    ))
    .unwrap();
    let parallel = sweep::run(&circuit, &SweepOptions { parallel: true }, None).unwrap();
    let sequential = sweep::run(&circuit, &SweepOptions { parallel: false }, None).unwrap();
    assert_eq!(parallel.points, sequential.points);
}

// ── CSV output ────────────────────────────────────────────────────

#[test]
fn test_csv_output_end_to_end() {
    let fc = 1.0 / (2.0 * PI * 1e3 * 1e-6);
    let result = sweep_of(&net(
        "n1=1 n2=2 R=1k\nn1=2 n2=0 C=1u",
        &format!("VT=1 RS=50 RL=1G\nFstart={fc} Fend={fc} Nfreqs=1"),
        "Av dB\nVin mV",
    ));

    let mut buf = Vec::new();
    output::write_csv(&result, &mut buf).unwrap();
    let aligned = output::align_columns(&String::from_utf8(buf).unwrap());
    let lines: Vec<&str> = aligned.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].replace(' ', ""), "Freq,|Av|,/_Av,Re(Vin),Im(Vin)");
    assert_eq!(lines[1].replace(' ', ""), "Hz,dB,Rads,mV,mV");

    let cells: Vec<String> = lines[2].split(',').map(|c| c.trim().to_string()).collect();
    assert_eq!(cells[0], "1.592e+02");
    assert_eq!(cells[1], "-3.010e+00");
    assert_eq!(cells[2], "-7.854e-01");
    assert_eq!(cells[5], "");

    // Every line of an aligned table has the same width up to the last column
    let first_comma: Vec<usize> = lines.iter().map(|l| l.find(',').unwrap()).collect();
    assert!(first_comma.iter().all(|&c| c == first_comma[0]));
}

// ── Error taxonomy ────────────────────────────────────────────────

#[test]
fn test_missing_section_is_grammar_error() {
    let err = failure_of("<CIRCUIT>\nn1=1 n2=2 R=1\n</CIRCUIT>\n<TERMS>\nRL=1\n</TERMS>\n");
    assert!(matches!(err, TwoportError::Grammar(_)), "{err}");
}

#[test]
fn test_skipped_node_is_topology_error() {
    let err = failure_of(&net(
        "n1=1 n2=3 R=1",
        "VT=1 RS=1 RL=1\nFstart=1 Fend=2 Nfreqs=2",
        "Vout V",
    ));
    assert!(matches!(err, TwoportError::Topology(_)), "{err}");
}

#[test]
fn test_missing_load_is_missing_parameter() {
    let err = failure_of(&net(
        "n1=1 n2=2 R=1",
        "VT=1 RS=1\nFstart=1 Fend=2 Nfreqs=2",
        "Vout V",
    ));
    match err {
        TwoportError::MissingParameter(msg) => assert!(msg.contains("Load resistance")),
        other => panic!("expected MissingParameter, got {other}"),
    }
}

#[test]
fn test_missing_sweep_is_missing_parameter() {
    let err = failure_of(&net("n1=1 n2=2 R=1", "VT=1 RS=1 RL=1", "Vout V"));
    assert!(matches!(err, TwoportError::MissingParameter(_)), "{err}");
}

#[test]
fn test_unknown_output_name() {
    let err = failure_of(&net(
        "n1=1 n2=2 R=1",
        "VT=1 RS=1 RL=1\nFstart=1 Fend=2 Nfreqs=2",
        "Vouts V",
    ));
    match err {
        TwoportError::UnknownOutput(name) => assert!(name.contains("Vouts")),
        other => panic!("expected UnknownOutput, got {other}"),
    }
}
