//! Results output formatting (CSV).
//!
//! Format:
//! ```csv
//! Freq,Re(Vin),Im(Vin),|Av|,/_Av
//! Hz,mV,mV,dB,Rads
//! 1.000e+01,2.500e+03,-1.571e-01,-6.021e+00,-1.000e-04,
//! ```
//!
//! Linear outputs are written as real and imaginary parts, dB outputs as
//! magnitude (dB) and phase (radians). Values are divided by the requested
//! prefix before formatting. Data rows carry a trailing empty field.

use std::io::Write;
use std::path::Path;

use num_complex::Complex64;

use crate::analysis::{ResolvedOutput, SweepPoint, SweepResult};
use crate::error::Result;
use crate::ir::Unit;

/// Scientific notation with three decimals and a signed two-digit exponent,
/// e.g. `1.000e+01`, `-2.500e-03`.
pub fn format_sci(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let raw = format!("{:.3e}", x);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => raw,
    }
}

/// The two display cells for one output value.
fn value_cells(output: &ResolvedOutput, value: Complex64) -> [String; 2] {
    let scaled = value / output.request.prefix.multiplier();
    if output.request.in_db {
        let factor = if output.quantity.is_power_like() { 10.0 } else { 20.0 };
        [
            format_sci(factor * scaled.norm().log10()),
            format_sci(scaled.arg()),
        ]
    } else {
        [format_sci(scaled.re), format_sci(scaled.im)]
    }
}

/// Write the name and unit header rows.
pub fn write_header<W: Write>(outputs: &[ResolvedOutput], writer: &mut W) -> Result<()> {
    let mut names = vec!["Freq".to_string()];
    let mut units = vec!["Hz".to_string()];

    for output in outputs {
        let request = &output.request;
        if request.in_db {
            names.push(format!("|{}|", request.name));
            names.push(format!("/_{}", request.name));
            units.push(format!("dB{}{}", request.prefix.symbol(), request.unit.symbol()));
            units.push("Rads".to_string());
        } else {
            // Gains are ratios whatever unit was written.
            let unit = if output.quantity.is_gain() {
                Unit::Linear
            } else {
                request.unit
            };
            names.push(format!("Re({})", request.name));
            names.push(format!("Im({})", request.name));
            let label = format!("{}{}", request.prefix.symbol(), unit.symbol());
            units.push(label.clone());
            units.push(label);
        }
    }

    writeln!(writer, "{}", names.join(","))?;
    writeln!(writer, "{}", units.join(","))?;
    Ok(())
}

/// Write one data row for a sweep point.
pub fn write_row<W: Write>(
    outputs: &[ResolvedOutput],
    point: &SweepPoint,
    writer: &mut W,
) -> Result<()> {
    let mut cells = vec![format_sci(point.frequency)];
    for (output, value) in outputs.iter().zip(&point.values) {
        cells.extend(value_cells(output, *value));
    }
    cells.push(String::new());
    writeln!(writer, "{}", cells.join(","))?;
    Ok(())
}

/// Write sweep results as CSV.
pub fn write_csv<W: Write>(result: &SweepResult, writer: &mut W) -> Result<()> {
    write_header(&result.outputs, writer)?;
    for point in &result.points {
        write_row(&result.outputs, point, writer)?;
    }
    Ok(())
}

/// Right-align every column of a comma-separated table.
///
/// Each cell is padded to two more than the widest cell of its column
/// (leading signs not counted). The first cell loses one leading space and
/// the last cell of each row is right-trimmed.
pub fn align_columns(csv: &str) -> String {
    let rows: Vec<Vec<&str>> = csv.lines().map(|line| line.split(',').collect()).collect();

    let mut widths: Vec<usize> = Vec::new();
    for row in &rows {
        if widths.len() < row.len() {
            widths.resize(row.len(), 0);
        }
        for (i, cell) in row.iter().enumerate() {
            let unsigned = cell.trim_start_matches(|c| c == '-' || c == '+');
            widths[i] = widths[i].max(unsigned.chars().count());
        }
    }

    let mut aligned = String::with_capacity(csv.len() * 2);
    for row in &rows {
        let mut cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:>width$}", cell, width = widths[i] + 2))
            .collect();
        if let Some(first) = cells.first_mut() {
            first.remove(0);
        }
        if let Some(last) = cells.last_mut() {
            let trimmed = last.trim_end().len();
            last.truncate(trimmed);
        }
        aligned.push_str(&cells.join(","));
        aligned.push('\n');
    }
    aligned
}

/// Create (or truncate) `path` as an empty file, the artifact left behind
/// when an analysis fails.
pub fn write_empty(path: &Path) -> Result<()> {
    std::fs::write(path, "")?;
    Ok(())
}
