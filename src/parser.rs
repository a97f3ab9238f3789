//! Network description parser.
//!
//! Parses the three-section `.net` format into the circuit IR.
//!
//! # Supported syntax
//!
//! ```text
//! # comment line
//! <CIRCUIT>
//! n1=1 n2=2 R=8.55            (fields in any order)
//! n1=2 n2=0 C=637 n
//! </CIRCUIT>
//! <TERMS>
//! VT=5 RS=50 RL=75
//! LFstart=10 LFend=10k Nfreqs=50
//! </TERMS>
//! <OUTPUT>
//! Vin mV
//! Av dB
//! </OUTPUT>
//! ```
//!
//! Values support the case-sensitive prefixes k, M, G, m, u (or µ) and n,
//! optionally separated from the number by blanks.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{anychar, char, digit0, digit1, one_of, space0, space1};
use nom::combinator::{eof, map_opt, map_res, opt, peek, recognize, value};
use nom::sequence::{preceded, terminated};
use nom::IResult;
use nom::Parser;

use crate::error::{Result, TwoportError};
use crate::ir::{Circuit, Component, ComponentKind, NodeId, OutputRequest, Prefix, Terminations, Unit};

/// The three sections of a network description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Circuit,
    Terms,
    Output,
}

impl Section {
    const ALL: [Section; 3] = [Section::Circuit, Section::Terms, Section::Output];

    fn name(self) -> &'static str {
        match self {
            Section::Circuit => "CIRCUIT",
            Section::Terms => "TERMS",
            Section::Output => "OUTPUT",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

enum Marker {
    Open(Section),
    Close(Section),
}

fn marker(line: &str) -> Option<Marker> {
    Section::ALL.into_iter().find_map(|section| {
        let name = section.name();
        let inner = line.strip_prefix('<')?.strip_suffix('>')?;
        match inner.strip_prefix('/') {
            Some(closed) if closed == name => Some(Marker::Close(section)),
            None if inner == name => Some(Marker::Open(section)),
            _ => None,
        }
    })
}

/// Parse a network description into a Circuit IR.
pub fn parse(input: &str) -> Result<Circuit> {
    let mut circuit = Circuit::default();
    let mut open: Option<Section> = None;
    let mut seen = [0usize; 3];

    for (line_num, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match marker(line) {
            Some(Marker::Open(section)) => {
                if let Some(current) = open {
                    return Err(grammar_err(
                        line_num,
                        raw_line,
                        &format!("{} section opened inside {}", section.name(), current.name()),
                    ));
                }
                if seen[section.index()] > 0 {
                    return Err(grammar_err(
                        line_num,
                        raw_line,
                        &format!("{} section opened more than once", section.name()),
                    ));
                }
                seen[section.index()] += 1;
                open = Some(section);
                tracing::debug!(line = line_num + 1, section = section.name(), "section opened");
            }
            Some(Marker::Close(section)) => {
                if open != Some(section) {
                    return Err(grammar_err(
                        line_num,
                        raw_line,
                        &format!("{} section closed without being opened", section.name()),
                    ));
                }
                open = None;
                tracing::debug!(line = line_num + 1, section = section.name(), "section closed");
            }
            None => match open {
                None => {
                    return Err(grammar_err(line_num, raw_line, "data outside of any section"));
                }
                Some(Section::Circuit) => {
                    let comp = parse_circuit_line(line)
                        .map_err(|e| grammar_err(line_num, raw_line, &e))?;
                    check_topology(&comp).map_err(|e| {
                        TwoportError::Topology(format!("line {}: {} in: {}", line_num + 1, e, raw_line))
                    })?;
                    circuit.components.push(comp);
                }
                Some(Section::Terms) => {
                    apply_terms_line(line, &mut circuit.terminations)
                        .map_err(|e| grammar_err(line_num, raw_line, &e))?;
                }
                Some(Section::Output) => {
                    let output = parse_output_line(line)
                        .map_err(|e| grammar_err(line_num, raw_line, &e))?;
                    circuit.outputs.push(output);
                }
            },
        }
    }

    if let Some(section) = open {
        return Err(TwoportError::Grammar(format!(
            "{} section not closed before end of input",
            section.name()
        )));
    }
    if let Some(missing) = Section::ALL.into_iter().find(|s| seen[s.index()] == 0) {
        return Err(TwoportError::Grammar(format!("{} section missing", missing.name())));
    }

    tracing::debug!(
        components = circuit.components.len(),
        outputs = circuit.outputs.len(),
        "network description parsed"
    );
    Ok(circuit)
}

fn grammar_err(line_num: usize, raw_line: &str, detail: &str) -> TwoportError {
    TwoportError::Grammar(format!("line {}: {} in: {}", line_num + 1, detail, raw_line))
}

// ---------------------------------------------------------------------------
// Numbers and prefixes
// ---------------------------------------------------------------------------

/// Plain decimal number: `-?digits[.digits][e[+-]digits]`.
fn real(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize((
            opt(char('-')),
            digit1,
            opt((char('.'), digit0)),
            opt((one_of("eE"), opt(one_of("+-")), digit1)),
        )),
        |text: &str| text.parse::<f64>(),
    )
    .parse(input)
}

/// Succeeds without consuming input at whitespace or end of line.
fn boundary(input: &str) -> IResult<&str, ()> {
    value((), peek(alt((space1, eof)))).parse(input)
}

fn prefix_char(input: &str) -> IResult<&str, Prefix> {
    map_opt(anychar, Prefix::from_char).parse(input)
}

/// A number with an optional magnitude prefix, e.g. `10k`, `637 n`, `8E10k`.
fn scaled_value(input: &str) -> IResult<&str, f64> {
    let (rest, number) = real(input)?;
    let (rest, scale) = opt(preceded(space0, terminated(prefix_char, boundary))).parse(rest)?;
    let (rest, _) = boundary(rest)?;
    Ok((rest, number * scale.unwrap_or_default().multiplier()))
}

// ---------------------------------------------------------------------------
// Token parsers
// ---------------------------------------------------------------------------

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_').parse(input)
}

/// `name =` with optional blanks around the equals sign.
fn key(input: &str) -> IResult<&str, &str> {
    terminated(identifier, (space0, char('='), space0)).parse(input)
}

fn node_id(input: &str) -> IResult<&str, NodeId> {
    terminated(map_res(digit1, |d: &str| d.parse::<NodeId>()), boundary).parse(input)
}

fn single_letter(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CIRCUIT section
// ---------------------------------------------------------------------------

/// Parse a line like: n1=1 n2=2 R=8.55k (fields in any order)
fn parse_circuit_line(line: &str) -> std::result::Result<Component, String> {
    let mut n1: Option<NodeId> = None;
    let mut n2: Option<NodeId> = None;
    let mut element: Option<(ComponentKind, f64)> = None;
    let mut rest = line;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let (after_key, name) =
            key(rest).map_err(|_| format!("expected <field>=<value> at '{}'", rest))?;

        match name {
            "n1" | "n2" => {
                let (r, node) = node_id(after_key)
                    .map_err(|_| format!("invalid node number for {}", name))?;
                let slot = if name == "n1" { &mut n1 } else { &mut n2 };
                if slot.replace(node).is_some() {
                    return Err(format!("{} given more than once", name));
                }
                rest = r;
            }
            _ => {
                let kind = single_letter(name)
                    .and_then(ComponentKind::from_letter)
                    .ok_or_else(|| format!("unknown field '{}'", name))?;
                let (r, value) = scaled_value(after_key)
                    .map_err(|_| format!("invalid value for {}", name))?;
                if element.replace((kind, value)).is_some() {
                    return Err("more than one component on a line".to_string());
                }
                rest = r;
            }
        }
    }

    match (n1, n2, element) {
        (Some(n1), Some(n2), Some((kind, value))) => Ok(Component::new(kind, n1, n2, value)),
        (None, _, _) => Err("missing n1".to_string()),
        (_, None, _) => Err("missing n2".to_string()),
        (_, _, None) => Err("missing component (R, L, C or G)".to_string()),
    }
}

/// Reject self-loops and series elements that skip a ladder node.
fn check_topology(comp: &Component) -> std::result::Result<(), String> {
    if comp.node_a == comp.node_b {
        return Err(format!("component connects node {} to itself", comp.node_a));
    }
    if !comp.is_shunt() && comp.node_a.abs_diff(comp.node_b) != 1 {
        return Err(format!(
            "series component between non-adjacent nodes {} and {}",
            comp.node_a, comp.node_b
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TERMS section
// ---------------------------------------------------------------------------

/// Parse a line of `name=value` assignments and store each one.
///
/// The whole line is validated before anything is stored.
fn apply_terms_line(line: &str, terms: &mut Terminations) -> std::result::Result<(), String> {
    let mut assignments = Vec::new();
    let mut rest = line;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let (r, (name, value)) = (key, scaled_value)
            .parse(rest)
            .map_err(|_| format!("expected <name>=<value> at '{}'", rest))?;
        if !Terminations::NAMES.contains(&name) {
            return Err(format!(
                "unknown termination parameter '{}' (expected one of {})",
                name,
                Terminations::NAMES.join(", ")
            ));
        }
        assignments.push((name, value));
        rest = r;
    }

    for (name, value) in assignments {
        terms.set(name, value);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// OUTPUT section
// ---------------------------------------------------------------------------

fn unit(input: &str) -> IResult<&str, Unit> {
    alt((
        value(Unit::Ohm, tag("Ohms")),
        value(Unit::Volt, tag("V")),
        value(Unit::Amp, tag("A")),
        value(Unit::Watt, tag("W")),
        value(Unit::Linear, tag("L")),
    ))
    .parse(input)
}

/// Parse a line like: Vin dBmV
fn parse_output_line(line: &str) -> std::result::Result<OutputRequest, String> {
    let (rest, name) = identifier(line).map_err(|_| "expected output name".to_string())?;

    let (rest, (in_db, prefix, unit)) = if rest.is_empty() {
        (rest, (None, None, None))
    } else {
        preceded(
            space1,
            (
                opt(tag("dB")),
                preceded(space0, opt(prefix_char)),
                preceded(space0, opt(unit)),
            ),
        )
        .parse(rest)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| format!("invalid display format after '{}'", name))?
    };

    (space0, eof)
        .parse(rest)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| format!("unexpected trailing text '{}'", rest))?;

    Ok(OutputRequest {
        name: name.to_string(),
        unit: unit.unwrap_or_default(),
        prefix: prefix.unwrap_or_default(),
        in_db: in_db.is_some(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
