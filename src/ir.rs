//! Circuit intermediate representation.
//!
//! The parser produces a `Circuit` containing ladder components, termination
//! parameters and output requests. The solver consumes it one frequency at a
//! time.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TwoportError};

/// Node identifier in the ladder. Node 0 is ground.
pub type NodeId = u32;

/// Two-terminal element kinds supported in a ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Value in ohms.
    Resistor,
    /// Value in henries.
    Inductor,
    /// Value in farads.
    Capacitor,
    /// Value in siemens.
    Conductance,
}

impl ComponentKind {
    /// Map the element letter used in network descriptions.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'R' => Some(Self::Resistor),
            'L' => Some(Self::Inductor),
            'C' => Some(Self::Capacitor),
            'G' => Some(Self::Conductance),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Resistor => 'R',
            Self::Inductor => 'L',
            Self::Capacitor => 'C',
            Self::Conductance => 'G',
        }
    }
}

/// A single element between two ladder nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub kind: ComponentKind,
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub value: f64,
}

impl Component {
    pub fn new(kind: ComponentKind, node_a: NodeId, node_b: NodeId, value: f64) -> Self {
        Self {
            kind,
            node_a,
            node_b,
            value,
        }
    }

    /// A shunt element has one terminal on ground; everything else is series.
    pub fn is_shunt(&self) -> bool {
        self.node_a == 0 || self.node_b == 0
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n1={} n2={} {}={}",
            self.node_a,
            self.node_b,
            self.kind.letter(),
            self.value
        )
    }
}

/// Decimal scaling prefix shared by values and output display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Prefix {
    #[default]
    None,
    Kilo,
    Mega,
    Giga,
    Milli,
    Micro,
    Nano,
}

impl Prefix {
    /// Map a prefix character. Both `u` and `µ` mean micro.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'k' => Some(Self::Kilo),
            'M' => Some(Self::Mega),
            'G' => Some(Self::Giga),
            'm' => Some(Self::Milli),
            'u' | 'µ' => Some(Self::Micro),
            'n' => Some(Self::Nano),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Kilo => 1e3,
            Self::Mega => 1e6,
            Self::Giga => 1e9,
            Self::Milli => 1e-3,
            Self::Micro => 1e-6,
            Self::Nano => 1e-9,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Kilo => "k",
            Self::Mega => "M",
            Self::Giga => "G",
            Self::Milli => "m",
            Self::Micro => "u",
            Self::Nano => "n",
        }
    }
}

/// Display unit attached to an output request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    None,
    Volt,
    Amp,
    Watt,
    Ohm,
    /// Dimensionless ratio.
    Linear,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Volt => "V",
            Self::Amp => "A",
            Self::Watt => "W",
            Self::Ohm => "Ohms",
            Self::Linear => "L",
        }
    }
}

/// The fixed vocabulary of quantities the solver can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputQuantity {
    Vin,
    Vout,
    Iin,
    Iout,
    Zin,
    Zout,
    Pin,
    Pout,
    Av,
    Ai,
    Ap,
}

impl OutputQuantity {
    pub const ALL: [OutputQuantity; 11] = [
        Self::Vin,
        Self::Vout,
        Self::Iin,
        Self::Iout,
        Self::Zin,
        Self::Zout,
        Self::Pin,
        Self::Pout,
        Self::Av,
        Self::Ai,
        Self::Ap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Vin => "Vin",
            Self::Vout => "Vout",
            Self::Iin => "Iin",
            Self::Iout => "Iout",
            Self::Zin => "Zin",
            Self::Zout => "Zout",
            Self::Pin => "Pin",
            Self::Pout => "Pout",
            Self::Av => "Av",
            Self::Ai => "Ai",
            Self::Ap => "Ap",
        }
    }

    /// Quantities shown as 10·log10 in dB rather than 20·log10.
    pub fn is_power_like(self) -> bool {
        matches!(self, Self::Pin | Self::Pout | Self::Zin | Self::Zout)
    }

    pub fn is_gain(self) -> bool {
        matches!(self, Self::Av | Self::Ai | Self::Ap)
    }
}

impl FromStr for OutputQuantity {
    type Err = TwoportError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|q| q.name() == s)
            .ok_or_else(|| TwoportError::UnknownOutput(s.to_string()))
    }
}

/// One requested output column, as written in the OUTPUT section.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRequest {
    /// Name as written; resolved to an `OutputQuantity` at solve time.
    pub name: String,
    pub unit: Unit,
    pub prefix: Prefix,
    pub in_db: bool,
}

/// Source model driving port 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    /// Ideal voltage `vt` behind series resistance `rs`.
    Thevenin { vt: f64, rs: f64 },
    /// Ideal current `current` in parallel with conductance `gs`.
    Norton { current: f64, gs: f64 },
}

/// Termination and sweep parameters from the TERMS section.
///
/// Every field is optional at parse time; the solver reports what is missing
/// when it actually needs a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Terminations {
    pub vt: Option<f64>,
    pub rs: Option<f64>,
    pub in_: Option<f64>,
    pub gs: Option<f64>,
    pub rl: Option<f64>,
    pub fstart: Option<f64>,
    pub fend: Option<f64>,
    pub lfstart: Option<f64>,
    pub lfend: Option<f64>,
    pub nfreqs: Option<f64>,
}

impl Terminations {
    /// Recognised parameter names, in the order they are usually written.
    pub const NAMES: [&'static str; 10] = [
        "VT", "RS", "IN", "GS", "RL", "Fstart", "Fend", "LFstart", "LFend", "Nfreqs",
    ];

    fn slot(&self, name: &str) -> Option<&Option<f64>> {
        match name {
            "VT" => Some(&self.vt),
            "RS" => Some(&self.rs),
            "IN" => Some(&self.in_),
            "GS" => Some(&self.gs),
            "RL" => Some(&self.rl),
            "Fstart" => Some(&self.fstart),
            "Fend" => Some(&self.fend),
            "LFstart" => Some(&self.lfstart),
            "LFend" => Some(&self.lfend),
            "Nfreqs" => Some(&self.nfreqs),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<f64>> {
        match name {
            "VT" => Some(&mut self.vt),
            "RS" => Some(&mut self.rs),
            "IN" => Some(&mut self.in_),
            "GS" => Some(&mut self.gs),
            "RL" => Some(&mut self.rl),
            "Fstart" => Some(&mut self.fstart),
            "Fend" => Some(&mut self.fend),
            "LFstart" => Some(&mut self.lfstart),
            "LFend" => Some(&mut self.lfend),
            "Nfreqs" => Some(&mut self.nfreqs),
            _ => None,
        }
    }

    /// Value of a named parameter, `None` if unset or not a known name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.slot(name).copied().flatten()
    }

    /// Assign a named parameter. Returns `false` for names outside the
    /// vocabulary, leaving the terminations untouched.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Load resistance `RL`.
    pub fn load(&self) -> Result<f64> {
        self.rl
            .ok_or_else(|| TwoportError::MissingParameter("Load resistance required".into()))
    }

    /// The single complete source description.
    ///
    /// Exactly one of the Thevenin pair (`VT`, `RS`) or the Norton pair
    /// (`IN`, `GS`) must be set; any other combination is rejected.
    pub fn source(&self) -> Result<Source> {
        let thevenin = [self.vt, self.rs].iter().any(Option::is_some);
        let norton = [self.in_, self.gs].iter().any(Option::is_some);
        match (self.vt, self.rs, self.in_, self.gs) {
            (Some(vt), Some(rs), None, None) => Ok(Source::Thevenin { vt, rs }),
            (None, None, Some(current), Some(gs)) => Ok(Source::Norton { current, gs }),
            _ => {
                let detail = match (thevenin, norton) {
                    (true, true) => "both Thevenin and Norton parameters given",
                    (false, false) => "no VT/RS or IN/GS pair given",
                    _ => "incomplete VT/RS or IN/GS pair",
                };
                Err(TwoportError::MissingParameter(format!(
                    "Source parameters required ({detail})"
                )))
            }
        }
    }
}

/// A parsed network description.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    /// Components in the order they were written.
    pub components: Vec<Component>,
    pub terminations: Terminations,
    pub outputs: Vec<OutputRequest>,
}
