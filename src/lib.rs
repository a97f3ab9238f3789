//! Frequency-domain analysis of linear two-port ladder networks.
//!
//! A network description (`.net`) lists series and shunt R/L/C/G elements,
//! the source and load terminations, a frequency sweep and the quantities to
//! report. Each element becomes an ABCD transmission matrix; the matrices are
//! cascaded in ladder order and the termination algebra yields impedances,
//! voltages, currents, powers and gains at every sweep point.

pub mod analysis;
pub mod batch;
pub mod error;
pub mod ir;
pub mod output;
pub mod parser;
pub mod solver;
pub mod stats;
