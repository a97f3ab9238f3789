//! Canonical component order for cascading.
//!
//! ABCD products do not commute, so components must be multiplied from the
//! source end of the ladder towards the load. Each component is keyed by its
//! non-ground nodes:
//!
//! - no non-ground node: `(0, 0)`
//! - one non-ground node `n`: `(n, 0)`
//! - two non-ground nodes: `(min, max)`
//!
//! so the shunt element at node `n` sorts just before the series element
//! leaving node `n`. Equal keys keep their input order.

use crate::ir::{Component, NodeId};

pub fn sort_key(component: &Component) -> (NodeId, NodeId) {
    match (component.node_a, component.node_b) {
        (0, 0) => (0, 0),
        (n, 0) | (0, n) => (n, 0),
        (a, b) => (a.min(b), a.max(b)),
    }
}

/// Components in signal-path order. The input slice is left untouched.
pub fn canonical_order(components: &[Component]) -> Vec<Component> {
    let mut ordered = components.to_vec();
    ordered.sort_by_key(sort_key);
    for (position, component) in ordered.iter().enumerate() {
        tracing::trace!(position, %component, "canonical order");
    }
    ordered
}
