//! Reattaching wires to a block that replaced another.
//!
//! Wires refer to ports by id and width, never by position, so after a
//! replacement every wire that touched the old block is checked against the
//! new port set. Wires that no longer fit are dropped; an edit never fails
//! because of them.

use crate::descriptor::{BlockDescriptor, PortSpec, Position, CONSTANT_PORT_ID, MEMORY_PORT_ID};
use serde::{Deserialize, Serialize};

/// One end of a wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEnd {
    /// Id of the block the wire attaches to.
    pub block: String,
    /// Id of the port on that block.
    pub port: String,
}

impl WireEnd {
    /// Creates an endpoint.
    pub fn new(block: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            port: port.into(),
        }
    }

    /// Returns `true` for the output of a constant or memory block.
    pub fn is_parameter_source(&self) -> bool {
        self.port == CONSTANT_PORT_ID || self.port == MEMORY_PORT_ID
    }
}

/// A connection between two ports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    /// The driving end.
    pub source: WireEnd,
    /// The driven end.
    pub target: WireEnd,
    /// Bus width carried by the wire.
    #[serde(default = "default_width")]
    pub size: u32,
    /// Intermediate routing points.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<Position>,
}

fn default_width() -> u32 {
    1
}

impl Wire {
    /// A straight wire.
    pub fn new(source: WireEnd, target: WireEnd, size: u32) -> Self {
        Self {
            source,
            target,
            size,
            vertices: Vec::new(),
        }
    }

    /// Returns `true` if either end sits on `block`.
    pub fn touches(&self, block: &str) -> bool {
        self.source.block == block || self.target.block == block
    }
}

/// The result of rebinding: wires to recreate and wires that were lost.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rebound {
    /// Wires to attach to the new block.
    pub kept: Vec<Wire>,
    /// Wires with no matching port on the new block.
    pub dropped: Vec<Wire>,
}

/// Sorts `wires` into those that fit `block`'s ports and those that don't.
///
/// A source end on the block needs a right or top port with the wire's id
/// and width. A target end needs a left port, or a top port when the wire is
/// driven by a constant or memory block. Wires not touching the block are
/// kept as they are.
pub fn rebind_wires(block: &BlockDescriptor, wires: Vec<Wire>) -> Rebound {
    let Some(id) = block.id.as_deref() else {
        log::debug!("rebinding skipped: block has no id");
        return Rebound {
            kept: Vec::new(),
            dropped: wires,
        };
    };

    let mut rebound = Rebound::default();
    for wire in wires {
        if fits(block, id, &wire) {
            rebound.kept.push(wire);
        } else {
            rebound.dropped.push(wire);
        }
    }
    log::debug!(
        "rebound wires of block {id}: {} kept, {} dropped",
        rebound.kept.len(),
        rebound.dropped.len()
    );
    rebound
}

fn fits(block: &BlockDescriptor, id: &str, wire: &Wire) -> bool {
    let ports = &block.ports;
    if wire.source.block == id {
        let found = has_port(&ports.right, &wire.source.port, wire.size)
            || has_port(&ports.top, &wire.source.port, wire.size);
        if !found {
            return false;
        }
    }
    if wire.target.block == id {
        let candidates = if wire.source.is_parameter_source() {
            &ports.top
        } else {
            &ports.left
        };
        if !has_port(candidates, &wire.target.port, wire.size) {
            return false;
        }
    }
    true
}

fn has_port(ports: &[PortSpec], id: &str, size: u32) -> bool {
    ports.iter().any(|port| port.id == id && port.size == size)
}
