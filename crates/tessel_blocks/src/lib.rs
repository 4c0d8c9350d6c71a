//! Label parsing, pin derivation and block geometry for the Tessel circuit editor.
//!
//! Text typed by the user flows through a fixed pipeline: labels are parsed
//! ([`label`]), expanded into pins ([`pins`]), checked for name collisions
//! ([`unique`]) and assembled into positioned [`BlockDescriptor`]s by the
//! [`BlockBuilder`]. Edits go through the same stages and then through the
//! [`geometry`] reconciler and, when a block is swapped out, the [`wire`]
//! rebinder. Every stage is a pure function of its inputs; errors are
//! returned as [`BlockError`] values and nothing is committed on failure.

#![warn(missing_docs)]

pub mod builder;
pub mod code;
pub mod composite;
pub mod descriptor;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod i18n;
pub mod label;
pub mod pins;
pub mod rules;
pub mod unique;
pub mod wire;

pub use builder::{BlockBuilder, BuildSettings, PortOptions, CODE_SIZE, MEMORY_SIZE};
pub use code::{code_form_fields, CodeFormFields};
pub use composite::{composite_size, CompositeSource};
pub use descriptor::{
    AddressFormat, BlockDescriptor, BlockKind, PortSpec, Ports, Position, Side, Size,
};
pub use edit::EditOutcome;
pub use error::{BlockError, BlockResult};
pub use geometry::{anchor_offset, reconcile, Footprint};
pub use i18n::{Localizer, Passthrough};
pub use label::{
    parse_param_label, parse_port_label, parse_port_label_with, BitRange, Grammar, ParamLabel,
    PortLabel, MAX_BUS_WIDTH,
};
pub use pins::{copy_pins, derive_pins, Pin};
pub use rules::{BoardRules, DefaultHint, InputRules, NoRules};
pub use unique::check_unique;
pub use wire::{rebind_wires, Rebound, Wire, WireEnd};
