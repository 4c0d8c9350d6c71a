//! Edit flows: a block and freshly typed text in, a new descriptor out.
//!
//! An edit never mutates the block it is given. It reports whether nothing
//! changed, whether the existing visual object can be patched with the new
//! descriptor, or whether it has to be swapped out, in which case the wires
//! that survive the swap are returned alongside.

use crate::builder::BlockBuilder;
use crate::descriptor::{AddressFormat, BlockDescriptor, BlockKind, LabelData, PortData};
use crate::error::{BlockError, BlockResult};
use crate::geometry::reconcile;
use crate::label::{parse_param_label, Grammar};
use crate::pins::{copy_pins, derive_pins};
use crate::wire::{rebind_wires, Rebound, Wire};
use serde::Serialize;

/// The result of an edit.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum EditOutcome {
    /// The typed values equal the current ones.
    Unchanged,
    /// Same identity and ports; update the existing object's data and position.
    Patch(BlockDescriptor),
    /// The port set changed; remove the old object and add this one.
    Replace {
        /// The new block, carrying the old block's id.
        block: BlockDescriptor,
        /// Wires sorted against the new ports.
        wires: Rebound,
    },
}

impl EditOutcome {
    /// The new descriptor, if there is one.
    pub fn block(&self) -> Option<&BlockDescriptor> {
        match self {
            EditOutcome::Unchanged => None,
            EditOutcome::Patch(block) | EditOutcome::Replace { block, .. } => Some(block),
        }
    }
}

fn wrong_kind(expected: &'static str, block: &BlockDescriptor) -> BlockError {
    BlockError::WrongKind {
        expected,
        found: block.type_name().to_string(),
    }
}

impl BlockBuilder {
    /// Rebuilds `block` with new data, keeping its id and size and moving it
    /// so that its anchor stays put.
    fn rebuild(&self, block: &BlockDescriptor, kind: BlockKind) -> BlockDescriptor {
        let mut new = self.build(block.id.clone(), kind, block.position, block.size);
        reconcile(block, &mut new, self.unit());
        new
    }

    fn replace(&self, block: &BlockDescriptor, kind: BlockKind, wires: Vec<Wire>) -> EditOutcome {
        let block = self.rebuild(block, kind);
        let wires = rebind_wires(&block, wires);
        EditOutcome::Replace { block, wires }
    }

    /// Edits an input or output block. `clock` is ignored for outputs.
    ///
    /// A range change replaces the block, carrying pin assignments over by
    /// position. Any other change patches it.
    pub fn edit_port(
        &self,
        block: &BlockDescriptor,
        label: &str,
        is_virtual: bool,
        clock: bool,
        wires: Vec<Wire>,
    ) -> BlockResult<EditOutcome> {
        let (old, is_input) = match &block.kind {
            BlockKind::Input(data) => (data, true),
            BlockKind::Output(data) => (data, false),
            _ => return Err(wrong_kind("port", block)),
        };
        let clock = clock && is_input;
        let parsed = self.parse_port(label, clock)?;
        if parsed.name == old.name
            && parsed.range == old.range
            && old.is_virtual == is_virtual
            && old.clock == clock
        {
            return Ok(EditOutcome::Unchanged);
        }

        let resized = parsed.range != old.range;
        let pins = if resized {
            let mut pins = derive_pins(&parsed);
            copy_pins(&old.pins, &mut pins);
            pins
        } else {
            old.pins.clone()
        };
        let data = PortData {
            name: parsed.name,
            range: parsed.range,
            pins,
            is_virtual,
            clock,
        };
        let kind = if is_input {
            BlockKind::Input(data)
        } else {
            BlockKind::Output(data)
        };

        if resized {
            log::debug!("port '{label}' changed width, replacing block");
            Ok(self.replace(block, kind, wires))
        } else {
            Ok(EditOutcome::Patch(self.rebuild(block, kind)))
        }
    }

    /// Edits an input or output label: name, range and color.
    pub fn edit_label(
        &self,
        block: &BlockDescriptor,
        label: &str,
        color: &str,
        wires: Vec<Wire>,
    ) -> BlockResult<EditOutcome> {
        let (old, make): (&LabelData, fn(LabelData) -> BlockKind) = match &block.kind {
            BlockKind::InputLabel(data) => (data, BlockKind::InputLabel),
            BlockKind::OutputLabel(data) => (data, BlockKind::OutputLabel),
            _ => return Err(wrong_kind("label", block)),
        };
        let parsed = self.parse_port(label, false)?;
        if parsed.name == old.name && parsed.range == old.range && old.color == color {
            return Ok(EditOutcome::Unchanged);
        }

        let resized = parsed.range != old.range;
        let pins = if resized {
            let mut pins = derive_pins(&parsed);
            copy_pins(&old.pins, &mut pins);
            pins
        } else {
            old.pins.clone()
        };
        let kind = make(LabelData {
            name: parsed.name,
            range: parsed.range,
            pins,
            color: color.to_string(),
        });

        if resized {
            Ok(self.replace(block, kind, wires))
        } else {
            Ok(EditOutcome::Patch(self.rebuild(block, kind)))
        }
    }

    /// Renames a label and recolors it, keeping its range.
    pub fn rename_label(
        &self,
        block: &BlockDescriptor,
        name: &str,
        color: &str,
    ) -> BlockResult<EditOutcome> {
        let (old, make): (&LabelData, fn(LabelData) -> BlockKind) = match &block.kind {
            BlockKind::InputLabel(data) => (data, BlockKind::InputLabel),
            BlockKind::OutputLabel(data) => (data, BlockKind::OutputLabel),
            _ => return Err(wrong_kind("label", block)),
        };
        let name = parse_param_label(name, Grammar::Global)?.name;
        if name == old.name && old.color == color {
            return Ok(EditOutcome::Unchanged);
        }
        let kind = make(LabelData {
            name,
            color: color.to_string(),
            ..old.clone()
        });
        Ok(EditOutcome::Patch(self.rebuild(block, kind)))
    }

    /// Renames a constant and sets whether it is local.
    pub fn edit_constant(
        &self,
        block: &BlockDescriptor,
        label: &str,
        local: bool,
    ) -> BlockResult<EditOutcome> {
        let BlockKind::Constant(old) = &block.kind else {
            return Err(wrong_kind("constant", block));
        };
        let name = parse_param_label(label, Grammar::Global)?.name;
        if name == old.name && old.local == local {
            return Ok(EditOutcome::Unchanged);
        }
        let mut data = old.clone();
        data.name = name;
        data.local = local;
        Ok(EditOutcome::Patch(self.rebuild(block, BlockKind::Constant(data))))
    }

    /// Renames a memory and sets its address format and locality.
    pub fn edit_memory(
        &self,
        block: &BlockDescriptor,
        label: &str,
        format: AddressFormat,
        local: bool,
    ) -> BlockResult<EditOutcome> {
        let BlockKind::Memory(old) = &block.kind else {
            return Err(wrong_kind("memory", block));
        };
        let name = parse_param_label(label, Grammar::Global)?.name;
        if name == old.name && old.local == local && old.format == format {
            return Ok(EditOutcome::Unchanged);
        }
        let mut data = old.clone();
        data.name = name;
        data.local = local;
        data.format = format;
        Ok(EditOutcome::Patch(self.rebuild(block, BlockKind::Memory(data))))
    }

    /// Re-declares a code block's ports and parameters. The code body, id,
    /// position and size are kept; the block is always replaced.
    pub fn edit_code(
        &self,
        block: &BlockDescriptor,
        inputs: &str,
        outputs: &str,
        params: &str,
        wires: Vec<Wire>,
    ) -> BlockResult<EditOutcome> {
        let BlockKind::Code(old) = &block.kind else {
            return Err(wrong_kind("code", block));
        };
        let data = self.code_data(old.code.clone(), inputs, outputs, params)?;
        Ok(self.replace(block, BlockKind::Code(data), wires))
    }

    /// Flips an info block between editable and read-only.
    pub fn toggle_info(&self, block: &BlockDescriptor) -> BlockResult<EditOutcome> {
        let BlockKind::Info(old) = &block.kind else {
            return Err(wrong_kind("info", block));
        };
        let mut data = old.clone();
        data.readonly = !data.readonly;
        Ok(EditOutcome::Patch(self.rebuild(block, BlockKind::Info(data))))
    }
}
