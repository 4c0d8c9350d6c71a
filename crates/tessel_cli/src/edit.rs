//! `tessel edit`: edit flows on stored blocks.

use serde::de::DeserializeOwned;
use std::path::Path;

use tessel_blocks::{AddressFormat, BlockDescriptor, Wire};

use crate::report::{finish, status};
use crate::settings::builder;
use crate::{EditArgs, EditKind, GlobalArgs};

/// Runs the `tessel edit` command.
///
/// Prints the edit outcome: `unchanged`, a `patch` with the new descriptor,
/// or a `replace` with the new descriptor and the wires sorted into kept and
/// dropped. Returns exit code 1 if the new text is invalid.
pub fn run(args: &EditArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let builder = builder(global)?;
    let block: BlockDescriptor = read_json(Path::new(&args.block))?;
    let wires: Vec<Wire> = match &args.wires {
        Some(path) => read_json(Path::new(path))?,
        None => Vec::new(),
    };
    status(global, "Editing", block.type_name());

    let result = match &args.change {
        EditKind::Port {
            label,
            is_virtual,
            clock,
        } => builder.edit_port(&block, label, *is_virtual, *clock, wires),
        EditKind::Label(label) => builder.edit_label(&block, &label.names, &label.block_color, wires),
        EditKind::Rename(label) => builder.rename_label(&block, &label.names, &label.block_color),
        EditKind::Constant { label, local } => builder.edit_constant(&block, label, *local),
        EditKind::Memory {
            label,
            radix,
            local,
        } => {
            let format = AddressFormat::try_from(*radix)?;
            builder.edit_memory(&block, label, format, *local)
        }
        EditKind::Code(code) => {
            builder.edit_code(&block, &code.inputs, &code.outputs, &code.params, wires)
        }
        EditKind::ToggleInfo => builder.toggle_info(&block),
    };
    finish(result, global)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_blocks::{BlockBuilder, PortOptions};

    #[test]
    fn reads_stored_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block.json");
        let block = BlockBuilder::default()
            .new_inputs("d[3:0]", PortOptions::default())
            .unwrap()
            .remove(0);
        std::fs::write(&path, serde_json::to_string(&block).unwrap()).unwrap();
        let back: BlockDescriptor = read_json(&path).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn missing_file_names_path() {
        let err = read_json::<Vec<Wire>>(Path::new("/nonexistent/wires.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/wires.json"));
    }
}
