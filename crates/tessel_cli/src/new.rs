//! `tessel new`: block creation from label lists.

use tessel_blocks::{AddressFormat, PortOptions};

use crate::report::{finish, status};
use crate::settings::builder;
use crate::{GlobalArgs, NewArgs, NewKind};

/// Runs the `tessel new` command.
///
/// Prints the created descriptors as a JSON array. Returns exit code 1 if
/// any label in the list is invalid, in which case nothing is printed to stdout.
pub fn run(args: &NewArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let builder = builder(global)?;

    let result = match &args.kind {
        NewKind::Input {
            names,
            is_virtual,
            clock,
        } => {
            status(global, "Creating", "input blocks");
            let options = PortOptions {
                is_virtual: *is_virtual,
                clock: *clock,
            };
            builder.new_inputs(names, options)
        }
        NewKind::Output { names, is_virtual } => {
            status(global, "Creating", "output blocks");
            builder.new_outputs(names, *is_virtual)
        }
        NewKind::InputLabel(label) => {
            status(global, "Creating", "input labels");
            builder.new_input_labels(&label.names, &label.block_color)
        }
        NewKind::OutputLabel(label) => {
            status(global, "Creating", "output labels");
            builder.new_output_labels(&label.names, &label.block_color)
        }
        NewKind::PairedLabels(label) => {
            status(global, "Creating", "label pairs");
            builder.new_paired_labels(&label.names, &label.block_color)
        }
        NewKind::Constant { names, local } => {
            status(global, "Creating", "constant blocks");
            builder.new_constants(names, *local)
        }
        NewKind::Memory {
            names,
            radix,
            local,
        } => {
            let format = AddressFormat::try_from(*radix)?;
            status(global, "Creating", "memory blocks");
            builder.new_memories(names, format, *local)
        }
        NewKind::Code(code) => {
            status(global, "Creating", "code block");
            builder
                .new_code(&code.inputs, &code.outputs, &code.params)
                .map(|block| vec![block])
        }
        NewKind::Info => {
            status(global, "Creating", "info block");
            Ok(vec![builder.new_info()])
        }
    };

    if let Ok(blocks) = &result {
        log::info!("created {} block(s)", blocks.len());
    }
    finish(result, global)
}
