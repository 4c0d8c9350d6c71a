//! `tessel offset`: the anchor calculator.

use tessel_blocks::{anchor_offset, Footprint};

use crate::settings::builder;
use crate::{GlobalArgs, OffsetArgs};

/// Runs the `tessel offset` command, printing the vertical offset for the
/// given width change under the configured grid unit.
pub fn run(args: &OffsetArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let unit = builder(global)?.unit();
    let old = Footprint {
        pins: args.old,
        is_virtual: args.old_virtual,
    };
    let new = Footprint {
        pins: args.new,
        is_virtual: args.new_virtual,
    };
    let offset = anchor_offset(old, new, unit);
    log::debug!("{old:?} -> {new:?} at unit {unit}");
    println!("{offset}");
    Ok(0)
}
