//! Anchor reconciliation for width-changing edits.
//!
//! Blocks grow downwards from their top-left corner while the layout centers
//! ports vertically, so a block whose pin count changes must be moved by the
//! difference to keep its connector where the existing wires expect it.

use crate::descriptor::{BlockDescriptor, BlockKind};

/// Layout grid steps per pin of vertical spacing.
const STEPS_PER_PIN: i64 = 2;

/// The width-relevant shape of a block before or after an edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footprint {
    /// Pin count.
    pub pins: u32,
    /// Label-only blocks always count as one pin.
    pub is_virtual: bool,
}

impl Footprint {
    /// A physical footprint.
    pub fn physical(pins: u32) -> Self {
        Self {
            pins,
            is_virtual: false,
        }
    }

    /// A label-only footprint.
    pub fn virtual_pins(pins: u32) -> Self {
        Self {
            pins,
            is_virtual: true,
        }
    }

    /// The pin count used for layout.
    pub fn effective_pins(self) -> u32 {
        if self.is_virtual {
            1
        } else {
            self.pins.max(1)
        }
    }
}

impl BlockKind {
    /// The footprint of port and label blocks. Other kinds have a fixed layout
    /// and report a single physical pin.
    pub fn footprint(&self) -> Footprint {
        match self {
            BlockKind::Input(data) | BlockKind::Output(data) => Footprint {
                pins: data.size(),
                is_virtual: data.is_virtual,
            },
            BlockKind::InputLabel(data) | BlockKind::OutputLabel(data) => {
                Footprint::virtual_pins(data.size())
            }
            _ => Footprint::physical(1),
        }
    }
}

/// Vertical offset that keeps the anchor edge of a block in place.
///
/// Zero when both footprints are virtual. Otherwise
/// `unit * 2 * (old - new)` over the effective pin counts, saturated to the
/// `i32` range.
pub fn anchor_offset(old: Footprint, new: Footprint, unit: i32) -> i32 {
    if old.is_virtual && new.is_virtual {
        return 0;
    }
    let delta = i64::from(old.effective_pins()) - i64::from(new.effective_pins());
    let offset = i64::from(unit).saturating_mul(STEPS_PER_PIN).saturating_mul(delta);
    i32::try_from(offset).unwrap_or(if offset < 0 { i32::MIN } else { i32::MAX })
}

/// Moves `new` so that its anchor lines up with `old`'s, returning the offset applied.
pub fn reconcile(old: &BlockDescriptor, new: &mut BlockDescriptor, unit: i32) -> i32 {
    let offset = anchor_offset(old.kind.footprint(), new.kind.footprint(), unit);
    if offset != 0 {
        log::debug!(
            "shifting block {} by {offset} to keep its anchor",
            new.id.as_deref().unwrap_or("<new>")
        );
    }
    new.position = old.position.shifted_y(offset);
    offset
}
