//! Expansion of a label's range into individual pins.

use crate::label::PortLabel;
use serde::{Deserialize, Serialize};
use tessel_common::Bit;

/// One bit lane of a port.
///
/// `name` is the board pin assigned to the lane (empty when unassigned) and
/// `value` is only ever set on constant-style blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// The bus index this pin stands for.
    pub index: u32,
    /// The assigned board pin name.
    #[serde(default)]
    pub name: String,
    /// The stored bit value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Bit>,
}

impl Pin {
    /// An unassigned pin for bus index `index`.
    pub fn empty(index: u32) -> Self {
        Self {
            index,
            name: String::new(),
            value: None,
        }
    }
}

/// Derives one empty pin per bit, ordered as the range was written.
///
/// A scalar label yields a single pin with index 0.
pub fn derive_pins(label: &PortLabel) -> Vec<Pin> {
    match label.range {
        Some(range) => range.indices().map(Pin::empty).collect(),
        None => vec![Pin::empty(0)],
    }
}

/// Overlays names and values from `old` onto `new`, position by position.
///
/// Extra pins on either side are left alone, so widening a bus keeps the
/// leading assignments and leaves the new lanes empty.
pub fn copy_pins(old: &[Pin], new: &mut [Pin]) {
    for (dst, src) in new.iter_mut().zip(old) {
        dst.name.clone_from(&src.name);
        dst.value = src.value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{parse_port_label, BitRange, Grammar};

    #[test]
    fn length_matches_label_size() {
        for text in ["a", "a[0]", "a[7:0]", "a[0:15]", "a[12:9]"] {
            let label = parse_port_label(text, Grammar::Local).unwrap();
            assert_eq!(derive_pins(&label).len() as u32, label.size(), "{text}");
        }
    }

    #[test]
    fn deterministic() {
        let label = PortLabel::bus("d", BitRange::new(3, 0));
        assert_eq!(derive_pins(&label), derive_pins(&label));
    }

    #[test]
    fn pins_are_empty_and_ordered() {
        let pins = derive_pins(&PortLabel::bus("d", BitRange::new(2, 0)));
        let indices: Vec<u32> = pins.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![2, 1, 0]);
        assert!(pins.iter().all(|p| p.name.is_empty() && p.value.is_none()));
    }

    #[test]
    fn copy_truncates_when_narrowing() {
        let mut old = derive_pins(&PortLabel::bus("d", BitRange::new(3, 0)));
        for (i, pin) in old.iter_mut().enumerate() {
            pin.name = format!("P{i}");
            pin.value = Some(Bit::One);
        }
        let mut new = derive_pins(&PortLabel::bus("d", BitRange::new(1, 0)));
        copy_pins(&old, &mut new);
        assert_eq!(new[0].name, "P0");
        assert_eq!(new[1].name, "P1");
        assert_eq!(new[1].index, 0);
    }

    #[test]
    fn copy_leaves_extra_pins_empty_when_widening() {
        let mut old = vec![Pin::empty(0)];
        old[0].value = Some(Bit::One);
        let mut new = derive_pins(&PortLabel::bus("d", BitRange::new(2, 0)));
        copy_pins(&old, &mut new);
        assert_eq!(new[0].value, Some(Bit::One));
        assert!(new[1].value.is_none());
        assert!(new[2].value.is_none());
    }

    #[test]
    fn copy_is_idempotent_on_equal_pins() {
        let mut pins = derive_pins(&PortLabel::bus("d", BitRange::new(1, 0)));
        pins[0].value = Some(Bit::Zero);
        let snapshot = pins.clone();
        let mut target = pins.clone();
        copy_pins(&snapshot, &mut target);
        assert_eq!(target, snapshot);
    }
}
