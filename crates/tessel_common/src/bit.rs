//! Two-state bit values stored on individual pins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The value held by one pin of a constant or memory block.
///
/// Wiring ports never carry a value; their pins hold `None` instead of a `Bit`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Bit {
    /// Logic low.
    #[serde(rename = "0")]
    Zero,
    /// Logic high.
    #[serde(rename = "1")]
    One,
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bit::Zero => write!(f, "0"),
            Bit::One => write!(f, "1"),
        }
    }
}
