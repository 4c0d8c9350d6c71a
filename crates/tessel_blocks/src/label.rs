//! Port and parameter label grammar.
//!
//! A label is a name optionally followed by a bit range:
//!
//! ```text
//! label := name ( '[' index ( ':' index )? ']' )?
//! list  := label ( ',' label )*
//! ```
//!
//! Two grammars share the range syntax. [`Grammar::Local`] is used for names
//! declared inside a code block and only accepts identifiers. [`Grammar::Global`]
//! is used for names shown on a circuit boundary and accepts any text without
//! brackets or commas, so labels like `LED 0` are legal there.

use crate::error::{BlockError, BlockResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tessel_config::RangeOrder;

/// Widest bus a label may declare.
pub const MAX_BUS_WIDTH: u32 = 4096;

/// Which characters are legal in the name part of a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grammar {
    /// Boundary labels: anything except brackets, commas and control characters.
    Global,
    /// Block-internal labels: `[A-Za-z_][A-Za-z0-9_]*`.
    Local,
}

/// A bus range as typed, first index first.
///
/// A single index `[3]` is stored and rendered as `[3:3]`.
///
/// `msb` is the left index and `lsb` the right one. They are usually written
/// high index first (`[7:0]`), but an ascending range (`[0:7]`) keeps its order
/// unless the [`RangeOrder`] policy says otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitRange {
    /// The left index.
    pub msb: u32,
    /// The right index.
    pub lsb: u32,
}

impl BitRange {
    /// Creates a range from its left and right indices.
    pub fn new(msb: u32, lsb: u32) -> Self {
        Self { msb, lsb }
    }

    /// A one-bit range, as written `[idx]`.
    pub fn single(index: u32) -> Self {
        Self::new(index, index)
    }

    /// Number of bits covered.
    pub fn width(self) -> u32 {
        self.msb.abs_diff(self.lsb).saturating_add(1)
    }

    /// Returns `true` when the left index is smaller than the right one.
    pub fn is_ascending(self) -> bool {
        self.msb < self.lsb
    }

    /// The same bits with the high index first.
    pub fn normalized(self) -> Self {
        Self::new(self.msb.max(self.lsb), self.msb.min(self.lsb))
    }

    /// Bit indices from the left index to the right one.
    pub fn indices(self) -> impl Iterator<Item = u32> {
        let Self { msb, lsb } = self;
        (0..self.width()).map(move |i| if msb >= lsb { msb - i } else { msb + i })
    }
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.msb, self.lsb)
    }
}

impl FromStr for BitRange {
    type Err = BlockError;

    /// Parses a bracketed range such as `[7:0]` or `[3]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BlockError::InvalidRange {
            text: s.to_string(),
        };
        let inner = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(invalid)?;
        parse_range_body(inner, s)
    }
}

impl Serialize for BitRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BitRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A parsed port label: a name and an optional bus range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortLabel {
    /// The port name.
    pub name: String,
    /// The bus range, absent for a scalar port.
    pub range: Option<BitRange>,
}

impl PortLabel {
    /// A scalar label.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: None,
        }
    }

    /// A bus label.
    pub fn bus(name: impl Into<String>, range: BitRange) -> Self {
        Self {
            name: name.into(),
            range: Some(range),
        }
    }

    /// Number of pins: the range width, or 1 for a scalar.
    pub fn size(&self) -> u32 {
        self.range.map_or(1, BitRange::width)
    }

    /// Returns `true` when the label spans more than one bit.
    pub fn is_bus(&self) -> bool {
        self.size() > 1
    }

    /// The range text (`"[7:0]"`), empty for a scalar.
    pub fn range_str(&self) -> String {
        self.range.map(|r| r.to_string()).unwrap_or_default()
    }
}

impl fmt::Display for PortLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(range) = self.range {
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

/// A parsed parameter label. Parameters never carry a range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamLabel {
    /// The parameter name.
    pub name: String,
}

/// Parses a port label, keeping ascending ranges as typed.
pub fn parse_port_label(text: &str, grammar: Grammar) -> BlockResult<PortLabel> {
    parse_port_label_with(text, grammar, RangeOrder::Preserve)
}

/// Parses a port label under an explicit [`RangeOrder`] policy.
pub fn parse_port_label_with(
    text: &str,
    grammar: Grammar,
    order: RangeOrder,
) -> BlockResult<PortLabel> {
    let trimmed = text.trim();
    let (name, body) = split_range(trimmed, text)?;
    let name = validate_name(name, grammar, text)?;

    let range = match body {
        None => None,
        Some(body) => {
            let range = parse_range_body(body, text)?;
            Some(match order {
                RangeOrder::Preserve => range,
                RangeOrder::Normalize => range.normalized(),
                RangeOrder::Reject if range.is_ascending() => {
                    return Err(BlockError::InvalidRange {
                        text: text.to_string(),
                    })
                }
                RangeOrder::Reject => range,
            })
        }
    };

    log::trace!("parsed port label '{text}' as {name} ({range:?})");
    Ok(PortLabel { name, range })
}

/// Parses a parameter label. Brackets are illegal name characters here.
pub fn parse_param_label(text: &str, grammar: Grammar) -> BlockResult<ParamLabel> {
    let name = validate_name(text.trim(), grammar, text)?;
    if name.contains(&['[', ']'][..]) {
        return Err(BlockError::InvalidIdentifier {
            text: text.to_string(),
        });
    }
    Ok(ParamLabel { name })
}

/// Splits a comma-separated list into trimmed entries.
///
/// Whitespace around commas is insignificant. Empty entries are kept so that
/// strict callers can reject them.
pub fn split_names(text: &str) -> Vec<&str> {
    text.split(',').map(str::trim).collect()
}

/// Like [`split_names`] but drops empty entries, for optional fields such as
/// a code block's port lists.
pub fn split_declared(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

/// Parses every entry of a list, stopping at the first invalid one.
pub fn parse_port_list(
    text: &str,
    grammar: Grammar,
    order: RangeOrder,
) -> BlockResult<Vec<PortLabel>> {
    split_names(text)
        .into_iter()
        .map(|entry| parse_port_label_with(entry, grammar, order))
        .collect()
}

/// Parses every parameter of a list, stopping at the first invalid one.
pub fn parse_param_list(text: &str, grammar: Grammar) -> BlockResult<Vec<ParamLabel>> {
    split_names(text)
        .into_iter()
        .map(|entry| parse_param_label(entry, grammar))
        .collect()
}

/// Returns `true` for `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits `name[body]` into its name and the text between the brackets.
fn split_range<'a>(label: &'a str, raw: &str) -> BlockResult<(&'a str, Option<&'a str>)> {
    let unbalanced = || BlockError::InvalidRange {
        text: raw.to_string(),
    };
    match label.find('[') {
        None if label.contains(']') => Err(unbalanced()),
        None => Ok((label, None)),
        Some(open) => {
            let name = &label[..open];
            let body = label[open + 1..].strip_suffix(']').ok_or_else(unbalanced)?;
            if name.contains(']') || body.contains(&['[', ']'][..]) {
                return Err(unbalanced());
            }
            Ok((name, Some(body)))
        }
    }
}

/// Parses `hi:lo` or `idx`, ignoring whitespace around each index.
fn parse_range_body(body: &str, raw: &str) -> BlockResult<BitRange> {
    let mut parts = body.split(':');
    let first = parse_index(parts.next().unwrap_or_default(), raw)?;
    let range = match parts.next() {
        None => BitRange::single(first),
        Some(second) => BitRange::new(first, parse_index(second, raw)?),
    };
    if parts.next().is_some() || range.width() > MAX_BUS_WIDTH {
        return Err(BlockError::InvalidRange {
            text: raw.to_string(),
        });
    }
    Ok(range)
}

fn parse_index(part: &str, raw: &str) -> BlockResult<u32> {
    let digits = part.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BlockError::InvalidRange {
            text: raw.to_string(),
        });
    }
    digits.parse().map_err(|_| BlockError::InvalidRange {
        text: raw.to_string(),
    })
}

fn validate_name(name: &str, grammar: Grammar, raw: &str) -> BlockResult<String> {
    let invalid = || BlockError::InvalidIdentifier {
        text: raw.to_string(),
    };
    let name = name.trim();
    let legal = match grammar {
        Grammar::Local => is_identifier(name),
        Grammar::Global => {
            !name.is_empty() && !name.chars().any(|c| c == ',' || c.is_control())
        }
    };
    if legal {
        Ok(name.to_string())
    } else {
        Err(invalid())
    }
}
