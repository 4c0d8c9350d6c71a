//! Configuration types deserialized from `tessel.toml`.

use serde::Deserialize;

/// The layout grid constant used when no configuration overrides it.
pub const DEFAULT_UNIT: i32 = 8;

/// The top-level configuration parsed from `tessel.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct TesselConfig {
    /// Grid and spacing settings.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Label grammar settings.
    #[serde(default)]
    pub labels: LabelConfig,
    /// Board rules for default input connections.
    #[serde(default)]
    pub rules: RulesConfig,
}

/// Layout grid settings.
#[derive(Debug, Deserialize)]
pub struct LayoutConfig {
    /// The grid unit that converts pin counts into position offsets.
    #[serde(default = "default_unit")]
    pub unit: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { unit: DEFAULT_UNIT }
    }
}

fn default_unit() -> i32 {
    DEFAULT_UNIT
}

/// Label grammar settings.
#[derive(Debug, Default, Deserialize)]
pub struct LabelConfig {
    /// What to do with ranges written low index first, like `[0:7]`.
    #[serde(default)]
    pub range_order: RangeOrder,
}

/// Policy for ranges whose first index is smaller than the second.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeOrder {
    /// Keep the order as typed; `[0:7]` renders back as `[0:7]`.
    #[default]
    Preserve,
    /// Rewrite to high index first; `[0:7]` becomes `[7:0]`.
    Normalize,
    /// Refuse ascending ranges.
    Reject,
}

/// Board rules section.
#[derive(Debug, Deserialize)]
pub struct RulesConfig {
    /// Whether rules are consulted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Rules for input ports, keyed by port name.
    #[serde(default)]
    pub input: Vec<InputRuleDef>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            input: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// One board rule: an input port with this name defaults to this pin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputRuleDef {
    /// The port name the rule applies to (e.g. `"clk"`).
    pub port: String,
    /// The board pin suggested for it.
    pub pin: String,
}
