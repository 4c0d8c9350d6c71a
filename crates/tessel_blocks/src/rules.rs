//! Board rules that suggest a default connection for well-known inputs.
//!
//! Whether a port "is a clock" is a naming convention owned by the board
//! definition, not by the parser, so the lookup sits behind [`InputRules`]
//! and can be swapped per board or disabled entirely.

use serde::{Deserialize, Serialize};
use tessel_config::{InputRuleDef, RulesConfig};

/// Port name looked up for inputs flagged as clocks.
pub const CLOCK_PORT: &str = "clk";

/// A suggested default connection attached to an unranged input port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultHint {
    /// The port name the rule matched.
    pub port: String,
    /// The board pin it suggests.
    pub pin: String,
    /// Whether the suggestion should be applied.
    pub apply: bool,
}

/// Decides whether an input port name has a board default.
pub trait InputRules {
    /// Returns the hint for `port`, if any rule matches.
    fn default_for(&self, port: &str) -> Option<DefaultHint>;

    /// Looks up the clock rule for clock inputs and the port's own name otherwise.
    fn default_for_input(&self, name: &str, clock: bool) -> Option<DefaultHint> {
        self.default_for(if clock { CLOCK_PORT } else { name })
    }
}

/// Rules read from the `[rules]` section of `tessel.toml`.
#[derive(Clone, Debug, Default)]
pub struct BoardRules {
    enabled: bool,
    input: Vec<InputRuleDef>,
}

impl BoardRules {
    /// Creates an enabled rule set.
    pub fn new(input: Vec<InputRuleDef>) -> Self {
        Self {
            enabled: true,
            input,
        }
    }

    /// Builds the rule set from configuration.
    pub fn from_config(config: &RulesConfig) -> Self {
        Self {
            enabled: config.enabled,
            input: config.input.clone(),
        }
    }

    /// Returns `true` if lookups can match anything.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.input.is_empty()
    }
}

impl InputRules for BoardRules {
    fn default_for(&self, port: &str) -> Option<DefaultHint> {
        if !self.enabled {
            return None;
        }
        self.input
            .iter()
            .find(|rule| rule.port == port)
            .map(|rule| DefaultHint {
                port: rule.port.clone(),
                pin: rule.pin.clone(),
                apply: true,
            })
    }
}

/// A rule set that never matches.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRules;

impl InputRules for NoRules {
    fn default_for(&self, _port: &str) -> Option<DefaultHint> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clk_rule() -> BoardRules {
        BoardRules::new(vec![InputRuleDef {
            port: "clk".into(),
            pin: "21".into(),
        }])
    }

    #[test]
    fn matching_port_yields_hint() {
        let hint = clk_rule().default_for("clk").unwrap();
        assert_eq!(hint.pin, "21");
        assert!(hint.apply);
        assert!(clk_rule().default_for("data").is_none());
    }

    #[test]
    fn clock_flag_looks_up_clock_port() {
        let rules = clk_rule();
        assert!(rules.default_for_input("sys_clock", true).is_some());
        assert!(rules.default_for_input("sys_clock", false).is_none());
    }

    #[test]
    fn disabled_rules_never_match() {
        let config = RulesConfig {
            enabled: false,
            input: vec![InputRuleDef {
                port: "clk".into(),
                pin: "21".into(),
            }],
        };
        let rules = BoardRules::from_config(&config);
        assert!(!rules.is_active());
        assert!(rules.default_for("clk").is_none());
    }

    #[test]
    fn no_rules() {
        assert!(NoRules.default_for("clk").is_none());
    }
}
