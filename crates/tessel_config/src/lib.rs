//! Parsing and validation of `tessel.toml` configuration files.
//!
//! The configuration fixes the layout grid unit, the policy for ascending bit
//! ranges, and the board input rules used to suggest default pin connections.
//! Every section is optional; an empty file yields [`TesselConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
