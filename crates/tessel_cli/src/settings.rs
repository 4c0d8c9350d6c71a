//! Configuration lookup for CLI commands.
//!
//! `--config` may name a `tessel.toml` file or a directory holding one.
//! Without it the current directory and its parents are searched; when no
//! file is found the built-in defaults apply.

use std::path::{Path, PathBuf};

use tessel_blocks::{BlockBuilder, BuildSettings};
use tessel_config::{load_config, load_config_from_str, TesselConfig, CONFIG_FILE_NAME};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `tessel.toml`.
pub fn find_config_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads the configuration selected by the global flags.
pub fn resolve_config(global: &GlobalArgs) -> Result<TesselConfig, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let path = PathBuf::from(config_path);
        log::debug!("loading configuration from {}", path.display());
        return if path.is_dir() {
            Ok(load_config(&path)?)
        } else {
            Ok(load_config_from_str(&std::fs::read_to_string(&path)?)?)
        };
    }
    match find_config_dir(&std::env::current_dir()?) {
        Some(dir) => {
            log::debug!("loading configuration from {}", dir.display());
            Ok(load_config(&dir)?)
        }
        None => {
            log::debug!("no {CONFIG_FILE_NAME} found, using defaults");
            Ok(TesselConfig::default())
        }
    }
}

/// Creates a block builder from the resolved configuration.
pub fn builder(global: &GlobalArgs) -> Result<BlockBuilder, Box<dyn std::error::Error>> {
    let config = resolve_config(global)?;
    Ok(BlockBuilder::new(BuildSettings::from_config(&config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportFormat;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config,
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn finds_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_config_dir(&nested).as_deref(), Some(dir.path()));
    }

    #[test]
    fn config_flag_accepts_file_or_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&file, "[layout]\nunit = 4\n").unwrap();

        let by_file = resolve_config(&global(Some(file.display().to_string()))).unwrap();
        assert_eq!(by_file.layout.unit, 4);
        let by_dir = resolve_config(&global(Some(dir.path().display().to_string()))).unwrap();
        assert_eq!(by_dir.layout.unit, 4);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.toml");
        std::fs::write(&file, "[layout]\nunit = 0\n").unwrap();
        assert!(resolve_config(&global(Some(file.display().to_string()))).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing.toml");
        assert!(builder(&global(Some(file.display().to_string()))).is_err());
    }
}
