// src/config/loader.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::model::{RawConfigFile, SypmixConfig};
use crate::errors::{Result, SypmixError};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SYPMIX_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "/etc/sypmix/sypmix.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for the
/// semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SypmixConfig> {
    let raw_config = load_from_path(&path)?;
    let config = SypmixConfig::try_from(raw_config)?;
    Ok(config)
}

/// Like [`load_and_validate`], but a missing file yields the defaults.
///
/// Any other failure (unreadable file, bad TOML, invalid values) is returned
/// so the caller can decide whether to fall back.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<SypmixConfig> {
    match load_and_validate(&path) {
        Err(SypmixError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
            Ok(SypmixConfig::default())
        }
        other => other,
    }
}

/// `$SYPMIX_CONFIG` if set and non-empty, otherwise [`DEFAULT_CONFIG_PATH`].
pub fn default_config_path() -> PathBuf {
    config_path_from(std::env::var_os(CONFIG_ENV))
}

pub fn config_path_from(value: Option<std::ffi::OsString>) -> PathBuf {
    value
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
