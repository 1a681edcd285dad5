// src/config/validate.rs

use std::collections::HashSet;

use crate::cli::WORKLOAD_ARG;
use crate::config::model::{FeatureFlag, MarkerSection, RawConfigFile, SypmixConfig};
use crate::errors::{Result, SypmixError};

impl TryFrom<RawConfigFile> for SypmixConfig {
    type Error = SypmixError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(SypmixConfig::new_unchecked(raw.marker, raw.flag))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_marker_section(&cfg.marker)?;
    validate_flag(&cfg.flag)?;
    Ok(())
}

fn validate_marker_section(marker: &MarkerSection) -> Result<()> {
    if !marker.base_dir.is_absolute() {
        return Err(SypmixError::ConfigError(format!(
            "[marker].base_dir must be an absolute path (got {:?})",
            marker.base_dir
        )));
    }

    // The owner has to be able to list, create and delete markers.
    check_mode("dir_mode", marker.dir_mode, 0o700)?;
    // Both the CLI and the supervisor must be able to stat the file.
    check_mode("file_mode", marker.file_mode, 0o400)?;
    Ok(())
}

fn check_mode(field: &str, mode: u32, required: u32) -> Result<()> {
    if mode > 0o777 {
        return Err(SypmixError::ConfigError(format!(
            "[marker].{field} must be a permission mode <= 0o777 (got {mode:#o})"
        )));
    }
    if mode & required != required {
        return Err(SypmixError::ConfigError(format!(
            "[marker].{field} {mode:#o} is missing required owner bits {required:#o}"
        )));
    }
    Ok(())
}

fn validate_flag(flag: &FeatureFlag) -> Result<()> {
    let name = flag.name.as_str();
    if name.is_empty() {
        return Err(SypmixError::ConfigError(
            "[flag].name must not be empty".to_string(),
        ));
    }
    if name.starts_with('-') {
        return Err(SypmixError::ConfigError(format!(
            "[flag].name '{name}' must not start with '-'"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SypmixError::ConfigError(format!(
            "[flag].name '{name}' may only contain lowercase letters, digits and '-'"
        )));
    }

    // Launch commands already own these argument ids.
    if [WORKLOAD_ARG, "help"].contains(&name) {
        return Err(SypmixError::ConfigError(format!(
            "[flag].name '{name}' clashes with an argument of the launch commands"
        )));
    }

    if flag.commands.is_empty() {
        return Err(SypmixError::ConfigError(
            "[flag].commands must list at least one launch command".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for cmd in flag.commands.iter() {
        if cmd.trim().is_empty() {
            return Err(SypmixError::ConfigError(
                "[flag].commands contains an empty command name".to_string(),
            ));
        }
        if !seen.insert(cmd.as_str()) {
            return Err(SypmixError::ConfigError(format!(
                "[flag].commands lists '{cmd}' more than once"
            )));
        }
    }
    Ok(())
}
