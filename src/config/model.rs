// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_BASE_DIR: &str = "/tmp/sypmix";
pub const DEFAULT_DIR_MODE: u32 = 0o755;
pub const DEFAULT_FILE_MODE: u32 = 0o644;
pub const DEFAULT_FLAG_NAME: &str = "pmix";
pub const DEFAULT_FLAG_USAGE: &str = "enable/disable PMIx support";
pub const DEFAULT_LAUNCH_COMMANDS: [&str; 2] = ["exec", "run"];

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [marker]
/// base_dir = "/tmp/sypmix"
/// dir_mode = 0o755
/// file_mode = 0o644
///
/// [flag]
/// name = "pmix"
/// hidden = false
/// commands = ["exec", "run"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub marker: MarkerSection,

    #[serde(default)]
    pub flag: FeatureFlag,
}

/// `[marker]` section: where markers live and how they are created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerSection {
    /// Shared by every process on the host; must be absolute.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,

    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BASE_DIR)
}

fn default_dir_mode() -> u32 {
    DEFAULT_DIR_MODE
}

fn default_file_mode() -> u32 {
    DEFAULT_FILE_MODE
}

impl Default for MarkerSection {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            dir_mode: default_dir_mode(),
            file_mode: default_file_mode(),
        }
    }
}

/// `[flag]` section: the boolean option added to each launch command.
///
/// One value is shared by every command registration; the per-invocation
/// on/off state is read from that invocation's parsed arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureFlag {
    /// Long option name, without the leading `--`.
    #[serde(default = "default_flag_name")]
    pub name: String,

    #[serde(default = "default_flag_usage")]
    pub usage: String,

    #[serde(default)]
    pub hidden: bool,

    /// Launch commands that get the option and the pre-run hook.
    #[serde(default = "default_launch_commands")]
    pub commands: Vec<String>,
}

fn default_flag_name() -> String {
    DEFAULT_FLAG_NAME.to_string()
}

fn default_flag_usage() -> String {
    DEFAULT_FLAG_USAGE.to_string()
}

fn default_launch_commands() -> Vec<String> {
    DEFAULT_LAUNCH_COMMANDS.iter().map(|s| s.to_string()).collect()
}

impl Default for FeatureFlag {
    fn default() -> Self {
        Self {
            name: default_flag_name(),
            usage: default_flag_usage(),
            hidden: false,
            commands: default_launch_commands(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// `Default`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SypmixConfig {
    marker: MarkerSection,
    flag: FeatureFlag,
}

impl SypmixConfig {
    pub(crate) fn new_unchecked(marker: MarkerSection, flag: FeatureFlag) -> Self {
        Self { marker, flag }
    }

    pub fn marker(&self) -> &MarkerSection {
        &self.marker
    }

    pub fn flag(&self) -> &FeatureFlag {
        &self.flag
    }
}
