#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sypmix::config::{FeatureFlag, MarkerSection, RawConfigFile, SypmixConfig};

/// Builder for `SypmixConfig` to simplify test setup.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                marker: MarkerSection::default(),
                flag: FeatureFlag::default(),
            },
        }
    }

    pub fn base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.marker.base_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn dir_mode(mut self, mode: u32) -> Self {
        self.config.marker.dir_mode = mode;
        self
    }

    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.marker.file_mode = mode;
        self
    }

    pub fn flag_name(mut self, name: &str) -> Self {
        self.config.flag.name = name.to_string();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.config.flag.hidden = hidden;
        self
    }

    pub fn commands(mut self, commands: &[&str]) -> Self {
        self.config.flag.commands = commands.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> SypmixConfig {
        SypmixConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `<dir>/sypmix`, a base directory that does not exist yet.
pub fn base_dir_in(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join("sypmix")
}
