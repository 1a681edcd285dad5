// src/host/engine.rs

use std::path::PathBuf;

/// Name of the engine whose configuration the post-start hook understands.
pub const CONTAINER_ENGINE: &str = "container";

/// Settings handed to post-start callbacks for one workload.
#[derive(Debug, Clone)]
pub struct Common {
    pub container_id: String,
    pub engine_name: String,
    pub engine_config: EngineConfig,
}

impl Common {
    pub fn new(container_id: impl Into<String>, engine_config: EngineConfig) -> Self {
        Self {
            container_id: container_id.into(),
            engine_name: engine_config.kind().to_string(),
            engine_config,
        }
    }
}

/// Engine-specific configuration.
#[derive(Debug, Clone)]
pub enum EngineConfig {
    Container(ContainerEngineConfig),
    Oci(OciEngineConfig),
}

impl EngineConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineConfig::Container(_) => CONTAINER_ENGINE,
            EngineConfig::Oci(_) => "oci",
        }
    }

    pub fn as_container(&self) -> Option<&ContainerEngineConfig> {
        match self {
            EngineConfig::Container(cfg) => Some(cfg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContainerEngineConfig {
    /// Launch command that produced this workload (`exec`, `run`).
    pub command: String,
    pub workload: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OciEngineConfig {
    pub bundle: PathBuf,
}
