// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

use crate::native::Status;
use crate::types::RunId;

#[derive(Error, Debug)]
pub enum SypmixError {
    #[error("Unexpected engine config: expected {expected}, got {found}")]
    ConfigurationMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("Marker IO error at {path:?}: {source}")]
    MarkerIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Marker for run {id} already exists at {path:?}")]
    MarkerAlreadyExists { id: RunId, path: PathBuf },

    #[error("Native subsystem returned {0}")]
    NativeSubsystem(Status),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SypmixError {
    pub(crate) fn marker_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SypmixError::MarkerIo {
            path: path.into(),
            source,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SypmixError>;
