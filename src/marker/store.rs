// src/marker/store.rs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::MarkerSection;
use crate::errors::{Result, SypmixError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::marker::MARKER_CONTENTS;
use crate::marker::liveness::pid_is_alive;
use crate::types::RunId;

/// Existence store keyed by run identifier.
///
/// There is no in-process state beyond the configuration: two stores built
/// from the same section in different processes see the same markers.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    base_dir: PathBuf,
    dir_mode: u32,
    file_mode: u32,
    fs: Arc<dyn FileSystem>,
}

impl MarkerStore {
    /// Store rooted at `base_dir` on the real filesystem, default modes.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let defaults = MarkerSection::default();
        Self {
            base_dir: base_dir.into(),
            dir_mode: defaults.dir_mode,
            file_mode: defaults.file_mode,
            fs: Arc::new(RealFileSystem),
        }
    }

    pub fn from_config(section: &MarkerSection) -> Self {
        Self {
            base_dir: section.base_dir.clone(),
            dir_mode: section.dir_mode,
            file_mode: section.file_mode,
            fs: Arc::new(RealFileSystem),
        }
    }

    /// Swap the filesystem backend (tests use `MockFileSystem`).
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn marker_path(&self, id: RunId) -> PathBuf {
        self.base_dir.join(id.to_string())
    }

    /// Return the base directory, creating it (and missing parents) if absent.
    pub fn ensure_base_directory(&self) -> Result<PathBuf> {
        if !self.fs.is_dir(&self.base_dir) {
            debug!(path = ?self.base_dir, "creating marker base directory");
            self.fs
                .create_dir_all(&self.base_dir, self.dir_mode)
                .map_err(|e| SypmixError::marker_io(&self.base_dir, e))?;
        }
        Ok(self.base_dir.clone())
    }

    /// Create the marker for `id`.
    ///
    /// Creation is exclusive: if a marker is already there (a live run, or a
    /// leaked one whose identifier got reused) it is left untouched and
    /// `MarkerAlreadyExists` is returned.
    pub fn put(&self, id: RunId) -> Result<PathBuf> {
        self.ensure_base_directory()?;
        let path = self.marker_path(id);
        match self.fs.create_new(&path, MARKER_CONTENTS, self.file_mode) {
            Ok(()) => {
                debug!(run_id = %id, path = ?path, "marker created");
                Ok(path)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(SypmixError::MarkerAlreadyExists { id, path })
            }
            Err(e) => Err(SypmixError::marker_io(path, e)),
        }
    }

    /// Whether a marker exists for `id`. Never fails; anything that prevents
    /// resolving the marker counts as "not enabled".
    pub fn exists(&self, id: RunId) -> bool {
        self.fs.is_file(&self.marker_path(id))
    }

    /// Delete the marker for `id`. Missing markers are not an error.
    pub fn remove(&self, id: RunId) -> Result<()> {
        let path = self.marker_path(id);
        if !self.fs.is_file(&path) {
            return Ok(());
        }
        match self.fs.remove_file(&path) {
            Ok(()) => {
                debug!(run_id = %id, path = ?path, "marker removed");
                Ok(())
            }
            // Someone else cleaned it up between the check and the delete.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SypmixError::marker_io(path, e)),
        }
    }

    /// All run identifiers that currently have a marker, sorted.
    ///
    /// Entries that are not decimal identifiers are ignored. A missing base
    /// directory yields an empty list.
    pub fn list(&self) -> Result<Vec<RunId>> {
        if !self.fs.is_dir(&self.base_dir) {
            return Ok(Vec::new());
        }
        let entries = self
            .fs
            .read_dir(&self.base_dir)
            .map_err(|e| SypmixError::marker_io(&self.base_dir, e))?;

        let mut ids: Vec<RunId> = entries
            .iter()
            .filter(|p| self.fs.is_file(p.as_path()))
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .filter_map(|name| name.parse::<RunId>().ok())
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Remove markers whose owning process no longer exists.
    pub fn prune_stale(&self) -> Result<Vec<RunId>> {
        self.prune_where(|id| !pid_is_alive(id.as_u32()))
    }

    /// Remove every marker for which `is_stale` returns true and report which
    /// ones were removed. Individual removal failures are logged and skipped.
    pub fn prune_where(&self, is_stale: impl Fn(RunId) -> bool) -> Result<Vec<RunId>> {
        let mut removed = Vec::new();
        for id in self.list()? {
            if !is_stale(id) {
                continue;
            }
            match self.remove(id) {
                Ok(()) => removed.push(id),
                Err(err) => warn!(run_id = %id, error = %err, "failed to prune marker"),
            }
        }
        Ok(removed)
    }
}
