// src/marker/mod.rs

//! Filesystem-backed marker store.
//!
//! A marker is an empty-ish file named after a run identifier inside a fixed
//! base directory. Its presence is the only thing the launching CLI and the
//! supervisor share: the CLI writes it when the feature is requested, the
//! supervisor reads it to decide whether to finalize, and removes it after.
//!
//! - [`store`] implements `put` / `exists` / `remove` and directory setup.
//! - [`liveness`] backs pruning of markers left behind by dead processes.

pub mod liveness;
pub mod store;

pub use store::MarkerStore;

/// Content written into every marker file.
pub const MARKER_CONTENTS: &[u8] = b"1";
