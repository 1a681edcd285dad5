// src/lifecycle/mod.rs

//! Gatekeeper for native subsystem initialize/finalize calls.
//!
//! Per run identifier the subsystem moves through:
//!
//! ```text
//! Disabled --flag set--> Enabling --marker + init--> Enabled
//! Enabled --post-start, marker found--> Finalizing --finalize + remove--> Finalized
//! ```
//!
//! The controller never lets the optional feature break the workload: every
//! failure is logged and the run continues, either without the feature
//! (marker could not be written) or without cleanup (marker could not be
//! removed).

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::errors::SypmixError;
use crate::marker::MarkerStore;
use crate::native::Subsystem;
use crate::types::{LifecycleState, RunId};

#[derive(Debug, Clone)]
pub struct LifecycleController {
    store: MarkerStore,
    subsystem: Arc<dyn Subsystem>,
}

impl LifecycleController {
    pub fn new(store: MarkerStore, subsystem: Arc<dyn Subsystem>) -> Self {
        Self { store, subsystem }
    }

    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    /// Pre-execution step for one launch command invocation.
    pub fn pre_run(&self, enabled: bool, run_id: RunId) -> LifecycleState {
        if !enabled {
            debug!(run_id = %run_id, "feature not requested");
            return LifecycleState::Disabled;
        }
        self.enable(run_id)
    }

    /// Record the enable decision for `run_id` and initialize the subsystem.
    pub fn enable(&self, run_id: RunId) -> LifecycleState {
        match self.store.put(run_id) {
            Ok(path) => {
                debug!(run_id = %run_id, path = ?path, "enable marker written");
            }
            Err(SypmixError::MarkerAlreadyExists { path, .. }) => {
                // Either a duplicate invocation or a leaked marker from an
                // earlier run with the same pid. Leave it as is.
                warn!(
                    run_id = %run_id,
                    path = ?path,
                    "marker already present, not initializing {} again",
                    self.subsystem.name()
                );
                return LifecycleState::Enabled;
            }
            Err(err) => {
                warn!(
                    run_id = %run_id,
                    error = %err,
                    "could not record enable marker, continuing without {}",
                    self.subsystem.name()
                );
                return LifecycleState::Disabled;
            }
        }

        info!(run_id = %run_id, "initializing {}", self.subsystem.name());
        if let Err(status) = self.subsystem.init() {
            // The marker stays: the supervisor still finalizes.
            let err = SypmixError::NativeSubsystem(status);
            error!(
                run_id = %run_id,
                error = %err,
                "{} initialization failed",
                self.subsystem.name()
            );
        }
        LifecycleState::Enabled
    }

    /// Post-start step: finalize if the CLI side left a marker for `run_id`.
    pub fn finalize(&self, run_id: RunId) -> LifecycleState {
        if !self.store.exists(run_id) {
            debug!(run_id = %run_id, "no marker, nothing to finalize");
            return LifecycleState::Disabled;
        }

        info!(run_id = %run_id, "finalizing {}", self.subsystem.name());
        self.subsystem.finalize();

        if let Err(err) = self.store.remove(run_id) {
            warn!(run_id = %run_id, error = %err, "failed to remove marker after finalize");
        }
        LifecycleState::Finalized
    }
}
