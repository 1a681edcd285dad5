// src/hooks/mod.rs

//! Wiring between the host's extension points and the lifecycle controller.
//!
//! - [`pre_run`] adds the feature flag to each launch command and chains the
//!   enable step in front of the command's own pre-run callback.
//! - [`post_start`] checks the engine configuration handed over by the
//!   supervisor and finalizes when the CLI side left a marker.

use std::sync::Arc;

use crate::config::{FeatureFlag, SypmixConfig};
use crate::lifecycle::LifecycleController;
use crate::marker::MarkerStore;
use crate::native::Subsystem;

pub mod post_start;
pub mod pre_run;

#[derive(Debug, Clone)]
pub struct HookAdapter {
    controller: Arc<LifecycleController>,
    flag: FeatureFlag,
}

impl HookAdapter {
    pub fn new(controller: LifecycleController, flag: FeatureFlag) -> Self {
        Self {
            controller: Arc::new(controller),
            flag,
        }
    }

    pub fn from_config(config: &SypmixConfig, subsystem: Arc<dyn Subsystem>) -> Self {
        let store = MarkerStore::from_config(config.marker());
        Self::new(
            LifecycleController::new(store, subsystem),
            config.flag().clone(),
        )
    }

    pub fn controller(&self) -> &LifecycleController {
        &self.controller
    }

    pub fn flag(&self) -> &FeatureFlag {
        &self.flag
    }
}
