// src/hooks/post_start.rs

use tracing::warn;

use super::HookAdapter;
use crate::errors::{Result, SypmixError};
use crate::host::Common;
use crate::host::engine::CONTAINER_ENGINE;
use crate::types::{LifecycleState, RunId};

impl HookAdapter {
    /// Supervisor notification that the workload for `run_id` is running.
    ///
    /// Only the container engine configuration is accepted; anything else is
    /// a `ConfigurationMismatch` and no native call is made, whatever the
    /// marker says.
    pub fn post_start_process(&self, common: &Common, run_id: RunId) -> Result<LifecycleState> {
        if common.engine_config.as_container().is_none() {
            let err = SypmixError::ConfigurationMismatch {
                expected: CONTAINER_ENGINE,
                found: common.engine_name.clone(),
            };
            warn!(
                run_id = %run_id,
                container = %common.container_id,
                error = %err,
                "unexpected engine config, skipping finalize"
            );
            return Err(err);
        }

        Ok(self.controller.finalize(run_id))
    }
}
