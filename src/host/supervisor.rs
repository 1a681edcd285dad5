// src/host/supervisor.rs

//! Workload supervisor.
//!
//! Spawns the workload, notifies post-start callbacks once it is running,
//! then waits for it. Callback failures are logged and never affect the
//! workload.

use std::fmt;
use std::process::{Command, ExitStatus};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::errors::SypmixError;
use crate::host::engine::Common;
use crate::types::RunId;

pub type PostStartFn =
    Arc<dyn Fn(&Common, RunId) -> std::result::Result<(), SypmixError> + Send + Sync>;

#[derive(Default)]
pub struct Supervisor {
    post_start: Vec<PostStartFn>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_post_start(&mut self, callback: PostStartFn) {
        self.post_start.push(callback);
    }

    pub fn post_start_count(&self) -> usize {
        self.post_start.len()
    }

    /// Run every post-start callback and return the errors they reported.
    pub fn notify_started(&self, common: &Common, run_id: RunId) -> Vec<SypmixError> {
        let mut errors = Vec::new();
        for callback in self.post_start.iter() {
            if let Err(err) = callback(common, run_id) {
                warn!(
                    run_id = %run_id,
                    container = %common.container_id,
                    error = %err,
                    "post-start callback failed"
                );
                errors.push(err);
            }
        }
        errors
    }

    /// Spawn `workload`, fire post-start callbacks, wait, and return the
    /// workload's exit code.
    pub fn launch(&self, common: &Common, workload: &[String], run_id: RunId) -> Result<i32> {
        let (program, args) = workload
            .split_first()
            .context("no workload program given")?;

        info!(
            run_id = %run_id,
            container = %common.container_id,
            program = %program,
            "starting workload"
        );

        let mut child = Command::new(program)
            .args(args)
            .spawn()
            .with_context(|| format!("spawning workload '{program}'"))?;

        debug!(run_id = %run_id, child_pid = child.id(), "workload started");
        self.notify_started(common, run_id);

        let status = child
            .wait()
            .with_context(|| format!("waiting for workload '{program}'"))?;
        let code = exit_code(status);
        info!(run_id = %run_id, code, "workload exited");
        Ok(code)
    }
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("post_start", &self.post_start.len())
            .finish()
    }
}

/// Shell-style exit code: the process code, or 128 + signal number.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
