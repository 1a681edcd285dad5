// src/hooks/pre_run.rs

use std::sync::Arc;

use tracing::{debug, warn};

use super::HookAdapter;
use crate::host::{CommandManager, PreRunContext};

impl HookAdapter {
    /// Register the flag on launch command `name` and chain the enable step
    /// onto its pre-run callback.
    ///
    /// Returns false (and logs) if the host has no such command.
    pub fn attach_launch_command(&self, manager: &mut CommandManager, name: &str) -> bool {
        let Some(cmd) = manager.get_cmd_mut(name) else {
            warn!(command = name, "could not find the '{name}' command");
            return false;
        };

        cmd.register_flag(&self.flag);

        let controller = Arc::clone(&self.controller);
        let flag_name = self.flag.name.clone();
        cmd.chain_pre_run(move |ctx: &PreRunContext<'_>| {
            let state = controller.pre_run(ctx.flag(&flag_name), ctx.run_id);
            debug!(command = ctx.command, run_id = %ctx.run_id, ?state, "pre-run hook done");
        });
        true
    }

    /// Attach to every launch command listed in the flag configuration.
    /// Returns how many were found.
    pub fn attach_all(&self, manager: &mut CommandManager) -> usize {
        self.flag
            .commands
            .iter()
            .filter(|name| self.attach_launch_command(manager, name.as_str()))
            .count()
    }
}
