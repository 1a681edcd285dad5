// src/host/mod.rs

//! Minimal host process model.
//!
//! The core only ever touches the host through two extension points:
//! - [`command`]: launch commands with chainable pre-run callbacks.
//! - [`supervisor`]: post-start callbacks fired once the workload runs.
//!
//! [`engine`] holds the configuration handle passed to post-start callbacks.

pub mod command;
pub mod engine;
pub mod supervisor;

pub use command::{CommandManager, LaunchCommand, PreRunContext, PreRunFn};
pub use engine::{Common, ContainerEngineConfig, EngineConfig, OciEngineConfig};
pub use supervisor::{PostStartFn, Supervisor};

use tracing::debug;

use crate::plugin::{Callback, Plugin};

/// Dispatch each plugin callback to its extension point.
pub fn load_plugin(plugin: &Plugin, manager: &mut CommandManager, supervisor: &mut Supervisor) {
    debug!(
        plugin = plugin.manifest.name,
        version = plugin.manifest.version,
        "loading plugin"
    );
    for callback in plugin.callbacks() {
        match callback {
            Callback::Command(register) => register(&mut *manager),
            Callback::PostStartProcess(post_start) => {
                supervisor.register_post_start(post_start.clone())
            }
        }
    }
}
