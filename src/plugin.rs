// src/plugin.rs

//! Plugin manifest and the callbacks it hands to the host.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::SypmixConfig;
use crate::errors::Result;
use crate::hooks::HookAdapter;
use crate::host::{CommandManager, Common, PostStartFn};
use crate::native::Subsystem;
use crate::types::RunId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Manifest {
    pub name: &'static str,
    pub author: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

pub const MANIFEST: Manifest = Manifest {
    name: "sypmix",
    author: "sypmix developers",
    version: env!("CARGO_PKG_VERSION"),
    description: "PMIx support for container launches",
};

/// One extension the host applies when loading the plugin.
pub enum Callback {
    /// Applied to the host's command registry at CLI setup time.
    Command(Box<dyn Fn(&mut CommandManager) + Send + Sync>),
    /// Fired by the supervisor once the workload is running.
    PostStartProcess(PostStartFn),
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Command(_) => f.write_str("Callback::Command"),
            Callback::PostStartProcess(_) => f.write_str("Callback::PostStartProcess"),
        }
    }
}

#[derive(Debug)]
pub struct Plugin {
    pub manifest: Manifest,
    adapter: Arc<HookAdapter>,
    callbacks: Vec<Callback>,
}

impl Plugin {
    pub fn new(config: &SypmixConfig, subsystem: Arc<dyn Subsystem>) -> Self {
        Self::from_adapter(HookAdapter::from_config(config, subsystem))
    }

    /// One `Command` callback per configured launch command, plus the
    /// post-start callback.
    pub fn from_adapter(adapter: HookAdapter) -> Self {
        let adapter = Arc::new(adapter);
        let mut callbacks = Vec::new();

        for name in adapter.flag().commands.iter() {
            let adapter = Arc::clone(&adapter);
            let name = name.clone();
            callbacks.push(Callback::Command(Box::new(
                move |manager: &mut CommandManager| {
                    adapter.attach_launch_command(manager, &name);
                },
            )));
        }

        let post_start_adapter = Arc::clone(&adapter);
        let post_start: PostStartFn = Arc::new(move |common: &Common, run_id: RunId| {
            post_start_adapter.post_start_process(common, run_id).map(|_| ())
        });
        callbacks.push(Callback::PostStartProcess(post_start));

        Self {
            manifest: MANIFEST,
            adapter,
            callbacks,
        }
    }

    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }

    pub fn adapter(&self) -> &HookAdapter {
        &self.adapter
    }

    /// Install-time setup: create the marker base directory ahead of the
    /// first run. Unlike the hooks, failures are reported to the caller.
    pub fn install(&self) -> Result<PathBuf> {
        self.adapter.controller().store().ensure_base_directory()
    }
}
