use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tempfile::TempDir;

use sypmix::cli::launch_command;
use sypmix::config::SypmixConfig;
use sypmix::errors::SypmixError;
use sypmix::host::{
    self, CommandManager, Common, ContainerEngineConfig, EngineConfig, LaunchCommand,
    OciEngineConfig, Supervisor,
};
use sypmix::marker::MarkerStore;
use sypmix::plugin::Plugin;
use sypmix::types::RunId;

use crate::builders::{base_dir_in, ConfigBuilder};
use crate::recording_subsystem::RecordingSubsystem;

/// A host with `exec` and `run` launch commands, a supervisor, and the
/// plugin loaded on top, all pointing at a temporary marker directory.
///
/// The host's own pre-run callbacks record the command name so tests can
/// check that chaining kept them.
pub struct Harness {
    pub dir: TempDir,
    pub subsystem: RecordingSubsystem,
    pub plugin: Plugin,
    pub manager: CommandManager,
    pub supervisor: Supervisor,
    original_pre_runs: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    /// Marker directory `<tmp>/sypmix`, not created yet.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("creating temp dir")?;
        let config = ConfigBuilder::new().base_dir(base_dir_in(dir.path())).build();
        Ok(Self::with_config(dir, config, RecordingSubsystem::new()))
    }

    /// Marker directory below a regular file, so it can never be created.
    pub fn with_blocked_base_dir() -> Result<Self> {
        let dir = TempDir::new().context("creating temp dir")?;
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").context("writing blocker file")?;
        let config = ConfigBuilder::new().base_dir(blocker.join("sypmix")).build();
        Ok(Self::with_config(dir, config, RecordingSubsystem::new()))
    }

    pub fn with_config(dir: TempDir, config: SypmixConfig, subsystem: RecordingSubsystem) -> Self {
        let original_pre_runs = Arc::new(Mutex::new(Vec::new()));
        let mut manager = CommandManager::new(clap::Command::new("host"));
        for name in ["exec", "run"] {
            let seen = Arc::clone(&original_pre_runs);
            manager.add_launch_command(
                LaunchCommand::new(launch_command(name, "test launch command")).with_pre_run(
                    move |ctx| seen.lock().unwrap().push(ctx.command.to_string()),
                ),
            );
        }

        let plugin = Plugin::new(&config, Arc::new(subsystem.clone()));
        let mut supervisor = Supervisor::new();
        host::load_plugin(&plugin, &mut manager, &mut supervisor);

        Self {
            dir,
            subsystem,
            plugin,
            manager,
            supervisor,
            original_pre_runs,
        }
    }

    pub fn store(&self) -> &MarkerStore {
        self.plugin.adapter().controller().store()
    }

    /// Parse `argv` (without the program name) and run the pre-run phase as
    /// process `run_id`.
    pub fn launch(&self, argv: &[&str], run_id: RunId) -> std::result::Result<(), clap::Error> {
        let full = std::iter::once("host").chain(argv.iter().copied());
        self.manager.try_dispatch_from(full, run_id).map(|_| ())
    }

    /// Fire the supervisor's post-start callbacks with a container config.
    pub fn post_start(&self, run_id: RunId) -> Vec<SypmixError> {
        self.supervisor.notify_started(&container_common(run_id), run_id)
    }

    /// Host pre-run callbacks seen so far, by command name.
    pub fn original_pre_runs(&self) -> Vec<String> {
        self.original_pre_runs.lock().unwrap().clone()
    }
}

pub fn container_common(run_id: RunId) -> Common {
    Common::new(
        format!("exec-{run_id}"),
        EngineConfig::Container(ContainerEngineConfig {
            command: "exec".to_string(),
            workload: vec!["true".to_string()],
        }),
    )
}

pub fn oci_common(run_id: RunId) -> Common {
    Common::new(
        format!("oci-{run_id}"),
        EngineConfig::Oci(OciEngineConfig {
            bundle: "/var/lib/bundle".into(),
        }),
    )
}
