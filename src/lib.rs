// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod hooks;
pub mod host;
pub mod lifecycle;
pub mod logging;
pub mod marker;
pub mod native;
pub mod plugin;
pub mod types;

use std::ffi::OsString;
use std::io::Write;

use anyhow::{Context, Result};
use clap::{ArgMatches, FromArgMatches};
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, MARKERS_COMMAND, MarkerAction, WORKLOAD_ARG};
use crate::config::SypmixConfig;
use crate::host::{Common, ContainerEngineConfig, EngineConfig, Supervisor};
use crate::marker::MarkerStore;
use crate::plugin::Plugin;
use crate::types::RunId;

/// High-level entry point used by `main.rs`. Returns the process exit code.
///
/// This wires together:
/// - config loading (falls back to defaults if the file is bad)
/// - the host command registry and supervisor
/// - the plugin's pre-run and post-start callbacks
/// - the workload launch
pub fn run<I, T>(argv: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    // The flag definition comes from the config, so it is read before the
    // command line can be parsed.
    let config_path = config::default_config_path();
    let loaded = config::load_or_default(&config_path);
    let config = loaded.as_ref().cloned().unwrap_or_else(|_| SypmixConfig::default());

    let plugin = Plugin::new(&config, native::default_subsystem());
    let mut manager = cli::command_manager();
    let mut supervisor = Supervisor::new();
    host::load_plugin(&plugin, &mut manager, &mut supervisor);

    let matches = manager.build().get_matches_from(argv);
    let args = CliArgs::from_arg_matches(&matches)?;
    logging::init_logging(args.log_level)?;

    if let Err(err) = loaded {
        warn!(path = ?config_path, error = %err, "ignoring invalid config, using defaults");
    }
    debug!(
        plugin = plugin.manifest.name,
        version = plugin.manifest.version,
        "plugin loaded"
    );

    let Some((name, sub)) = matches.subcommand() else {
        return Ok(0);
    };

    if name == MARKERS_COMMAND {
        let action = MarkerAction::from_arg_matches(sub)?;
        run_markers(&plugin, action, &mut std::io::stdout())?;
        return Ok(0);
    }

    let run_id = RunId::current();
    manager.pre_run(name, sub, run_id);
    let workload = workload_of(sub);
    let common = Common::new(
        format!("{name}-{run_id}"),
        EngineConfig::Container(ContainerEngineConfig {
            command: name.to_string(),
            workload: workload.clone(),
        }),
    );
    launch_workload(&plugin, &supervisor, &common, &workload, run_id)
}

/// Hand the workload to the supervisor. If it never starts, the post-start
/// hook never fires either, so finalize here instead of leaking the marker
/// left by the pre-run phase.
pub fn launch_workload(
    plugin: &Plugin,
    supervisor: &Supervisor,
    common: &Common,
    workload: &[String],
    run_id: RunId,
) -> Result<i32> {
    supervisor.launch(common, workload, run_id).inspect_err(|err| {
        warn!(run_id = %run_id, error = %err, "workload did not start, cleaning up");
        plugin.adapter().controller().finalize(run_id);
    })
}

fn workload_of(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>(WORKLOAD_ARG)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Execute a `markers` subcommand, writing results to `out`.
pub fn run_markers(plugin: &Plugin, action: MarkerAction, out: &mut impl Write) -> Result<()> {
    let store: &MarkerStore = plugin.adapter().controller().store();
    match action {
        MarkerAction::Setup => {
            let dir = plugin.install().context("preparing marker directory")?;
            info!(path = ?dir, "marker directory ready");
            writeln!(out, "{}", dir.display())?;
        }
        MarkerAction::List => {
            for id in store.list().context("listing markers")? {
                writeln!(out, "{id}")?;
            }
        }
        MarkerAction::Prune => {
            let removed = store.prune_stale().context("pruning markers")?;
            for id in removed.iter() {
                writeln!(out, "removed {id}")?;
            }
            info!(count = removed.len(), "stale markers pruned");
        }
        MarkerAction::Remove { id } => {
            store
                .remove(id)
                .with_context(|| format!("removing marker for run {id}"))?;
        }
    }
    Ok(())
}
