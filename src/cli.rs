// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The top-level options are derived; the launch commands are built with the
//! builder API because plugins add options to them at runtime.

use clap::{Arg, Command, CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::host::{CommandManager, LaunchCommand, PreRunContext};
use crate::types::RunId;

/// Top-level command-line arguments for `sypmix`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sypmix",
    version,
    about = "Launch workloads with optional PMIx support.",
    long_about = None,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SYPMIX_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// `sypmix markers ...`
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum MarkerAction {
    /// Create the marker base directory.
    Setup,
    /// Print the run identifiers that have a marker.
    List,
    /// Remove markers whose process is gone.
    Prune,
    /// Remove the marker for one run identifier.
    Remove {
        #[arg(value_name = "RUN_ID")]
        id: RunId,
    },
}

pub const MARKERS_COMMAND: &str = "markers";

/// Name of the positional holding the workload command line.
pub const WORKLOAD_ARG: &str = "workload";

/// A launch command taking a workload command line.
pub fn launch_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(
        Arg::new(WORKLOAD_ARG)
            .value_name("PROGRAM")
            .help("Program to run, followed by its arguments")
            .required(true)
            .num_args(1..)
            .trailing_var_arg(true)
            .allow_hyphen_values(true),
    )
}

pub fn markers_command() -> Command {
    MarkerAction::augment_subcommands(
        Command::new(MARKERS_COMMAND)
            .about("Inspect or clean up enable markers")
            .subcommand_required(true),
    )
}

/// The host's command registry before any plugin is loaded.
pub fn command_manager() -> CommandManager {
    let mut manager = CommandManager::new(CliArgs::command());
    manager.add_launch_command(
        LaunchCommand::new(launch_command("exec", "Run a command as the workload"))
            .with_pre_run(host_pre_run),
    );
    manager.add_launch_command(
        LaunchCommand::new(launch_command("run", "Run the default workload entry point"))
            .with_pre_run(host_pre_run),
    );
    manager.add_command(markers_command());
    manager
}

fn host_pre_run(ctx: &PreRunContext<'_>) {
    let program = ctx
        .matches
        .get_many::<String>(WORKLOAD_ARG)
        .and_then(|mut values| values.next().cloned())
        .unwrap_or_default();
    debug!(command = ctx.command, run_id = %ctx.run_id, %program, "preparing workload");
}
