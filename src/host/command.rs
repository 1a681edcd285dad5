// src/host/command.rs

//! Launch commands and their pre-run callbacks.
//!
//! `clap` has no notion of a pre-run step, so the host keeps one optional
//! callback next to each launch command and runs it after parsing, before
//! the workload is handed to the supervisor. Plugins extend a command by
//! registering options on it and chaining onto that callback.

use std::ffi::OsString;
use std::fmt;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;

use crate::config::FeatureFlag;
use crate::types::RunId;

/// What a pre-run callback gets to see.
#[derive(Debug, Clone, Copy)]
pub struct PreRunContext<'a> {
    pub command: &'a str,
    pub matches: &'a ArgMatches,
    pub run_id: RunId,
}

impl PreRunContext<'_> {
    /// Value of a boolean option registered with [`flag_arg`]. Unknown or
    /// unset options read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.matches
            .try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }
}

pub type PreRunFn = Box<dyn Fn(&PreRunContext<'_>) + Send + Sync>;

/// Build the `clap` argument for a feature flag.
///
/// Accepts `--name`, `--name=true` and `--name=false`; defaults to false.
pub fn flag_arg(flag: &FeatureFlag) -> Arg {
    Arg::new(flag.name.clone())
        .long(flag.name.clone())
        .value_name("true|false")
        .value_parser(clap::value_parser!(bool))
        .num_args(0..=1)
        .require_equals(true)
        .default_value("false")
        .default_missing_value("true")
        .action(ArgAction::Set)
        .help(flag.usage.clone())
        .hide(flag.hidden)
}

/// A command that launches a workload.
pub struct LaunchCommand {
    command: Command,
    pre_run: Option<PreRunFn>,
}

impl LaunchCommand {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            pre_run: None,
        }
    }

    pub fn with_pre_run(mut self, f: impl Fn(&PreRunContext<'_>) + Send + Sync + 'static) -> Self {
        self.pre_run = Some(Box::new(f));
        self
    }

    pub fn name(&self) -> &str {
        self.command.get_name()
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn has_pre_run(&self) -> bool {
        self.pre_run.is_some()
    }

    pub fn register_flag(&mut self, flag: &FeatureFlag) {
        let command = std::mem::take(&mut self.command);
        self.command = command.arg(flag_arg(flag));
    }

    /// Install `hook` in front of the existing pre-run callback.
    ///
    /// `hook` always runs first; the previous callback (if any) always runs
    /// after it.
    pub fn chain_pre_run(&mut self, hook: impl Fn(&PreRunContext<'_>) + Send + Sync + 'static) {
        let previous = self.pre_run.take();
        self.pre_run = Some(Box::new(move |ctx: &PreRunContext<'_>| {
            hook(ctx);
            if let Some(prev) = &previous {
                prev(ctx);
            }
        }));
    }

    pub fn run_pre_run(&self, ctx: &PreRunContext<'_>) {
        if let Some(pre_run) = &self.pre_run {
            pre_run(ctx);
        }
    }
}

impl fmt::Debug for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchCommand")
            .field("name", &self.name())
            .field("has_pre_run", &self.has_pre_run())
            .finish()
    }
}

/// Registry of the host's subcommands.
#[derive(Debug)]
pub struct CommandManager {
    root: Command,
    launch: Vec<LaunchCommand>,
    other: Vec<Command>,
}

impl CommandManager {
    pub fn new(root: Command) -> Self {
        Self {
            root,
            launch: Vec::new(),
            other: Vec::new(),
        }
    }

    pub fn add_launch_command(&mut self, cmd: LaunchCommand) {
        self.launch.push(cmd);
    }

    /// Add a subcommand that has no pre-run phase.
    pub fn add_command(&mut self, cmd: Command) {
        self.other.push(cmd);
    }

    pub fn get_cmd(&self, name: &str) -> Option<&LaunchCommand> {
        self.launch.iter().find(|c| c.name() == name)
    }

    pub fn get_cmd_mut(&mut self, name: &str) -> Option<&mut LaunchCommand> {
        self.launch.iter_mut().find(|c| c.name() == name)
    }

    /// Assemble the full `clap` command tree.
    pub fn build(&self) -> Command {
        let mut root = self.root.clone();
        for cmd in self.launch.iter() {
            root = root.subcommand(cmd.command().clone());
        }
        for cmd in self.other.iter() {
            root = root.subcommand(cmd.clone());
        }
        root
    }

    /// Run the pre-run callback of launch command `name`, if it is one.
    /// Returns whether `name` is a launch command.
    pub fn pre_run(&self, name: &str, matches: &ArgMatches, run_id: RunId) -> bool {
        let Some(cmd) = self.get_cmd(name) else {
            return false;
        };
        debug!(command = name, run_id = %run_id, "running pre-run callbacks");
        cmd.run_pre_run(&PreRunContext {
            command: name,
            matches,
            run_id,
        });
        true
    }

    /// Parse `argv` and run the selected launch command's pre-run callback.
    pub fn try_dispatch_from<I, T>(&self, argv: I, run_id: RunId) -> Result<ArgMatches, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.build().try_get_matches_from(argv)?;
        if let Some((name, sub)) = matches.subcommand() {
            self.pre_run(name, sub, run_id);
        }
        Ok(matches)
    }
}
