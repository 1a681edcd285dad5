// tests/hook_scenarios.rs

//! End-to-end runs through the host's two extension points: the pre-run
//! phase of a launch command, then the supervisor's post-start callbacks.

mod common;
use crate::common::{init_tracing, TestResult};

use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use sypmix::cli::launch_command;
use sypmix::errors::SypmixError;
use sypmix::hooks::HookAdapter;
use sypmix::host::{CommandManager, Common, LaunchCommand};
use sypmix::types::{LifecycleState, RunId};
use sypmix_test_utils::builders::{base_dir_in, ConfigBuilder};
use sypmix_test_utils::harness::{container_common, oci_common};
use sypmix_test_utils::{Harness, NativeCall, RecordingSubsystem};

#[test]
fn flag_unset_runs_only_original_pre_run() -> TestResult {
    init_tracing();
    let h = Harness::new()?;
    let id = RunId::new(42);

    h.launch(&["exec", "true"], id)?;
    assert_eq!(h.original_pre_runs(), vec!["exec".to_string()]);
    assert!(!h.store().exists(id));
    assert!(h.subsystem.calls().is_empty());

    let errors = h.post_start(id);
    assert!(errors.is_empty());
    assert!(h.subsystem.calls().is_empty());
    Ok(())
}

#[test]
fn flag_set_initializes_then_supervisor_finalizes() -> TestResult {
    init_tracing();
    let h = Harness::new()?;
    let id = RunId::new(42);

    h.launch(&["exec", "--pmix", "true"], id)?;
    assert!(h.store().exists(id));
    assert_eq!(h.subsystem.calls(), vec![NativeCall::Init]);
    assert_eq!(h.original_pre_runs(), vec!["exec".to_string()]);

    let errors = h.post_start(id);
    assert!(errors.is_empty());
    assert_eq!(h.subsystem.calls(), vec![NativeCall::Init, NativeCall::Finalize]);
    assert!(!h.store().exists(id));
    Ok(())
}

#[test]
fn both_launch_commands_carry_the_hook() -> TestResult {
    init_tracing();
    let h = Harness::new()?;

    h.launch(&["run", "--pmix=true", "/bin/app", "--verbose"], RunId::new(7))?;
    h.launch(&["exec", "--pmix", "env"], RunId::new(8))?;
    assert!(h.store().exists(RunId::new(7)));
    assert!(h.store().exists(RunId::new(8)));
    assert_eq!(h.subsystem.init_count(), 2);
    assert_eq!(h.original_pre_runs(), vec!["run".to_string(), "exec".to_string()]);
    Ok(())
}

#[test]
fn explicit_false_keeps_feature_disabled() -> TestResult {
    init_tracing();
    let h = Harness::new()?;

    h.launch(&["exec", "--pmix=false", "true"], RunId::new(42))?;
    assert!(!h.store().exists(RunId::new(42)));
    assert!(h.subsystem.calls().is_empty());
    Ok(())
}

#[test]
fn flag_after_workload_belongs_to_the_workload() -> TestResult {
    init_tracing();
    let h = Harness::new()?;

    h.launch(&["exec", "echo", "--pmix"], RunId::new(42))?;
    assert!(!h.store().exists(RunId::new(42)));
    assert!(h.subsystem.calls().is_empty());
    Ok(())
}

#[test]
fn unwritable_marker_directory_fails_open() -> TestResult {
    init_tracing();
    let h = Harness::with_blocked_base_dir()?;
    let id = RunId::new(42);

    h.launch(&["exec", "--pmix", "true"], id)?;
    assert!(!h.store().exists(id));
    assert!(h.subsystem.calls().is_empty());
    // The host's own pre-run still ran; the launch goes ahead.
    assert_eq!(h.original_pre_runs(), vec!["exec".to_string()]);

    let errors = h.post_start(id);
    assert!(errors.is_empty());
    assert!(h.subsystem.calls().is_empty());
    Ok(())
}

#[test]
fn mismatched_engine_config_skips_finalize_even_with_marker() -> TestResult {
    init_tracing();
    let h = Harness::new()?;
    let id = RunId::new(42);
    h.launch(&["exec", "--pmix", "true"], id)?;

    let errors = h.supervisor.notify_started(&oci_common(id), id);
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        SypmixError::ConfigurationMismatch { expected, found } => {
            assert_eq!(*expected, "container");
            assert_eq!(found, "oci");
        }
        other => panic!("Expected ConfigurationMismatch, got: {:?}", other),
    }
    assert_eq!(h.subsystem.finalize_count(), 0);
    assert!(h.store().exists(id));

    // The right config later still finalizes.
    assert!(h.post_start(id).is_empty());
    assert_eq!(h.subsystem.finalize_count(), 1);
    Ok(())
}

#[test]
fn mismatched_engine_config_without_marker_is_still_an_error() -> TestResult {
    init_tracing();
    let h = Harness::new()?;
    let result = h
        .plugin
        .adapter()
        .post_start_process(&oci_common(RunId::new(9)), RunId::new(9));
    assert!(matches!(
        result,
        Err(SypmixError::ConfigurationMismatch { .. })
    ));
    assert!(h.subsystem.calls().is_empty());
    Ok(())
}

#[test]
fn mismatch_reports_the_engine_name_it_was_given() -> TestResult {
    init_tracing();
    let h = Harness::new()?;
    let id = RunId::new(9);
    let common = Common {
        engine_name: "kata".to_string(),
        ..oci_common(id)
    };

    match h.plugin.adapter().post_start_process(&common, id) {
        Err(SypmixError::ConfigurationMismatch { found, .. }) => assert_eq!(found, "kata"),
        other => panic!("Expected ConfigurationMismatch, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn post_start_for_other_identifier_leaves_marker_alone() -> TestResult {
    init_tracing();
    let h = Harness::new()?;
    h.launch(&["exec", "--pmix", "true"], RunId::new(41))?;

    let state = h
        .plugin
        .adapter()
        .post_start_process(&container_common(RunId::new(42)), RunId::new(42))?;
    assert_eq!(state, LifecycleState::Disabled);
    assert!(h.store().exists(RunId::new(41)));
    assert_eq!(h.subsystem.finalize_count(), 0);
    Ok(())
}

#[test]
fn reused_identifier_does_not_reinitialize() -> TestResult {
    init_tracing();
    let h = Harness::new()?;
    let id = RunId::new(42);

    h.launch(&["exec", "--pmix", "true"], id)?;
    // Same pid again before the first run was finalized.
    h.launch(&["run", "--pmix", "true"], id)?;
    assert_eq!(h.subsystem.init_count(), 1);
    assert_eq!(h.original_pre_runs(), vec!["exec".to_string(), "run".to_string()]);

    assert!(h.post_start(id).is_empty());
    assert_eq!(h.subsystem.finalize_count(), 1);
    assert!(!h.store().exists(id));
    Ok(())
}

#[test]
fn enable_step_runs_before_original_pre_run() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let config = ConfigBuilder::new().base_dir(base_dir_in(dir.path())).build();
    let adapter = HookAdapter::from_config(&config, Arc::new(RecordingSubsystem::new()));

    let store = adapter.controller().store().clone();
    let seen_marker = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&seen_marker);
    let mut manager = CommandManager::new(clap::Command::new("host"));
    manager.add_launch_command(
        LaunchCommand::new(launch_command("exec", "test")).with_pre_run(move |ctx| {
            *seen.lock().unwrap() = Some(store.exists(ctx.run_id));
        }),
    );

    assert!(adapter.attach_launch_command(&mut manager, "exec"));
    manager.try_dispatch_from(["host", "exec", "--pmix", "true"], RunId::new(5))?;
    assert_eq!(*seen_marker.lock().unwrap(), Some(true));
    Ok(())
}

#[test]
fn missing_launch_command_is_skipped() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let config = ConfigBuilder::new()
        .base_dir(base_dir_in(dir.path()))
        .commands(&["exec", "shell"])
        .build();
    let adapter = HookAdapter::from_config(&config, Arc::new(RecordingSubsystem::new()));

    let mut manager = CommandManager::new(clap::Command::new("host"));
    manager.add_launch_command(LaunchCommand::new(launch_command("exec", "test")));

    assert_eq!(adapter.attach_all(&mut manager), 1);
    assert!(!adapter.attach_launch_command(&mut manager, "shell"));
    assert!(manager.get_cmd("exec").is_some_and(|c| c.has_pre_run()));
    Ok(())
}

#[test]
fn flag_shows_up_in_launch_command_help() -> TestResult {
    init_tracing();
    let h = Harness::new()?;
    let mut cli = h.manager.build();

    for name in ["exec", "run"] {
        let cmd = cli
            .find_subcommand_mut(name)
            .ok_or_else(|| format!("missing subcommand {name}"))?;
        let help = cmd.render_help().to_string();
        assert!(help.contains("--pmix"), "help for {name}:\n{help}");
        assert!(help.contains("enable/disable PMIx support"));
    }
    Ok(())
}

#[test]
fn hidden_flag_is_accepted_but_not_listed() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let config = ConfigBuilder::new()
        .base_dir(base_dir_in(dir.path()))
        .flag_name("with-pmix")
        .hidden(true)
        .build();
    let h = Harness::with_config(dir, config, RecordingSubsystem::new());

    let mut cli = h.manager.build();
    let exec = cli.find_subcommand_mut("exec").ok_or("missing exec")?;
    assert!(!exec.render_help().to_string().contains("--with-pmix"));

    h.launch(&["exec", "--with-pmix", "true"], RunId::new(3))?;
    assert!(h.store().exists(RunId::new(3)));
    Ok(())
}

#[test]
fn renamed_flag_help_does_not_mention_default_name() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let config = ConfigBuilder::new()
        .base_dir(base_dir_in(dir.path()))
        .flag_name("with-pmix")
        .build();
    let h = Harness::with_config(dir, config, RecordingSubsystem::new());

    let mut cli = h.manager.build();
    let exec = cli.find_subcommand_mut("exec").ok_or("missing exec")?;
    let help = exec.render_help().to_string();
    assert!(help.contains("--with-pmix"), "help:\n{help}");
    assert!(help.contains("enable/disable PMIx support"));
    assert!(!help.contains("--pmix "), "help:\n{help}");
    Ok(())
}
