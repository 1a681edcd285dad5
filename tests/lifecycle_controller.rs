// tests/lifecycle_controller.rs

mod common;
use crate::common::{init_tracing, TestResult};

use std::io::ErrorKind;
use std::sync::Arc;

use tempfile::TempDir;

use sypmix::fs::mock::MockFileSystem;
use sypmix::lifecycle::LifecycleController;
use sypmix::marker::MarkerStore;
use sypmix::native::Status;
use sypmix::types::{LifecycleState, RunId};
use sypmix_test_utils::{NativeCall, RecordingSubsystem};

fn controller_in(dir: &TempDir, subsystem: &RecordingSubsystem) -> LifecycleController {
    let store = MarkerStore::new(dir.path().join("sypmix"));
    LifecycleController::new(store, Arc::new(subsystem.clone()))
}

#[test]
fn disabled_pre_run_touches_nothing() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let subsystem = RecordingSubsystem::new();
    let controller = controller_in(&dir, &subsystem);

    let state = controller.pre_run(false, RunId::new(42));
    assert_eq!(state, LifecycleState::Disabled);
    assert!(subsystem.calls().is_empty());
    assert!(!controller.store().base_dir().exists());
    Ok(())
}

#[test]
fn enable_then_finalize_full_cycle() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let subsystem = RecordingSubsystem::new();
    let controller = controller_in(&dir, &subsystem);
    let id = RunId::new(42);

    assert_eq!(controller.pre_run(true, id), LifecycleState::Enabled);
    assert!(controller.store().exists(id));
    assert_eq!(subsystem.calls(), vec![NativeCall::Init]);

    assert_eq!(controller.finalize(id), LifecycleState::Finalized);
    assert!(!controller.store().exists(id));
    assert_eq!(subsystem.calls(), vec![NativeCall::Init, NativeCall::Finalize]);

    // Finalized is terminal; a second notification is a no-op.
    assert_eq!(controller.finalize(id), LifecycleState::Disabled);
    assert_eq!(subsystem.finalize_count(), 1);
    Ok(())
}

#[test]
fn finalize_without_marker_makes_no_native_call() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let subsystem = RecordingSubsystem::new();
    let controller = controller_in(&dir, &subsystem);

    assert_eq!(controller.finalize(RunId::new(42)), LifecycleState::Disabled);
    assert!(subsystem.calls().is_empty());
    Ok(())
}

#[test]
fn init_failure_keeps_marker_so_finalize_still_runs() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let subsystem = RecordingSubsystem::with_init_status(Status(-31));
    let controller = controller_in(&dir, &subsystem);
    let id = RunId::new(42);

    assert_eq!(controller.enable(id), LifecycleState::Enabled);
    assert!(controller.store().exists(id));
    assert_eq!(subsystem.init_count(), 1);

    assert_eq!(controller.finalize(id), LifecycleState::Finalized);
    assert_eq!(subsystem.finalize_count(), 1);
    assert!(!controller.store().exists(id));
    Ok(())
}

#[test]
fn identifier_collision_does_not_reinitialize_or_clobber() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let subsystem = RecordingSubsystem::new();
    let controller = controller_in(&dir, &subsystem);
    let id = RunId::new(42);

    // A marker leaked by an earlier run that had the same pid.
    let leaked = controller.store().put(id)?;
    std::fs::write(&leaked, b"earlier run")?;

    assert_eq!(controller.enable(id), LifecycleState::Enabled);
    assert_eq!(subsystem.init_count(), 0);
    assert_eq!(std::fs::read(&leaked)?, b"earlier run");
    Ok(())
}

#[test]
fn marker_failure_fails_open_without_init() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.fail_at("/tmp/sypmix", ErrorKind::PermissionDenied);
    let store = MarkerStore::new("/tmp/sypmix").with_fs(Arc::new(fs));
    let subsystem = RecordingSubsystem::new();
    let controller = LifecycleController::new(store, Arc::new(subsystem.clone()));

    assert_eq!(controller.enable(RunId::new(42)), LifecycleState::Disabled);
    assert!(subsystem.calls().is_empty());
    assert_eq!(controller.finalize(RunId::new(42)), LifecycleState::Disabled);
    assert!(subsystem.calls().is_empty());
    Ok(())
}

#[test]
fn marker_removal_failure_still_reports_finalized() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let store = MarkerStore::new("/tmp/sypmix").with_fs(Arc::new(fs.clone()));
    let subsystem = RecordingSubsystem::new();
    let controller = LifecycleController::new(store, Arc::new(subsystem.clone()));
    let id = RunId::new(42);

    controller.enable(id);
    fs.fail_at(controller.store().marker_path(id), ErrorKind::PermissionDenied);

    assert_eq!(controller.finalize(id), LifecycleState::Finalized);
    assert_eq!(subsystem.finalize_count(), 1);
    // The marker leaked; it is tolerated, not fatal.
    assert!(controller.store().exists(id));
    Ok(())
}
