use std::sync::{Arc, Mutex};

use sypmix::native::{Status, Subsystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCall {
    Init,
    Finalize,
}

/// A fake native subsystem that:
/// - records every init/finalize call in order
/// - returns a configurable status from `init`.
#[derive(Debug, Clone)]
pub struct RecordingSubsystem {
    calls: Arc<Mutex<Vec<NativeCall>>>,
    init_status: Status,
}

impl RecordingSubsystem {
    pub fn new() -> Self {
        Self::with_init_status(Status::SUCCESS)
    }

    /// `init` reports `status` (still recorded as a call).
    pub fn with_init_status(status: Status) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            init_status: status,
        }
    }

    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn init_count(&self) -> usize {
        self.count(NativeCall::Init)
    }

    pub fn finalize_count(&self) -> usize {
        self.count(NativeCall::Finalize)
    }

    fn count(&self, kind: NativeCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == kind).count()
    }
}

impl Default for RecordingSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Subsystem for RecordingSubsystem {
    fn name(&self) -> &str {
        "recording"
    }

    fn init(&self) -> Result<(), Status> {
        self.calls.lock().unwrap().push(NativeCall::Init);
        if self.init_status.is_success() {
            Ok(())
        } else {
            Err(self.init_status)
        }
    }

    fn finalize(&self) {
        self.calls.lock().unwrap().push(NativeCall::Finalize);
    }
}
