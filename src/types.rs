// src/types.rs

use std::fmt;
use std::str::FromStr;

/// Identifier correlating the launching CLI process with the supervisor
/// that continues its workload.
///
/// It is the numeric process identifier of the CLI invocation; markers are
/// keyed by its decimal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u32);

impl RunId {
    pub const fn new(pid: u32) -> Self {
        RunId(pid)
    }

    /// Identifier of the calling process.
    pub fn current() -> Self {
        RunId(std::process::id())
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for RunId {
    fn from(pid: u32) -> Self {
        RunId(pid)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RunId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Only plain decimal digits; "+42" or "042"-style aliases would let two
        // file names map to the same run.
        if trimmed.is_empty()
            || !trimmed.bytes().all(|b| b.is_ascii_digit())
            || (trimmed.len() > 1 && trimmed.starts_with('0'))
        {
            return Err(format!("invalid run identifier: {s:?}"));
        }
        trimmed
            .parse::<u32>()
            .map(RunId)
            .map_err(|e| format!("invalid run identifier {s:?}: {e}"))
    }
}

/// Lifecycle state of the native subsystem for one run identifier, as seen
/// from the hook that just ran.
///
/// `Enabling` and `Finalizing` are transient and only exist while a hook is
/// executing, so hooks report one of the settled states below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Feature not requested, marker could not be written, or no marker was
    /// found at post-start time.
    Disabled,
    /// Marker present; waiting for the post-start notification.
    Enabled,
    /// Finalize ran and the marker was cleared.
    Finalized,
}
