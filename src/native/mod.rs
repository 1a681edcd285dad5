// src/native/mod.rs

//! Native process-management subsystem abstraction.
//!
//! The lifecycle controller talks to a `Subsystem` instead of calling into
//! the C library directly, so tests can swap in a fake that records calls.
//!
//! - [`pmix`] links the real `libpmix` (cargo feature `pmix`).
//! - [`dry_run`] logs what it would do; used when the library is not linked.

use std::fmt;
use std::sync::Arc;

pub mod dry_run;
#[cfg(feature = "pmix")]
pub mod pmix;

pub use dry_run::DryRunSubsystem;
#[cfg(feature = "pmix")]
pub use pmix::PmixSubsystem;

/// Raw status code reported by the native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub i32);

impl Status {
    pub const SUCCESS: Status = Status(0);

    pub fn is_success(self) -> bool {
        self == Status::SUCCESS
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}", self.0)
    }
}

/// Initialize/finalize entry points of the wrapped library.
///
/// Both calls block. Finalize must be tolerated even when init never ran in
/// this process, because the supervisor finalizes on behalf of the CLI.
pub trait Subsystem: Send + Sync + fmt::Debug {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    fn init(&self) -> Result<(), Status>;

    fn finalize(&self);
}

/// Backend chosen at build time.
pub fn default_subsystem() -> Arc<dyn Subsystem> {
    #[cfg(feature = "pmix")]
    {
        Arc::new(PmixSubsystem::new())
    }
    #[cfg(not(feature = "pmix"))]
    {
        Arc::new(DryRunSubsystem)
    }
}
