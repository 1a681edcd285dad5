// src/native/dry_run.rs

use tracing::info;

use super::{Status, Subsystem};

/// Stand-in used when `libpmix` is not linked into the build.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSubsystem;

impl Subsystem for DryRunSubsystem {
    fn name(&self) -> &str {
        "pmix (dry-run)"
    }

    fn init(&self) -> Result<(), Status> {
        info!("dry-run: would call PMIx_Init");
        Ok(())
    }

    fn finalize(&self) {
        info!("dry-run: would call PMIx_Finalize");
    }
}
