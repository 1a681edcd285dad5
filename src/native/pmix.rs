// src/native/pmix.rs

//! Bindings to the two `libpmix` entry points we need.

use std::ffi::{c_char, c_int, c_void};

use tracing::{error, info};

use super::{Status, Subsystem};

const PMIX_MAX_NSLEN: usize = 255;
const PMIX_SUCCESS: c_int = 0;

/// `pmix_proc_t`.
#[repr(C)]
struct PmixProc {
    nspace: [c_char; PMIX_MAX_NSLEN + 1],
    rank: u32,
}

#[link(name = "pmix")]
unsafe extern "C" {
    fn PMIx_Init(proc_: *mut PmixProc, info: *mut c_void, ninfo: usize) -> c_int;
    fn PMIx_Finalize(info: *const c_void, ninfo: usize) -> c_int;
}

#[derive(Debug, Default)]
pub struct PmixSubsystem;

impl PmixSubsystem {
    pub fn new() -> Self {
        PmixSubsystem
    }
}

impl Subsystem for PmixSubsystem {
    fn name(&self) -> &str {
        "pmix"
    }

    fn init(&self) -> Result<(), Status> {
        info!("initializing PMIx");
        let mut myproc = PmixProc {
            nspace: [0; PMIX_MAX_NSLEN + 1],
            rank: 0,
        };
        // SAFETY: `myproc` is a valid, writable pmix_proc_t and no info array
        // is passed.
        let rc = unsafe { PMIx_Init(&mut myproc, std::ptr::null_mut(), 0) };
        if rc != PMIX_SUCCESS {
            error!(rc, "failed to initialize PMIx");
            return Err(Status(rc));
        }
        info!(rank = myproc.rank, "PMIx initialized");
        Ok(())
    }

    fn finalize(&self) {
        info!("finalizing PMIx");
        // SAFETY: no info array is passed.
        let rc = unsafe { PMIx_Finalize(std::ptr::null(), 0) };
        if rc != PMIX_SUCCESS {
            error!(rc, "PMIx_Finalize reported an error");
        }
    }
}
