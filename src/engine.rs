//! Repair engine contract
//!
//! The erasure-coding engine is an external collaborator with a fixed
//! contract: one synchronous call in, one native status code out. This module
//! defines that contract as the [`RepairEngine`] trait plus the full
//! parameter set ([`EngineParams`]) and status value ([`EngineStatus`]) that
//! cross the boundary. The production implementation, [`LibPar2Engine`],
//! binds to the libpar2 C shim and is gated behind the `libpar2` cargo
//! feature because it requires linking that shim.

use crate::resources::ResourceBudget;
use std::path::PathBuf;

/// Engine output verbosity, mirroring the shim's noise-level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum Verbosity {
    /// No engine output at all (the orchestrator's fixed choice)
    #[default]
    Silent = 1,
    /// Errors only
    Quiet = 2,
    /// Standard interactive progress output
    Normal = 3,
}

/// Native status value returned by the repair engine
///
/// The named constants mirror the engine's own result enumeration. Values
/// outside the known set are carried verbatim and resolved by the outcome
/// mapper, never rejected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineStatus(
    /// Raw status code as returned by the engine
    pub i32,
);

impl EngineStatus {
    /// All files verified intact, or repair completed
    pub const SUCCESS: Self = Self(0);
    /// Damage found; enough recovery data exists to repair
    pub const REPAIR_POSSIBLE: Self = Self(1);
    /// Damage found; recovery data is insufficient
    pub const REPAIR_NOT_POSSIBLE: Self = Self(2);
    /// The parameter set was rejected
    pub const INVALID_ARGUMENTS: Self = Self(3);
    /// Not enough critical packet data in the parity set
    pub const INSUFFICIENT_DATA: Self = Self(4);
    /// A repair attempt ran and did not restore the files
    pub const REPAIR_FAILED: Self = Self(5);
    /// The engine hit a file I/O error
    pub const FILE_IO_ERROR: Self = Self(6);
    /// Internal engine inconsistency
    pub const LOGIC_ERROR: Self = Self(7);
    /// The engine exhausted its memory budget
    pub const MEMORY_ERROR: Self = Self(8);
}

/// Full parameter set for one engine invocation
///
/// The fixed sub-parameters carry the defaults the engine's own command-line
/// front end would use: silent verbosity, two file threads, purge and
/// skip-data disabled, zero skip leeway. [`EngineParams::new`] applies them;
/// they are named fields rather than positional constants so the call
/// contract stays legible and independently testable.
#[derive(Debug, Clone)]
pub struct EngineParams {
    /// Path to the parity descriptor (.par2) file
    pub parity_file: PathBuf,
    /// Directory containing the data set
    pub base_dir: PathBuf,
    /// Memory limit and primary worker thread count
    pub budget: ResourceBudget,
    /// Non-parity files offered for content-hash matching of misnamed files
    pub candidates: Vec<PathBuf>,
    /// true = attempt repair, false = verify only
    pub do_repair: bool,
    /// Engine output verbosity
    pub verbosity: Verbosity,
    /// Secondary file-hashing thread count, distinct from the primary count
    pub file_threads: u32,
    /// Delete backup and parity files after a successful repair
    pub purge: bool,
    /// Skip data verification inside target files
    pub skip_data: bool,
    /// Tolerated byte offset when skipping data
    pub skip_leeway: u64,
}

impl EngineParams {
    /// Fixed secondary file-thread count (the engine's own default)
    pub const DEFAULT_FILE_THREADS: u32 = 2;

    /// Build the parameter set for one invocation, applying the fixed
    /// sub-parameter defaults
    #[must_use]
    pub fn new(
        parity_file: PathBuf,
        base_dir: PathBuf,
        budget: ResourceBudget,
        candidates: Vec<PathBuf>,
        do_repair: bool,
    ) -> Self {
        Self {
            parity_file,
            base_dir,
            budget,
            candidates,
            do_repair,
            verbosity: Verbosity::Silent,
            file_threads: Self::DEFAULT_FILE_THREADS,
            purge: false,
            skip_data: false,
            skip_leeway: 0,
        }
    }
}

/// Fixed-contract interface to the external repair engine
///
/// Implementations perform exactly one synchronous, blocking verify/repair
/// pass per call and return the engine's native status value unmodified. The
/// orchestrator never retries and adds no concurrency of its own; any
/// parallelism happens inside the engine using the supplied thread counts.
pub trait RepairEngine {
    /// Run one verify/repair pass with the supplied parameters
    fn run(&self, params: &EngineParams) -> EngineStatus;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

#[cfg(feature = "libpar2")]
pub use libpar2::LibPar2Engine;

#[cfg(feature = "libpar2")]
mod libpar2 {
    use super::{EngineParams, EngineStatus, RepairEngine};
    use crate::error::{Error, Result};
    use std::ffi::CString;
    use std::os::raw::{c_char, c_int, c_uint};
    use std::path::Path;
    use tracing::warn;

    unsafe extern "C" {
        /// Provided by the libpar2 C shim; wraps the library's `par2repair`
        /// entry point with a C-compatible signature.
        fn par2_engine_repair(
            noise_level: c_int,
            memory_limit: usize,
            base_dir: *const c_char,
            threads: c_uint,
            file_threads: c_uint,
            parity_file: *const c_char,
            candidate_files: *const *const c_char,
            candidate_count: usize,
            do_repair: bool,
            purge: bool,
            skip_data: bool,
            skip_leeway: u64,
        ) -> c_int;
    }

    /// Engine backed by the libpar2 C shim
    ///
    /// Marshals [`EngineParams`] to C types and performs the one blocking
    /// call. A parity or base path that cannot be represented as a C string
    /// yields [`EngineStatus::INVALID_ARGUMENTS`] without entering the shim.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LibPar2Engine;

    #[cfg(unix)]
    fn path_to_cstring(path: &Path) -> Result<CString> {
        use std::os::unix::ffi::OsStrExt;
        CString::new(path.as_os_str().as_bytes()).map_err(|_| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "interior NUL byte".to_string(),
        })
    }

    #[cfg(not(unix))]
    fn path_to_cstring(path: &Path) -> Result<CString> {
        CString::new(path.to_string_lossy().into_owned()).map_err(|_| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "interior NUL byte".to_string(),
        })
    }

    impl RepairEngine for LibPar2Engine {
        fn run(&self, params: &EngineParams) -> EngineStatus {
            let Ok(parity_file) = path_to_cstring(&params.parity_file) else {
                return EngineStatus::INVALID_ARGUMENTS;
            };
            let Ok(base_dir) = path_to_cstring(&params.base_dir) else {
                return EngineStatus::INVALID_ARGUMENTS;
            };

            let mut candidates = Vec::with_capacity(params.candidates.len());
            for path in &params.candidates {
                match path_to_cstring(path) {
                    Ok(cstr) => candidates.push(cstr),
                    Err(e) => {
                        // A single unencodable candidate should not void the
                        // run; the engine just never sees that file
                        warn!(error = %e, "skipping unencodable candidate file");
                    }
                }
            }
            let candidate_ptrs: Vec<*const c_char> =
                candidates.iter().map(|c| c.as_ptr()).collect();

            // SAFETY: every pointer passed references a CString or Vec that
            // outlives the call; counts match the pointer array length; the
            // shim treats all inputs as read-only.
            let status = unsafe {
                par2_engine_repair(
                    params.verbosity as c_int,
                    params.budget.memory_limit as usize,
                    base_dir.as_ptr(),
                    params.budget.threads as c_uint,
                    params.file_threads as c_uint,
                    parity_file.as_ptr(),
                    candidate_ptrs.as_ptr(),
                    candidate_ptrs.len(),
                    params.do_repair,
                    params.purge,
                    params.skip_data,
                    params.skip_leeway,
                )
            };

            EngineStatus(status)
        }

        fn name(&self) -> &'static str {
            "libpar2"
        }
    }
}
