//! # par2-repair
//!
//! Synchronous orchestration layer in front of an external PAR2 repair
//! engine (the libpar2 / par2cmdline-turbo family).
//!
//! Given a parity descriptor path and a repair/verify flag, one call:
//!
//! - derives a memory and thread budget from the host (halved physical RAM
//!   clamped to 16 MiB..2 GiB, hardware concurrency with a fallback of 2)
//! - offers every non-parity sibling file to the engine, so content-hash
//!   matching recovers files whose names were obfuscated
//! - silences the engine's interactive output for the duration of the call,
//!   restoring the process streams on every exit path
//! - invokes the engine exactly once and maps its native status onto the
//!   closed [`RepairOutcome`] set
//!
//! The engine itself (parity parsing, Reed-Solomon math, repair I/O) is an
//! external collaborator behind the [`RepairEngine`] trait. Enable the
//! `libpar2` cargo feature to use the bundled FFI binding, or inject your
//! own implementation.
//!
//! ## Quick Start
//!
//! ```
//! use par2_repair::{EngineParams, EngineStatus, RepairEngine, RepairOutcome, repair_with_engine};
//!
//! struct AlwaysHealthy;
//!
//! impl RepairEngine for AlwaysHealthy {
//!     fn run(&self, _params: &EngineParams) -> EngineStatus {
//!         EngineStatus::SUCCESS
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "always-healthy"
//!     }
//! }
//!
//! let outcome = repair_with_engine(&AlwaysHealthy, "downloads/archive.par2", false);
//! assert_eq!(outcome, RepairOutcome::Success);
//! ```
//!
//! ## Serialization contract
//!
//! Each call is blocking and runs to completion; the caller always receives
//! a defined outcome kind, never an error or a panic. The output-suppression
//! stage swaps the process-wide stdout/stderr descriptors and is not
//! reentrant, so callers must serialize calls into this crate (an external
//! mutex around the entry point). No other state is shared between calls.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Repair engine contract and FFI binding
pub mod engine;
/// Error types
pub mod error;
/// Orchestration pipeline
pub mod orchestrator;
/// Outcome kinds
pub mod outcome;
/// Scoped stdout/stderr suppression
pub mod output_guard;
/// Host resource detection
pub mod resources;
/// Candidate data file discovery
pub mod scan;

// Re-export commonly used types
#[cfg(feature = "libpar2")]
pub use engine::LibPar2Engine;
pub use engine::{EngineParams, EngineStatus, RepairEngine, Verbosity};
pub use error::{Error, Result};
pub use orchestrator::{RepairRequest, repair_with_engine};
pub use outcome::RepairOutcome;
pub use output_guard::OutputGuard;
pub use resources::{ResourceBudget, ResourceProbe, SystemProbe};
pub use scan::candidate_files;

/// Verify or repair the data set described by a parity file
///
/// Entry point backed by the libpar2 FFI engine. `do_repair = false`
/// requests verification only; `true` attempts an actual repair. See
/// [`repair_with_engine`] for the full pipeline contract, including the
/// caller-side serialization requirement.
#[cfg(feature = "libpar2")]
pub fn repair(parity_path: impl AsRef<std::path::Path>, do_repair: bool) -> RepairOutcome {
    repair_with_engine(&LibPar2Engine, parity_path, do_repair)
}
