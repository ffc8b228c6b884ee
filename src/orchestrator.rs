//! The orchestration pipeline
//!
//! One strictly linear sequence per call: probe resources, scan for
//! candidate files, silence the process streams, invoke the engine exactly
//! once, restore the streams, map the native status to an outcome. Every
//! stage except the invocation degrades gracefully on internal failure; the
//! engine's status is the only source of outcome variation.

use crate::engine::{EngineParams, RepairEngine};
use crate::outcome::RepairOutcome;
use crate::output_guard::OutputGuard;
use crate::resources::ResourceBudget;
use crate::scan;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One repair or verify request
///
/// Constructed per call, consumed once, never persisted.
#[derive(Debug, Clone)]
pub struct RepairRequest {
    /// Path to the parity descriptor file
    pub parity_path: PathBuf,
    /// true = attempt repair, false = verify only
    pub do_repair: bool,
}

impl RepairRequest {
    /// Build a request for the given parity file
    pub fn new(parity_path: impl Into<PathBuf>, do_repair: bool) -> Self {
        Self {
            parity_path: parity_path.into(),
            do_repair,
        }
    }
}

/// Run the full repair pipeline against the supplied engine
///
/// Returns exactly one [`RepairOutcome`]; no error type and no panic crosses
/// this boundary. An empty `parity_path` yields
/// [`RepairOutcome::InvalidArguments`] immediately, with no directory scan
/// and no engine invocation.
///
/// Calls must be serialized by the caller: the output-suppression stage swaps
/// the process-wide stdout/stderr descriptors and is not reentrant. The
/// library holds no internal lock. No other state is shared across calls;
/// the resource budget and candidate set are recomputed fresh each time.
pub fn repair_with_engine(
    engine: &dyn RepairEngine,
    parity_path: impl AsRef<Path>,
    do_repair: bool,
) -> RepairOutcome {
    run(
        engine,
        RepairRequest::new(parity_path.as_ref().to_path_buf(), do_repair),
    )
}

pub(crate) fn run(engine: &dyn RepairEngine, request: RepairRequest) -> RepairOutcome {
    if request.parity_path.as_os_str().is_empty() {
        warn!("rejecting repair request with empty parity path");
        return RepairOutcome::InvalidArguments;
    }

    let base_dir = base_dir_of(&request.parity_path);
    let budget = ResourceBudget::detect();
    let candidates = scan::candidate_files(&base_dir);

    debug!(
        parity_path = %request.parity_path.display(),
        base_dir = %base_dir.display(),
        do_repair = request.do_repair,
        candidates = candidates.len(),
        memory_limit = budget.memory_limit,
        threads = budget.threads,
        engine = engine.name(),
        "invoking repair engine"
    );

    let params = EngineParams::new(
        request.parity_path,
        base_dir,
        budget,
        candidates,
        request.do_repair,
    );

    let status = {
        let _guard = OutputGuard::engage_best_effort();
        engine.run(&params)
    };

    let outcome = RepairOutcome::from_status(status);
    info!(
        status = status.0,
        outcome = outcome.code(),
        "repair engine finished"
    );
    outcome
}

/// Directory containing the parity file, `.` when the path has no parent
fn base_dir_of(parity_path: &Path) -> PathBuf {
    match parity_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
