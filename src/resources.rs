//! Host resource detection and repair budget computation
//!
//! The repair engine needs a memory limit and a worker thread count on every
//! invocation. Both are derived from host state through the [`ResourceProbe`]
//! capability trait, with one platform-backed implementation
//! ([`SystemProbe`]) and deterministic substitutes in tests. Detection can
//! never fail observably: an undetectable host falls back to fixed defaults.

use tracing::debug;

/// Lower clamp bound for the engine memory limit (16 MiB)
pub const MIN_MEMORY_LIMIT: u64 = 16 * 1024 * 1024;

/// Upper clamp bound for the engine memory limit (2 GiB, 32-bit safe)
pub const MAX_MEMORY_LIMIT: u64 = 2048 * 1024 * 1024;

/// Assumed total physical memory when detection fails or reports zero
pub const FALLBACK_TOTAL_MEMORY: u64 = 256 * 1024 * 1024;

/// Worker thread count when hardware concurrency is undetectable
pub const FALLBACK_THREADS: usize = 2;

/// Capability interface for host resource detection
///
/// Abstracting the platform queries behind this trait keeps the budget math
/// pure and lets tests substitute fixed values instead of querying real
/// hardware.
pub trait ResourceProbe {
    /// Total physical memory in bytes, `None` if undetectable
    fn total_memory(&self) -> Option<u64>;

    /// Hardware thread count, `None` if undetectable
    fn hardware_threads(&self) -> Option<usize>;
}

/// Probe backed by the host platform's native queries
///
/// - Linux: `sysconf(_SC_PHYS_PAGES) * sysconf(_SC_PAGE_SIZE)`
/// - macOS: `sysctl(CTL_HW, HW_MEMSIZE)`
/// - Windows: `GlobalMemoryStatusEx`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl ResourceProbe for SystemProbe {
    fn total_memory(&self) -> Option<u64> {
        total_physical_memory()
    }

    fn hardware_threads(&self) -> Option<usize> {
        std::thread::available_parallelism().ok().map(|n| n.get())
    }
}

#[cfg(target_os = "linux")]
fn total_physical_memory() -> Option<u64> {
    // SAFETY: sysconf takes no pointers and is always safe to call; a
    // negative return value signals an unsupported or failed query and is
    // rejected below.
    let pages = unsafe { libc::sysconf(libc::_SC_PHYS_PAGES) };
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGE_SIZE) };
    if pages > 0 && page_size > 0 {
        Some(pages as u64 * page_size as u64)
    } else {
        None
    }
}

#[cfg(target_os = "macos")]
fn total_physical_memory() -> Option<u64> {
    let mut mib = [libc::CTL_HW, libc::HW_MEMSIZE];
    let mut total: u64 = 0;
    let mut len = std::mem::size_of::<u64>();

    // SAFETY: This is safe because:
    // 1. mib is a valid two-element MIB array for the duration of the call
    // 2. total is a properly aligned u64 and len is initialized to its size
    // 3. We check the return value and only read total after a successful call
    let rc = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            2,
            &mut total as *mut u64 as *mut libc::c_void,
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };

    (rc == 0 && total > 0).then_some(total)
}

#[cfg(windows)]
fn total_physical_memory() -> Option<u64> {
    use winapi::um::sysinfoapi::{GlobalMemoryStatusEx, MEMORYSTATUSEX};

    // SAFETY: This is safe because:
    // 1. status is zero-initialized and dwLength is set before the call
    // 2. We check the return value and only read the struct on success
    unsafe {
        let mut status: MEMORYSTATUSEX = std::mem::zeroed();
        status.dwLength = std::mem::size_of::<MEMORYSTATUSEX>() as u32;
        if GlobalMemoryStatusEx(&mut status) == 0 {
            return None;
        }
        (status.ullTotalPhys > 0).then_some(status.ullTotalPhys)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn total_physical_memory() -> Option<u64> {
    None
}

/// Memory and thread budget supplied to the repair engine
///
/// Recomputed fresh on every orchestrated call; never cached across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceBudget {
    /// Engine memory limit in bytes, always within [16 MiB, 2 GiB]
    pub memory_limit: u64,
    /// Primary worker thread count, always >= 1
    pub threads: usize,
}

impl ResourceBudget {
    /// Compute a budget from the given probe
    ///
    /// The memory limit is half of total physical memory (matching the
    /// engine's own default behavior), clamped to [16 MiB, 2 GiB]. An
    /// undetectable total is treated as 256 MiB, giving a 128 MiB limit.
    /// Thread count is the reported hardware concurrency, or 2 when
    /// undetectable.
    #[must_use]
    pub fn from_probe(probe: &dyn ResourceProbe) -> Self {
        let total = match probe.total_memory() {
            Some(total) if total > 0 => total,
            _ => FALLBACK_TOTAL_MEMORY,
        };
        let memory_limit = (total / 2).clamp(MIN_MEMORY_LIMIT, MAX_MEMORY_LIMIT);

        let threads = match probe.hardware_threads() {
            Some(threads) if threads > 0 => threads,
            _ => FALLBACK_THREADS,
        };

        debug!(memory_limit, threads, "computed resource budget");
        Self {
            memory_limit,
            threads,
        }
    }

    /// Compute a budget from the host platform
    #[must_use]
    pub fn detect() -> Self {
        Self::from_probe(&SystemProbe)
    }
}
