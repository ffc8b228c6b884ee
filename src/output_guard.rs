//! Scoped suppression of process stdout and stderr
//!
//! The repair engine emits verbose progress text meant for interactive use.
//! This crate presents a silent, structured API instead, so the engine call
//! runs inside an [`OutputGuard`] that redirects both standard streams to the
//! discard destination and restores them when dropped, on every exit path.
//!
//! The swap happens at the file-descriptor level so output written by foreign
//! (engine) code is silenced too, not just Rust-side writes. The descriptors
//! are process-wide state and the swap is not reentrant: callers must not
//! overlap two guards (see the crate-level serialization contract).

use crate::error::Result;
use tracing::warn;

/// RAII guard holding duplicates of the original stdout/stderr descriptors
///
/// Created with [`OutputGuard::engage`]; dropping the guard restores the
/// original destinations unconditionally.
#[derive(Debug)]
pub struct OutputGuard {
    #[cfg(unix)]
    saved_stdout: libc::c_int,
    #[cfg(unix)]
    saved_stderr: libc::c_int,
}

#[cfg(unix)]
impl OutputGuard {
    /// Redirect stdout and stderr to `/dev/null`
    ///
    /// # Errors
    ///
    /// Returns an error if the discard destination cannot be opened or the
    /// descriptors cannot be duplicated. The orchestrator absorbs this and
    /// proceeds without suppression; suppression is best-effort, not a
    /// precondition for correctness.
    pub fn engage() -> Result<Self> {
        // Flush Rust-side buffers before the descriptors change underneath them
        use std::io::Write;
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();

        // SAFETY: open takes a valid NUL-terminated path; the returned
        // descriptor is checked before use and closed on every path below.
        let null_fd = unsafe { libc::open(c"/dev/null".as_ptr(), libc::O_WRONLY) };
        if null_fd < 0 {
            return Err(std::io::Error::last_os_error().into());
        }

        // SAFETY: dup duplicates valid well-known descriptors; failures are
        // checked and any descriptor acquired so far is closed before
        // returning.
        let saved_stdout = unsafe { libc::dup(libc::STDOUT_FILENO) };
        let saved_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
        if saved_stdout < 0 || saved_stderr < 0 {
            let err = std::io::Error::last_os_error();
            // SAFETY: only descriptors that were successfully acquired are closed
            unsafe {
                if saved_stdout >= 0 {
                    libc::close(saved_stdout);
                }
                if saved_stderr >= 0 {
                    libc::close(saved_stderr);
                }
                libc::close(null_fd);
            }
            return Err(err.into());
        }

        // SAFETY: both source and target descriptors are valid; on failure
        // the originals are restored from the saved duplicates.
        let redirected_out = unsafe { libc::dup2(null_fd, libc::STDOUT_FILENO) };
        let redirected_err = unsafe { libc::dup2(null_fd, libc::STDERR_FILENO) };
        // SAFETY: null_fd is a valid descriptor owned by this function
        unsafe { libc::close(null_fd) };

        if redirected_out < 0 || redirected_err < 0 {
            let err = std::io::Error::last_os_error();
            // SAFETY: the saved duplicates are valid; restore whatever was
            // swapped and release the duplicates.
            unsafe {
                libc::dup2(saved_stdout, libc::STDOUT_FILENO);
                libc::dup2(saved_stderr, libc::STDERR_FILENO);
                libc::close(saved_stdout);
                libc::close(saved_stderr);
            }
            return Err(err.into());
        }

        Ok(Self {
            saved_stdout,
            saved_stderr,
        })
    }
}

#[cfg(not(unix))]
impl OutputGuard {
    /// No-op on platforms without descriptor-level redirection
    ///
    /// Suppression is best-effort; on these hosts the engine's output reaches
    /// the process streams unchanged.
    pub fn engage() -> Result<Self> {
        Ok(Self {})
    }
}

impl OutputGuard {
    /// Engage suppression, absorbing setup failure
    ///
    /// Returns `None` with a warning when redirection cannot be set up, so
    /// the repair proceeds unsuppressed rather than aborting.
    pub(crate) fn engage_best_effort() -> Option<Self> {
        match Self::engage() {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!(
                    error = %e,
                    "output suppression unavailable, engine output will not be silenced"
                );
                None
            }
        }
    }
}

#[cfg(unix)]
impl Drop for OutputGuard {
    fn drop(&mut self) {
        // SAFETY: the saved descriptors are valid duplicates owned by this
        // guard; dup2 back onto the well-known descriptors and release them.
        unsafe {
            libc::dup2(self.saved_stdout, libc::STDOUT_FILENO);
            libc::dup2(self.saved_stderr, libc::STDERR_FILENO);
            libc::close(self.saved_stdout);
            libc::close(self.saved_stderr);
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Device and inode identifying where a descriptor currently points
    fn fd_identity(fd: libc::c_int) -> (u64, u64) {
        // SAFETY: stat is zero-initialized and only read after fstat succeeds
        unsafe {
            let mut stat: libc::stat = std::mem::zeroed();
            assert_eq!(libc::fstat(fd, &mut stat), 0, "fstat failed for fd {fd}");
            (stat.st_dev as u64, stat.st_ino as u64)
        }
    }

    fn devnull_identity() -> (u64, u64) {
        // SAFETY: open with a valid path; descriptor closed after fstat
        let fd = unsafe { libc::open(c"/dev/null".as_ptr(), libc::O_RDONLY) };
        assert!(fd >= 0);
        let identity = fd_identity(fd);
        // SAFETY: fd was opened above
        unsafe { libc::close(fd) };
        identity
    }

    #[test]
    #[serial]
    fn engage_points_both_streams_at_devnull() {
        let null = devnull_identity();
        let guard = OutputGuard::engage().unwrap();

        assert_eq!(fd_identity(libc::STDOUT_FILENO), null);
        assert_eq!(fd_identity(libc::STDERR_FILENO), null);

        drop(guard);
    }

    #[test]
    #[serial]
    fn drop_restores_original_destinations() {
        let original_out = fd_identity(libc::STDOUT_FILENO);
        let original_err = fd_identity(libc::STDERR_FILENO);

        {
            let _guard = OutputGuard::engage().unwrap();
            // Writes land in the discard destination here
            println!("suppressed marker");
            eprintln!("suppressed marker");
        }

        assert_eq!(fd_identity(libc::STDOUT_FILENO), original_out);
        assert_eq!(fd_identity(libc::STDERR_FILENO), original_err);
    }

    #[test]
    #[serial]
    fn drop_restores_even_when_the_guarded_scope_panics() {
        let original_out = fd_identity(libc::STDOUT_FILENO);

        let result = std::panic::catch_unwind(|| {
            let _guard = OutputGuard::engage().unwrap();
            panic!("engine blew up");
        });
        assert!(result.is_err());

        assert_eq!(fd_identity(libc::STDOUT_FILENO), original_out);
    }

    #[test]
    #[serial]
    fn best_effort_engage_succeeds_on_unix() {
        let guard = OutputGuard::engage_best_effort();
        assert!(guard.is_some());
    }

    #[test]
    #[serial]
    fn sequential_guards_are_independent() {
        let original_out = fd_identity(libc::STDOUT_FILENO);

        for _ in 0..3 {
            let _guard = OutputGuard::engage().unwrap();
        }

        assert_eq!(fd_identity(libc::STDOUT_FILENO), original_out);
    }
}
