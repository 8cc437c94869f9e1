//! Thread-to-CPU binding.
//!
//! Binding is a single-shot, synchronous operation on the calling thread: the
//! thread's OS identity is resolved, a mask holding exactly one CPU is built,
//! and the OS is asked to apply it. Nothing is retried, queued, or cached; a
//! failed call leaves the thread's affinity untouched. Concurrent calls from
//! different threads are independent because each thread only ever touches
//! its own scheduling constraints, which the kernel serializes itself.
//!
//! One backend exists per OS family, selected at build time. All backends
//! expose the same surface: bind, affinity query, and CPU enumeration.

use crate::cpu::CpuId;

use std::io;
use std::thread::{self, JoinHandle};

use thiserror::Error;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) mod linux;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) use linux as platform;

#[cfg(windows)]
pub(crate) mod windows;
#[cfg(windows)]
pub(crate) use windows as platform;

#[cfg(not(any(target_os = "linux", target_os = "android", windows)))]
pub(crate) mod unsupported;
#[cfg(not(any(target_os = "linux", target_os = "android", windows)))]
pub(crate) use unsupported as platform;

/// Binds the calling thread to `cpu`, immediately and for all future
/// scheduling decisions until a later call changes the mask.
///
/// The requested index is not range-checked here; the OS rejects an index
/// that is out of range or not permitted to this process, and the raw error
/// code comes back inside the [`AffinityError`]. Re-binding to the same CPU
/// is idempotent. Other threads in the process are unaffected.
pub fn bind_current_thread(cpu: CpuId) -> Result<(), AffinityError> {
    platform::bind_current_thread(cpu)?;
    log::debug!("pinned thread to CPU {}", cpu);
    Ok(())
}

/// Flat integer surface for `bind_current_thread`: `0` on success, an
/// errno-equivalent code on failure. Never panics.
///
/// A negative `cpu` cannot be represented in an affinity mask and reports the
/// same code the OS returns for any other out-of-range index.
pub fn bind_current_thread_to_cpu(cpu: i32) -> i32 {
    let err = match u32::try_from(cpu) {
        Ok(raw) => match bind_current_thread(CpuId(raw)) {
            Ok(()) => return 0,
            Err(e) => e,
        },
        Err(_) => platform::out_of_range(),
    };
    err.os_code()
}

/// Queries the calling thread's current affinity set from the OS.
pub fn current_affinity() -> Result<Vec<CpuId>, AffinityError> {
    platform::current_affinity()
}

/// Spawns a named worker thread that pins itself to `cpu` before running `f`.
///
/// The pin happens on the worker itself. A failed pin is logged and the
/// worker still runs; callers that need a hard guarantee should call
/// [`bind_current_thread`] inside the worker and handle the error there.
pub fn spawn_pinned<F, T>(cpu: CpuId, name: &str, f: F) -> io::Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new().name(name.to_string()).spawn(move || {
        if let Err(e) = bind_current_thread(cpu) {
            log::error!("failed to pin worker thread to CPU {}: {}", cpu, e);
        }
        f()
    })
}

/* --------------------------------------------------------------------------------- */

/// Errno-equivalent reported for `Unsupported`, where no OS code exists.
const ENOSYS: i32 = 38;

/// Outcome classification for a failed binding attempt. The raw OS error
/// code is preserved in every variant that has one; the classification is a
/// convenience on top, not a replacement.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffinityError {
    /// The OS rejected the requested CPU index.
    #[error("invalid CPU index (OS error {0})")]
    InvalidCpu(i32),

    /// The process may not use the requested CPU, e.g. under a cpuset or
    /// cgroup restriction.
    #[error("CPU not permitted (OS error {0})")]
    PermissionDenied(i32),

    /// The platform has no thread-affinity concept.
    #[error("thread affinity is not supported on this platform")]
    Unsupported,

    /// Any other OS failure, code preserved as reported.
    #[error("OS error {0}")]
    Os(i32),
}

impl AffinityError {
    /// The raw OS error code, surfaced unchanged. `Unsupported` has no OS
    /// code and reports the errno-equivalent `ENOSYS`.
    pub fn os_code(&self) -> i32 {
        match self {
            AffinityError::InvalidCpu(code)
            | AffinityError::PermissionDenied(code)
            | AffinityError::Os(code) => *code,
            AffinityError::Unsupported => ENOSYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_code_passes_through_unchanged() {
        assert_eq!(AffinityError::InvalidCpu(22).os_code(), 22);
        assert_eq!(AffinityError::PermissionDenied(1).os_code(), 1);
        assert_eq!(AffinityError::Os(71).os_code(), 71);
        assert_eq!(AffinityError::Unsupported.os_code(), ENOSYS);
    }
}
