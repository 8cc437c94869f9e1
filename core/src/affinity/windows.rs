//! Windows backend. `SetThreadAffinityMask` applies a mask to the calling
//! thread's pseudo-handle; the previous mask it returns doubles as the
//! read-back mechanism, since Windows has no direct thread-affinity query.

use super::AffinityError;
use crate::cpu::CpuId;

use windows_sys::Win32::Foundation::{
    ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER, GetLastError,
};
use windows_sys::Win32::System::Threading::{
    GetCurrentProcess, GetCurrentThread, GetProcessAffinityMask, SetThreadAffinityMask,
};

pub(crate) fn bind_current_thread(cpu: CpuId) -> Result<(), AffinityError> {
    // Masks are one machine word wide; an index past that cannot be
    // represented, same as an out-of-range index to the OS.
    if cpu.raw() >= usize::BITS {
        return Err(out_of_range());
    }
    let mask: usize = 1 << cpu.raw();
    let previous = unsafe { SetThreadAffinityMask(GetCurrentThread(), mask) };
    if previous == 0 {
        return Err(classify(unsafe { GetLastError() }));
    }
    Ok(())
}

/// Reads the calling thread's mask via set-and-restore: the process mask is
/// always a valid thread mask, so applying it momentarily exposes the
/// current mask in the return value, which is then put back.
///
/// If the restore itself fails (retried once), the error is reported and the
/// thread is left on the process mask; there is no way to both fail and roll
/// back with this API.
pub(crate) fn current_affinity() -> Result<Vec<CpuId>, AffinityError> {
    let probe = process_mask()?;
    let thread = unsafe { GetCurrentThread() };
    let current = unsafe { SetThreadAffinityMask(thread, probe) };
    if current == 0 {
        return Err(classify(unsafe { GetLastError() }));
    }
    let mut restored = unsafe { SetThreadAffinityMask(thread, current) };
    if restored == 0 {
        restored = unsafe { SetThreadAffinityMask(thread, current) };
    }
    if restored == 0 {
        return Err(classify(unsafe { GetLastError() }));
    }
    Ok(collect(current))
}

pub(crate) fn cpu_ids() -> Result<Vec<CpuId>, AffinityError> {
    Ok(collect(process_mask()?))
}

pub(crate) fn out_of_range() -> AffinityError {
    AffinityError::InvalidCpu(ERROR_INVALID_PARAMETER as i32)
}

fn process_mask() -> Result<usize, AffinityError> {
    let mut process: usize = 0;
    let mut system: usize = 0;
    let ok =
        unsafe { GetProcessAffinityMask(GetCurrentProcess(), &mut process, &mut system) };
    if ok == 0 {
        return Err(classify(unsafe { GetLastError() }));
    }
    Ok(process)
}

fn collect(mask: usize) -> Vec<CpuId> {
    (0..usize::BITS)
        .filter(|i| mask & (1 << i) != 0)
        .map(CpuId)
        .collect()
}

fn classify(code: u32) -> AffinityError {
    match code {
        ERROR_INVALID_PARAMETER => AffinityError::InvalidCpu(code as i32),
        ERROR_ACCESS_DENIED => AffinityError::PermissionDenied(code as i32),
        _ => AffinityError::Os(code as i32),
    }
}
