//! Linux and Android backend. Thread identity is the kernel thread id
//! (`gettid`); masks are applied with `sched_setaffinity` and read back with
//! `sched_getaffinity`.

use super::AffinityError;
use crate::cpu::CpuId;

use nix::errno::Errno;
use nix::sched::{sched_getaffinity, sched_setaffinity, CpuSet};
use nix::unistd::{gettid, Pid};

/// Kernel thread id of the calling thread, resolved fresh on every call.
fn current_thread() -> Pid {
    gettid()
}

pub(crate) fn bind_current_thread(cpu: CpuId) -> Result<(), AffinityError> {
    let mut mask = CpuSet::new();
    // An index that does not fit the fixed-size mask is rejected here with
    // EINVAL, the same code the kernel reports for an out-of-range index.
    mask.set(cpu.raw() as usize).map_err(classify)?;
    sched_setaffinity(current_thread(), &mask).map_err(classify)
}

pub(crate) fn current_affinity() -> Result<Vec<CpuId>, AffinityError> {
    let mask = sched_getaffinity(current_thread()).map_err(classify)?;
    collect(&mask)
}

/// CPUs the process is allowed to run on: the main thread's mask, which a
/// worker binding itself does not disturb.
pub(crate) fn cpu_ids() -> Result<Vec<CpuId>, AffinityError> {
    let mask = sched_getaffinity(nix::unistd::getpid()).map_err(classify)?;
    collect(&mask)
}

pub(crate) fn out_of_range() -> AffinityError {
    AffinityError::InvalidCpu(Errno::EINVAL as i32)
}

fn collect(mask: &CpuSet) -> Result<Vec<CpuId>, AffinityError> {
    let mut cpus = Vec::new();
    for i in 0..CpuSet::count() {
        if mask.is_set(i).map_err(classify)? {
            cpus.push(CpuId(i as u32));
        }
    }
    Ok(cpus)
}

fn classify(errno: Errno) -> AffinityError {
    match errno {
        Errno::EINVAL => AffinityError::InvalidCpu(errno as i32),
        Errno::EPERM | Errno::EACCES => AffinityError::PermissionDenied(errno as i32),
        _ => AffinityError::Os(errno as i32),
    }
}
