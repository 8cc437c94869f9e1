//! Fallback for platforms without a thread-affinity concept (e.g. sandboxed
//! targets). Every operation reports `Unsupported` rather than an ambiguous
//! failure code.

use super::AffinityError;
use crate::cpu::CpuId;

pub(crate) fn bind_current_thread(_cpu: CpuId) -> Result<(), AffinityError> {
    Err(AffinityError::Unsupported)
}

pub(crate) fn current_affinity() -> Result<Vec<CpuId>, AffinityError> {
    Err(AffinityError::Unsupported)
}

pub(crate) fn cpu_ids() -> Result<Vec<CpuId>, AffinityError> {
    Err(AffinityError::Unsupported)
}

pub(crate) fn out_of_range() -> AffinityError {
    AffinityError::Unsupported
}
