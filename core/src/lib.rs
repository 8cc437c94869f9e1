//! Thread-to-CPU affinity control.
//!
//! corepin lets a process query the logical CPUs available to it and bind the
//! calling thread (or a spawned worker) to one of them. It is a leaf
//! facility: the binding operation is synchronous and stateless, the OS
//! scheduler is the only source of truth for affinity state, and nothing here
//! decides *which* CPU a thread should get; that belongs to the caller.
//!
//! ```no_run
//! use corepin_core::{bind_current_thread, cpu_ids};
//!
//! let cpus = cpu_ids().unwrap();
//! bind_current_thread(cpus[0]).unwrap();
//! ```
//!
//! Callers that integrate through a flat integer surface can use
//! [`bind_current_thread_to_cpu`] instead, which reports `0` on success and
//! the raw OS error code otherwise. On platforms without a thread-affinity
//! concept every operation reports [`AffinityError::Unsupported`] rather than
//! an ambiguous failure.

pub mod affinity;
pub mod config;
pub mod cpu;

pub use affinity::{
    bind_current_thread, bind_current_thread_to_cpu, current_affinity, spawn_pinned, AffinityError,
};
pub use cpu::{cpu_count, cpu_ids, CpuId, CpuList};
