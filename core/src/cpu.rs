//! Logical CPU identifiers, enumeration, and CPU-list parsing.
//!
//! Availability is queried from the OS on every call rather than cached:
//! hot-plug events and cpuset changes can alter the set while the process is
//! running, so a cached copy would go stale.

use crate::affinity::{platform, AffinityError};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of one logical CPU as enumerated by the operating system.
#[derive(Debug, Copy, Clone, Hash, Ord, Eq, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct CpuId(pub u32);

impl CpuId {
    /// For OS-facing calls
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CpuId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns the logical CPUs this process is allowed to run on, in ascending
/// order. This is the set a bind can actually succeed against under cpuset or
/// cgroup restriction, not the machine's raw topology.
pub fn cpu_ids() -> Result<Vec<CpuId>, AffinityError> {
    platform::cpu_ids()
}

/// Number of logical CPUs currently available to this process.
pub fn cpu_count() -> Result<usize, AffinityError> {
    Ok(platform::cpu_ids()?.len())
}

/* --------------------------------------------------------------------------------- */

/// An ordered list of CPUs parsed from a textual spec: `"all"`, or
/// comma-separated indices and inclusive ranges such as `"1,2-4,6"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuList(Vec<CpuId>);

impl CpuList {
    pub fn iter(&self) -> impl Iterator<Item = CpuId> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, cpu: CpuId) -> bool {
        self.0.contains(&cpu)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for CpuList {
    type Err = CpuListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(CpuListError::Empty);
        }
        // "all" expands to whatever the OS reports right now.
        if s.trim() == "all" {
            return Ok(CpuList(cpu_ids()?));
        }

        let mut cpus = Vec::new();
        for token in s.split(',') {
            match token.split('-').collect::<Vec<_>>().as_slice() {
                [index] => cpus.push(CpuId(parse_index(index)?)),
                [lo, hi] => {
                    let (lo, hi) = (parse_index(lo)?, parse_index(hi)?);
                    if lo > hi {
                        return Err(CpuListError::InvalidRange(token.to_string()));
                    }
                    cpus.extend((lo..=hi).map(CpuId));
                }
                _ => return Err(CpuListError::InvalidRange(token.to_string())),
            }
        }
        Ok(CpuList(cpus))
    }
}

fn parse_index(token: &str) -> Result<u32, CpuListError> {
    token
        .trim()
        .parse()
        .map_err(|_| CpuListError::InvalidIndex(token.to_string()))
}

#[derive(Error, Debug)]
pub enum CpuListError {
    #[error("empty CPU list")]
    Empty,

    #[error("invalid CPU index `{0}`")]
    InvalidIndex(String),

    #[error("invalid CPU range `{0}`")]
    InvalidRange(String),

    #[error(transparent)]
    Enumerate(#[from] AffinityError),
}
