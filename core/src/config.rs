//! Configuration options.
//!
//! Applications assign worker threads to CPUs through a TOML file rather
//! than in code: the file names the CPUs, the application only carries them
//! to the binding calls. Placement policy stays with the operator.
//!
//! ```toml
//! workers = "1,2-4"
//! ```

use crate::cpu::CpuList;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Loads a configuration file from `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AffinityConfig> {
    let config_str = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
    let config: AffinityConfig = toml::from_str(&config_str).context("invalid config file")?;
    if let Some(workers) = &config.workers {
        if workers.trim().is_empty() {
            bail!("`workers` must name at least one CPU");
        }
    }
    Ok(config)
}

/// Worker-affinity options.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AffinityConfig {
    /// CPUs to pin worker threads to: `"all"` or a list such as `"1,2-4,6"`.
    /// Omit to leave workers unpinned.
    #[serde(default)]
    pub workers: Option<String>,
}

impl AffinityConfig {
    /// Parses the configured worker list, `None` when workers are unpinned.
    pub fn worker_cpus(&self) -> Result<Option<CpuList>> {
        match &self.workers {
            Some(spec) => {
                let cpus = spec
                    .parse::<CpuList>()
                    .with_context(|| format!("invalid `workers` list `{}`", spec))?;
                Ok(Some(cpus))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_worker_list() {
        let config: AffinityConfig = toml::from_str("workers = \"1,2-3\"").unwrap();
        let cpus = config.worker_cpus().unwrap().unwrap();
        assert_eq!(
            cpus.iter().map(|c| c.raw()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn workers_default_to_unpinned() {
        let config: AffinityConfig = toml::from_str("").unwrap();
        assert!(config.worker_cpus().unwrap().is_none());
    }

    #[test]
    fn rejects_bad_worker_list() {
        let config: AffinityConfig = toml::from_str("workers = \"4-2\"").unwrap();
        assert!(config.worker_cpus().is_err());
    }

    #[test]
    fn loads_config_file() {
        let path = std::env::temp_dir().join(format!("corepin-config-{}.toml", std::process::id()));
        fs::write(&path, "workers = \"0\"").unwrap();
        let config = load_config(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.workers.as_deref(), Some("0"));
    }
}
