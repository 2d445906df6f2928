//! config
//!
//! Doctor configuration: namespaces, timing, and the deep-diagnosis table.
//!
//! # Design
//!
//! Every field has a serde default so an absent or partial file still yields
//! a working configuration. The file is optional; a malformed file is an
//! error rather than a silent fallback.
//!
//! Resolution order:
//! 1. explicit `--config <path>`
//! 2. `<platform config dir>/fluxdoctor/config.toml`
//! 3. built-in defaults

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The file could not be parsed.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },
}

/// Doctor configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoctorConfig {
    /// Namespace holding the GitOps objects to diagnose.
    pub gitops_namespace: String,
    /// Namespace where the diagnosed workloads run (pod logs are read here).
    pub workload_namespace: String,
    /// Object names with a documented deep-diagnosis path: name -> pod label
    /// selector in the workload namespace. Used by the install-timeout rule.
    pub deep_diagnosis: HashMap<String, String>,
    /// Upper bound of the random start jitter, in seconds.
    pub jitter_secs: u64,
    /// Watch-mode poll interval, in seconds.
    pub interval_secs: u64,
    /// Per-check deadline, in seconds.
    pub deadline_secs: u64,
}

impl Default for DoctorConfig {
    fn default() -> Self {
        let mut deep_diagnosis = HashMap::new();
        deep_diagnosis.insert("kube-apiserver".to_string(), "role=apiserver".to_string());

        Self {
            gitops_namespace: "flux-system".to_string(),
            workload_namespace: "garden".to_string(),
            deep_diagnosis,
            jitter_secs: 5,
            interval_secs: 5,
            deadline_secs: 30,
        }
    }
}

impl DoctorConfig {
    /// Load from an explicit path, or the default location, or defaults.
    ///
    /// A missing file at the default location is not an error; a missing
    /// file at an explicit path is.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Start jitter upper bound.
    pub fn jitter(&self) -> Duration {
        Duration::from_secs(self.jitter_secs)
    }

    /// Watch-mode poll interval.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Per-check deadline.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    /// Label selector for an object's deep-diagnosis path, if registered.
    pub fn deep_diagnosis_selector(&self, name: &str) -> Option<&str> {
        self.deep_diagnosis.get(name).map(String::as_str)
    }
}

/// Default config file location.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fluxdoctor").join("config.toml"))
}
