//! Configuration for circuit orchestration

use crate::backends::ProofSystem;
use crate::error::{CircuitError, CircuitResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Defaults applied by the `*_default` circuit operations and by logging setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    pub proof_system: ProofSystem,
    pub recursive: bool,
    pub srs_path: Option<PathBuf>,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            proof_system: ProofSystem::default(),
            recursive: false,
            srs_path: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl CircuitConfig {
    pub fn from_toml_str(s: &str) -> CircuitResult<Self> {
        toml::from_str(s).map_err(|e| CircuitError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> CircuitResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CircuitError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> CircuitResult<String> {
        toml::to_string(self).map_err(|e| CircuitError::Config(e.to_string()))
    }
}
