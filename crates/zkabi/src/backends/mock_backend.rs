//! Mock proving backend for testing
//!
//! Deterministic and in-process. Proofs are SHA-256 digests over the proof
//! system tag, the bytecode and the witness; verification accepts the proofs
//! this instance issued, up to `max_issued` of the most recent ones. Only
//! compiled with the `mock` feature.

use crate::backends::{Proof, ProofSystem, ProvingBackend};
use crate::error::{BackendError, BackendResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use tracing::debug;

/// Configuration for the mock backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Lower bound for the reported SRS point count
    pub min_points: u32,
    /// Fail every SRS setup
    pub fail_setup: bool,
    /// Fail every proof generation
    pub fail_proving: bool,
    /// Issued proofs remembered for verification; the oldest is forgotten
    /// once the limit is reached
    pub max_issued: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            min_points: 4096,
            fail_setup: false,
            fail_proving: false,
            max_issued: 1024,
        }
    }
}

type IssuedKey = (ProofSystem, Vec<u8>, Vec<u8>);

/// Bounded record of issued proofs, evicted in insertion order
#[derive(Debug, Default)]
struct IssuedProofs {
    order: VecDeque<IssuedKey>,
    keys: HashSet<IssuedKey>,
}

impl IssuedProofs {
    fn insert(&mut self, key: IssuedKey, limit: usize) {
        if limit == 0 || self.keys.contains(&key) {
            return;
        }
        while self.order.len() >= limit {
            if let Some(oldest) = self.order.pop_front() {
                self.keys.remove(&oldest);
            }
        }
        self.keys.insert(key.clone());
        self.order.push_back(key);
    }

    fn contains(&self, key: &IssuedKey) -> bool {
        self.keys.contains(key)
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn clear(&mut self) {
        self.order.clear();
        self.keys.clear();
    }
}

/// Mock backend that issues hash-based proofs
pub struct MockBackend {
    config: MockConfig,
    issued: Mutex<IssuedProofs>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            issued: Mutex::new(IssuedProofs::default()),
        }
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Number of distinct proofs currently remembered
    pub fn issued_count(&self) -> usize {
        self.issued.lock().len()
    }

    /// Forget every issued proof; later verification of them fails
    pub fn clear_issued(&self) {
        self.issued.lock().clear();
    }

    fn digest(domain: &[u8], proof_system: ProofSystem, bytecode: &[u8]) -> Sha256 {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        hasher.update(proof_system.as_str().as_bytes());
        hasher.update((bytecode.len() as u64).to_be_bytes());
        hasher.update(bytecode);
        hasher
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvingBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn setup_srs(
        &self,
        bytecode: &[u8],
        srs_path: Option<&Path>,
        recursive: bool,
    ) -> BackendResult<u32> {
        if self.config.fail_setup {
            return Err(BackendError::Setup(
                "mock backend simulated setup failure".to_string(),
            ));
        }
        if let Some(path) = srs_path {
            if !path.exists() {
                return Err(BackendError::Setup(format!(
                    "SRS file not found: {}",
                    path.display()
                )));
            }
        }
        let wanted = (bytecode.len() as u64).max(u64::from(self.config.min_points));
        let points = u32::try_from(wanted.next_power_of_two()).map_err(|_| {
            BackendError::Setup(format!("circuit too large: {} gates", bytecode.len()))
        })?;
        debug!(points, recursive, "mock SRS ready");
        Ok(points)
    }

    fn execute(&self, bytecode: &[u8], witness: &[String]) -> BackendResult<Vec<String>> {
        if bytecode.is_empty() {
            return Err(BackendError::Execution("empty bytecode".to_string()));
        }
        Ok(witness.to_vec())
    }

    fn prove(
        &self,
        bytecode: &[u8],
        witness: &[String],
        proof_system: ProofSystem,
        recursive: bool,
    ) -> BackendResult<Proof> {
        if self.config.fail_proving {
            return Err(BackendError::Proving(
                "mock backend simulated proving failure".to_string(),
            ));
        }
        let mut hasher = Self::digest(b"proof", proof_system, bytecode);
        hasher.update([recursive as u8]);
        for value in witness {
            hasher.update(value.as_bytes());
        }
        let proof = hasher.finalize().to_vec();
        let vkey = self.verification_key(bytecode, proof_system)?;

        self.issued.lock().insert(
            (proof_system, proof.clone(), vkey.clone()),
            self.config.max_issued,
        );
        Ok(Proof::new(proof, vkey))
    }

    fn verify(&self, proof: &Proof, proof_system: ProofSystem) -> BackendResult<bool> {
        let key = (proof_system, proof.proof.clone(), proof.vkey.clone());
        Ok(self.issued.lock().contains(&key))
    }

    fn verification_key(
        &self,
        bytecode: &[u8],
        proof_system: ProofSystem,
    ) -> BackendResult<Vec<u8>> {
        Ok(Self::digest(b"vkey", proof_system, bytecode)
            .finalize()
            .to_vec())
    }
}
