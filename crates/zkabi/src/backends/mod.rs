//! Proving backend capability and implementations

#[cfg(feature = "mock")]
pub mod mock_backend;

use crate::error::{BackendError, BackendResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[cfg(feature = "mock")]
use std::sync::Arc;

#[cfg(feature = "mock")]
pub use mock_backend::{MockBackend, MockConfig};

/// Proof system families a backend can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofSystem {
    UltraPlonk,
    #[default]
    UltraHonk,
}

impl ProofSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofSystem::UltraPlonk => "ultra_plonk",
            ProofSystem::UltraHonk => "ultra_honk",
        }
    }
}

impl fmt::Display for ProofSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProofSystem {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ultra_plonk" => Ok(ProofSystem::UltraPlonk),
            "ultra_honk" => Ok(ProofSystem::UltraHonk),
            other => Err(BackendError::Unavailable(format!(
                "unknown proof system '{}'",
                other
            ))),
        }
    }
}

/// Opaque proof blob together with the verification key it checks against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub proof: Vec<u8>,
    pub vkey: Vec<u8>,
}

impl Proof {
    pub fn new(proof: Vec<u8>, vkey: Vec<u8>) -> Self {
        Self { proof, vkey }
    }

    pub fn proof_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.proof))
    }
}

/// Capability contract of an external proving backend.
///
/// The witness crosses this boundary as canonical hex strings, one per field
/// element, in schema order.
pub trait ProvingBackend: Send + Sync {
    /// Backend name for identification
    fn name(&self) -> &'static str;

    /// Prepare the structured reference string and return its point count
    fn setup_srs(
        &self,
        bytecode: &[u8],
        srs_path: Option<&Path>,
        recursive: bool,
    ) -> BackendResult<u32>;

    /// Solve the circuit for the given input witness
    fn execute(&self, bytecode: &[u8], witness: &[String]) -> BackendResult<Vec<String>>;

    fn prove(
        &self,
        bytecode: &[u8],
        witness: &[String],
        proof_system: ProofSystem,
        recursive: bool,
    ) -> BackendResult<Proof>;

    fn verify(&self, proof: &Proof, proof_system: ProofSystem) -> BackendResult<bool>;

    fn verification_key(&self, bytecode: &[u8], proof_system: ProofSystem)
        -> BackendResult<Vec<u8>>;
}

/// Backend used when the caller does not supply one
#[cfg(feature = "mock")]
pub fn default_backend() -> Arc<dyn ProvingBackend> {
    Arc::new(MockBackend::new())
}
