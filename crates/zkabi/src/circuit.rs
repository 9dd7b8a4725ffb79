//! A loaded circuit bound to a proving backend.
//!
//! Every operation encodes the caller's inputs against the manifest schema
//! and hands the hex witness to the backend. Proving and verification need
//! a completed SRS setup first.

use crate::backends::{Proof, ProofSystem, ProvingBackend};
use crate::config::CircuitConfig;
use crate::error::{BackendError, CircuitError, CircuitResult};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use zkabi_schema::{CircuitManifest, CircuitSchema};
use zkabi_witness::{encode, InputMap, WitnessSequence};

pub struct Circuit {
    backend: Arc<dyn ProvingBackend>,
    manifest: CircuitManifest,
    config: CircuitConfig,
    num_points: Option<u32>,
}

impl Circuit {
    /// Load a circuit from raw manifest JSON
    pub fn new(backend: Arc<dyn ProvingBackend>, manifest: &[u8]) -> CircuitResult<Self> {
        Self::with_config(backend, manifest, CircuitConfig::default())
    }

    pub fn with_config(
        backend: Arc<dyn ProvingBackend>,
        manifest: &[u8],
        config: CircuitConfig,
    ) -> CircuitResult<Self> {
        let manifest = CircuitManifest::from_slice(manifest)?;
        Ok(Self::from_manifest(backend, manifest, config))
    }

    pub fn from_manifest(
        backend: Arc<dyn ProvingBackend>,
        manifest: CircuitManifest,
        config: CircuitConfig,
    ) -> Self {
        info!(
            backend = backend.name(),
            parameters = manifest.schema().len(),
            witness_len = manifest.schema().witness_len(),
            bytecode_len = manifest.bytecode().len(),
            hash = manifest.hash(),
            "loaded circuit"
        );
        Self {
            backend,
            manifest,
            config,
            num_points: None,
        }
    }

    //-------------------------------------------------------------------------
    // Accessors
    //-------------------------------------------------------------------------

    pub fn schema(&self) -> &CircuitSchema {
        self.manifest.schema()
    }

    pub fn manifest(&self) -> &CircuitManifest {
        &self.manifest
    }

    pub fn bytecode(&self) -> &[u8] {
        self.manifest.bytecode()
    }

    pub fn hash(&self) -> u64 {
        self.manifest.hash()
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn ProvingBackend> {
        &self.backend
    }

    pub fn is_srs_ready(&self) -> bool {
        self.num_points.is_some()
    }

    /// Point count reported by the last successful SRS setup
    pub fn num_points(&self) -> Option<u32> {
        self.num_points
    }

    //-------------------------------------------------------------------------
    // Operations
    //-------------------------------------------------------------------------

    /// Prepare the reference string. Must succeed before `prove` or `verify`.
    pub fn setup_srs(&mut self, srs_path: Option<&Path>, recursive: bool) -> CircuitResult<u32> {
        let points = self
            .backend
            .setup_srs(self.bytecode(), srs_path, recursive)
            .map_err(|e| {
                warn!(error = %e, "SRS setup failed");
                e
            })?;
        if points == 0 {
            warn!("backend reported an empty SRS");
            return Err(BackendError::Setup("backend reported zero points".to_string()).into());
        }
        info!(points, recursive, "SRS setup complete");
        self.num_points = Some(points);
        Ok(points)
    }

    /// The encoder's raw input witness for `inputs`
    pub fn witness(&self, inputs: &InputMap) -> CircuitResult<WitnessSequence> {
        Ok(encode(inputs, self.schema().parameters())?)
    }

    /// Solve the circuit and return the backend's solved witness
    pub fn execute(&self, inputs: &InputMap) -> CircuitResult<Vec<String>> {
        let witness = self.witness(inputs)?.to_hex_strings();
        let solved = self.backend.execute(self.bytecode(), &witness)?;
        info!(inputs = witness.len(), solved = solved.len(), "executed circuit");
        Ok(solved)
    }

    pub fn prove(
        &self,
        inputs: &InputMap,
        proof_system: ProofSystem,
        recursive: bool,
    ) -> CircuitResult<Proof> {
        self.require_srs()?;
        let witness = self.witness(inputs)?.to_hex_strings();
        let proof = self
            .backend
            .prove(self.bytecode(), &witness, proof_system, recursive)
            .map_err(|e| {
                warn!(error = %e, %proof_system, "proving failed");
                e
            })?;
        info!(%proof_system, recursive, proof_len = proof.proof.len(), "generated proof");
        Ok(proof)
    }

    pub fn verify(&self, proof: &Proof, proof_system: ProofSystem) -> CircuitResult<bool> {
        self.require_srs()?;
        let verified = self.backend.verify(proof, proof_system)?;
        info!(%proof_system, verified, "verified proof");
        Ok(verified)
    }

    pub fn verification_key(&self, proof_system: ProofSystem) -> CircuitResult<Vec<u8>> {
        self.require_srs()?;
        Ok(self.backend.verification_key(self.bytecode(), proof_system)?)
    }

    /// [`Circuit::setup_srs`] with the configured path and recursion flag
    pub fn setup_srs_default(&mut self) -> CircuitResult<u32> {
        let srs_path = self.config.srs_path.clone();
        let recursive = self.config.recursive;
        self.setup_srs(srs_path.as_deref(), recursive)
    }

    /// [`Circuit::prove`] with the configured proof system and recursion flag
    pub fn prove_default(&self, inputs: &InputMap) -> CircuitResult<Proof> {
        self.prove(inputs, self.config.proof_system, self.config.recursive)
    }

    pub fn verify_default(&self, proof: &Proof) -> CircuitResult<bool> {
        self.verify(proof, self.config.proof_system)
    }

    fn require_srs(&self) -> CircuitResult<()> {
        if self.is_srs_ready() {
            Ok(())
        } else {
            Err(CircuitError::SrsNotSetup)
        }
    }
}

impl std::fmt::Debug for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Circuit")
            .field("backend", &self.backend.name())
            .field("hash", &self.hash())
            .field("parameters", &self.schema().len())
            .field("num_points", &self.num_points)
            .finish()
    }
}
