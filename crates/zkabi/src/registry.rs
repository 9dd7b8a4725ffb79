//! Named collection of circuits sharing one backend

use crate::backends::ProvingBackend;
use crate::circuit::Circuit;
use crate::config::CircuitConfig;
use crate::error::{CircuitError, CircuitResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct CircuitRegistry {
    backend: Arc<dyn ProvingBackend>,
    config: CircuitConfig,
    circuits: HashMap<String, Circuit>,
}

impl CircuitRegistry {
    pub fn new(backend: Arc<dyn ProvingBackend>) -> Self {
        Self::with_config(backend, CircuitConfig::default())
    }

    /// Registry whose circuits all start from `config`
    pub fn with_config(backend: Arc<dyn ProvingBackend>, config: CircuitConfig) -> Self {
        Self {
            backend,
            config,
            circuits: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &Arc<dyn ProvingBackend> {
        &self.backend
    }

    /// Load a circuit on the shared backend without registering it
    pub fn create_circuit(&self, manifest: &[u8]) -> CircuitResult<Circuit> {
        Circuit::with_config(self.backend.clone(), manifest, self.config.clone())
    }

    /// Load and register a circuit, replacing any previous one with that name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        manifest: &[u8],
    ) -> CircuitResult<&mut Circuit> {
        let name = name.into();
        let circuit = self.create_circuit(manifest)?;
        debug!(name = %name, "registered circuit");
        self.circuits.insert(name.clone(), circuit);
        self.get_mut(&name)
    }

    pub fn get(&self, name: &str) -> CircuitResult<&Circuit> {
        self.circuits
            .get(name)
            .ok_or_else(|| CircuitError::CircuitNotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> CircuitResult<&mut Circuit> {
        self.circuits
            .get_mut(name)
            .ok_or_else(|| CircuitError::CircuitNotFound(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> CircuitResult<Circuit> {
        self.circuits
            .remove(name)
            .ok_or_else(|| CircuitError::CircuitNotFound(name.to_string()))
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.circuits.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }
}
