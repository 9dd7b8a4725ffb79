//! Circuit orchestration for ABI-described arithmetic circuits.
//!
//! Loads a compiled circuit manifest, encodes named inputs into the witness
//! layout its ABI declares, and drives a [`ProvingBackend`] through SRS
//! setup, execution, proving and verification.

pub mod backends;
pub mod circuit;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use backends::{Proof, ProofSystem, ProvingBackend};
#[cfg(feature = "mock")]
pub use backends::{default_backend, MockBackend, MockConfig};
pub use circuit::Circuit;
pub use config::CircuitConfig;
pub use error::{BackendError, BackendResult, CircuitError, CircuitResult};
pub use registry::CircuitRegistry;

pub use zkabi_schema::{
    CircuitManifest, CircuitSchema, ManifestError, Parameter, ParameterType, SchemaError, Sign,
};
pub use zkabi_witness::{
    encode, inputs, inputs_from_json, InputFault, InputMap, InputValue, WitnessError,
    WitnessSequence, WitnessValue,
};
