//! ABI schema model for compiled circuits.
//!
//! This crate holds the immutable description of a circuit's named inputs
//! and the decoding of compiler manifests into that description. The
//! witness encoder walks these types; nothing here interprets input values.

pub mod error;
pub mod manifest;
pub mod types;
pub mod wire;

pub use error::{ManifestError, ManifestResult, SchemaError, SchemaResult};
pub use manifest::CircuitManifest;
pub use types::{CircuitSchema, Parameter, ParameterType, Sign, MAX_INTEGER_WIDTH};
pub use wire::{RawParameter, RawType};
