//! Circuit manifest decoding.
//!
//! A manifest is the JSON artifact produced by the circuit compiler. It
//! carries base64 bytecode, the ABI parameter list and an integrity hash.
//! Decoding happens in three steps, each with its own failure kind: JSON
//! shape ([`ManifestError::Parsing`]), schema conversion
//! ([`ManifestError::Schema`]) and bytecode decoding
//! ([`ManifestError::Loading`]).

use crate::error::{ManifestError, ManifestResult};
use crate::types::{CircuitSchema, Parameter};
use crate::wire::RawParameter;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct RawAbi {
    parameters: Vec<RawParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    return_type: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    noir_version: Option<String>,
    hash: u64,
    abi: RawAbi,
    bytecode: String,
}

/// A decoded circuit manifest
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitManifest {
    schema: CircuitSchema,
    bytecode: Vec<u8>,
    hash: u64,
    compiler_version: Option<String>,
    return_type: Option<serde_json::Value>,
}

impl CircuitManifest {
    /// Decode a manifest from raw JSON bytes
    pub fn from_slice(data: &[u8]) -> ManifestResult<Self> {
        let raw: RawManifest = serde_json::from_slice(data)?;
        Self::from_raw(raw)
    }

    /// Decode a manifest from a JSON string
    pub fn from_json_str(json: &str) -> ManifestResult<Self> {
        Self::from_slice(json.as_bytes())
    }

    fn from_raw(raw: RawManifest) -> ManifestResult<Self> {
        let parameters = raw
            .abi
            .parameters
            .into_iter()
            .map(Parameter::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let schema = CircuitSchema::new(parameters)?;

        let bytecode = STANDARD.decode(raw.bytecode.as_bytes()).map_err(|e| {
            ManifestError::Loading(format!("Invalid base64 bytecode in manifest: {}", e))
        })?;

        debug!(
            parameters = schema.len(),
            bytecode_len = bytecode.len(),
            hash = raw.hash,
            "decoded circuit manifest"
        );

        Ok(Self {
            schema,
            bytecode,
            hash: raw.hash,
            compiler_version: raw.noir_version,
            return_type: raw.abi.return_type,
        })
    }

    pub fn schema(&self) -> &CircuitSchema {
        &self.schema
    }

    pub fn parameters(&self) -> &[Parameter] {
        self.schema.parameters()
    }

    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn compiler_version(&self) -> Option<&str> {
        self.compiler_version.as_deref()
    }

    /// Return type description, passed through untouched
    pub fn return_type(&self) -> Option<&serde_json::Value> {
        self.return_type.as_ref()
    }

    /// Re-serialize into the manifest wire format
    pub fn to_json(&self) -> ManifestResult<String> {
        let raw = RawManifest {
            noir_version: self.compiler_version.clone(),
            hash: self.hash,
            abi: RawAbi {
                parameters: self.schema.parameters().iter().map(RawParameter::from).collect(),
                return_type: self.return_type.clone(),
            },
            bytecode: STANDARD.encode(&self.bytecode),
        };
        Ok(serde_json::to_string(&raw)?)
    }
}
