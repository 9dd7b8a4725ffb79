//! Error types for schema construction and manifest decoding

use thiserror::Error;

/// Structural problems in an ABI type schema. Fatal at circuit construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unknown parameter kind: {0}")]
    UnknownKind(String),

    #[error("Unknown integer sign '{0}', expected 'signed' or 'unsigned'")]
    UnknownSign(String),

    #[error("Invalid integer width {width}, expected 1..={max}")]
    InvalidWidth { width: u32, max: u32 },

    #[error("Type of kind '{kind}' is missing required key '{key}'")]
    MissingKey { kind: String, key: &'static str },

    #[error("Duplicate parameter name: {0}")]
    DuplicateParameter(String),

    #[error("Flattened length of parameter {0} overflows")]
    LengthOverflow(String),
}

/// Failures while turning raw manifest bytes into a circuit description.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest decoded but its payload could not be loaded (bad bytecode).
    #[error("Error loading manifest: {0}")]
    Loading(String),

    /// The manifest is not valid JSON or does not have the expected shape.
    #[error("Error parsing manifest: {0}")]
    Parsing(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl From<serde_json::Error> for ManifestError {
    fn from(err: serde_json::Error) -> Self {
        ManifestError::Parsing(err.to_string())
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;
