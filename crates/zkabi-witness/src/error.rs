//! Error types for witness encoding

use thiserror::Error;

/// Why a single input value was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputFault {
    #[error("must be an integer")]
    NotAnInteger,

    #[error("must be a string")]
    NotAString,

    #[error("must be a struct of named fields")]
    NotAStruct,

    #[error("length mismatch: input has {actual} {unit} but circuit expects {expected}")]
    LengthMismatch {
        actual: usize,
        expected: usize,
        unit: &'static str,
    },

    #[error("value {value} is out of range for {ty}")]
    OutOfRange { value: String, ty: String },

    #[error("'{0}' is not a decimal or 0x-prefixed hex number")]
    InvalidNumber(String),

    #[error("is not valid UTF-8")]
    InvalidUtf8,

    #[error("element {index}: {fault}")]
    InvalidElement { index: usize, fault: Box<InputFault> },
}

impl InputFault {
    /// Attribute a fault to one element of a flattened array
    pub fn at(self, index: usize) -> Self {
        InputFault::InvalidElement {
            index,
            fault: Box::new(self),
        }
    }
}

/// Encoding failures. The first failure aborts the whole encoding call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WitnessError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid input for {parameter}: {fault}")]
    InvalidInput { parameter: String, fault: InputFault },

    #[error("Invalid JSON input: {0}")]
    InvalidJson(String),
}

impl WitnessError {
    pub fn invalid(parameter: impl Into<String>, fault: InputFault) -> Self {
        WitnessError::InvalidInput {
            parameter: parameter.into(),
            fault,
        }
    }

    /// Name (dotted path for nested fields) of the offending parameter
    pub fn parameter(&self) -> Option<&str> {
        match self {
            WitnessError::MissingInput(name) => Some(name),
            WitnessError::InvalidInput { parameter, .. } => Some(parameter),
            WitnessError::InvalidJson(_) => None,
        }
    }
}

/// Result type for witness operations
pub type WitnessResult<T> = Result<T, WitnessError>;
