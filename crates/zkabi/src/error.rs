//! Error types for circuit orchestration

use thiserror::Error;
use zkabi_schema::ManifestError;
use zkabi_witness::WitnessError;

/// Top-level error for circuit operations
#[derive(Error, Debug)]
pub enum CircuitError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Witness(#[from] WitnessError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("SRS not setup. Call setup_srs before proving or verifying")]
    SrsNotSetup,

    #[error("Circuit not found: {0}")]
    CircuitNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures reported by a proving backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("SRS setup failed: {0}")]
    Setup(String),

    #[error("Circuit execution failed: {0}")]
    Execution(String),

    #[error("Proof generation failed: {0}")]
    Proving(String),

    #[error("Proof verification failed: {0}")]
    Verification(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

pub type CircuitResult<T> = Result<T, CircuitError>;
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;
    use zkabi_witness::InputFault;

    #[test]
    fn test_witness_errors_keep_their_message() {
        let err: CircuitError = WitnessError::invalid("x", InputFault::NotAnInteger).into();
        assert_eq!(err.to_string(), "Invalid input for x: must be an integer");

        let err: CircuitError = WitnessError::MissingInput("factors.b".to_string()).into();
        assert_eq!(err.to_string(), "Missing input: factors.b");
    }

    #[test]
    fn test_backend_errors_are_wrapped() {
        let err: CircuitError = BackendError::Proving("out of memory".to_string()).into();
        assert!(matches!(err, CircuitError::Backend(BackendError::Proving(_))));
        assert_eq!(
            err.to_string(),
            "Backend error: Proof generation failed: out of memory"
        );
    }
}
