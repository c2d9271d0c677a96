//! Error types for the simulation kernel.
//!
//! Physics never fails at runtime; only construction and host-side
//! configuration can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("Unknown phenomenon: {0}")]
    UnknownPhenomenon(String),

    /// Settings parsing or snapshot serialisation
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter assignment (expected name=value): {0}")]
    InvalidParameterAssignment(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_are_not_labelled_as_settings() {
        let err: KernelError = serde_json::from_str::<f64>("nope").unwrap_err().into();
        assert!(matches!(err, KernelError::Json(_)));
        assert!(err.to_string().starts_with("JSON error: "));
    }
}
