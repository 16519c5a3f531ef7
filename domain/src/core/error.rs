//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid agent definition: {0}")]
    InvalidAgentDefinition(String),

    #[error("Invalid consultation request: {0}")]
    InvalidRequest(String),

    #[error("Confidence out of range: {0}")]
    ConfidenceOutOfRange(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::InvalidAgentDefinition("empty id".to_string());
        assert_eq!(error.to_string(), "Invalid agent definition: empty id");
    }
}
