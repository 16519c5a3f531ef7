//! Registry error types

use consilium_domain::DomainError;
use thiserror::Error;

/// Hard registration-time errors
///
/// These indicate a caller or configuration bug, unlike "no agent is free
/// right now" which is an expected runtime condition reported inside
/// response values.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("agent {0} is already registered")]
    DuplicateAgent(String),

    #[error(transparent)]
    InvalidDefinition(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_display() {
        let error = RegistryError::DuplicateAgent("security-agent".to_string());
        assert_eq!(error.to_string(), "agent security-agent is already registered");
    }
}
