//! Agent identity and capabilities

use super::performance::PerformanceSpec;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Immutable identity of an agent: who it is, what it covers, what it
/// relies on, and what it is expected to deliver
///
/// # Example
///
/// ```
/// use consilium_domain::agent::profile::AgentProfile;
///
/// let profile = AgentProfile::new("security-agent", "Security Advisor", "security")
///     .with_capability("threat-modeling")
///     .with_capability("secrets-management");
///
/// assert!(profile.capabilities.contains("threat-modeling"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Unique agent id
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Primary domain classification (e.g. "security")
    pub domain: String,
    /// What the agent can advise on, beyond its primary domain
    pub capabilities: BTreeSet<String>,
    /// Ids of other agents this one relies on
    pub dependencies: BTreeSet<String>,
    /// Performance targets and load ceiling
    pub performance: PerformanceSpec,
}

impl AgentProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            domain: domain.into(),
            capabilities: BTreeSet::new(),
            dependencies: BTreeSet::new(),
            performance: PerformanceSpec::standard(),
        }
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities
            .extend(capabilities.into_iter().map(Into::into));
        self
    }

    pub fn with_dependency(mut self, agent_id: impl Into<String>) -> Self {
        self.dependencies.insert(agent_id.into());
        self
    }

    pub fn with_performance(mut self, performance: PerformanceSpec) -> Self {
        self.performance = performance;
        self
    }

    /// Reject profiles that cannot be registered
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidAgentDefinition(
                "agent id must not be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidAgentDefinition(
                "agent name must not be empty".to_string(),
            ));
        }
        if self.domain.trim().is_empty() {
            return Err(DomainError::InvalidAgentDefinition(
                "agent domain must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the two profiles share at least one capability
    pub fn overlaps_capabilities(&self, other: &AgentProfile) -> bool {
        self.capabilities
            .iter()
            .any(|c| other.capabilities.contains(c))
    }
}
