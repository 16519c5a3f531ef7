//! Specialized cross-cutting agent classifications
//!
//! Some concerns cut across primary domains: an agent whose primary domain
//! is "architecture" may still be the right expert for event-driven
//! questions. Classification is derived from capability keyword tables at
//! registration time.

use consilium_domain::AgentProfile;
use serde::{Deserialize, Serialize};

/// Well-known cross-cutting domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecializedDomain {
    EventDriven,
    Cicd,
    Configuration,
    Resilience,
}

impl SpecializedDomain {
    pub const ALL: [SpecializedDomain; 4] = [
        SpecializedDomain::EventDriven,
        SpecializedDomain::Cicd,
        SpecializedDomain::Configuration,
        SpecializedDomain::Resilience,
    ];

    /// Capabilities that mark an agent as belonging to this classification
    pub fn trigger_capabilities(&self) -> &'static [&'static str] {
        match self {
            SpecializedDomain::EventDriven => {
                &["event-schemas", "kafka", "sns-sqs", "rabbitmq", "event-sourcing"]
            }
            SpecializedDomain::Cicd => &[
                "build-automation",
                "deployment-strategies",
                "security-scanning",
                "pipeline-orchestration",
            ],
            SpecializedDomain::Configuration => &[
                "config-distribution",
                "feature-flags",
                "secrets-management",
                "configuration-validation",
            ],
            SpecializedDomain::Resilience => &[
                "circuit-breakers",
                "retry-patterns",
                "bulkhead-patterns",
                "chaos-engineering",
            ],
        }
    }

    /// The tag used in ids and lookups (e.g. "event-driven")
    pub fn tag(&self) -> &'static str {
        match self {
            SpecializedDomain::EventDriven => "event-driven",
            SpecializedDomain::Cicd => "cicd",
            SpecializedDomain::Configuration => "configuration",
            SpecializedDomain::Resilience => "resilience",
        }
    }

    /// Whether the profile belongs to this classification
    pub fn matches(&self, profile: &AgentProfile) -> bool {
        profile.id.contains(self.tag())
            || self
                .trigger_capabilities()
                .iter()
                .any(|trigger| profile.capabilities.contains(*trigger))
    }

    /// All classifications a profile belongs to
    pub fn classify(profile: &AgentProfile) -> Vec<SpecializedDomain> {
        Self::ALL
            .into_iter()
            .filter(|domain| domain.matches(profile))
            .collect()
    }
}

impl std::fmt::Display for SpecializedDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for SpecializedDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.tag() == s)
            .ok_or_else(|| format!("unknown specialized domain: {s}"))
    }
}
