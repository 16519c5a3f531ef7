//! Configuration file schema
//!
//! A registry config file declares the agents to register and the
//! standard collaboration workflows per domain:
//!
//! ```toml
//! [[agents]]
//! id = "security-agent"
//! name = "Security Advisor"
//! domain = "security"
//! capabilities = ["threat-modeling", "secrets-management"]
//! performance = "critical"
//!
//! [agents.guidance]
//! text = "Apply least privilege everywhere."
//! confidence = 0.9
//! recommendations = ["Rotate credentials", "Audit access logs"]
//!
//! [workflows]
//! security = ["security-agent", "architecture-agent"]
//! ```

use consilium_domain::{AgentProfile, PerformanceSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub agents: Vec<AgentDefinition>,
    /// domain -> standard agent sequence
    #[serde(default)]
    pub workflows: HashMap<String, Vec<String>>,
}

/// Named performance presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformancePreset {
    #[default]
    Standard,
    HighThroughput,
    Critical,
}

impl PerformancePreset {
    pub fn to_spec(self) -> PerformanceSpec {
        match self {
            PerformancePreset::Standard => PerformanceSpec::standard(),
            PerformancePreset::HighThroughput => PerformanceSpec::high_throughput(),
            PerformancePreset::Critical => PerformanceSpec::critical(),
        }
    }
}

/// One agent to register at bootstrap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub id: String,
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub performance: PerformancePreset,
    pub guidance: GuidanceDefinition,
}

impl AgentDefinition {
    pub fn to_profile(&self) -> AgentProfile {
        let mut profile = AgentProfile::new(&self.id, &self.name, &self.domain)
            .with_capabilities(self.capabilities.iter().cloned())
            .with_performance(self.performance.to_spec());
        for dependency in &self.dependencies {
            profile = profile.with_dependency(dependency);
        }
        profile
    }
}

/// Canned guidance an agent answers with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidanceDefinition {
    pub text: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

fn default_confidence() -> f64 {
    0.8
}
