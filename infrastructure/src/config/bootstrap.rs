//! Registry bootstrap from configuration
//!
//! Explicit construction: callers load a [`RegistryConfig`], build the
//! registry and protocol from it, and own both. There is no process-wide
//! factory or singleton.

use super::file_config::RegistryConfig;
use crate::policies::StaticGuidancePolicy;
use consilium_application::{AgentRegistry, CollaborationProtocol, RegistryError};
use consilium_domain::Agent;
use std::sync::Arc;
use tracing::info;

/// Build a registry and collaboration protocol from configuration
///
/// Registers every configured agent with a [`StaticGuidancePolicy`] and
/// installs the configured workflows. A duplicate or malformed agent
/// definition aborts the bootstrap: configuration bugs surface
/// immediately rather than at consultation time.
pub fn bootstrap(
    config: &RegistryConfig,
) -> Result<(Arc<AgentRegistry>, CollaborationProtocol), RegistryError> {
    let registry = Arc::new(AgentRegistry::new());

    for definition in &config.agents {
        let policy = StaticGuidancePolicy::new(
            &definition.guidance.text,
            definition.guidance.confidence,
        )
        .with_recommendations(definition.guidance.recommendations.iter().cloned());

        let agent = Agent::new(definition.to_profile(), Arc::new(policy));
        registry.register_agent(Arc::new(agent))?;
    }

    let protocol = CollaborationProtocol::new(Arc::clone(&registry));
    for (domain, agent_ids) in &config.workflows {
        protocol.register_workflow(domain.as_str(), agent_ids.clone());
    }

    info!(
        "Bootstrapped registry with {} agents and {} workflows",
        config.agents.len(),
        config.workflows.len()
    );

    Ok((registry, protocol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_domain::ConsultationRequest;

    fn sample_config() -> RegistryConfig {
        toml::from_str(
            r#"
            [[agents]]
            id = "security-agent"
            name = "Security Advisor"
            domain = "security"
            capabilities = ["secrets-management"]

            [agents.guidance]
            text = "Apply least privilege."
            confidence = 0.9
            recommendations = ["Rotate credentials"]

            [[agents]]
            id = "architecture-agent"
            name = "Architecture Advisor"
            domain = "architecture"

            [agents.guidance]
            text = "Keep service boundaries aligned with the domain."

            [workflows]
            security = ["security-agent", "architecture-agent"]
            "#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_bootstrap_registers_agents_and_workflows() {
        let (registry, protocol) = bootstrap(&sample_config()).unwrap();

        assert_eq!(registry.all_agents().len(), 2);
        assert_eq!(
            protocol.collaboration_workflow("security"),
            vec!["security-agent", "architecture-agent"]
        );

        let request = ConsultationRequest::new("security", "token rotation?");
        let response = registry.consult_best_agent(&request).await;
        assert!(response.is_success());
        assert_eq!(response.agent_id, "security-agent");
        assert_eq!(response.guidance, "Apply least privilege.");
    }

    #[test]
    fn test_bootstrap_rejects_duplicate_ids() {
        let mut config = sample_config();
        let duplicate = config.agents[0].clone();
        config.agents.push(duplicate);

        assert!(matches!(
            bootstrap(&config),
            Err(RegistryError::DuplicateAgent(_))
        ));
    }
}
