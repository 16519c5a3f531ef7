//! Multi-agent collaboration protocol
//!
//! Coordinates one request across several agents in parallel, validates
//! that their answers agree, and resolves conflicts without dropping below
//! the best individual answer's quality floor.

use crate::registry::AgentRegistry;
use consilium_domain::{
    Agent, CollaborationStatus, CollaborativeGuidanceResponse, ConsistencyValidationResult,
    ConsultationRequest, GuidanceResponse, validate_consistency,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Conflict resolution never reports confidence below
/// `min(best individual confidence, QUALITY_FLOOR)`
const QUALITY_FLOOR: f64 = 0.95;

/// Soft ceiling for a whole coordinated consultation
const COLLABORATION_TIME_THRESHOLD: Duration = Duration::from_secs(3);

/// Orchestrates consultations that span several agents
pub struct CollaborationProtocol {
    registry: Arc<AgentRegistry>,
    /// domain -> standard agent sequence
    workflows: RwLock<HashMap<String, Vec<String>>>,
}

impl CollaborationProtocol {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self {
            registry,
            workflows: RwLock::new(HashMap::new()),
        }
    }

    /// Define the standard agent sequence for a domain
    pub fn register_workflow(&self, domain: impl Into<String>, agent_ids: Vec<String>) {
        self.write_workflows().insert(domain.into(), agent_ids);
    }

    /// The standard agent sequence for a domain, filtered to agents that
    /// currently resolve in the registry; deterministic across calls
    pub fn collaboration_workflow(&self, domain: &str) -> Vec<String> {
        self.read_workflows()
            .get(domain)
            .map(|ids| {
                ids.iter()
                    .filter(|id| self.registry.get_agent(id).is_some())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Dispatch one request to every resolvable, available participant in
    /// parallel, then validate the answers against each other
    ///
    /// Unknown or unavailable participant ids are silently dropped; the
    /// coordination only fails when zero valid participants remain or
    /// every dispatched agent errors. Failure is reported in the response
    /// value, never as an error.
    pub async fn coordinate_consultation(
        &self,
        request: &ConsultationRequest,
        participant_ids: &[String],
    ) -> CollaborativeGuidanceResponse {
        let start = Instant::now();
        debug!(
            "Starting collaborative consultation for request {} with agents: {participant_ids:?}",
            request.request_id
        );

        let participants: Vec<Arc<Agent>> = participant_ids
            .iter()
            .filter_map(|id| match self.registry.get_agent(id) {
                Some(agent) if agent.is_available() => Some(agent),
                Some(_) => {
                    debug!("Dropping unavailable participant {id}");
                    None
                }
                None => {
                    debug!("Dropping unregistered participant {id}");
                    None
                }
            })
            .collect();

        if participants.is_empty() {
            return CollaborativeGuidanceResponse::failure(
                &request.request_id,
                participant_ids.to_vec(),
                "No participants available for collaborative consultation",
                start.elapsed(),
            );
        }

        let dispatched = participants.len();
        let mut join_set = JoinSet::new();

        for agent in participants {
            let request = request.clone();
            join_set.spawn(async move {
                let agent_id = agent.id().to_string();
                let result = agent.provide_guidance(&request).await;
                (agent_id, result)
            });
        }

        let mut individual_responses = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((agent_id, Ok(response))) => {
                    debug!("Participant {agent_id} responded");
                    individual_responses.push(response);
                }
                Ok((agent_id, Err(error))) => {
                    warn!("Participant {agent_id} failed: {error}");
                    individual_responses.push(GuidanceResponse::failure(
                        &request.request_id,
                        agent_id,
                        error.to_string(),
                        Duration::ZERO,
                    ));
                }
                Err(error) => {
                    warn!("Participant task join error: {error}");
                }
            }
        }

        let successes: Vec<GuidanceResponse> = individual_responses
            .iter()
            .filter(|response| response.is_success())
            .cloned()
            .collect();

        if successes.is_empty() {
            return CollaborativeGuidanceResponse::failure(
                &request.request_id,
                participant_ids.to_vec(),
                "All participants failed to provide guidance",
                start.elapsed(),
            );
        }

        let consistency = validate_consistency(&successes);
        let resolved = if consistency.consistent {
            None
        } else {
            Some(self.resolve_conflicts(&successes))
        };

        let status = if !consistency.consistent {
            CollaborationStatus::ConsistencyIssues
        } else if successes.len() == dispatched {
            CollaborationStatus::Success
        } else {
            CollaborationStatus::PartialSuccess
        };

        let total = start.elapsed();
        if total > COLLABORATION_TIME_THRESHOLD {
            warn!("Collaborative consultation exceeded threshold: {total:?}");
        }

        CollaborativeGuidanceResponse {
            request_id: request.request_id.clone(),
            participants: participant_ids.to_vec(),
            consolidated_guidance: consolidate_guidance(&successes),
            overall_confidence: mean_confidence(&successes),
            consolidated_recommendations: consolidate_recommendations(&successes),
            individual_responses,
            consistency,
            resolved,
            total_processing_time: total,
            status,
            created_at: chrono::Utc::now(),
        }
    }

    /// Check a gathered response set for mutual consistency
    pub fn validate_consistency(
        &self,
        responses: &[GuidanceResponse],
    ) -> ConsistencyValidationResult {
        validate_consistency(responses)
    }

    /// Produce one usable answer from conflicting responses
    ///
    /// The highest-confidence response wins (ties broken by agent id);
    /// recommendations are merged across all responses. The result is
    /// always a success whose confidence is at least
    /// `min(best confidence, QUALITY_FLOOR)`.
    pub fn resolve_conflicts(&self, responses: &[GuidanceResponse]) -> GuidanceResponse {
        let Some(best) = responses.iter().max_by(|a, b| {
            a.confidence
                .total_cmp(&b.confidence)
                .then_with(|| b.agent_id.cmp(&a.agent_id))
        }) else {
            return GuidanceResponse::failure(
                "unknown",
                "collaboration-protocol",
                "No responses to resolve",
                Duration::ZERO,
            );
        };

        info!(
            "Resolved conflicts by selecting response from agent {} with confidence {}",
            best.agent_id, best.confidence
        );

        let confidence = best.confidence.max(QUALITY_FLOOR.min(best.confidence));

        GuidanceResponse::success(
            &best.request_id,
            &best.agent_id,
            &best.guidance,
            confidence,
            consolidate_recommendations(responses),
            best.processing_time,
        )
    }

    fn read_workflows(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<String>>> {
        self.workflows
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_workflows(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<String>>> {
        self.workflows
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Combine guidance texts, labelling each contribution
fn consolidate_guidance(responses: &[GuidanceResponse]) -> String {
    if let [only] = responses {
        return only.guidance.clone();
    }

    let mut consolidated = String::from("Collaborative guidance:\n\n");
    for response in responses {
        consolidated.push_str(&format!(
            "Agent {} (confidence {:.2}):\n{}\n\n",
            response.agent_id, response.confidence, response.guidance
        ));
    }
    consolidated
}

/// Union of recommendations in first-seen order
fn consolidate_recommendations(responses: &[GuidanceResponse]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut merged = Vec::new();
    for response in responses {
        for recommendation in &response.recommendations {
            if seen.insert(recommendation.clone()) {
                merged.push(recommendation.clone());
            }
        }
    }
    merged
}

fn mean_confidence(responses: &[GuidanceResponse]) -> f64 {
    if responses.is_empty() {
        return 0.0;
    }
    responses.iter().map(|r| r.confidence).sum::<f64>() / responses.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use consilium_domain::{
        AgentProfile, GuidanceDraft, GuidanceError, GuidancePolicy,
    };

    struct CannedPolicy {
        guidance: &'static str,
        confidence: f64,
        recommendations: Vec<&'static str>,
    }

    #[async_trait]
    impl GuidancePolicy for CannedPolicy {
        async fn advise(
            &self,
            _request: &ConsultationRequest,
        ) -> Result<GuidanceDraft, GuidanceError> {
            Ok(GuidanceDraft::new(self.guidance, self.confidence)
                .with_recommendations(self.recommendations.clone()))
        }
    }

    struct FailingPolicy;

    #[async_trait]
    impl GuidancePolicy for FailingPolicy {
        async fn advise(
            &self,
            _request: &ConsultationRequest,
        ) -> Result<GuidanceDraft, GuidanceError> {
            Err(GuidanceError::new("simulated outage"))
        }
    }

    fn register(
        registry: &AgentRegistry,
        id: &str,
        domain: &str,
        policy: impl GuidancePolicy + 'static,
    ) {
        let profile = AgentProfile::new(id, format!("Agent {id}"), domain);
        registry
            .register_agent(Arc::new(Agent::new(profile, Arc::new(policy))))
            .unwrap();
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn response(agent: &str, confidence: f64, recommendations: &[&str]) -> GuidanceResponse {
        GuidanceResponse::success(
            "req-1",
            agent,
            format!("guidance from {agent}"),
            confidence,
            recommendations.iter().map(|s| s.to_string()).collect(),
            Duration::from_millis(5),
        )
    }

    #[tokio::test]
    async fn test_coordination_success_when_agents_agree() {
        let registry = Arc::new(AgentRegistry::new());
        register(
            &registry,
            "a-agent",
            "security",
            CannedPolicy {
                guidance: "Use mTLS between services.",
                confidence: 0.9,
                recommendations: vec!["enable mtls"],
            },
        );
        register(
            &registry,
            "b-agent",
            "security",
            CannedPolicy {
                guidance: "mTLS everywhere.",
                confidence: 0.88,
                recommendations: vec!["enable mtls"],
            },
        );

        let protocol = CollaborationProtocol::new(registry);
        let request = ConsultationRequest::new("security", "service auth?");
        let response = protocol
            .coordinate_consultation(&request, &ids(&["a-agent", "b-agent"]))
            .await;

        assert_eq!(response.status, CollaborationStatus::Success);
        assert!(response.is_successful());
        assert!(response.consistency.consistent);
        assert!(response.resolved.is_none());
        assert_eq!(response.individual_responses.len(), 2);
        assert_eq!(response.consolidated_recommendations, vec!["enable mtls"]);
    }

    #[tokio::test]
    async fn test_unknown_participants_are_dropped() {
        let registry = Arc::new(AgentRegistry::new());
        register(
            &registry,
            "a-agent",
            "security",
            CannedPolicy {
                guidance: "Solo answer.",
                confidence: 0.9,
                recommendations: vec![],
            },
        );

        let protocol = CollaborationProtocol::new(registry);
        let request = ConsultationRequest::new("security", "q");
        let response = protocol
            .coordinate_consultation(&request, &ids(&["a-agent", "ghost-agent"]))
            .await;

        // Only the resolvable participant was dispatched
        assert_eq!(response.individual_responses.len(), 1);
        assert!(response.is_successful());
        // The requested set is preserved for auditing
        assert_eq!(response.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_participants_fails_without_panicking() {
        let registry = Arc::new(AgentRegistry::new());
        let protocol = CollaborationProtocol::new(registry);

        let request = ConsultationRequest::new("security", "q");
        let response = protocol
            .coordinate_consultation(&request, &ids(&["ghost-a", "ghost-b"]))
            .await;

        assert_eq!(response.status, CollaborationStatus::Failure);
        assert!(!response.is_successful());
        assert!(
            response
                .consolidated_guidance
                .contains("No participants available")
        );
    }

    #[tokio::test]
    async fn test_partial_success_when_one_agent_fails() {
        let registry = Arc::new(AgentRegistry::new());
        register(
            &registry,
            "a-agent",
            "security",
            CannedPolicy {
                guidance: "Still here.",
                confidence: 0.9,
                recommendations: vec![],
            },
        );
        register(&registry, "b-agent", "security", FailingPolicy);

        let protocol = CollaborationProtocol::new(registry);
        let request = ConsultationRequest::new("security", "q");
        let response = protocol
            .coordinate_consultation(&request, &ids(&["a-agent", "b-agent"]))
            .await;

        assert_eq!(response.status, CollaborationStatus::PartialSuccess);
        assert!(response.is_successful());
        assert_eq!(response.individual_responses.len(), 2);
    }

    #[tokio::test]
    async fn test_all_participants_failing_is_a_failure() {
        let registry = Arc::new(AgentRegistry::new());
        register(&registry, "a-agent", "security", FailingPolicy);
        register(&registry, "b-agent", "security", FailingPolicy);

        let protocol = CollaborationProtocol::new(registry);
        let request = ConsultationRequest::new("security", "q");
        let response = protocol
            .coordinate_consultation(&request, &ids(&["a-agent", "b-agent"]))
            .await;

        assert_eq!(response.status, CollaborationStatus::Failure);
        assert!(!response.is_successful());
    }

    #[tokio::test]
    async fn test_conflicting_recommendations_are_resolved() {
        let registry = Arc::new(AgentRegistry::new());
        register(
            &registry,
            "a-agent",
            "architecture",
            CannedPolicy {
                guidance: "Go event-driven.",
                confidence: 0.7,
                recommendations: vec!["use kafka"],
            },
        );
        register(
            &registry,
            "b-agent",
            "architecture",
            CannedPolicy {
                guidance: "Poll the database.",
                confidence: 0.9,
                recommendations: vec!["use polling"],
            },
        );

        let protocol = CollaborationProtocol::new(registry);
        let request = ConsultationRequest::new("architecture", "integration style?");
        let response = protocol
            .coordinate_consultation(&request, &ids(&["a-agent", "b-agent"]))
            .await;

        assert_eq!(response.status, CollaborationStatus::ConsistencyIssues);
        assert!(response.is_successful());
        assert!(response.has_consistency_issues());

        let resolved = response.resolved.unwrap();
        assert!(resolved.is_success());
        assert_eq!(resolved.agent_id, "b-agent");
        assert!(resolved.confidence >= 0.9_f64.min(QUALITY_FLOOR));
        // Merged recommendations keep both viewpoints
        assert!(resolved.recommendations.contains(&"use kafka".to_string()));
        assert!(resolved.recommendations.contains(&"use polling".to_string()));
    }

    #[test]
    fn test_resolve_conflicts_quality_floor() {
        let registry = Arc::new(AgentRegistry::new());
        let protocol = CollaborationProtocol::new(registry);

        let responses = vec![
            response("a-agent", 0.6, &["approach a"]),
            response("b-agent", 0.8, &["approach b"]),
        ];
        let resolved = protocol.resolve_conflicts(&responses);

        assert!(resolved.is_success());
        assert!(!resolved.guidance.is_empty());
        assert!(resolved.confidence >= 0.8_f64.min(QUALITY_FLOOR));
        assert_eq!(resolved.agent_id, "b-agent");
    }

    #[test]
    fn test_resolve_conflicts_tie_breaks_on_agent_id() {
        let registry = Arc::new(AgentRegistry::new());
        let protocol = CollaborationProtocol::new(registry);

        let responses = vec![
            response("b-agent", 0.8, &[]),
            response("a-agent", 0.8, &[]),
        ];
        let resolved = protocol.resolve_conflicts(&responses);
        assert_eq!(resolved.agent_id, "a-agent");
    }

    #[test]
    fn test_workflow_lookup_drops_unregistered_ids() {
        let registry = Arc::new(AgentRegistry::new());
        register(
            &registry,
            "security-agent",
            "security",
            CannedPolicy {
                guidance: "g",
                confidence: 0.9,
                recommendations: vec![],
            },
        );

        let protocol = CollaborationProtocol::new(registry);
        protocol.register_workflow("security", ids(&["security-agent", "retired-agent"]));

        let workflow = protocol.collaboration_workflow("security");
        assert_eq!(workflow, vec!["security-agent"]);

        // Deterministic: repeated lookups agree
        assert_eq!(protocol.collaboration_workflow("security"), workflow);
        assert!(protocol.collaboration_workflow("unknown").is_empty());
    }
}
