//! Agent entity and guidance strategy
//!
//! An [`Agent`] pairs an immutable [`AgentProfile`] with a pluggable
//! [`GuidancePolicy`] that produces the actual advice. The entity wraps
//! every policy call with load accounting, latency/accuracy tracking and
//! health grading, so selection and failover never need to know what the
//! policy does.

pub mod health;
pub mod metrics;
pub mod performance;
pub mod profile;

use crate::consultation::request::ConsultationRequest;
use crate::consultation::response::GuidanceResponse;
use async_trait::async_trait;
use health::AgentHealthStatus;
use metrics::{AgentMetrics, MetricsRecorder};
use profile::AgentProfile;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use thiserror::Error;

/// Error produced by a [`GuidancePolicy`]
#[derive(Error, Debug)]
#[error("{0}")]
pub struct GuidanceError(pub String);

impl GuidanceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Raw advice produced by a policy, before the agent stamps identity,
/// timing and status onto it
#[derive(Debug, Clone)]
pub struct GuidanceDraft {
    pub guidance: String,
    /// Confidence in the guidance, 0.0 to 1.0
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

impl GuidanceDraft {
    pub fn new(guidance: impl Into<String>, confidence: f64) -> Self {
        Self {
            guidance: guidance.into(),
            confidence,
            recommendations: Vec::new(),
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendations.push(recommendation.into());
        self
    }

    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations
            .extend(recommendations.into_iter().map(Into::into));
        self
    }
}

/// The pluggable strategy that produces an agent's advice
///
/// Implementations are opaque to the registry; a failing policy reports an
/// explicit [`GuidanceError`] rather than panicking.
#[async_trait]
pub trait GuidancePolicy: Send + Sync {
    async fn advise(&self, request: &ConsultationRequest) -> Result<GuidanceDraft, GuidanceError>;
}

/// Invocation failure of a single agent
///
/// These are the conditions the registry recovers from via backup
/// failover; they are ordinary values, never panics.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("agent {agent_id} cannot handle requests for domain {domain}")]
    CannotHandle { agent_id: String, domain: String },

    #[error("agent {agent_id} is at maximum capacity")]
    AtCapacity { agent_id: String },

    #[error("agent {agent_id} failed to produce guidance: {source}")]
    Guidance {
        agent_id: String,
        #[source]
        source: GuidanceError,
    },
}

/// A registered domain expert
pub struct Agent {
    profile: AgentProfile,
    policy: Arc<dyn GuidancePolicy>,
    recorder: MetricsRecorder,
    health: RwLock<AgentHealthStatus>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("profile", &self.profile)
            .field("health", &self.health_status().state)
            .finish_non_exhaustive()
    }
}

impl Agent {
    pub fn new(profile: AgentProfile, policy: Arc<dyn GuidancePolicy>) -> Self {
        let health = RwLock::new(AgentHealthStatus::healthy(&profile.id));
        Self {
            profile,
            policy,
            recorder: MetricsRecorder::new(),
            health,
        }
    }

    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn domain(&self) -> &str {
        &self.profile.domain
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    /// Whether the request's domain matches, or any capability appears in
    /// the query text (case-insensitive)
    pub fn can_handle(&self, request: &ConsultationRequest) -> bool {
        if self.profile.domain == request.domain {
            return true;
        }
        let query = request.query.to_lowercase();
        self.profile
            .capabilities
            .iter()
            .any(|capability| query.contains(&capability.to_lowercase()))
    }

    /// Health is not unhealthy and the load ceiling has headroom
    pub fn is_available(&self) -> bool {
        self.read_health().is_available()
            && self.recorder.active_requests() < self.profile.performance.max_concurrent_requests
    }

    pub fn health_status(&self) -> AgentHealthStatus {
        self.read_health().clone()
    }

    pub fn metrics(&self) -> AgentMetrics {
        self.recorder.snapshot(&self.profile.id, self.is_available())
    }

    /// Ask the agent for guidance
    ///
    /// A successful call increments then decrements the active-request
    /// counter and folds the latency into the rolling average. Exceeding
    /// the latency target degrades the agent; a policy error marks it
    /// unhealthy and surfaces as an [`AgentError`] for the caller to
    /// recover from.
    pub async fn provide_guidance(
        &self,
        request: &ConsultationRequest,
    ) -> Result<GuidanceResponse, AgentError> {
        if !self.can_handle(request) {
            return Err(AgentError::CannotHandle {
                agent_id: self.profile.id.clone(),
                domain: request.domain.clone(),
            });
        }

        if self.recorder.active_requests() >= self.profile.performance.max_concurrent_requests {
            return Err(AgentError::AtCapacity {
                agent_id: self.profile.id.clone(),
            });
        }

        self.recorder.start_request();
        let start = Instant::now();
        let result = self.policy.advise(request).await;
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(draft) if draft.guidance.trim().is_empty() => {
                Err(GuidanceError::new("policy returned empty guidance"))
            }
            other => other,
        };

        let response = match outcome {
            Ok(draft) => {
                self.recorder.record_outcome(elapsed, true);

                if elapsed > self.profile.performance.target_response_time {
                    self.set_health(AgentHealthStatus::degraded(
                        &self.profile.id,
                        "Response time target exceeded",
                    ));
                } else {
                    self.set_health(AgentHealthStatus::healthy(&self.profile.id));
                }

                Ok(GuidanceResponse::success(
                    &request.request_id,
                    &self.profile.id,
                    draft.guidance,
                    draft.confidence,
                    draft.recommendations,
                    elapsed,
                ))
            }
            Err(error) => {
                self.recorder.record_outcome(elapsed, false);
                self.set_health(AgentHealthStatus::unhealthy(
                    &self.profile.id,
                    format!("Processing error: {error}"),
                ));

                Err(AgentError::Guidance {
                    agent_id: self.profile.id.clone(),
                    source: error,
                })
            }
        };

        self.recorder.finish_request();
        response
    }

    fn read_health(&self) -> RwLockReadGuard<'_, AgentHealthStatus> {
        self.health.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_health(&self) -> RwLockWriteGuard<'_, AgentHealthStatus> {
        self.health.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_health(&self, status: AgentHealthStatus) {
        *self.write_health() = status;
    }
}
