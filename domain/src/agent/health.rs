//! Agent health states

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health of a single agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// Operating normally
    Healthy,
    /// Slower than its targets but still usable
    Degraded,
    /// Must not receive new requests
    Unhealthy,
}

impl HealthState {
    /// Degraded agents still accept work; unhealthy agents do not
    pub fn is_available(&self) -> bool {
        matches!(self, HealthState::Healthy | HealthState::Degraded)
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Degraded => write!(f, "degraded"),
            HealthState::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health snapshot for one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentHealthStatus {
    pub agent_id: String,
    pub state: HealthState,
    pub message: String,
    pub last_check: DateTime<Utc>,
}

impl AgentHealthStatus {
    pub fn healthy(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            state: HealthState::Healthy,
            message: "Agent is operating normally".to_string(),
            last_check: Utc::now(),
        }
    }

    pub fn degraded(agent_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            state: HealthState::Degraded,
            message: reason.into(),
            last_check: Utc::now(),
        }
    }

    pub fn unhealthy(agent_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            state: HealthState::Unhealthy,
            message: reason.into(),
            last_check: Utc::now(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.state.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_by_state() {
        assert!(AgentHealthStatus::healthy("a").is_available());
        assert!(AgentHealthStatus::degraded("a", "slow").is_available());
        assert!(!AgentHealthStatus::unhealthy("a", "broken").is_available());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(HealthState::Healthy.to_string(), "healthy");
        assert_eq!(HealthState::Degraded.to_string(), "degraded");
        assert_eq!(HealthState::Unhealthy.to_string(), "unhealthy");
    }
}
