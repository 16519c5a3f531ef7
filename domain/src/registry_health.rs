//! Aggregate registry health

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registry-wide availability threshold
const AVAILABILITY_THRESHOLD: f64 = 0.8;

/// Health of the agent population as a whole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryHealthStatus {
    pub total_agents: usize,
    pub available_agents: usize,
    pub unhealthy_agents: usize,
    /// available / total, 1.0 for an empty registry
    pub overall_availability: f64,
    pub last_check: DateTime<Utc>,
}

impl RegistryHealthStatus {
    pub fn new(total: usize, available: usize, unhealthy: usize) -> Self {
        let overall_availability = if total > 0 {
            available as f64 / total as f64
        } else {
            1.0
        };
        Self {
            total_agents: total,
            available_agents: available,
            unhealthy_agents: unhealthy,
            overall_availability,
            last_check: Utc::now(),
        }
    }

    /// Healthy means at least one available agent and ≥ 80% availability
    pub fn is_healthy(&self) -> bool {
        self.available_agents > 0 && self.overall_availability >= AVAILABILITY_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_availability() {
        let status = RegistryHealthStatus::new(0, 0, 0);
        assert_eq!(status.overall_availability, 1.0);
        // healthy requires at least one available agent
        assert!(!status.is_healthy());
    }

    #[test]
    fn test_healthy_registry() {
        let status = RegistryHealthStatus::new(5, 4, 1);
        assert_eq!(status.overall_availability, 0.8);
        assert!(status.is_healthy());
    }

    #[test]
    fn test_low_availability_is_unhealthy() {
        let status = RegistryHealthStatus::new(4, 2, 2);
        assert_eq!(status.overall_availability, 0.5);
        assert!(!status.is_healthy());
    }
}
