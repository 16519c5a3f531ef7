//! Agent performance specification

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Targets an agent is expected to meet
///
/// The load ceiling (`max_concurrent_requests`) is the only hard limit;
/// the other fields are targets used for health grading and metrics
/// comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSpec {
    /// Target response time; exceeding it degrades the agent
    pub target_response_time: Duration,
    /// Target accuracy, 0.0 to 1.0
    pub accuracy_threshold: f64,
    /// Target availability, 0.0 to 1.0
    pub availability_threshold: f64,
    /// Load ceiling: maximum in-flight requests
    pub max_concurrent_requests: u32,
}

impl PerformanceSpec {
    /// Default targets: 3s response, 95% accuracy, 100 concurrent requests
    pub fn standard() -> Self {
        Self {
            target_response_time: Duration::from_secs(3),
            accuracy_threshold: 0.95,
            availability_threshold: 0.999,
            max_concurrent_requests: 100,
        }
    }

    /// Tighter latency with a higher load ceiling
    pub fn high_throughput() -> Self {
        Self {
            target_response_time: Duration::from_secs(2),
            accuracy_threshold: 0.96,
            availability_threshold: 0.999,
            max_concurrent_requests: 200,
        }
    }

    /// Strictest targets, lower ceiling: quality over quantity
    pub fn critical() -> Self {
        Self {
            target_response_time: Duration::from_secs(1),
            accuracy_threshold: 1.0,
            availability_threshold: 0.999,
            max_concurrent_requests: 50,
        }
    }
}

impl Default for PerformanceSpec {
    fn default() -> Self {
        Self::standard()
    }
}
