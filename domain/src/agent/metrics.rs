//! Live agent metrics
//!
//! The recorder is updated atomically from concurrent guidance calls; the
//! [`AgentMetrics`] snapshot is what callers and the registry read.

use super::performance::PerformanceSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// Point-in-time metrics snapshot for one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub agent_id: String,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time: Duration,
    pub max_response_time: Duration,
    /// Fraction of requests that succeeded, 1.0 before any traffic
    pub current_accuracy: f64,
    pub availability: f64,
    pub active_requests: u32,
    pub last_updated: DateTime<Utc>,
}

impl AgentMetrics {
    pub fn initial(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            average_response_time: Duration::ZERO,
            max_response_time: Duration::ZERO,
            current_accuracy: 1.0,
            availability: 1.0,
            active_requests: 0,
            last_updated: Utc::now(),
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            1.0
        } else {
            self.successful_requests as f64 / self.total_requests as f64
        }
    }

    pub fn failure_rate(&self) -> f64 {
        1.0 - self.success_rate()
    }

    /// Whether the snapshot meets every target of the given spec
    pub fn meets_performance_spec(&self, spec: &PerformanceSpec) -> bool {
        self.average_response_time <= spec.target_response_time
            && self.current_accuracy >= spec.accuracy_threshold
            && self.availability >= spec.availability_threshold
            && self.active_requests <= spec.max_concurrent_requests
    }
}

/// Lock-free metrics accumulator shared by concurrent guidance calls
#[derive(Debug, Default)]
pub(crate) struct MetricsRecorder {
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    active: AtomicU32,
    avg_micros: AtomicU64,
    max_micros: AtomicU64,
}

impl MetricsRecorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn active_requests(&self) -> u32 {
        self.active.load(Ordering::Acquire)
    }

    /// Marks a request in flight and counts it toward the total
    pub(crate) fn start_request(&self) {
        self.active.fetch_add(1, Ordering::AcqRel);
        self.total.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn finish_request(&self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }

    pub(crate) fn record_outcome(&self, elapsed: Duration, success: bool) {
        if success {
            self.successful.fetch_add(1, Ordering::AcqRel);
        } else {
            self.failed.fetch_add(1, Ordering::AcqRel);
        }

        let micros = elapsed.as_micros() as u64;

        // Cumulative moving average over the request count so far
        let total = self.total.load(Ordering::Acquire).max(1);
        let _ = self
            .avg_micros
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |avg| {
                Some((avg * (total - 1) + micros) / total)
            });

        let _ = self
            .max_micros
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |max| {
                (micros > max).then_some(micros)
            });
    }

    pub(crate) fn snapshot(&self, agent_id: &str, available: bool) -> AgentMetrics {
        let total = self.total.load(Ordering::Acquire);
        let successful = self.successful.load(Ordering::Acquire);

        let current_accuracy = if total == 0 {
            1.0
        } else {
            successful as f64 / total as f64
        };

        AgentMetrics {
            agent_id: agent_id.to_string(),
            total_requests: total,
            successful_requests: successful,
            failed_requests: self.failed.load(Ordering::Acquire),
            average_response_time: Duration::from_micros(self.avg_micros.load(Ordering::Acquire)),
            max_response_time: Duration::from_micros(self.max_micros.load(Ordering::Acquire)),
            current_accuracy,
            availability: if available { 1.0 } else { 0.0 },
            active_requests: self.active.load(Ordering::Acquire),
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_snapshot() {
        let metrics = AgentMetrics::initial("agent-a");
        assert_eq!(metrics.total_requests, 0);
        assert_eq!(metrics.current_accuracy, 1.0);
        assert_eq!(metrics.success_rate(), 1.0);
    }

    #[test]
    fn test_recorder_counts_outcomes() {
        let recorder = MetricsRecorder::new();

        recorder.start_request();
        recorder.record_outcome(Duration::from_millis(10), true);
        recorder.finish_request();

        recorder.start_request();
        recorder.record_outcome(Duration::from_millis(30), false);
        recorder.finish_request();

        let snapshot = recorder.snapshot("agent-a", true);
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.successful_requests, 1);
        assert_eq!(snapshot.failed_requests, 1);
        assert_eq!(snapshot.current_accuracy, 0.5);
        assert_eq!(snapshot.active_requests, 0);
        assert_eq!(snapshot.max_response_time, Duration::from_millis(30));
    }

    #[test]
    fn test_active_request_tracking() {
        let recorder = MetricsRecorder::new();
        recorder.start_request();
        recorder.start_request();
        assert_eq!(recorder.active_requests(), 2);
        recorder.finish_request();
        assert_eq!(recorder.active_requests(), 1);
    }

    #[test]
    fn test_meets_performance_spec() {
        let mut metrics = AgentMetrics::initial("agent-a");
        metrics.average_response_time = Duration::from_millis(100);
        assert!(metrics.meets_performance_spec(&PerformanceSpec::standard()));

        metrics.average_response_time = Duration::from_secs(10);
        assert!(!metrics.meets_performance_spec(&PerformanceSpec::standard()));
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        use std::sync::Arc;

        let recorder = Arc::new(MetricsRecorder::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let recorder = Arc::clone(&recorder);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    recorder.start_request();
                    recorder.record_outcome(Duration::from_micros(50), true);
                    recorder.finish_request();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = recorder.snapshot("agent-a", true);
        assert_eq!(snapshot.total_requests, 800);
        assert_eq!(snapshot.successful_requests, 800);
        assert_eq!(snapshot.active_requests, 0);
    }
}
