//! Collaborative guidance response

use super::consistency::ConsistencyValidationResult;
use crate::consultation::response::GuidanceResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a coordinated multi-agent consultation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    /// Every participant succeeded and the answers are consistent
    Success,
    /// Some participants failed but the remainder agree
    PartialSuccess,
    /// Answers conflicted; a resolved answer was produced
    ConsistencyIssues,
    /// No usable answer could be produced
    Failure,
}

/// The merged result of one coordinated request across several agents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborativeGuidanceResponse {
    pub request_id: String,
    /// The agent ids the caller asked for (including any that were dropped)
    pub participants: Vec<String>,
    /// Combined guidance text across all successful responses
    pub consolidated_guidance: String,
    /// Mean confidence of the successful responses
    pub overall_confidence: f64,
    /// Deduplicated recommendations, in first-seen order
    pub consolidated_recommendations: Vec<String>,
    /// Every individual response gathered
    pub individual_responses: Vec<GuidanceResponse>,
    pub consistency: ConsistencyValidationResult,
    /// The conflict-resolution winner, present when answers conflicted
    pub resolved: Option<GuidanceResponse>,
    pub total_processing_time: Duration,
    pub status: CollaborationStatus,
    pub created_at: DateTime<Utc>,
}

impl CollaborativeGuidanceResponse {
    /// A coordination that produced no usable answer
    pub fn failure(
        request_id: impl Into<String>,
        participants: Vec<String>,
        reason: impl Into<String>,
        total_processing_time: Duration,
    ) -> Self {
        let reason = reason.into();
        Self {
            request_id: request_id.into(),
            participants,
            consolidated_guidance: reason.clone(),
            overall_confidence: 0.0,
            consolidated_recommendations: Vec::new(),
            individual_responses: Vec::new(),
            consistency: ConsistencyValidationResult::failed(reason),
            resolved: None,
            total_processing_time,
            status: CollaborationStatus::Failure,
            created_at: Utc::now(),
        }
    }

    /// Whether a usable answer exists (conflicts that were resolved still
    /// count as usable)
    pub fn is_successful(&self) -> bool {
        self.status != CollaborationStatus::Failure
    }

    pub fn has_consistency_issues(&self) -> bool {
        !self.consistency.consistent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_response() {
        let response = CollaborativeGuidanceResponse::failure(
            "req-1",
            vec!["a".to_string(), "b".to_string()],
            "no participants available",
            Duration::ZERO,
        );

        assert!(!response.is_successful());
        assert!(response.has_consistency_issues());
        assert_eq!(response.status, CollaborationStatus::Failure);
        assert!(response.individual_responses.is_empty());
    }
}
