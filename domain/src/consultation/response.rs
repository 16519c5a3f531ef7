//! Guidance response value object

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a single agent consultation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Failure,
}

/// One agent's structured answer to a consultation request
///
/// Success responses always carry non-empty guidance and a confidence in
/// `[0, 1]`; failure responses carry an error message and may omit guidance.
///
/// # Example
///
/// ```
/// use consilium_domain::consultation::response::GuidanceResponse;
/// use std::time::Duration;
///
/// let response = GuidanceResponse::success(
///     "req-1",
///     "security-agent",
///     "Rotate tokens every 24 hours.",
///     0.92,
///     vec!["Use short-lived credentials".to_string()],
///     Duration::from_millis(40),
/// );
/// assert!(response.is_success());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidanceResponse {
    /// Id of the originating request
    pub request_id: String,
    /// Agent that produced this response
    pub agent_id: String,
    /// Success or failure
    pub status: ResponseStatus,
    /// Guidance text (empty on failure)
    pub guidance: String,
    /// Confidence in the guidance, 0.0 to 1.0
    pub confidence: f64,
    /// Ordered recommendations
    pub recommendations: Vec<String>,
    /// How long the agent took
    pub processing_time: Duration,
    /// Error message, present on failure
    pub error: Option<String>,
    /// When the response was produced
    pub created_at: DateTime<Utc>,
}

impl GuidanceResponse {
    /// Create a success response; confidence is clamped to `[0, 1]`
    pub fn success(
        request_id: impl Into<String>,
        agent_id: impl Into<String>,
        guidance: impl Into<String>,
        confidence: f64,
        recommendations: Vec<String>,
        processing_time: Duration,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            agent_id: agent_id.into(),
            status: ResponseStatus::Success,
            guidance: guidance.into(),
            confidence: confidence.clamp(0.0, 1.0),
            recommendations,
            processing_time,
            error: None,
            created_at: Utc::now(),
        }
    }

    /// Create a failure response carrying an error message
    pub fn failure(
        request_id: impl Into<String>,
        agent_id: impl Into<String>,
        error: impl Into<String>,
        processing_time: Duration,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            agent_id: agent_id.into(),
            status: ResponseStatus::Failure,
            guidance: String::new(),
            confidence: 0.0,
            recommendations: Vec::new(),
            processing_time,
            error: Some(error.into()),
            created_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    pub fn is_failure(&self) -> bool {
        self.status == ResponseStatus::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = GuidanceResponse::success(
            "req-1",
            "agent-a",
            "Use event sourcing for the audit trail.",
            0.9,
            vec!["Keep events immutable".to_string()],
            Duration::from_millis(12),
        );

        assert!(response.is_success());
        assert!(response.error.is_none());
        assert!(!response.guidance.is_empty());
        assert_eq!(response.confidence, 0.9);
    }

    #[test]
    fn test_failure_response() {
        let response =
            GuidanceResponse::failure("req-1", "agent-a", "policy blew up", Duration::ZERO);

        assert!(response.is_failure());
        assert_eq!(response.error.as_deref(), Some("policy blew up"));
        assert_eq!(response.confidence, 0.0);
        assert!(response.recommendations.is_empty());
    }

    #[test]
    fn test_confidence_is_clamped() {
        let high = GuidanceResponse::success("r", "a", "g", 1.5, vec![], Duration::ZERO);
        assert_eq!(high.confidence, 1.0);

        let low = GuidanceResponse::success("r", "a", "g", -0.3, vec![], Duration::ZERO);
        assert_eq!(low.confidence, 0.0);
    }
}
