//! Consistency validation over multiple guidance responses
//!
//! Scoring is based on recommendation overlap: responses that recommend
//! materially different, non-overlapping approaches for the same query are
//! flagged as conflicting. High variance in confidence levels damps the
//! score further.

use crate::consultation::response::GuidanceResponse;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Minimum score for a response set to count as consistent
pub const CONSISTENCY_THRESHOLD: f64 = 0.8;

/// Confidence variance above this damps the consistency score
const VARIANCE_TOLERANCE: f64 = 0.1;

/// Verdict of a consistency check over a set of responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyValidationResult {
    pub consistent: bool,
    /// 0.0 (contradictory) to 1.0 (fully compatible)
    pub score: f64,
    pub conflicts: Vec<String>,
    pub agreements: Vec<String>,
    pub validation_time: Duration,
}

impl ConsistencyValidationResult {
    pub fn consistent(score: f64, agreements: Vec<String>, validation_time: Duration) -> Self {
        Self {
            consistent: true,
            score,
            conflicts: Vec::new(),
            agreements,
            validation_time,
        }
    }

    pub fn inconsistent(score: f64, conflicts: Vec<String>, validation_time: Duration) -> Self {
        Self {
            consistent: false,
            score,
            conflicts,
            agreements: Vec::new(),
            validation_time,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            consistent: false,
            score: 0.0,
            conflicts: vec![format!("Validation failed: {}", reason.into())],
            agreements: Vec::new(),
            validation_time: Duration::ZERO,
        }
    }

    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.score >= threshold
    }
}

/// Check that a set of responses do not contradict each other
///
/// Fewer than two responses are trivially consistent. The score is the
/// fraction of distinct recommendations that more than one agent agrees
/// on (1.0 when nobody made recommendations), damped when confidence
/// levels diverge sharply.
pub fn validate_consistency(responses: &[GuidanceResponse]) -> ConsistencyValidationResult {
    let start = Instant::now();

    if responses.len() < 2 {
        return ConsistencyValidationResult::consistent(
            1.0,
            vec!["Single response - no conflicts possible".to_string()],
            start.elapsed(),
        );
    }

    let mut conflicts = Vec::new();

    let avg_confidence =
        responses.iter().map(|r| r.confidence).sum::<f64>() / responses.len() as f64;
    let confidence_variance = responses
        .iter()
        .map(|r| (r.confidence - avg_confidence).powi(2))
        .sum::<f64>()
        / responses.len() as f64;

    let mut recommendation_counts: HashMap<&str, usize> = HashMap::new();
    for response in responses {
        for recommendation in &response.recommendations {
            *recommendation_counts.entry(recommendation.as_str()).or_default() += 1;
        }
    }

    let distinct = recommendation_counts.len();
    let shared = recommendation_counts.values().filter(|&&n| n > 1).count();

    let mut score = if distinct == 0 {
        1.0
    } else {
        shared as f64 / distinct as f64
    };

    if confidence_variance > VARIANCE_TOLERANCE {
        score *= 1.0 - confidence_variance;
        conflicts.push(format!(
            "High variance in confidence levels: {confidence_variance:.3}"
        ));
    }

    if score >= CONSISTENCY_THRESHOLD {
        let agreements = vec![format!(
            "Recommendations show {:.0}% agreement",
            score * 100.0
        )];
        ConsistencyValidationResult::consistent(score, agreements, start.elapsed())
    } else {
        conflicts.push(format!(
            "Low recommendation agreement: {:.0}%",
            score * 100.0
        ));
        ConsistencyValidationResult::inconsistent(score, conflicts, start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(agent: &str, confidence: f64, recommendations: &[&str]) -> GuidanceResponse {
        GuidanceResponse::success(
            "req-1",
            agent,
            "guidance",
            confidence,
            recommendations.iter().map(|s| s.to_string()).collect(),
            Duration::from_millis(10),
        )
    }

    #[test]
    fn test_single_response_is_trivially_consistent() {
        let result = validate_consistency(&[response("a", 0.9, &["use kafka"])]);
        assert!(result.consistent);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_agreeing_recommendations_are_consistent() {
        let responses = vec![
            response("a", 0.9, &["use kafka", "schema registry"]),
            response("b", 0.88, &["use kafka", "schema registry"]),
        ];
        let result = validate_consistency(&responses);

        assert!(result.consistent);
        assert_eq!(result.score, 1.0);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_disjoint_recommendations_conflict() {
        let responses = vec![
            response("a", 0.9, &["use kafka"]),
            response("b", 0.9, &["use polling"]),
        ];
        let result = validate_consistency(&responses);

        assert!(!result.consistent);
        assert_eq!(result.score, 0.0);
        assert!(!result.conflicts.is_empty());
    }

    #[test]
    fn test_no_recommendations_is_consistent() {
        let responses = vec![response("a", 0.9, &[]), response("b", 0.85, &[])];
        let result = validate_consistency(&responses);

        assert!(result.consistent);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_confidence_variance_damps_score() {
        // Same recommendations but wildly different confidence
        let responses = vec![
            response("a", 1.0, &["use kafka"]),
            response("b", 0.1, &["use kafka"]),
        ];
        let result = validate_consistency(&responses);

        // variance 0.2025 drops the score to 0.7975, under the threshold
        assert!(!result.consistent);
        assert!(result.score < CONSISTENCY_THRESHOLD);
        assert!(result.conflicts.iter().any(|c| c.contains("variance")));
    }

    #[test]
    fn test_meets_threshold() {
        let result = ConsistencyValidationResult::consistent(0.85, vec![], Duration::ZERO);
        assert!(result.meets_threshold(0.8));
        assert!(!result.meets_threshold(0.9));
    }

    #[test]
    fn test_failed_result() {
        let result = ConsistencyValidationResult::failed("no responses gathered");
        assert!(!result.consistent);
        assert_eq!(result.score, 0.0);
        assert!(result.conflicts[0].contains("no responses gathered"));
    }
}
