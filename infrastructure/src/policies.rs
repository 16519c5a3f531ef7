//! Guidance policy implementations
//!
//! The registry treats policies as opaque; these are the two stock
//! implementations: canned text loaded from configuration, and an
//! arbitrary closure for callers that compute guidance on the fly.

use async_trait::async_trait;
use consilium_domain::{ConsultationRequest, GuidanceDraft, GuidanceError, GuidancePolicy};

/// Always answers with the same canned draft
#[derive(Debug, Clone)]
pub struct StaticGuidancePolicy {
    draft: GuidanceDraft,
}

impl StaticGuidancePolicy {
    pub fn new(guidance: impl Into<String>, confidence: f64) -> Self {
        Self {
            draft: GuidanceDraft::new(guidance, confidence),
        }
    }

    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.draft = self.draft.with_recommendations(recommendations);
        self
    }
}

#[async_trait]
impl GuidancePolicy for StaticGuidancePolicy {
    async fn advise(&self, _request: &ConsultationRequest) -> Result<GuidanceDraft, GuidanceError> {
        Ok(self.draft.clone())
    }
}

/// Wraps a synchronous closure as a policy
///
/// Useful for tests and for callers that derive guidance from the request
/// context without any I/O.
pub struct FnGuidancePolicy<F>
where
    F: Fn(&ConsultationRequest) -> Result<GuidanceDraft, GuidanceError> + Send + Sync,
{
    advise: F,
}

impl<F> FnGuidancePolicy<F>
where
    F: Fn(&ConsultationRequest) -> Result<GuidanceDraft, GuidanceError> + Send + Sync,
{
    pub fn new(advise: F) -> Self {
        Self { advise }
    }
}

#[async_trait]
impl<F> GuidancePolicy for FnGuidancePolicy<F>
where
    F: Fn(&ConsultationRequest) -> Result<GuidanceDraft, GuidanceError> + Send + Sync,
{
    async fn advise(&self, request: &ConsultationRequest) -> Result<GuidanceDraft, GuidanceError> {
        (self.advise)(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_policy_returns_canned_draft() {
        let policy = StaticGuidancePolicy::new("Pin your dependencies.", 0.85)
            .with_recommendations(["use a lockfile"]);

        let request = ConsultationRequest::new("build", "dependency hygiene?");
        let draft = policy.advise(&request).await.unwrap();

        assert_eq!(draft.guidance, "Pin your dependencies.");
        assert_eq!(draft.confidence, 0.85);
        assert_eq!(draft.recommendations, vec!["use a lockfile"]);
    }

    #[tokio::test]
    async fn test_fn_policy_sees_the_request() {
        let policy = FnGuidancePolicy::new(|request: &ConsultationRequest| {
            Ok(GuidanceDraft::new(format!("Echo: {}", request.query), 0.5))
        });

        let request = ConsultationRequest::new("testing", "hello");
        let draft = policy.advise(&request).await.unwrap();
        assert_eq!(draft.guidance, "Echo: hello");
    }
}
