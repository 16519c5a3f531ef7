//! Consultation request value object

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Urgency of a consultation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

/// A request for guidance, immutable once constructed
///
/// # Example
///
/// ```
/// use consilium_domain::consultation::request::{ConsultationRequest, Priority};
///
/// let request = ConsultationRequest::new("security", "How should service tokens rotate?")
///     .with_requester("work-order-service")
///     .with_priority(Priority::High);
///
/// assert_eq!(request.domain, "security");
/// assert!(!request.request_id.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationRequest {
    /// Unique request id, generated when not supplied
    pub request_id: String,
    /// Primary domain the request is aimed at (e.g. "security")
    pub domain: String,
    /// Free-text query
    pub query: String,
    /// Arbitrary context passed through to the agent
    pub context: HashMap<String, Value>,
    /// Who is asking
    pub requester_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Request urgency
    pub priority: Priority,
}

impl ConsultationRequest {
    /// Create a request with a generated id, "system" requester and
    /// normal priority
    pub fn new(domain: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            domain: domain.into(),
            query: query.into(),
            context: HashMap::new(),
            requester_id: "system".to_string(),
            created_at: Utc::now(),
            priority: Priority::Normal,
        }
    }

    /// Override the generated request id
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Replace the context map
    pub fn with_context(mut self, context: HashMap<String, Value>) -> Self {
        self.context = context;
        self
    }

    /// Add a single context entry
    pub fn with_context_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_requester(mut self, requester_id: impl Into<String>) -> Self {
        self.requester_id = requester_id.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_generates_unique_ids() {
        let a = ConsultationRequest::new("security", "q");
        let b = ConsultationRequest::new("security", "q");
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_request_defaults() {
        let request = ConsultationRequest::new("testing", "how do I stub time?");
        assert_eq!(request.requester_id, "system");
        assert_eq!(request.priority, Priority::Normal);
        assert!(request.context.is_empty());
    }

    #[test]
    fn test_request_builders() {
        let request = ConsultationRequest::new("architecture", "bounded contexts?")
            .with_request_id("req-1")
            .with_context_value("service", "inventory")
            .with_requester("shop-manager")
            .with_priority(Priority::Critical);

        assert_eq!(request.request_id, "req-1");
        assert_eq!(request.context["service"], "inventory");
        assert_eq!(request.requester_id, "shop-manager");
        assert_eq!(request.priority, Priority::Critical);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
    }
}
