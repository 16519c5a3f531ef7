//! Domain layer for consilium
//!
//! This crate contains the core business logic, entities, and value objects
//! of the consultation registry. It has no dependencies on infrastructure
//! or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Agent
//!
//! An agent is a domain expert: a primary domain tag, a capability set, a
//! performance profile, live metrics, and an asynchronous guidance
//! operation. What the agent actually says is supplied by an injected
//! [`GuidancePolicy`]; the entity only tracks load, latency, accuracy and
//! health around it.
//!
//! ## Consultation
//!
//! - **ConsultationRequest**: an immutable query aimed at a domain
//! - **GuidanceResponse**: one agent's structured answer
//! - **CollaborativeGuidanceResponse**: the merged answer of several agents,
//!   together with a consistency verdict over their recommendations

pub mod agent;
pub mod collaboration;
pub mod consultation;
pub mod core;
pub mod registry_health;

// Re-export commonly used types
pub use agent::{
    Agent, AgentError, GuidanceDraft, GuidanceError, GuidancePolicy,
    health::{AgentHealthStatus, HealthState},
    metrics::AgentMetrics,
    performance::PerformanceSpec,
    profile::AgentProfile,
};
pub use collaboration::{
    consistency::{CONSISTENCY_THRESHOLD, ConsistencyValidationResult, validate_consistency},
    response::{CollaborationStatus, CollaborativeGuidanceResponse},
};
pub use consultation::{
    request::{ConsultationRequest, Priority},
    response::{GuidanceResponse, ResponseStatus},
};
pub use crate::core::error::DomainError;
pub use registry_health::RegistryHealthStatus;
