//! Infrastructure layer for consilium
//!
//! Everything here is replaceable plumbing: canned guidance policies and
//! the configuration file format that describes which agents to register.
//! The registry itself never depends on any of it.

pub mod config;
pub mod policies;

pub use config::{
    bootstrap::bootstrap,
    file_config::{AgentDefinition, GuidanceDefinition, PerformancePreset, RegistryConfig},
    loader::ConfigLoader,
};
pub use policies::{FnGuidancePolicy, StaticGuidancePolicy};
