//! Application layer for consilium
//!
//! Holds the [`AgentRegistry`] (agent population, selection, failover and
//! aggregate health) and the [`CollaborationProtocol`] (parallel fan-out
//! across several agents with consistency validation and conflict
//! resolution). All state lives in one process; the registry owns every
//! agent handle and hands out snapshots.

pub mod collaboration;
pub mod error;
pub mod registry;
pub mod specialized;

pub use collaboration::CollaborationProtocol;
pub use error::RegistryError;
pub use registry::AgentRegistry;
pub use specialized::SpecializedDomain;
