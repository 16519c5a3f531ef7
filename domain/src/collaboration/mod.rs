//! Multi-agent collaboration value objects
//!
//! Pure scoring lives here; the orchestration that gathers responses in
//! parallel is an application concern.

pub mod consistency;
pub mod response;
