//! Consultation value objects
//!
//! A consultation is a single question aimed at a domain, answered by one
//! or more agents. Both sides of the exchange are immutable value objects.

pub mod request;
pub mod response;
