//! Registry configuration: file format, loading and bootstrap

pub mod bootstrap;
pub mod file_config;
pub mod loader;
