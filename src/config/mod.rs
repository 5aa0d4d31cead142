//! Configuration management for the Hola client
//!
//! This module handles loading and managing configuration settings
//! for the library and the command-line front end.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{ApiSettings, LoggingSettings, NetworkSettings, Settings};

// Serialises unit tests that touch process-wide environment variables
#[cfg(test)]
pub(crate) static ENV_TEST_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
