//! # Subsystem Container
//!
//! Holds every subsystem instance, built once from [`SafetyConfig`] with the
//! adapters injected through their ports.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, SafetyConfig, DEFAULT_CONFIG_PATH};
pub use subsystems::SubsystemContainer;
