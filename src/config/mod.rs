//! Configuration management for the tournament core
//!
//! This module handles configuration loading from file and environment
//! variables, validation, and default values.

pub mod app;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, PairingSettings, RatingSettings, ServiceSettings};
