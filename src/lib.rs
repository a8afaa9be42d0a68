//! Joust Core - Pairing and rating engine for chess tournament management
//!
//! This crate provides the tournament pairing-session manager and the
//! cross-platform rating normalization engine: live pairing-engine
//! configurations built and cached per tournament, and per-player ratings
//! aggregated concurrently from the external chess platforms onto a common
//! neutral scale.

pub mod config;
pub mod error;
pub mod pairing;
pub mod rating;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Result, TournamentError};
pub use types::*;

// Re-export key components
pub use pairing::{PairingSession, PairingSessionBuilder, PairingSessionCache};
pub use rating::{RatingAggregator, RatingNormalizer, RatingReport, RatingService, RatingSource};
pub use store::{PlayerStore, SnapshotProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
