//! Pairing session management
//!
//! This module turns persisted tournament records into live pairing-engine
//! configurations and caches one session per tournament identity.

pub mod builder;
pub mod cache;
pub mod session;

// Re-export commonly used types
pub use builder::PairingSessionBuilder;
pub use cache::PairingSessionCache;
pub use session::{PairingParticipant, PairingSession, ScoringSettings, StageDefinition};
