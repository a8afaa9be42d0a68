//! Error types for the tournament core
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

use crate::types::{Platform, PlayerId, TournamentId};

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific tournament scenarios
///
/// An empty rating aggregate is deliberately not represented here: it is a
/// recognized outcome (`RatingReport::mean()` returning `None`), not a failure.
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("Rating source {platform} unavailable: {reason}")]
    SourceUnavailable { platform: Platform, reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Tournament not found: {tournament_id}")]
    TournamentNotFound { tournament_id: TournamentId },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: PlayerId },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}
