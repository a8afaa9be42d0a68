//! Pairing session construction
//!
//! Maps a persisted tournament snapshot into a pairing-engine configuration:
//! entries become participants, stored format/tiebreak strings are parsed
//! against the supported enumerations, and the fixed stage and scoring
//! constants are filled in.

use crate::error::{Result, TournamentError};
use crate::pairing::session::{
    PairingParticipant, PairingSession, ScoringSettings, StageDefinition,
};
use crate::types::{EntryStatus, PairingFormat, TiebreakSystem, TournamentSnapshot};
use crate::utils::player_external_id;

/// Builds pairing sessions from tournament snapshots
///
/// Construction is deterministic: the same snapshot always yields an equal
/// session, with participants in entry order.
#[derive(Debug, Clone, Default)]
pub struct PairingSessionBuilder;

impl PairingSessionBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build an engine-ready session from a snapshot
    ///
    /// Fails with `ConfigurationError` if the stored format or tiebreak value
    /// falls outside the supported enumerations, or if the stage bounds are
    /// unusable; no partial session is produced.
    pub fn build(&self, snapshot: &TournamentSnapshot) -> Result<PairingSession> {
        let format: PairingFormat = snapshot.format.parse()?;
        let tiebreak: TiebreakSystem = snapshot.tiebreak.parse()?;

        if snapshot.round_count == 0 {
            return Err(TournamentError::ConfigurationError {
                message: format!(
                    "Tournament {} has no rounds configured",
                    snapshot.id
                ),
            }
            .into());
        }
        if snapshot.max_participants < 2 {
            return Err(TournamentError::ConfigurationError {
                message: format!(
                    "Tournament {} allows fewer than two participants",
                    snapshot.id
                ),
            }
            .into());
        }

        let participants = snapshot
            .entries
            .iter()
            .map(|entry| PairingParticipant {
                id: player_external_id(entry.player.id),
                name: entry.player.name.clone(),
                active: entry.status == EntryStatus::Active,
                value: entry
                    .player
                    .neutral_rating
                    .unwrap_or(snapshot.default_rating),
            })
            .collect();

        Ok(PairingSession {
            tournament_id: snapshot.id,
            name: snapshot.name.clone(),
            participants,
            stage: StageDefinition {
                format,
                round_count: snapshot.round_count,
                max_participants: snapshot.max_participants,
                consolation: false,
                initial_round: 1,
            },
            settings: ScoringSettings::standard(vec![tiebreak]),
        })
    }
}
