//! Pairing session data model
//!
//! The engine-ready configuration derived from a persisted tournament
//! snapshot: participant list, stage definition, and scoring settings. A
//! session is immutable once built; entry changes only reach the pairing
//! engine through an explicit cache invalidation and rebuild.

use crate::types::{PairingFormat, TiebreakSystem, TournamentId};
use serde::{Deserialize, Serialize};

/// Ephemeral participant handed to the external pairing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingParticipant {
    /// External identity string (decimal player id)
    pub id: String,
    pub name: String,
    /// False for withdrawn entries; kept so already-played rounds stay valid
    pub active: bool,
    /// Seeding value: the player's neutral rating or the tournament default
    pub value: f64,
}

/// Pairing-format configuration block consumed by the external engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub format: PairingFormat,
    pub round_count: u32,
    pub max_participants: u32,
    pub consolation: bool,
    pub initial_round: u32,
}

/// Scoring point values and tiebreak chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    pub bye: f64,
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
    /// Ordered tiebreak criteria; currently always a single element
    pub tiebreaks: Vec<TiebreakSystem>,
}

impl ScoringSettings {
    /// Standard point values with the given tiebreak chain
    pub fn standard(tiebreaks: Vec<TiebreakSystem>) -> Self {
        Self {
            bye: 1.0,
            win: 1.0,
            draw: 0.5,
            loss: 0.0,
            tiebreaks,
        }
    }
}

/// Live pairing-engine configuration for one tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingSession {
    pub tournament_id: TournamentId,
    pub name: String,
    pub participants: Vec<PairingParticipant>,
    pub stage: StageDefinition,
    pub settings: ScoringSettings,
}

impl PairingSession {
    /// Participants still in contention
    pub fn active_participants(&self) -> impl Iterator<Item = &PairingParticipant> {
        self.participants.iter().filter(|p| p.active)
    }
}
