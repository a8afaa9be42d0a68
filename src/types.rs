//! Common types used throughout the tournament core

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TournamentError;

/// Unique identifier for players (persisted integer key)
pub type PlayerId = i64;

/// Unique identifier for tournaments (persisted integer key)
pub type TournamentId = i64;

/// External rating platform
///
/// The wire names (`chessCom`, `lichess`, `uscf`) are part of the storage
/// contract and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "chessCom")]
    ChessCom,
    #[serde(rename = "lichess")]
    Lichess,
    #[serde(rename = "uscf")]
    Uscf,
}

impl Platform {
    /// All platforms the system knows how to query
    pub const ALL: [Platform; 3] = [Platform::ChessCom, Platform::Lichess, Platform::Uscf];

    /// Stable wire/storage name for this platform
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::ChessCom => "chessCom",
            Platform::Lichess => "lichess",
            Platform::Uscf => "uscf",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chessCom" => Ok(Platform::ChessCom),
            "lichess" => Ok(Platform::Lichess),
            "uscf" => Ok(Platform::Uscf),
            other => Err(TournamentError::ConfigurationError {
                message: format!("Unknown rating platform: {}", other),
            }),
        }
    }
}

/// Pairing format understood by the external pairing engine
///
/// Stored verbatim in tournament records; the string forms below are a fixed
/// storage contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairingFormat {
    #[serde(rename = "single-elimination")]
    SingleElimination,
    #[serde(rename = "double-elimination")]
    DoubleElimination,
    #[serde(rename = "stepladder")]
    Stepladder,
    #[serde(rename = "swiss")]
    Swiss,
    #[serde(rename = "round-robin")]
    RoundRobin,
    #[serde(rename = "double-round-robin")]
    DoubleRoundRobin,
}

impl PairingFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingFormat::SingleElimination => "single-elimination",
            PairingFormat::DoubleElimination => "double-elimination",
            PairingFormat::Stepladder => "stepladder",
            PairingFormat::Swiss => "swiss",
            PairingFormat::RoundRobin => "round-robin",
            PairingFormat::DoubleRoundRobin => "double-round-robin",
        }
    }
}

impl std::fmt::Display for PairingFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PairingFormat {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-elimination" => Ok(PairingFormat::SingleElimination),
            "double-elimination" => Ok(PairingFormat::DoubleElimination),
            "stepladder" => Ok(PairingFormat::Stepladder),
            "swiss" => Ok(PairingFormat::Swiss),
            "round-robin" => Ok(PairingFormat::RoundRobin),
            "double-round-robin" => Ok(PairingFormat::DoubleRoundRobin),
            other => Err(TournamentError::ConfigurationError {
                message: format!("Unsupported pairing format: {}", other),
            }),
        }
    }
}

/// Tiebreak system applied by the external pairing engine
///
/// String forms are the engine's own identifiers and are stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TiebreakSystem {
    #[serde(rename = "median buchholz")]
    MedianBuchholz,
    #[serde(rename = "solkoff")]
    Solkoff,
    #[serde(rename = "sonneborn berger")]
    SonnebornBerger,
    #[serde(rename = "cumulative")]
    Cumulative,
    #[serde(rename = "versus")]
    Versus,
    #[serde(rename = "game win percentage")]
    GameWinPercentage,
    #[serde(rename = "opponent game win percentage")]
    OpponentGameWinPercentage,
    #[serde(rename = "opponent match win percentage")]
    OpponentMatchWinPercentage,
    #[serde(rename = "opponent opponent match win percentage")]
    OpponentOpponentMatchWinPercentage,
}

impl TiebreakSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            TiebreakSystem::MedianBuchholz => "median buchholz",
            TiebreakSystem::Solkoff => "solkoff",
            TiebreakSystem::SonnebornBerger => "sonneborn berger",
            TiebreakSystem::Cumulative => "cumulative",
            TiebreakSystem::Versus => "versus",
            TiebreakSystem::GameWinPercentage => "game win percentage",
            TiebreakSystem::OpponentGameWinPercentage => "opponent game win percentage",
            TiebreakSystem::OpponentMatchWinPercentage => "opponent match win percentage",
            TiebreakSystem::OpponentOpponentMatchWinPercentage => {
                "opponent opponent match win percentage"
            }
        }
    }
}

impl std::fmt::Display for TiebreakSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TiebreakSystem {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "median buchholz" => Ok(TiebreakSystem::MedianBuchholz),
            "solkoff" => Ok(TiebreakSystem::Solkoff),
            "sonneborn berger" => Ok(TiebreakSystem::SonnebornBerger),
            "cumulative" => Ok(TiebreakSystem::Cumulative),
            "versus" => Ok(TiebreakSystem::Versus),
            "game win percentage" => Ok(TiebreakSystem::GameWinPercentage),
            "opponent game win percentage" => Ok(TiebreakSystem::OpponentGameWinPercentage),
            "opponent match win percentage" => Ok(TiebreakSystem::OpponentMatchWinPercentage),
            "opponent opponent match win percentage" => {
                Ok(TiebreakSystem::OpponentOpponentMatchWinPercentage)
            }
            other => Err(TournamentError::ConfigurationError {
                message: format!("Unsupported tiebreak system: {}", other),
            }),
        }
    }
}

/// Per-platform account handles for a player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformHandles {
    pub chess_com: Option<String>,
    pub lichess: Option<String>,
    pub uscf: Option<String>,
}

impl PlatformHandles {
    /// Get the handle configured for a platform, if any
    pub fn get(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::ChessCom => self.chess_com.as_deref(),
            Platform::Lichess => self.lichess.as_deref(),
            Platform::Uscf => self.uscf.as_deref(),
        }
    }
}

/// Player record as seen through the persistence boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub handles: PlatformHandles,
    /// Normalized rating on the common scale, if ever computed or set by hand
    pub neutral_rating: Option<f64>,
}

impl Player {
    /// Shortcut to the handle for one platform
    pub fn handle_for(&self, platform: Platform) -> Option<&str> {
        self.handles.get(platform)
    }
}

/// Status of a tournament entry
///
/// Transitions happen in place (active -> withdrawn and back); entries are
/// never deleted so already-paired tournaments keep their history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "withdrawn")]
    Withdrawn,
}

/// One tournament entry joined with its player record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub player: Player,
    pub status: EntryStatus,
}

/// Point-in-time view of a persisted tournament and its entries
///
/// `format` and `tiebreak` carry the raw stored strings; they are parsed by
/// the session builder so that an out-of-range stored value surfaces as a
/// `ConfigurationError` at build time rather than being lost at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    pub id: TournamentId,
    pub name: String,
    pub format: String,
    pub round_count: u32,
    pub max_participants: u32,
    /// Participant value used when a player has no neutral rating
    pub default_rating: f64,
    pub tiebreak: String,
    pub entries: Vec<EntrySnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_wire_names_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_pairing_format_parses_stored_strings() {
        assert_eq!(
            "double-round-robin".parse::<PairingFormat>().unwrap(),
            PairingFormat::DoubleRoundRobin
        );
        assert_eq!(
            "swiss".parse::<PairingFormat>().unwrap(),
            PairingFormat::Swiss
        );
        assert!("freestyle".parse::<PairingFormat>().is_err());
    }

    #[test]
    fn test_tiebreak_parses_stored_strings() {
        assert_eq!(
            "sonneborn berger".parse::<TiebreakSystem>().unwrap(),
            TiebreakSystem::SonnebornBerger
        );
        assert_eq!(
            "opponent opponent match win percentage"
                .parse::<TiebreakSystem>()
                .unwrap(),
            TiebreakSystem::OpponentOpponentMatchWinPercentage
        );
        assert!("coin flip".parse::<TiebreakSystem>().is_err());
    }

    #[test]
    fn test_handles_lookup() {
        let handles = PlatformHandles {
            chess_com: Some("hikaru".to_string()),
            lichess: None,
            uscf: Some("12743305".to_string()),
        };
        assert_eq!(handles.get(Platform::ChessCom), Some("hikaru"));
        assert_eq!(handles.get(Platform::Lichess), None);
        assert_eq!(handles.get(Platform::Uscf), Some("12743305"));
    }

    #[test]
    fn test_platform_serde_uses_wire_names() {
        let json = serde_json::to_string(&Platform::ChessCom).unwrap();
        assert_eq!(json, "\"chessCom\"");
        let back: Platform = serde_json::from_str("\"uscf\"").unwrap();
        assert_eq!(back, Platform::Uscf);
    }
}
