//! Persistence boundary traits and in-memory implementations
//!
//! The web and database layers live outside this crate; the core consumes
//! them through the narrow interfaces defined here. The in-memory store backs
//! tests and the CLI without a database.

use crate::error::{Result, TournamentError};
use crate::types::{
    EntrySnapshot, EntryStatus, Player, PlayerId, TournamentId, TournamentSnapshot,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Supplies tournament snapshots to the pairing layer
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Load the current snapshot of a tournament, `None` if it does not exist
    async fn load_snapshot(&self, tournament_id: TournamentId)
        -> Result<Option<TournamentSnapshot>>;
}

/// Reads and writes player records
#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn load_player(&self, player_id: PlayerId) -> Result<Option<Player>>;

    async fn save_player(&self, player: &Player) -> Result<()>;
}

/// Tournament record without its entries
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentRecord {
    pub id: TournamentId,
    pub name: String,
    pub format: String,
    pub round_count: u32,
    pub max_participants: u32,
    pub default_rating: f64,
    pub tiebreak: String,
}

/// One persisted entry linking a player to a tournament
#[derive(Debug, Clone)]
struct EntryRecord {
    player_id: PlayerId,
    tournament_id: TournamentId,
    status: EntryStatus,
    registered_at: DateTime<Utc>,
}

/// In-memory store implementing both boundary traits
///
/// Entry status transitions happen in place: registering an already-withdrawn
/// player re-activates their entry, withdrawing flips it to withdrawn, and
/// entries are never deleted so already-paired tournaments keep their history.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    players: RwLock<HashMap<PlayerId, Player>>,
    tournaments: RwLock<HashMap<TournamentId, TournamentRecord>>,
    entries: RwLock<Vec<EntryRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error(what: &str) -> anyhow::Error {
        TournamentError::InternalError {
            message: format!("Failed to acquire {} lock", what),
        }
        .into()
    }

    /// Insert or replace a player record
    pub fn upsert_player(&self, player: Player) {
        if let Ok(mut players) = self.players.write() {
            players.insert(player.id, player);
        }
    }

    /// Insert or replace a tournament record
    pub fn upsert_tournament(&self, record: TournamentRecord) {
        if let Ok(mut tournaments) = self.tournaments.write() {
            tournaments.insert(record.id, record);
        }
    }

    /// Register a player for a tournament
    ///
    /// At most one entry exists per (player, tournament) pair; a withdrawn
    /// entry is re-activated in place rather than duplicated.
    pub fn register_player(
        &self,
        player_id: PlayerId,
        tournament_id: TournamentId,
    ) -> Result<()> {
        {
            let players = self
                .players
                .read()
                .map_err(|_| Self::lock_error("players"))?;
            if !players.contains_key(&player_id) {
                return Err(TournamentError::PlayerNotFound { player_id }.into());
            }
        }
        {
            let tournaments = self
                .tournaments
                .read()
                .map_err(|_| Self::lock_error("tournaments"))?;
            if !tournaments.contains_key(&tournament_id) {
                return Err(TournamentError::TournamentNotFound { tournament_id }.into());
            }
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| Self::lock_error("entries"))?;

        if let Some(entry) = entries
            .iter_mut()
            .find(|e| e.player_id == player_id && e.tournament_id == tournament_id)
        {
            entry.status = EntryStatus::Active;
        } else {
            entries.push(EntryRecord {
                player_id,
                tournament_id,
                status: EntryStatus::Active,
                registered_at: crate::utils::current_timestamp(),
            });
        }
        Ok(())
    }

    /// Withdraw a player's entry in place; returns true if an entry existed
    pub fn withdraw_player(
        &self,
        player_id: PlayerId,
        tournament_id: TournamentId,
    ) -> Result<bool> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Self::lock_error("entries"))?;

        if let Some(entry) = entries
            .iter_mut()
            .find(|e| e.player_id == player_id && e.tournament_id == tournament_id)
        {
            entry.status = EntryStatus::Withdrawn;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Entry count for a tournament (all statuses)
    pub fn entry_count(&self, tournament_id: TournamentId) -> usize {
        self.entries
            .read()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.tournament_id == tournament_id)
                    .count()
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl SnapshotProvider for InMemoryStore {
    async fn load_snapshot(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Option<TournamentSnapshot>> {
        let record = {
            let tournaments = self
                .tournaments
                .read()
                .map_err(|_| Self::lock_error("tournaments"))?;
            match tournaments.get(&tournament_id) {
                Some(record) => record.clone(),
                None => return Ok(None),
            }
        };

        let entry_records: Vec<EntryRecord> = {
            let entries = self
                .entries
                .read()
                .map_err(|_| Self::lock_error("entries"))?;
            let mut matching: Vec<EntryRecord> = entries
                .iter()
                .filter(|e| e.tournament_id == tournament_id)
                .cloned()
                .collect();
            matching.sort_by_key(|e| e.registered_at);
            matching
        };

        let players = self
            .players
            .read()
            .map_err(|_| Self::lock_error("players"))?;

        let mut entry_snapshots = Vec::with_capacity(entry_records.len());
        for entry in entry_records {
            let player = players.get(&entry.player_id).cloned().ok_or_else(|| {
                TournamentError::InternalError {
                    message: format!(
                        "Entry references missing player {} in tournament {}",
                        entry.player_id, tournament_id
                    ),
                }
            })?;
            entry_snapshots.push(EntrySnapshot {
                player,
                status: entry.status,
            });
        }

        Ok(Some(TournamentSnapshot {
            id: record.id,
            name: record.name,
            format: record.format,
            round_count: record.round_count,
            max_participants: record.max_participants,
            default_rating: record.default_rating,
            tiebreak: record.tiebreak,
            entries: entry_snapshots,
        }))
    }
}

#[async_trait]
impl PlayerStore for InMemoryStore {
    async fn load_player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| Self::lock_error("players"))?;
        Ok(players.get(&player_id).cloned())
    }

    async fn save_player(&self, player: &Player) -> Result<()> {
        let mut players = self
            .players
            .write()
            .map_err(|_| Self::lock_error("players"))?;
        players.insert(player.id, player.clone());
        Ok(())
    }
}

/// Mock snapshot provider for testing
///
/// Serves preset snapshots, counts load calls, and can delay responses to
/// exercise concurrent cache builds.
#[derive(Debug, Default)]
pub struct MockSnapshotProvider {
    snapshots: RwLock<HashMap<TournamentId, TournamentSnapshot>>,
    load_calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockSnapshotProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artificial delay before every response
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Preset the snapshot served for its tournament id
    pub fn preset(&self, snapshot: TournamentSnapshot) {
        if let Ok(mut snapshots) = self.snapshots.write() {
            snapshots.insert(snapshot.id, snapshot);
        }
    }

    /// Number of load calls made so far (for testing)
    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotProvider for MockSnapshotProvider {
    async fn load_snapshot(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Option<TournamentSnapshot>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self
            .snapshots
            .read()
            .ok()
            .and_then(|snapshots| snapshots.get(&tournament_id).cloned()))
    }
}
