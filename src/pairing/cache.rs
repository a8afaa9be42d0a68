//! Pairing session cache
//!
//! One live session per tournament identity, built lazily on first request
//! from the injected snapshot provider. A per-key cell gives single-flight
//! semantics: under concurrent first requests exactly one build executes and
//! every caller observes the same session. Sessions are never rebuilt
//! implicitly; callers who change entries must invalidate first.

use crate::error::{Result, TournamentError};
use crate::pairing::builder::PairingSessionBuilder;
use crate::pairing::session::PairingSession;
use crate::store::SnapshotProvider;
use crate::types::TournamentId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::OnceCell;
use tracing::{debug, info};

type SessionCell = Arc<OnceCell<Arc<PairingSession>>>;

/// Memoizes one pairing session per tournament identity
pub struct PairingSessionCache {
    sessions: RwLock<HashMap<TournamentId, SessionCell>>,
    provider: Arc<dyn SnapshotProvider>,
    builder: PairingSessionBuilder,
}

impl PairingSessionCache {
    pub fn new(provider: Arc<dyn SnapshotProvider>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            provider,
            builder: PairingSessionBuilder::new(),
        }
    }

    fn cell_for(&self, tournament_id: TournamentId) -> Result<SessionCell> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| TournamentError::InternalError {
                message: "Failed to acquire session cache write lock".to_string(),
            })?;
        Ok(Arc::clone(
            sessions
                .entry(tournament_id)
                .or_insert_with(|| Arc::new(OnceCell::new())),
        ))
    }

    /// Get the cached session for a tournament, building it on first access
    ///
    /// A failed build (missing tournament, invalid stored configuration)
    /// leaves the identity absent from the cache so a later request retries
    /// from a fresh snapshot.
    pub async fn get_or_create(&self, tournament_id: TournamentId) -> Result<Arc<PairingSession>> {
        // The map guard is dropped before any await; only the per-key cell
        // is held across the build.
        let cell = self.cell_for(tournament_id)?;

        let outcome = cell
            .get_or_try_init(|| async {
                debug!("Building pairing session for tournament {}", tournament_id);
                let snapshot = self
                    .provider
                    .load_snapshot(tournament_id)
                    .await?
                    .ok_or(TournamentError::TournamentNotFound { tournament_id })?;
                let session = self.builder.build(&snapshot)?;
                info!(
                    "Pairing session ready for tournament {} ({} participants)",
                    tournament_id,
                    session.participants.len()
                );
                Ok::<_, anyhow::Error>(Arc::new(session))
            })
            .await;

        match outcome {
            Ok(session) => Ok(Arc::clone(session)),
            Err(e) => {
                self.drop_if_empty(tournament_id);
                Err(e)
            }
        }
    }

    /// Remove an identity whose cell never initialized, so the failed build
    /// leaves no trace in the map
    fn drop_if_empty(&self, tournament_id: TournamentId) {
        if let Ok(mut sessions) = self.sessions.write() {
            if let Some(cell) = sessions.get(&tournament_id) {
                if !cell.initialized() {
                    sessions.remove(&tournament_id);
                }
            }
        }
    }

    /// Whether a built session is cached for this tournament
    pub fn contains(&self, tournament_id: TournamentId) -> bool {
        self.sessions
            .read()
            .map(|sessions| {
                sessions
                    .get(&tournament_id)
                    .map(|cell| cell.initialized())
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    /// Evict the session for one tournament; returns true if one was cached
    pub fn invalidate(&self, tournament_id: TournamentId) -> bool {
        let removed = self
            .sessions
            .write()
            .ok()
            .and_then(|mut sessions| sessions.remove(&tournament_id))
            .map(|cell| cell.initialized())
            .unwrap_or(false);
        if removed {
            info!("Invalidated pairing session for tournament {}", tournament_id);
        }
        removed
    }

    /// Evict every cached session
    pub fn clear(&self) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.clear();
        }
    }

    /// Number of built sessions currently cached
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .map(|sessions| {
                sessions
                    .values()
                    .filter(|cell| cell.initialized())
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
