//! Test fixtures shared by the integration tests

use joust_core::store::{InMemoryStore, TournamentRecord};
use joust_core::types::{Platform, Player, PlatformHandles, PlayerId, TournamentId};
use std::collections::HashMap;
use std::sync::Arc;

use joust_core::rating::normalizer::{ConversionTable, RatingNormalizer, CONTROL_CATEGORY};

/// Normalizer whose tables are the identity over a wide domain, so test
/// arithmetic stays readable
pub fn identity_normalizer() -> Arc<RatingNormalizer> {
    let mut tables = HashMap::new();
    for platform in Platform::ALL {
        tables.insert(
            (platform, CONTROL_CATEGORY.to_string()),
            ConversionTable::new(&[(0.0, 0.0), (4000.0, 4000.0)]).unwrap(),
        );
    }
    Arc::new(RatingNormalizer::new(tables))
}

/// A player with the given handles and optional stored neutral rating
pub fn player(id: PlayerId, name: &str, handles: PlatformHandles, neutral: Option<f64>) -> Player {
    Player {
        id,
        name: name.to_string(),
        handles,
        neutral_rating: neutral,
    }
}

/// A swiss tournament record with the standard test defaults
pub fn swiss_tournament(id: TournamentId, name: &str) -> TournamentRecord {
    TournamentRecord {
        id,
        name: name.to_string(),
        format: "swiss".to_string(),
        round_count: 5,
        max_participants: 32,
        default_rating: 800.0,
        tiebreak: "median buchholz".to_string(),
    }
}

/// Store seeded with one tournament and the given players, all registered
pub fn seeded_store(
    tournament: TournamentRecord,
    players: Vec<Player>,
) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    let tournament_id = tournament.id;
    store.upsert_tournament(tournament);
    for p in players {
        let player_id = p.id;
        store.upsert_player(p);
        store.register_player(player_id, tournament_id).unwrap();
    }
    store
}
