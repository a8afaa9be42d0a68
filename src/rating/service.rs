//! Neutral-rating refresh flow
//!
//! Couples the aggregator to the player store: recompute a player's neutral
//! rating from the external platforms and persist the mean, skipping the
//! write entirely when no platform produced a rating.

use crate::error::{Result, TournamentError};
use crate::rating::aggregator::RatingAggregator;
use crate::store::PlayerStore;
use crate::types::PlayerId;
use std::sync::Arc;
use tracing::info;

/// Recomputes and persists neutral ratings
pub struct RatingService {
    aggregator: RatingAggregator,
    players: Arc<dyn PlayerStore>,
}

impl RatingService {
    pub fn new(aggregator: RatingAggregator, players: Arc<dyn PlayerStore>) -> Self {
        Self { aggregator, players }
    }

    /// Refresh a player's neutral rating from the external sources
    ///
    /// Returns the newly persisted mean, or `None` when aggregation came back
    /// empty — in which case the stored neutral rating is left untouched.
    pub async fn refresh_neutral_rating(&self, player_id: PlayerId) -> Result<Option<f64>> {
        let mut player = self
            .players
            .load_player(player_id)
            .await?
            .ok_or(TournamentError::PlayerNotFound { player_id })?;

        let report = self.aggregator.aggregate(&player).await?;

        let Some(mean) = report.mean() else {
            info!(
                "No ratings available for player {}, keeping stored neutral rating",
                player_id
            );
            return Ok(None);
        };

        player.neutral_rating = Some(mean);
        self.players.save_player(&player).await?;

        info!(
            "Updated neutral rating for player {} to {:.1} from {} platform(s)",
            player_id,
            mean,
            report.len()
        );
        Ok(Some(mean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::normalizer::{ConversionTable, RatingNormalizer, CONTROL_CATEGORY};
    use crate::rating::source::{MockOutcome, MockRatingSource};
    use crate::store::InMemoryStore;
    use crate::types::{Platform, Player, PlatformHandles};
    use std::collections::HashMap;

    fn identity_normalizer() -> Arc<RatingNormalizer> {
        let mut tables = HashMap::new();
        for platform in Platform::ALL {
            tables.insert(
                (platform, CONTROL_CATEGORY.to_string()),
                ConversionTable::new(&[(0.0, 0.0), (4000.0, 4000.0)]).unwrap(),
            );
        }
        Arc::new(RatingNormalizer::new(tables))
    }

    fn store_with_player(handles: PlatformHandles, neutral: Option<f64>) -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        store.upsert_player(Player {
            id: 1,
            name: "Test Player".to_string(),
            handles,
            neutral_rating: neutral,
        });
        store
    }

    #[tokio::test]
    async fn test_refresh_persists_mean_of_present_ratings() {
        let chess_com = Arc::new(MockRatingSource::new(Platform::ChessCom));
        chess_com.preset("cc", MockOutcome::Rating(1300.0));
        let lichess = Arc::new(MockRatingSource::new(Platform::Lichess));
        lichess.preset("li", MockOutcome::Rating(1500.0));

        let store = store_with_player(
            PlatformHandles {
                chess_com: Some("cc".to_string()),
                lichess: Some("li".to_string()),
                uscf: None,
            },
            None,
        );

        let service = RatingService::new(
            RatingAggregator::new(vec![chess_com, lichess], identity_normalizer()),
            store.clone(),
        );

        let result = service.refresh_neutral_rating(1).await.unwrap();
        assert_eq!(result, Some(1400.0));

        let player = store.load_player(1).await.unwrap().unwrap();
        assert_eq!(player.neutral_rating, Some(1400.0));
    }

    #[tokio::test]
    async fn test_refresh_skips_persistence_on_empty_aggregate() {
        let lichess = Arc::new(MockRatingSource::new(Platform::Lichess));
        lichess.preset("li", MockOutcome::Failure("down".to_string()));

        let store = store_with_player(
            PlatformHandles {
                chess_com: None,
                lichess: Some("li".to_string()),
                uscf: None,
            },
            Some(950.0),
        );

        let service = RatingService::new(
            RatingAggregator::new(vec![lichess], identity_normalizer()),
            store.clone(),
        );

        let result = service.refresh_neutral_rating(1).await.unwrap();
        assert_eq!(result, None);

        // Stored neutral rating must not be overwritten.
        let player = store.load_player(1).await.unwrap().unwrap();
        assert_eq!(player.neutral_rating, Some(950.0));
    }

    #[tokio::test]
    async fn test_refresh_unknown_player_fails() {
        let store = Arc::new(InMemoryStore::new());
        let service = RatingService::new(
            RatingAggregator::new(vec![], identity_normalizer()),
            store,
        );

        assert!(service.refresh_neutral_rating(99).await.is_err());
    }

    #[tokio::test]
    async fn test_single_platform_mean_equals_that_rating() {
        let chess_com = Arc::new(MockRatingSource::new(Platform::ChessCom));
        chess_com.preset("solo", MockOutcome::Rating(1500.0));

        let store = store_with_player(
            PlatformHandles {
                chess_com: Some("solo".to_string()),
                lichess: None,
                uscf: None,
            },
            None,
        );

        let service = RatingService::new(
            RatingAggregator::new(vec![chess_com], identity_normalizer()),
            store.clone(),
        );

        let result = service.refresh_neutral_rating(1).await.unwrap();
        assert_eq!(result, Some(1500.0));
    }
}
