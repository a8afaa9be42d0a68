//! Multi-platform rating aggregation
//!
//! Fan-out/fan-in orchestrator: fetches a player's raw rating from every
//! configured source concurrently, folds per-source failures and timeouts
//! into absence, and normalizes the survivors onto the common scale.

use crate::error::Result;
use crate::rating::normalizer::{RatingNormalizer, CONTROL_CATEGORY};
use crate::rating::source::RatingSource;
use crate::types::{Platform, Player};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-source fetch timeout; the sources are untrusted and
/// latency-unbounded
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Normalized per-platform ratings for one player
///
/// A platform absent from the map means "no profile configured or no rating
/// obtainable", never "rating of zero".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingReport {
    ratings: BTreeMap<Platform, f64>,
}

impl RatingReport {
    pub fn insert(&mut self, platform: Platform, rating: f64) {
        self.ratings.insert(platform, rating);
    }

    pub fn get(&self, platform: Platform) -> Option<f64> {
        self.ratings.get(&platform).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// True when no platform produced a rating (the empty-aggregate outcome)
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, f64)> + '_ {
        self.ratings.iter().map(|(&platform, &rating)| (platform, rating))
    }

    /// Arithmetic mean of the present values; `None` when the report is empty
    ///
    /// Callers must treat `None` as "no ratings available" and leave any
    /// stored neutral rating untouched.
    pub fn mean(&self) -> Option<f64> {
        let values: Vec<f64> = self.ratings.values().copied().collect();
        crate::utils::mean(&values)
    }
}

/// Aggregates ratings from all configured sources for one player
pub struct RatingAggregator {
    sources: Vec<Arc<dyn RatingSource>>,
    normalizer: Arc<RatingNormalizer>,
    fetch_timeout: Duration,
}

impl RatingAggregator {
    /// Create an aggregator with the default fetch timeout
    pub fn new(sources: Vec<Arc<dyn RatingSource>>, normalizer: Arc<RatingNormalizer>) -> Self {
        Self::with_timeout(sources, normalizer, DEFAULT_FETCH_TIMEOUT)
    }

    /// Create an aggregator with an explicit per-source fetch timeout
    pub fn with_timeout(
        sources: Vec<Arc<dyn RatingSource>>,
        normalizer: Arc<RatingNormalizer>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            sources,
            normalizer,
            fetch_timeout,
        }
    }

    /// Aggregate normalized ratings for a player across all configured sources
    ///
    /// Platforms without a configured handle are skipped. All remaining
    /// fetches run concurrently; each one is failure-isolated, so a single
    /// slow or broken source only costs its own entry in the report.
    pub async fn aggregate(&self, player: &Player) -> Result<RatingReport> {
        let mut fetches = Vec::new();

        for source in &self.sources {
            let platform = source.platform();
            let Some(handle) = player.handle_for(platform) else {
                debug!("No {} handle for player {}, skipping", platform, player.id);
                continue;
            };

            let source = Arc::clone(source);
            let handle = handle.to_string();
            let timeout = self.fetch_timeout;

            fetches.push(async move {
                let raw = match tokio::time::timeout(timeout, source.fetch_rating(&handle)).await {
                    Ok(Ok(Some(rating))) => Some(rating),
                    Ok(Ok(None)) => {
                        debug!("No {} rating found for handle '{}'", platform, handle);
                        None
                    }
                    Ok(Err(e)) => {
                        warn!("Rating fetch from {} failed: {:#}", platform, e);
                        None
                    }
                    Err(_) => {
                        warn!(
                            "Rating fetch from {} timed out after {:?}",
                            platform, timeout
                        );
                        None
                    }
                };
                (platform, raw)
            });
        }

        let outcomes = futures::future::join_all(fetches).await;

        let mut report = RatingReport::default();
        for (platform, raw) in outcomes {
            if let Some(raw) = raw {
                let normalized = self.normalizer.normalize(raw, platform, CONTROL_CATEGORY)?;
                report.insert(platform, normalized);
            }
        }

        debug!(
            "Aggregated {} rating(s) for player {} (mean: {:?})",
            report.len(),
            player.id,
            report.mean()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::source::{MockOutcome, MockRatingSource};
    use crate::types::PlatformHandles;

    fn player_with_handles(handles: PlatformHandles) -> Player {
        Player {
            id: 7,
            name: "Test Player".to_string(),
            handles,
            neutral_rating: None,
        }
    }

    fn identity_normalizer() -> Arc<RatingNormalizer> {
        // Identity tables over a wide domain keep the arithmetic visible.
        let mut tables = std::collections::HashMap::new();
        for platform in Platform::ALL {
            tables.insert(
                (platform, CONTROL_CATEGORY.to_string()),
                crate::rating::normalizer::ConversionTable::new(&[
                    (0.0, 0.0),
                    (4000.0, 4000.0),
                ])
                .unwrap(),
            );
        }
        Arc::new(RatingNormalizer::new(tables))
    }

    #[tokio::test]
    async fn test_aggregate_skips_platforms_without_handles() {
        let chess_com = Arc::new(MockRatingSource::new(Platform::ChessCom));
        chess_com.preset("gm_handle", MockOutcome::Rating(1500.0));
        let lichess = Arc::new(MockRatingSource::new(Platform::Lichess));

        let aggregator = RatingAggregator::new(
            vec![chess_com.clone(), lichess.clone()],
            identity_normalizer(),
        );

        let player = player_with_handles(PlatformHandles {
            chess_com: Some("gm_handle".to_string()),
            lichess: None,
            uscf: None,
        });

        let report = aggregator.aggregate(&player).await.unwrap();
        assert_eq!(report.get(Platform::ChessCom), Some(1500.0));
        // Never present with value 0 for unconfigured platforms.
        assert_eq!(report.get(Platform::Lichess), None);
        assert_eq!(report.len(), 1);
        assert_eq!(report.mean(), Some(1500.0));

        // The lichess source must not have been called at all.
        assert!(lichess.fetch_calls().is_empty());
    }

    #[tokio::test]
    async fn test_aggregate_isolates_source_failures() {
        let chess_com = Arc::new(MockRatingSource::new(Platform::ChessCom));
        chess_com.preset("x", MockOutcome::Rating(1400.0));
        let lichess = Arc::new(MockRatingSource::new(Platform::Lichess));
        lichess.preset("x", MockOutcome::Failure("503".to_string()));
        let uscf = Arc::new(MockRatingSource::new(Platform::Uscf));
        uscf.preset("x", MockOutcome::NotFound);

        let aggregator =
            RatingAggregator::new(vec![chess_com, lichess, uscf], identity_normalizer());

        let player = player_with_handles(PlatformHandles {
            chess_com: Some("x".to_string()),
            lichess: Some("x".to_string()),
            uscf: Some("x".to_string()),
        });

        let report = aggregator.aggregate(&player).await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.get(Platform::ChessCom), Some(1400.0));
        assert_eq!(report.mean(), Some(1400.0));
    }

    #[tokio::test]
    async fn test_aggregate_report_independent_of_completion_order() {
        // The slow source answers last but the report content only depends
        // on which platforms succeeded.
        let slow = Arc::new(
            MockRatingSource::new(Platform::ChessCom)
                .with_delay(Duration::from_millis(50)),
        );
        slow.preset("p", MockOutcome::Rating(1200.0));
        let fast = Arc::new(MockRatingSource::new(Platform::Lichess));
        fast.preset("p", MockOutcome::Rating(1600.0));

        let player = player_with_handles(PlatformHandles {
            chess_com: Some("p".to_string()),
            lichess: Some("p".to_string()),
            uscf: None,
        });

        let slow_first = RatingAggregator::new(
            vec![slow.clone(), fast.clone()],
            identity_normalizer(),
        )
        .aggregate(&player)
        .await
        .unwrap();
        let fast_first = RatingAggregator::new(vec![fast, slow], identity_normalizer())
            .aggregate(&player)
            .await
            .unwrap();

        assert_eq!(slow_first, fast_first);
        assert_eq!(slow_first.mean(), Some(1400.0));
    }

    #[tokio::test]
    async fn test_aggregate_times_out_hung_source() {
        let hung = Arc::new(
            MockRatingSource::new(Platform::Lichess).with_delay(Duration::from_secs(30)),
        );
        hung.preset("p", MockOutcome::Rating(2000.0));
        let healthy = Arc::new(MockRatingSource::new(Platform::ChessCom));
        healthy.preset("p", MockOutcome::Rating(1000.0));

        let aggregator = RatingAggregator::with_timeout(
            vec![hung, healthy],
            identity_normalizer(),
            Duration::from_millis(20),
        );

        let player = player_with_handles(PlatformHandles {
            chess_com: Some("p".to_string()),
            lichess: Some("p".to_string()),
            uscf: None,
        });

        let report = aggregator.aggregate(&player).await.unwrap();
        // Timeout is indistinguishable from source failure: absent.
        assert_eq!(report.get(Platform::Lichess), None);
        assert_eq!(report.get(Platform::ChessCom), Some(1000.0));
    }

    #[tokio::test]
    async fn test_aggregate_empty_report_when_nothing_succeeds() {
        let lichess = Arc::new(MockRatingSource::new(Platform::Lichess));
        lichess.preset("p", MockOutcome::Failure("down".to_string()));

        let aggregator = RatingAggregator::new(vec![lichess], identity_normalizer());
        let player = player_with_handles(PlatformHandles {
            chess_com: None,
            lichess: Some("p".to_string()),
            uscf: None,
        });

        let report = aggregator.aggregate(&player).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.mean(), None);
    }

    #[tokio::test]
    async fn test_aggregate_normalizes_raw_ratings() {
        let mut tables = std::collections::HashMap::new();
        tables.insert(
            (Platform::ChessCom, CONTROL_CATEGORY.to_string()),
            crate::rating::normalizer::ConversionTable::new(&[
                (1000.0, 1000.0),
                (1500.0, 1400.0),
                (2000.0, 1800.0),
            ])
            .unwrap(),
        );
        let normalizer = Arc::new(RatingNormalizer::new(tables));

        let chess_com = Arc::new(MockRatingSource::new(Platform::ChessCom));
        chess_com.preset("p", MockOutcome::Rating(1250.0));

        let aggregator = RatingAggregator::new(vec![chess_com], normalizer);
        let player = player_with_handles(PlatformHandles {
            chess_com: Some("p".to_string()),
            lichess: None,
            uscf: None,
        });

        let report = aggregator.aggregate(&player).await.unwrap();
        assert_eq!(report.get(Platform::ChessCom), Some(1200.0));
        assert_eq!(report.mean(), Some(1200.0));
    }
}
