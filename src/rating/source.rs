//! Rating source interface and test implementations
//!
//! This module defines the interface shared by the external rating platforms:
//! fetch one player's raw rating by account handle.

use crate::error::Result;
use crate::types::Platform;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// Trait for fetching a raw rating from one external platform
///
/// `Ok(None)` means the handle was not found or has no rating in the control
/// category; `Err` means the source failed (network, malformed response).
/// The aggregator treats both as "absent" and never distinguishes causes.
#[async_trait]
pub trait RatingSource: Send + Sync {
    /// Which platform this source queries
    fn platform(&self) -> Platform;

    /// Fetch the raw rating for an account handle
    async fn fetch_rating(&self, handle: &str) -> Result<Option<f64>>;
}

/// Preset outcome for one handle on a mock source
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Rating(f64),
    NotFound,
    Failure(String),
}

/// Mock rating source for testing
///
/// Supports preset per-handle outcomes, an artificial response delay for
/// completion-order and timeout tests, and call recording.
#[derive(Debug)]
pub struct MockRatingSource {
    platform: Platform,
    outcomes: RwLock<HashMap<String, MockOutcome>>,
    delay: Option<Duration>,
    fetch_calls: RwLock<Vec<String>>,
}

impl MockRatingSource {
    /// Create a mock source for a platform with no preset outcomes
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            outcomes: RwLock::new(HashMap::new()),
            delay: None,
            fetch_calls: RwLock::new(Vec::new()),
        }
    }

    /// Add an artificial delay before every response
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Preset the outcome for a handle
    pub fn preset(&self, handle: &str, outcome: MockOutcome) {
        if let Ok(mut outcomes) = self.outcomes.write() {
            outcomes.insert(handle.to_string(), outcome);
        }
    }

    /// Get all handles fetched so far (for testing)
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RatingSource for MockRatingSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch_rating(&self, handle: &str) -> Result<Option<f64>> {
        if let Ok(mut calls) = self.fetch_calls.write() {
            calls.push(handle.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .outcomes
            .read()
            .ok()
            .and_then(|outcomes| outcomes.get(handle).cloned());

        match outcome {
            Some(MockOutcome::Rating(rating)) => Ok(Some(rating)),
            Some(MockOutcome::NotFound) | None => Ok(None),
            Some(MockOutcome::Failure(reason)) => {
                Err(crate::error::TournamentError::SourceUnavailable {
                    platform: self.platform,
                    reason,
                }
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source_preset_outcomes() {
        let source = MockRatingSource::new(Platform::Lichess);
        source.preset("magnus", MockOutcome::Rating(2850.0));
        source.preset("ghost", MockOutcome::NotFound);
        source.preset("flaky", MockOutcome::Failure("connection reset".to_string()));

        assert_eq!(source.fetch_rating("magnus").await.unwrap(), Some(2850.0));
        assert_eq!(source.fetch_rating("ghost").await.unwrap(), None);
        assert!(source.fetch_rating("flaky").await.is_err());

        // Unknown handles behave as not found
        assert_eq!(source.fetch_rating("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_source_records_calls() {
        let source = MockRatingSource::new(Platform::ChessCom);
        source.fetch_rating("a").await.unwrap();
        source.fetch_rating("b").await.unwrap();

        assert_eq!(source.fetch_calls(), vec!["a".to_string(), "b".to_string()]);
    }
}
