//! Utility functions for the tournament core

use chrono::{DateTime, Utc};

use crate::types::PlayerId;

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Arithmetic mean of a slice, `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// External identity string handed to the pairing engine for a player
pub fn player_external_id(player_id: PlayerId) -> String {
    player_id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_values() {
        assert_eq!(mean(&[1200.0, 1400.0]), Some(1300.0));
        assert_eq!(mean(&[950.0]), Some(950.0));
    }

    #[test]
    fn test_mean_of_empty_slice() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_player_external_id() {
        assert_eq!(player_external_id(42), "42");
    }
}
