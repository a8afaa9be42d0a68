//! Main application configuration
//!
//! This module defines the primary configuration structures for the tournament
//! core, including file loading, environment variable overlay, and validation.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingSettings,
    pub pairing: PairingSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// External rating platform settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    /// Chess.com published-data API base URL
    pub chess_com_api_url: String,
    /// Lichess API base URL
    pub lichess_api_url: String,
    /// USCF member-search base URL
    pub uscf_api_url: String,
    /// Optional Lichess personal access token
    pub lichess_token: Option<String>,
    /// Per-source fetch timeout in seconds
    pub fetch_timeout_seconds: u64,
    /// Optional path to a JSON conversion-table file; built-in tables are
    /// used when absent
    pub conversion_table_path: Option<PathBuf>,
}

/// Pairing and tournament defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingSettings {
    /// Default rating assigned to new tournaments as their fallback value
    pub default_rating: f64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "joust-core".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            chess_com_api_url: "https://api.chess.com".to_string(),
            lichess_api_url: "https://lichess.org".to_string(),
            uscf_api_url: "https://new.uschess.org".to_string(),
            lichess_token: None,
            fetch_timeout_seconds: 10,
            conversion_table_path: None,
        }
    }
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            default_rating: 800.0,
        }
    }
}

impl RatingSettings {
    /// Get the per-source fetch timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then overlay environment variables
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let mut config: Self = toml::from_str(&raw)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        if let Ok(url) = env::var("CHESS_COM_API_URL") {
            self.rating.chess_com_api_url = url;
        }
        if let Ok(url) = env::var("LICHESS_API_URL") {
            self.rating.lichess_api_url = url;
        }
        if let Ok(url) = env::var("USCF_API_URL") {
            self.rating.uscf_api_url = url;
        }
        if let Ok(token) = env::var("LICHESS_TOKEN") {
            self.rating.lichess_token = Some(token);
        }
        if let Ok(timeout) = env::var("RATING_FETCH_TIMEOUT_SECONDS") {
            self.rating.fetch_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_FETCH_TIMEOUT_SECONDS value: {}", timeout))?;
        }
        if let Ok(path) = env::var("CONVERSION_TABLE_PATH") {
            self.rating.conversion_table_path = Some(PathBuf::from(path));
        }

        if let Ok(rating) = env::var("DEFAULT_RATING") {
            self.pairing.default_rating = rating
                .parse()
                .map_err(|_| anyhow!("Invalid DEFAULT_RATING value: {}", rating))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.rating.fetch_timeout_seconds == 0 {
        return Err(anyhow!("Rating fetch timeout must be greater than 0"));
    }

    for (name, url) in [
        ("chess.com", &config.rating.chess_com_api_url),
        ("lichess", &config.rating.lichess_api_url),
        ("uscf", &config.rating.uscf_api_url),
    ] {
        if url.is_empty() {
            return Err(anyhow!("{} API URL cannot be empty", name));
        }
    }

    if config.pairing.default_rating <= 0.0 {
        return Err(anyhow!("Default rating must be positive"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.rating.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.pairing.default_rating, 800.0);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = AppConfig::default();
        config.service.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.rating.fetch_timeout_seconds = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_api_url_rejected() {
        let mut config = AppConfig::default();
        config.rating.lichess_api_url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_nonpositive_default_rating_rejected() {
        let mut config = AppConfig::default();
        config.pairing.default_rating = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_toml_parsing_with_partial_sections() {
        let raw = r#"
            [service]
            log_level = "debug"

            [rating]
            fetch_timeout_seconds = 5
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.service.log_level, "debug");
        assert_eq!(config.rating.fetch_timeout_seconds, 5);
        // Untouched sections keep their defaults.
        assert_eq!(config.pairing.default_rating, 800.0);
        assert_eq!(config.rating.lichess_api_url, "https://lichess.org");
    }
}
