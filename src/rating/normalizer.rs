//! Cross-platform rating normalization
//!
//! This module converts raw platform ratings onto the common neutral scale via
//! piecewise-linear interpolation against fixed breakpoint tables, one table
//! per (platform, category) pair.

use crate::error::{Result, TournamentError};
use crate::types::Platform;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Rating category used for all tournament-agnostic rating controls
pub const CONTROL_CATEGORY: &str = "rapid";

/// One (source, target) pair in a conversion table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub source: f64,
    pub target: f64,
}

/// Ordered breakpoint list defining a piecewise-linear mapping onto the
/// common scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionTable {
    breakpoints: Vec<Breakpoint>,
}

impl ConversionTable {
    /// Build a table from `[source, target]` pairs, validating ordering
    pub fn new(pairs: &[(f64, f64)]) -> Result<Self> {
        if pairs.is_empty() {
            return Err(TournamentError::ConfigurationError {
                message: "Conversion table must have at least one breakpoint".to_string(),
            }
            .into());
        }

        for window in pairs.windows(2) {
            if window[1].0 <= window[0].0 {
                return Err(TournamentError::ConfigurationError {
                    message: format!(
                        "Conversion table breakpoints must be strictly ascending by source \
                         rating ({} followed by {})",
                        window[0].0, window[1].0
                    ),
                }
                .into());
            }
        }

        Ok(Self {
            breakpoints: pairs
                .iter()
                .map(|&(source, target)| Breakpoint { source, target })
                .collect(),
        })
    }

    /// Convert a raw platform rating onto the target scale
    ///
    /// Finds the first adjacent pair whose upper breakpoint covers `raw` and
    /// interpolates linearly between them. Ratings above the last breakpoint
    /// clamp to the last target; ratings below the first breakpoint
    /// extrapolate along the first pair's slope (the fraction goes negative).
    pub fn convert(&self, raw: f64) -> f64 {
        for window in self.breakpoints.windows(2) {
            let (current, next) = (window[0], window[1]);
            if next.source >= raw {
                let fraction = (raw - current.source) / (next.source - current.source);
                return current.target + fraction * (next.target - current.target);
            }
        }
        // Above every breakpoint (or a single-breakpoint table): clamp high.
        self.breakpoints[self.breakpoints.len() - 1].target
    }
}

/// External table file format: platform name -> category -> ordered
/// `[source, target]` pairs
type TableFile = HashMap<String, HashMap<String, Vec<[f64; 2]>>>;

/// Converts raw platform ratings into the common neutral scale
///
/// Tables are immutable reference data loaded once at startup.
#[derive(Debug, Clone)]
pub struct RatingNormalizer {
    tables: HashMap<(Platform, String), ConversionTable>,
}

impl RatingNormalizer {
    /// Build a normalizer from explicit tables
    pub fn new(tables: HashMap<(Platform, String), ConversionTable>) -> Self {
        Self { tables }
    }

    /// Built-in `rapid` tables anchored on the USCF scale
    ///
    /// The USCF table is the identity over its domain; the chess.com and
    /// lichess tables map those sites' rapid pools onto it.
    pub fn with_builtin_tables() -> Self {
        let mut tables = HashMap::new();

        tables.insert(
            (Platform::ChessCom, CONTROL_CATEGORY.to_string()),
            ConversionTable::new(&[
                (400.0, 500.0),
                (800.0, 850.0),
                (1200.0, 1250.0),
                (1600.0, 1650.0),
                (2000.0, 2050.0),
                (2400.0, 2400.0),
            ])
            .expect("builtin chess.com table is valid"),
        );

        tables.insert(
            (Platform::Lichess, CONTROL_CATEGORY.to_string()),
            ConversionTable::new(&[
                (800.0, 400.0),
                (1200.0, 850.0),
                (1600.0, 1300.0),
                (2000.0, 1750.0),
                (2400.0, 2200.0),
                (2800.0, 2500.0),
            ])
            .expect("builtin lichess table is valid"),
        );

        tables.insert(
            (Platform::Uscf, CONTROL_CATEGORY.to_string()),
            ConversionTable::new(&[(100.0, 100.0), (3000.0, 3000.0)])
                .expect("builtin uscf table is valid"),
        );

        Self { tables }
    }

    /// Load tables from a JSON file of the external reference-data format
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TournamentError::ConfigurationError {
                message: format!("Failed to read conversion tables from {}: {}", path.display(), e),
            }
        })?;
        Self::from_json(&raw)
    }

    /// Parse tables from JSON reference data
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: TableFile =
            serde_json::from_str(raw).map_err(|e| TournamentError::ConfigurationError {
                message: format!("Malformed conversion table data: {}", e),
            })?;

        let mut tables = HashMap::new();
        for (platform_name, categories) in file {
            let platform: Platform = platform_name.parse()?;
            for (category, pairs) in categories {
                let pairs: Vec<(f64, f64)> = pairs.iter().map(|p| (p[0], p[1])).collect();
                tables.insert((platform, category), ConversionTable::new(&pairs)?);
            }
        }

        Ok(Self { tables })
    }

    /// Normalize a raw platform rating onto the common scale
    pub fn normalize(&self, raw: f64, platform: Platform, category: &str) -> Result<f64> {
        let table = self
            .tables
            .get(&(platform, category.to_string()))
            .ok_or_else(|| TournamentError::ConfigurationError {
                message: format!(
                    "No conversion table configured for {} / {}",
                    platform, category
                ),
            })?;
        Ok(table.convert(raw))
    }
}

impl Default for RatingNormalizer {
    fn default() -> Self {
        Self::with_builtin_tables()
    }
}
