//! Cross-platform rating aggregation and normalization
//!
//! This module queries the external rating platforms, normalizes each raw
//! rating onto the common neutral scale, and combines the results into a
//! per-platform report.

pub mod aggregator;
pub mod clients;
pub mod normalizer;
pub mod service;
pub mod source;

// Re-export commonly used types
pub use aggregator::{RatingAggregator, RatingReport};
pub use normalizer::{ConversionTable, RatingNormalizer, CONTROL_CATEGORY};
pub use service::RatingService;
pub use source::RatingSource;
