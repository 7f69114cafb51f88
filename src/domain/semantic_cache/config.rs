//! Semantic cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_MAX_ENTRIES: usize = 1000;
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.95;
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the two-layer embedding cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Maximum number of entries held by each index
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Minimum cosine similarity for a semantic hit, in (0, 1]
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Time-to-live for cached entries in milliseconds
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,

    /// Upper bound on a single embedding provider call
    #[serde(default)]
    pub embed_timeout_ms: Option<u64>,

    /// Interval for the optional background expiry sweep
    #[serde(default)]
    pub cleanup_interval_secs: Option<u64>,
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_similarity_threshold() -> f32 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_ttl_ms() -> u64 {
    DEFAULT_TTL.as_millis() as u64
}

// Rounds a nonzero duration up to at least one unit so it never reads as unset
fn whole_units(value: u128, nonzero: bool) -> u64 {
    let units = u64::try_from(value).unwrap_or(u64::MAX);

    if nonzero { units.max(1) } else { units }
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            similarity_threshold: default_similarity_threshold(),
            ttl_ms: default_ttl_ms(),
            embed_timeout_ms: None,
            cleanup_interval_secs: None,
        }
    }
}

impl SemanticCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Get the provider call timeout, if any
    pub fn embed_timeout(&self) -> Option<Duration> {
        self.embed_timeout_ms.map(Duration::from_millis)
    }

    /// Get the background sweep interval, if any
    pub fn cleanup_interval(&self) -> Option<Duration> {
        self.cleanup_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Set the maximum number of entries
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = whole_units(ttl.as_millis(), !ttl.is_zero());
        self
    }

    /// Set the provider call timeout
    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout_ms = Some(whole_units(timeout.as_millis(), !timeout.is_zero()));
        self
    }

    /// Set the background sweep interval
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval_secs = Some(whole_units(
            u128::from(interval.as_secs()),
            !interval.is_zero(),
        ));
        self
    }

    /// Replace out-of-range values with their defaults
    ///
    /// A cache may always behave smaller or shorter-lived than requested, so
    /// bad values are coerced instead of rejected.
    pub fn normalized(mut self) -> Self {
        if self.max_entries == 0 {
            warn!(
                "max_entries must be positive, using default {}",
                DEFAULT_MAX_ENTRIES
            );
            self.max_entries = DEFAULT_MAX_ENTRIES;
        }

        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            warn!(
                "similarity_threshold {} outside (0, 1], using default {}",
                self.similarity_threshold, DEFAULT_SIMILARITY_THRESHOLD
            );
            self.similarity_threshold = DEFAULT_SIMILARITY_THRESHOLD;
        }

        if self.ttl_ms == 0 {
            warn!("ttl must be positive, using default {:?}", DEFAULT_TTL);
            self.ttl_ms = default_ttl_ms();
        }

        if self.embed_timeout_ms == Some(0) {
            self.embed_timeout_ms = None;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SemanticCacheConfig::default();

        assert_eq!(config.max_entries, 1000);
        assert!((config.similarity_threshold - 0.95).abs() < f32::EPSILON);
        assert_eq!(config.ttl(), Duration::from_secs(86_400));
        assert_eq!(config.embed_timeout(), None);
        assert_eq!(config.cleanup_interval(), None);
    }

    #[test]
    fn test_config_builder() {
        let config = SemanticCacheConfig::new()
            .with_max_entries(50)
            .with_similarity_threshold(0.9)
            .with_ttl(Duration::from_millis(1500))
            .with_embed_timeout(Duration::from_millis(200))
            .with_cleanup_interval(Duration::from_secs(30));

        assert_eq!(config.max_entries, 50);
        assert!((config.similarity_threshold - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.ttl(), Duration::from_millis(1500));
        assert_eq!(config.embed_timeout(), Some(Duration::from_millis(200)));
        assert_eq!(config.cleanup_interval(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_normalized_coerces_invalid_values() {
        let config = SemanticCacheConfig::new()
            .with_max_entries(0)
            .with_similarity_threshold(1.5)
            .with_ttl(Duration::ZERO)
            .normalized();

        assert_eq!(config.max_entries, DEFAULT_MAX_ENTRIES);
        assert!((config.similarity_threshold - DEFAULT_SIMILARITY_THRESHOLD).abs() < f32::EPSILON);
        assert_eq!(config.ttl(), DEFAULT_TTL);
    }

    #[test]
    fn test_normalized_threshold_bounds() {
        let zero = SemanticCacheConfig::new()
            .with_similarity_threshold(0.0)
            .normalized();
        assert!((zero.similarity_threshold - DEFAULT_SIMILARITY_THRESHOLD).abs() < f32::EPSILON);

        let nan = SemanticCacheConfig::new()
            .with_similarity_threshold(f32::NAN)
            .normalized();
        assert!((nan.similarity_threshold - DEFAULT_SIMILARITY_THRESHOLD).abs() < f32::EPSILON);

        let one = SemanticCacheConfig::new()
            .with_similarity_threshold(1.0)
            .normalized();
        assert!((one.similarity_threshold - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sub_unit_durations_round_up() {
        let config = SemanticCacheConfig::new()
            .with_ttl(Duration::from_micros(500))
            .with_embed_timeout(Duration::from_nanos(1))
            .with_cleanup_interval(Duration::from_millis(250))
            .normalized();

        assert_eq!(config.ttl(), Duration::from_millis(1));
        assert_eq!(config.embed_timeout(), Some(Duration::from_millis(1)));
        assert_eq!(config.cleanup_interval(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_huge_durations_saturate() {
        let config = SemanticCacheConfig::new().with_ttl(Duration::MAX);

        assert_eq!(config.ttl_ms, u64::MAX);
        assert_eq!(config.normalized().ttl(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_normalized_keeps_valid_values() {
        let config = SemanticCacheConfig::new()
            .with_max_entries(10)
            .with_similarity_threshold(0.8)
            .with_ttl(Duration::from_secs(60));

        assert_eq!(config.clone().normalized(), config);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: SemanticCacheConfig =
            serde_json::from_str(r#"{"max_entries": 25, "embed_timeout_ms": 500}"#).unwrap();

        assert_eq!(config.max_entries, 25);
        assert!((config.similarity_threshold - 0.95).abs() < f32::EPSILON);
        assert_eq!(config.ttl(), DEFAULT_TTL);
        assert_eq!(config.embed_timeout(), Some(Duration::from_millis(500)));
    }
}
