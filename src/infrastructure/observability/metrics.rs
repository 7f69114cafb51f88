//! Cache metrics
//!
//! Thin wrappers over the `metrics` facade. Nothing is exported unless the
//! host application installs a recorder.

use ::metrics::{counter, histogram};

/// Layer of the two-layer cache that served a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLayer {
    Exact,
    Semantic,
}

impl CacheLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheLayer::Exact => "exact",
            CacheLayer::Semantic => "semantic",
        }
    }
}

/// Record a lookup outcome for one layer
pub fn record_lookup(layer: CacheLayer, hit: bool) {
    counter!(
        "embedding_cache_lookups_total",
        "layer" => layer.as_str(),
        "outcome" => outcome_label(hit)
    )
    .increment(1);
}

/// Record the similarity of an accepted semantic hit
pub fn record_similarity(score: f32) {
    histogram!("embedding_cache_hit_similarity").record(score as f64);
}

/// Record a capacity eviction from a store
pub fn record_eviction(store: &'static str) {
    counter!("embedding_cache_evictions_total", "store" => store).increment(1);
}

/// Record entries dropped because their TTL passed
pub fn record_expired(store: &'static str, count: usize) {
    if count == 0 {
        return;
    }

    counter!("embedding_cache_expired_total", "store" => store).increment(count as u64);
}

/// Record a failed or abandoned embedding provider call
pub fn record_provider_failure(provider: &'static str, reason: &'static str) {
    counter!(
        "embedding_cache_provider_failures_total",
        "provider" => provider,
        "reason" => reason
    )
    .increment(1);
}

fn outcome_label(hit: bool) -> &'static str {
    if hit { "hit" } else { "miss" }
}
