//! Lookup counters and similarity histogram

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::domain::semantic_cache::{SemanticCacheStats, SimilarityBucket};
use crate::infrastructure::observability::metrics::{self, CacheLayer};

#[derive(Debug, Default)]
struct Counters {
    exact_hits: u64,
    exact_misses: u64,
    semantic_hits: u64,
    semantic_misses: u64,
    buckets: [u64; 3],
}

/// Lock-protected statistics of a semantic cache
///
/// Counters only grow until [`StatsRecorder::reset`].
#[derive(Debug, Default)]
pub struct StatsRecorder {
    counters: Mutex<Counters>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_exact(&self, hit: bool) {
        {
            let mut counters = self.counters.lock();

            if hit {
                counters.exact_hits += 1;
            } else {
                counters.exact_misses += 1;
            }
        }

        metrics::record_lookup(CacheLayer::Exact, hit);
    }

    pub fn record_semantic(&self, hit: bool) {
        {
            let mut counters = self.counters.lock();

            if hit {
                counters.semantic_hits += 1;
            } else {
                counters.semantic_misses += 1;
            }
        }

        metrics::record_lookup(CacheLayer::Semantic, hit);
    }

    /// Adds an accepted similarity score to the histogram
    pub fn record_similarity(&self, score: f32) {
        let bucket = SimilarityBucket::for_score(score);
        self.counters.lock().buckets[bucket.index()] += 1;

        metrics::record_similarity(score);
    }

    /// Copies the counters, reporting `semantic_size` as the index size
    pub fn snapshot(&self, semantic_size: usize) -> SemanticCacheStats {
        let counters = self.counters.lock();

        let similarity_distribution: BTreeMap<String, u64> = SimilarityBucket::ALL
            .iter()
            .map(|bucket| (bucket.label().to_string(), counters.buckets[bucket.index()]))
            .collect();

        SemanticCacheStats {
            exact_hits: counters.exact_hits,
            exact_misses: counters.exact_misses,
            semantic_hits: counters.semantic_hits,
            semantic_misses: counters.semantic_misses,
            semantic_size,
            similarity_distribution,
        }
    }

    pub fn reset(&self) {
        *self.counters.lock() = Counters::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let recorder = StatsRecorder::new();

        recorder.record_exact(true);
        recorder.record_exact(false);
        recorder.record_exact(false);
        recorder.record_semantic(true);
        recorder.record_semantic(false);

        let stats = recorder.snapshot(7);

        assert_eq!(stats.exact_hits, 1);
        assert_eq!(stats.exact_misses, 2);
        assert_eq!(stats.semantic_hits, 1);
        assert_eq!(stats.semantic_misses, 1);
        assert_eq!(stats.semantic_size, 7);
    }

    #[test]
    fn test_similarity_histogram() {
        let recorder = StatsRecorder::new();

        recorder.record_similarity(0.5);
        recorder.record_similarity(0.92);
        recorder.record_similarity(0.96);
        recorder.record_similarity(1.0);

        let stats = recorder.snapshot(0);

        assert_eq!(stats.similarity_distribution.len(), 3);
        assert_eq!(stats.bucket_count(SimilarityBucket::Low), 1);
        assert_eq!(stats.bucket_count(SimilarityBucket::High), 1);
        assert_eq!(stats.bucket_count(SimilarityBucket::Top), 2);
    }

    #[test]
    fn test_reset() {
        let recorder = StatsRecorder::new();

        recorder.record_exact(true);
        recorder.record_semantic(false);
        recorder.record_similarity(0.99);
        recorder.reset();

        let stats = recorder.snapshot(0);

        assert_eq!(stats.exact_hits, 0);
        assert_eq!(stats.semantic_misses, 0);
        assert!(stats.similarity_distribution.values().all(|count| *count == 0));
    }
}
