//! Semantic cache statistics snapshot

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed histogram buckets for accepted similarity scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimilarityBucket {
    /// [0.00, 0.90)
    Low,
    /// [0.90, 0.95)
    High,
    /// [0.95, 1.00]
    Top,
}

impl SimilarityBucket {
    pub const ALL: [SimilarityBucket; 3] = [Self::Low, Self::High, Self::Top];

    /// Bucket for a similarity score
    pub fn for_score(score: f32) -> Self {
        if score >= 0.95 {
            Self::Top
        } else if score >= 0.90 {
            Self::High
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "0.00-0.90",
            Self::High => "0.90-0.95",
            Self::Top => "0.95-1.00",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Low => 0,
            Self::High => 1,
            Self::Top => 2,
        }
    }
}

/// Read-only statistics for the two-layer cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticCacheStats {
    /// Lookups answered by the exact-match layer
    pub exact_hits: u64,
    /// Lookups the exact-match layer could not answer
    pub exact_misses: u64,
    /// Lookups answered by the similarity scan
    pub semantic_hits: u64,
    /// Lookups the similarity scan could not answer
    pub semantic_misses: u64,
    /// Entries held by the semantic index when the snapshot was taken
    pub semantic_size: usize,
    /// Accepted similarity scores per bucket label
    pub similarity_distribution: BTreeMap<String, u64>,
}

impl SemanticCacheStats {
    /// Count for one histogram bucket
    pub fn bucket_count(&self, bucket: SimilarityBucket) -> u64 {
        self.similarity_distribution
            .get(bucket.label())
            .copied()
            .unwrap_or(0)
    }

    /// Fraction of lookups answered by either layer
    pub fn hit_rate(&self) -> f32 {
        let total = self.exact_hits + self.exact_misses;

        if total == 0 {
            return 0.0;
        }

        (self.exact_hits + self.semantic_hits) as f32 / total as f32
    }
}
