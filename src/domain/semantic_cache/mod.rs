//! Semantic cache domain models
//!
//! Provides the types of a two-layer cache that answers identical texts by
//! hash and paraphrased texts by vector similarity.

mod config;
mod entry;
mod stats;

pub use config::{
    SemanticCacheConfig, DEFAULT_MAX_ENTRIES, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TTL,
};
pub use entry::{SemanticCacheEntry, SemanticLookup, SemanticMatch};
pub use stats::{SemanticCacheStats, SimilarityBucket};
