//! Embedding Cache
//!
//! A two-layer, in-process cache for text embeddings:
//! - Exact-match layer keyed by a hash of the text
//! - Semantic layer answering near-duplicate texts by cosine similarity
//! - Bounded LRU stores with per-entry TTL and optional background sweeping
//! - Hit/miss statistics with a similarity histogram

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    cosine_similarity, exact_key, DomainError, EmbeddingProvider, SemanticCacheConfig,
    SemanticCacheStats, SemanticLookup, SimilarityBucket,
};
pub use infrastructure::cache::{spawn_sweeper, OrderedBoundedStore, Sweep};
pub use infrastructure::semantic_cache::SemanticCache;
