//! Domain layer - Cache conventions, ports and value types

pub mod cache;
pub mod embedding;
pub mod error;
pub mod semantic_cache;

pub use cache::{decode_embedding, encode_embedding, exact_key, CacheKey};
pub use embedding::{cosine_similarity, EmbeddingProvider};
pub use error::DomainError;
pub use semantic_cache::{
    SemanticCacheConfig, SemanticCacheEntry, SemanticCacheStats, SemanticLookup, SemanticMatch,
    SimilarityBucket,
};
