//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI, local models, etc.)
///
/// The cache only needs text in, vector out. A batch call fails as a whole
/// when any element fails.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Generate embeddings for several texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        futures::future::try_join_all(texts.iter().map(|text| self.embed(text))).await
    }

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
