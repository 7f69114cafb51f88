//! Two-layer embedding cache
//!
//! Lookups first try the exact-match layer keyed by a hash of the text. On a
//! miss, and only when an embedding provider is configured, the text is
//! embedded and the semantic layer is scanned for the closest cached vector.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{ExactMatchIndex, SemanticIndex, StatsRecorder};
use crate::domain::cache::exact_key;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::semantic_cache::{
    SemanticCacheConfig, SemanticCacheEntry, SemanticCacheStats, SemanticLookup,
};
use crate::domain::DomainError;
use crate::infrastructure::cache::{spawn_sweeper, Sweep};
use crate::infrastructure::observability::metrics;

/// Outcome of a lookup before it is reduced to what the caller asked for
enum Resolution {
    Hit(SemanticLookup),
    /// Carries the query embedding when one was computed, or why not
    Miss(Result<Vec<f32>, DomainError>),
}

/// Embedding cache with an exact-match layer and a similarity layer
///
/// Both layers hold up to `max_entries` items with the same TTL but evict
/// independently, so a text may survive in one layer and not the other.
#[derive(Debug)]
pub struct SemanticCache {
    config: SemanticCacheConfig,
    exact: ExactMatchIndex,
    semantic: SemanticIndex,
    stats: StatsRecorder,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl SemanticCache {
    /// Create a cache; out-of-range config values fall back to defaults
    pub fn new(config: SemanticCacheConfig) -> Self {
        let config = config.normalized();
        let ttl = config.ttl();

        Self {
            exact: ExactMatchIndex::new(config.max_entries, ttl),
            semantic: SemanticIndex::new(config.max_entries, ttl),
            stats: StatsRecorder::new(),
            embedding_provider: None,
            config,
        }
    }

    /// Attach the provider used to embed queries on an exact miss
    pub fn with_embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    pub fn has_embedding_provider(&self) -> bool {
        self.embedding_provider.is_some()
    }

    /// Get the effective configuration
    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    /// Look up the embedding for `text`
    ///
    /// Provider failures, timeouts and an empty cache all yield `None`.
    pub async fn get(&self, text: &str) -> Option<SemanticLookup> {
        self.get_with_cancel(text, std::future::pending::<()>()).await
    }

    /// Like [`SemanticCache::get`], abandoning the provider call as soon as
    /// `cancel` completes
    pub async fn get_with_cancel<C>(&self, text: &str, cancel: C) -> Option<SemanticLookup>
    where
        C: Future<Output = ()>,
    {
        match self.resolve(text, cancel).await {
            Resolution::Hit(lookup) => Some(lookup),
            Resolution::Miss(_) => None,
        }
    }

    /// Look up `text`, embedding and caching it on a complete miss
    ///
    /// The freshly computed vector is returned with similarity 1.0 and
    /// `is_exact_match` false. Fails when no provider is configured or the
    /// provider call fails.
    pub async fn get_or_embed(&self, text: &str) -> Result<SemanticLookup, DomainError> {
        match self.resolve(text, std::future::pending::<()>()).await {
            Resolution::Hit(lookup) => Ok(lookup),
            Resolution::Miss(Ok(vector)) => {
                self.set(text, &vector);
                Ok(SemanticLookup::semantic(vector, 1.0))
            }
            Resolution::Miss(Err(e)) => Err(e),
        }
    }

    /// Store `vector` as the embedding of `text` in both layers
    ///
    /// Re-setting the same text replaces its vector and refreshes its TTL.
    pub fn set(&self, text: &str, vector: &[f32]) {
        let key = exact_key(text);
        let ttl = self.config.ttl();

        self.exact.set(key.clone(), vector, ttl);
        self.semantic
            .insert(SemanticCacheEntry::new(key, text, vector.to_vec()), ttl);

        debug!(dimensions = vector.len(), "Cached embedding");
    }

    /// Embed `texts` in one batch and cache every result
    ///
    /// Nothing is stored when the batch call fails.
    pub async fn warm_up(&self, texts: &[String]) -> Result<usize, DomainError> {
        let provider = self.provider()?;

        if texts.is_empty() {
            return Ok(0);
        }

        let vectors = self.with_timeout(provider.embed_batch(texts)).await?;

        if vectors.len() != texts.len() {
            return Err(DomainError::provider(
                provider.provider_name(),
                format!(
                    "Expected {} embeddings, got {}",
                    texts.len(),
                    vectors.len()
                ),
            ));
        }

        for (text, vector) in texts.iter().zip(vectors.iter()) {
            self.set(text, vector);
        }

        info!(count = texts.len(), "Warmed up embedding cache");
        Ok(texts.len())
    }

    /// Drop `text` from both layers
    pub fn remove(&self, text: &str) -> bool {
        let key = exact_key(text);
        let from_exact = self.exact.remove(&key);
        let from_semantic = self.semantic.remove(&key);

        from_exact || from_semantic
    }

    /// Remove expired entries from both layers
    pub fn cleanup_expired(&self) -> usize {
        self.exact.cleanup_expired() + self.semantic.cleanup_expired()
    }

    pub fn stats(&self) -> SemanticCacheStats {
        self.stats.snapshot(self.semantic.size())
    }

    /// Empty both layers and reset all statistics
    pub fn clear(&self) {
        self.exact.clear();
        self.semantic.clear();
        self.stats.reset();
        info!("Embedding cache cleared");
    }

    /// Start the background sweep when `cleanup_interval_secs` is configured
    pub fn spawn_sweeper(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let interval = self.config.cleanup_interval()?;
        Some(spawn_sweeper(self.clone(), interval))
    }

    async fn resolve<C>(&self, text: &str, cancel: C) -> Resolution
    where
        C: Future<Output = ()>,
    {
        let key = exact_key(text);

        if let Some(vector) = self.exact.get(&key) {
            self.stats.record_exact(true);
            debug!(key = %key, "Exact cache hit");
            return Resolution::Hit(SemanticLookup::exact(vector));
        }

        self.stats.record_exact(false);

        let provider = match self.provider() {
            Ok(provider) => provider,
            Err(e) => return Resolution::Miss(Err(e)),
        };

        let query = match self.embed_query(provider, text, cancel).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(provider = provider.provider_name(), error = %e, "Embedding lookup failed");
                metrics::record_provider_failure(provider.provider_name(), failure_reason(&e));
                self.stats.record_semantic(false);
                return Resolution::Miss(Err(e));
            }
        };

        match self.semantic.find_most_similar(&query) {
            Some(found) if found.similarity >= self.config.similarity_threshold => {
                self.stats.record_semantic(true);
                self.stats.record_similarity(found.similarity);
                debug!(
                    "Semantic cache hit with similarity {:.4} for entry {}",
                    found.similarity,
                    found.entry.key()
                );
                Resolution::Hit(SemanticLookup::semantic(
                    found.entry.into_vector(),
                    found.similarity,
                ))
            }
            best => {
                self.stats.record_semantic(false);
                debug!(
                    best = best.map(|m| m.similarity),
                    threshold = self.config.similarity_threshold,
                    "Semantic cache miss"
                );
                Resolution::Miss(Ok(query))
            }
        }
    }

    async fn embed_query<C>(
        &self,
        provider: &Arc<dyn EmbeddingProvider>,
        text: &str,
        cancel: C,
    ) -> Result<Vec<f32>, DomainError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            result = self.with_timeout(provider.embed(text)) => result,
            _ = cancel => Err(DomainError::cancelled("Embedding lookup cancelled by caller")),
        }
    }

    async fn with_timeout<T, F>(&self, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match self.config.embed_timeout() {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| DomainError::timeout(millis(limit)))?,
            None => call.await,
        }
    }

    fn provider(&self) -> Result<&Arc<dyn EmbeddingProvider>, DomainError> {
        self.embedding_provider
            .as_ref()
            .ok_or_else(|| DomainError::configuration("No embedding provider configured"))
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn failure_reason(error: &DomainError) -> &'static str {
    match error {
        DomainError::Timeout { .. } => "timeout",
        DomainError::Cancelled { .. } => "cancelled",
        _ => "error",
    }
}

impl Sweep for SemanticCache {
    fn sweep(&self) -> usize {
        self.cleanup_expired()
    }

    fn sweep_name(&self) -> &'static str {
        "semantic_cache"
    }
}

/// The cache is itself a provider: callers embedding through it get cached
/// or near-duplicate vectors and only pay for genuinely new texts.
#[async_trait]
impl EmbeddingProvider for SemanticCache {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.get_or_embed(text).await.map(|lookup| lookup.vector)
    }

    fn provider_name(&self) -> &'static str {
        "semantic_cache"
    }
}
