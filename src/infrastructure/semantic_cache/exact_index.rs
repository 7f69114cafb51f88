//! Exact-match layer: hash key to encoded embedding

use std::time::Duration;

use tracing::warn;

use crate::domain::cache::{decode_embedding, encode_embedding};
use crate::infrastructure::cache::{byte_store, ByteStore};

#[derive(Debug)]
pub struct ExactMatchIndex {
    store: ByteStore,
}

impl ExactMatchIndex {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            store: byte_store(capacity, ttl).with_name("exact"),
        }
    }

    /// Returns the decoded embedding stored under `key`
    ///
    /// A payload that fails to decode is dropped and reported as absent.
    pub fn get(&self, key: &String) -> Option<Vec<f32>> {
        let data = self.store.get(key)?;

        match decode_embedding(&data) {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(key = %key, error = %e, "Dropping undecodable exact-match payload");
                self.store.remove(key);
                None
            }
        }
    }

    /// Encodes and stores an embedding
    pub fn set(&self, key: String, vector: &[f32], ttl: Duration) {
        self.store.set(key, encode_embedding(vector), ttl);
    }

    pub fn remove(&self, key: &String) -> bool {
        self.store.remove(key)
    }

    pub fn contains(&self, key: &String) -> bool {
        self.store.contains(key)
    }

    pub fn size(&self) -> usize {
        self.store.size()
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn cleanup_expired(&self) -> usize {
        self.store.cleanup_expired()
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &ByteStore {
        &self.store
    }
}
