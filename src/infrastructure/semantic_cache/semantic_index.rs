//! Semantic layer: linear similarity scan over cached embeddings

use std::time::Duration;

use crate::domain::embedding::cosine_similarity;
use crate::domain::semantic_cache::{SemanticCacheEntry, SemanticMatch};
use crate::infrastructure::cache::OrderedBoundedStore;

/// Bounded store of `{text, vector}` entries searched by cosine similarity
///
/// Evicts on its own LRU order, independently of the exact-match layer.
#[derive(Debug)]
pub struct SemanticIndex {
    store: OrderedBoundedStore<String, SemanticCacheEntry>,
}

impl SemanticIndex {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            store: OrderedBoundedStore::new(capacity, ttl).with_name("semantic"),
        }
    }

    /// Inserts an entry, or refreshes the entry with the same key
    pub fn insert(&self, entry: SemanticCacheEntry, ttl: Duration) {
        self.store.set(entry.key().to_string(), entry, ttl);
    }

    /// Finds the live entry most similar to `query`
    ///
    /// Entries are scanned most recently used first and only a strictly
    /// greater score replaces the current best, so ties go to the more
    /// recently used entry. Scores of 0 or below never match. The winner is
    /// then re-read, which promotes it and re-checks that it is still live.
    pub fn find_most_similar(&self, query: &[f32]) -> Option<SemanticMatch> {
        let mut best: Option<(String, f32)> = None;

        self.store.scan_live(|key, entry| {
            let similarity = cosine_similarity(query, entry.vector());
            let current = best.as_ref().map_or(0.0, |(_, score)| *score);

            if similarity > current {
                best = Some((key.clone(), similarity));
            }
        });

        let (key, _) = best?;
        let entry = self.store.get(&key)?;
        let similarity = cosine_similarity(query, entry.vector());

        Some(SemanticMatch { entry, similarity })
    }

    pub fn remove(&self, key: &String) -> bool {
        self.store.remove(key)
    }

    pub fn size(&self) -> usize {
        self.store.size()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn cleanup_expired(&self) -> usize {
        self.store.cleanup_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::exact_key;

    const HOUR: Duration = Duration::from_secs(3600);

    fn entry(text: &str, vector: Vec<f32>) -> SemanticCacheEntry {
        SemanticCacheEntry::new(exact_key(text), text, vector)
    }

    #[test]
    fn test_find_most_similar_picks_maximum() {
        let index = SemanticIndex::new(10, HOUR);

        index.insert(entry("low", vec![0.5, 0.5, 0.5]), HOUR);
        index.insert(entry("high", vec![0.99, 0.1, 0.0]), HOUR);
        index.insert(entry("medium", vec![0.8, 0.3, 0.0]), HOUR);

        let found = index.find_most_similar(&[1.0, 0.0, 0.0]).unwrap();

        assert_eq!(found.entry.text(), "high");
        assert!(found.similarity > 0.99);
    }

    #[test]
    fn test_find_most_similar_empty_index() {
        let index = SemanticIndex::new(10, HOUR);

        assert!(index.find_most_similar(&[1.0, 0.0]).is_none());
    }

    #[test]
    fn test_non_positive_scores_never_match() {
        let index = SemanticIndex::new(10, HOUR);

        index.insert(entry("orthogonal", vec![0.0, 1.0]), HOUR);
        index.insert(entry("opposite", vec![-1.0, 0.0]), HOUR);
        index.insert(entry("other-dimension", vec![1.0, 0.0, 0.0]), HOUR);

        assert!(index.find_most_similar(&[1.0, 0.0]).is_none());
    }

    #[test]
    fn test_expired_entries_are_skipped() {
        let index = SemanticIndex::new(10, HOUR);

        index.insert(entry("expired", vec![1.0, 0.0]), Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(50));

        assert!(index.find_most_similar(&[1.0, 0.0]).is_none());
    }

    #[test]
    fn test_same_text_refreshes_single_entry() {
        let index = SemanticIndex::new(10, HOUR);

        index.insert(entry("note", vec![1.0, 0.0]), HOUR);
        index.insert(entry("note", vec![0.0, 1.0]), HOUR);

        assert_eq!(index.size(), 1);
        let found = index.find_most_similar(&[0.0, 1.0]).unwrap();
        assert!((found.similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_match_is_promoted() {
        let index = SemanticIndex::new(2, HOUR);

        index.insert(entry("a", vec![1.0, 0.0]), HOUR);
        index.insert(entry("b", vec![0.0, 1.0]), HOUR);

        assert_eq!(
            index.find_most_similar(&[1.0, 0.1]).unwrap().entry.text(),
            "a"
        );

        index.insert(entry("c", vec![1.0, 1.0]), HOUR);

        assert_eq!(index.size(), 2);
        assert!(!index.remove(&exact_key("b")));
        assert!(index.remove(&exact_key("a")));
    }

    #[test]
    fn test_capacity_bound() {
        let index = SemanticIndex::new(3, HOUR);

        for i in 0..10 {
            index.insert(entry(&format!("text {}", i), vec![i as f32, 1.0]), HOUR);
            assert!(index.size() <= index.capacity());
        }

        assert_eq!(index.size(), 3);
    }
}
