//! Semantic cache entries and lookup results

use serde::{Deserialize, Serialize};

/// An entry of the semantic index
///
/// Holds its own copy of the vector; the exact-match layer stores an encoded
/// copy of the same data and may evict it independently.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticCacheEntry {
    key: String,
    text: String,
    vector: Vec<f32>,
}

impl SemanticCacheEntry {
    pub fn new(key: impl Into<String>, text: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            vector,
        }
    }

    /// Exact-match key of the source text
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Original text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cached vector
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn into_vector(self) -> Vec<f32> {
        self.vector
    }
}

/// Best match found by a similarity scan
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    pub entry: SemanticCacheEntry,
    pub similarity: f32,
}

/// A successful cache lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticLookup {
    /// The cached (or freshly computed) vector
    pub vector: Vec<f32>,
    /// 1.0 for exact hits, the measured cosine similarity otherwise
    pub similarity: f32,
    /// Whether the exact-match layer answered
    pub is_exact_match: bool,
}

impl SemanticLookup {
    pub fn exact(vector: Vec<f32>) -> Self {
        Self {
            vector,
            similarity: 1.0,
            is_exact_match: true,
        }
    }

    pub fn semantic(vector: Vec<f32>, similarity: f32) -> Self {
        Self {
            vector,
            similarity,
            is_exact_match: false,
        }
    }
}
