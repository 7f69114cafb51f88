//! Cache key traits and exact-match key derivation

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use sha2::{Digest, Sha256};

/// Prefix shared by every exact-match key
pub const EXACT_KEY_PREFIX: &str = "semantic:";

/// Number of digest bytes kept in an exact-match key
const EXACT_KEY_DIGEST_BYTES: usize = 8;

/// Trait for types that can be used as keys of a bounded store
///
/// String-like keys expose their textual form so that pattern invalidation
/// can match them. Every other key type keeps the defaults and is skipped by
/// pattern invalidation.
pub trait CacheKey: Eq + Hash + Clone + Send + Sync + Debug {
    /// Returns the textual form of the key, if it has one
    fn pattern_str(&self) -> Option<&str> {
        None
    }

    /// Builds a key from an exact (wildcard-free) pattern
    fn from_pattern(_pattern: &str) -> Option<Self> {
        None
    }
}

impl CacheKey for String {
    fn pattern_str(&self) -> Option<&str> {
        Some(self)
    }

    fn from_pattern(pattern: &str) -> Option<Self> {
        Some(pattern.to_string())
    }
}

impl CacheKey for Box<str> {
    fn pattern_str(&self) -> Option<&str> {
        Some(self)
    }

    fn from_pattern(pattern: &str) -> Option<Self> {
        Some(pattern.into())
    }
}

impl CacheKey for Arc<str> {
    fn pattern_str(&self) -> Option<&str> {
        Some(self)
    }

    fn from_pattern(pattern: &str) -> Option<Self> {
        Some(pattern.into())
    }
}

macro_rules! impl_opaque_key {
    ($($ty:ty),*) => {
        $(impl CacheKey for $ty {})*
    };
}

impl_opaque_key!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char);

/// Derives the exact-match key for a text
///
/// The key is the SHA-256 digest of the raw text, truncated to 8 bytes and
/// hex encoded, behind the `semantic:` prefix. No normalization is applied.
pub fn exact_key(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!(
        "{}{}",
        EXACT_KEY_PREFIX,
        hex::encode(&digest[..EXACT_KEY_DIGEST_BYTES])
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_key_is_deterministic() {
        assert_eq!(exact_key("如何创建笔记"), exact_key("如何创建笔记"));
    }

    #[test]
    fn test_exact_key_shape() {
        let key = exact_key("hello");
        assert!(key.starts_with(EXACT_KEY_PREFIX));
        // 8 digest bytes, two hex chars each
        assert_eq!(key.len(), EXACT_KEY_PREFIX.len() + 16);
        // sha256("hello") = 2cf24dba5fb0a30e...
        assert_eq!(key, "semantic:2cf24dba5fb0a30e");
    }

    #[test]
    fn test_exact_key_distinguishes_texts() {
        assert_ne!(exact_key("如何创建笔记"), exact_key("怎么新建笔记"));
        assert_ne!(exact_key("note"), exact_key("note "));
    }

    #[test]
    fn test_string_keys_are_pattern_capable() {
        let key = "user:1".to_string();
        assert_eq!(key.pattern_str(), Some("user:1"));
        assert_eq!(String::from_pattern("user:1"), Some(key));

        let boxed: Box<str> = "a:b".into();
        assert_eq!(boxed.pattern_str(), Some("a:b"));
    }

    #[test]
    fn test_integer_keys_are_opaque() {
        assert_eq!(42u64.pattern_str(), None);
        assert_eq!(u64::from_pattern("42"), None);
    }
}
