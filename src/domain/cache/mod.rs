//! Cache domain - key and payload conventions shared by the cache stores

mod codec;
mod key;

pub use codec::{decode_embedding, encode_embedding};
pub use key::{exact_key, CacheKey, EXACT_KEY_PREFIX};
