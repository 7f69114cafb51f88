//! Infrastructure layer - Store, index and observability implementations

pub mod cache;
pub mod logging;
pub mod observability;
pub mod semantic_cache;
