//! Semantic cache infrastructure - exact and similarity layers

mod exact_index;
mod semantic_index;
mod service;
mod stats;

pub use exact_index::ExactMatchIndex;
pub use semantic_index::SemanticIndex;
pub use service::SemanticCache;
pub use stats::StatsRecorder;
