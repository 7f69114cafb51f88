//! Observability infrastructure - Cache metrics

pub mod metrics;

pub use self::metrics::CacheLayer;
