//! Periodic expiry sweeping
//!
//! Correctness never depends on sweeping, since expired entries are also
//! dropped on access. A sweep only bounds the memory held by entries nobody
//! looks up again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::OrderedBoundedStore;
use crate::domain::cache::CacheKey;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Longest supported sweep period; longer ones are clamped to it
pub const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Anything that can drop its expired entries in bulk
pub trait Sweep: Send + Sync {
    /// Removes expired entries, returning how many were removed
    fn sweep(&self) -> usize;

    /// Name used in logs
    fn sweep_name(&self) -> &'static str;
}

impl<K, V> Sweep for OrderedBoundedStore<K, V>
where
    K: CacheKey,
    V: Send + Sync,
{
    fn sweep(&self) -> usize {
        self.cleanup_expired()
    }

    fn sweep_name(&self) -> &'static str {
        self.name()
    }
}

/// Spawns a task sweeping `target` every `interval`
///
/// The first sweep happens one full interval after the call. The interval
/// is clamped to `[1ms, MAX_SWEEP_INTERVAL]`. Abort the returned handle to
/// stop sweeping. Must be called within a tokio runtime.
pub fn spawn_sweeper(target: Arc<dyn Sweep>, interval: Duration) -> JoinHandle<()> {
    let requested = interval;
    let interval = interval.clamp(MIN_INTERVAL, MAX_SWEEP_INTERVAL);
    let name = target.sweep_name();

    if interval != requested {
        warn!(sweep = name, ?requested, ?interval, "Sweep interval out of range, clamped");
    }
    info!(sweep = name, ?interval, "Starting expiry sweeper");

    tokio::spawn(async move {
        let now = tokio::time::Instant::now();
        let start = now.checked_add(interval).unwrap_or(now);
        let mut ticker = tokio::time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let removed = target.sweep();

            if removed > 0 {
                debug!(sweep = name, removed, "Sweep removed expired entries");
            }
        }
    })
}
