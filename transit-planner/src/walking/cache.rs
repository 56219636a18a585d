//! Memoized walking times with straight-line fallback.
//!
//! Class events often share a building or a boarding stop, so the same
//! (from, to) pair gets asked for repeatedly within a run. Each pair is
//! measured once; concurrent requests for the same pair wait on the first.
//!
//! A failed measurement is replaced by the haversine estimate and cached as
//! such, so a broken service costs one request per pair rather than one per
//! lookup.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use moka::future::Cache as MokaCache;
use tracing::warn;

use crate::domain::Coordinate;

use super::haversine::HaversineWalker;
use super::{WalkEstimate, WalkSource, WalkTimeProvider};

/// Cache key: quantized (from, to) coordinates.
type WalkKey = ((i64, i64), (i64, i64));

/// Configuration for the walk-time cache.
#[derive(Debug, Clone)]
pub struct WalkCacheConfig {
    /// How long a measured walk is trusted.
    pub ttl: StdDuration,

    /// Upper bound on memoized (from, to) pairs.
    pub max_capacity: u64,
}

impl Default for WalkCacheConfig {
    fn default() -> Self {
        Self {
            ttl: StdDuration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Walking-time lookups for one planning run.
///
/// Wraps a `WalkTimeProvider`, memoizing results and falling back to a
/// straight-line estimate whenever the provider fails.
pub struct WalkTimes<P> {
    provider: P,
    fallback: HaversineWalker,
    cache: MokaCache<WalkKey, WalkEstimate>,
    fallbacks: AtomicUsize,
}

impl<P: WalkTimeProvider> WalkTimes<P> {
    /// Create a lookup around `provider`, estimating at `speed_mps` on failure.
    pub fn new(provider: P, speed_mps: f64, config: &WalkCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            provider,
            fallback: HaversineWalker::new(speed_mps),
            cache,
            fallbacks: AtomicUsize::new(0),
        }
    }

    /// Walking time from `from` to `to`, measured if possible.
    pub async fn measure(&self, from: Coordinate, to: Coordinate) -> WalkEstimate {
        let key = (from.key(), to.key());
        self.cache
            .get_with(key, async {
                match self.provider.walk_time(from, to).await {
                    Ok(duration) => WalkEstimate {
                        duration,
                        source: self.provider.source(),
                    },
                    Err(e) => {
                        warn!(
                            from = %from,
                            to = %to,
                            error = %e,
                            "walking service failed, using straight-line estimate"
                        );
                        self.fallbacks.fetch_add(1, Ordering::Relaxed);
                        self.estimate(from, to)
                    }
                }
            })
            .await
    }

    /// Straight-line estimate, bypassing the provider and cache.
    pub fn estimate(&self, from: Coordinate, to: Coordinate) -> WalkEstimate {
        WalkEstimate {
            duration: self.fallback.estimate(from, to),
            source: WalkSource::Estimated,
        }
    }

    /// Number of measurements that fell back to an estimate.
    pub fn fallback_count(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Number of memoized walks.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Access the wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
