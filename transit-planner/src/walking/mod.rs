//! Walking-time measurement.
//!
//! The planner asks "how long does it take to walk from here to there?"
//! through the `WalkTimeProvider` capability. Two implementations exist: a
//! network-backed Distance Matrix client and a haversine estimate. The
//! `WalkTimes` wrapper memoizes answers for a planning run and substitutes
//! the estimate whenever the provider fails.

mod cache;
mod client;
mod error;
mod haversine;
mod types;

use chrono::Duration;
use serde::Serialize;

use crate::domain::{Coordinate, serialize_duration_secs};

pub use cache::{WalkCacheConfig, WalkTimes};
pub use client::{DistanceMatrixClient, DistanceMatrixConfig};
pub use error::WalkingError;
pub use haversine::HaversineWalker;
pub use types::{DistanceMatrixResponse, MatrixElement, MatrixRow, TextValue};

/// Where a walking duration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkSource {
    /// Returned by a routing service
    Measured,
    /// Straight-line distance at an assumed speed
    Estimated,
}

/// A walking duration tagged with its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalkEstimate {
    #[serde(rename = "seconds", serialize_with = "serialize_duration_secs")]
    pub duration: Duration,
    pub source: WalkSource,
}

impl WalkEstimate {
    pub fn is_estimated(&self) -> bool {
        self.source == WalkSource::Estimated
    }
}

/// Capability for measuring walking time between two points.
///
/// This abstraction allows the planner to be tested without network access.
/// Futures are not required to be `Send`; planning runs on one task.
#[allow(async_fn_in_trait)]
pub trait WalkTimeProvider {
    /// What kind of value `walk_time` returns on success.
    fn source(&self) -> WalkSource {
        WalkSource::Measured
    }

    /// Walking time from `from` to `to`.
    async fn walk_time(&self, from: Coordinate, to: Coordinate) -> Result<Duration, WalkingError>;
}
