//! Straight-line walking estimate.

use chrono::Duration;

use crate::domain::{Coordinate, DEFAULT_WALKING_SPEED_MPS, distance_meters, estimated_walk};

use super::error::WalkingError;
use super::{WalkSource, WalkTimeProvider};

/// Walking time from great-circle distance at a fixed speed.
///
/// Never fails and never touches the network. Used when no measurement
/// service is configured, and as the fallback when one fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaversineWalker {
    pub speed_mps: f64,
}

impl HaversineWalker {
    pub fn new(speed_mps: f64) -> Self {
        Self { speed_mps }
    }

    /// Estimate without going through the async trait.
    pub fn estimate(&self, from: Coordinate, to: Coordinate) -> Duration {
        estimated_walk(distance_meters(from, to), self.speed_mps)
    }
}

impl Default for HaversineWalker {
    fn default() -> Self {
        Self::new(DEFAULT_WALKING_SPEED_MPS)
    }
}

impl WalkTimeProvider for HaversineWalker {
    fn source(&self) -> WalkSource {
        WalkSource::Estimated
    }

    async fn walk_time(&self, from: Coordinate, to: Coordinate) -> Result<Duration, WalkingError> {
        Ok(self.estimate(from, to))
    }
}
