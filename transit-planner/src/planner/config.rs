//! Planner configuration.

use crate::domain::DEFAULT_WALKING_SPEED_MPS;

/// Smallest walking radius honoured, in meters.
pub const MIN_WALK_METERS: f64 = 10.0;

/// Largest walking radius honoured, in meters.
pub const MAX_WALK_METERS: f64 = 2000.0;

/// Configuration parameters for route planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Walking-distance preference (meters). Classes closer than this are
    /// walked to, and stops farther than this are not considered.
    /// Clamped to [`MIN_WALK_METERS`, `MAX_WALK_METERS`] when used.
    pub max_walk_meters: f64,

    /// Assumed walking speed when no measurement is available (m/s).
    pub walking_speed_mps: f64,

    /// Maximum number of class events planned at once.
    /// Bounds concurrent requests to the walking-time service.
    pub worker_count: usize,

    /// Time budget for planning a single event (seconds).
    pub event_timeout_secs: u64,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_walk_meters: f64,
        walking_speed_mps: f64,
        worker_count: usize,
        event_timeout_secs: u64,
    ) -> Self {
        Self {
            max_walk_meters,
            walking_speed_mps,
            worker_count,
            event_timeout_secs,
        }
    }

    /// Set the walking-distance preference.
    pub fn with_max_walk_meters(mut self, meters: f64) -> Self {
        self.max_walk_meters = meters;
        self
    }

    /// The walking radius actually used, clamped to a sane range.
    pub fn walk_radius(&self) -> f64 {
        if self.max_walk_meters.is_nan() {
            return MIN_WALK_METERS;
        }
        self.max_walk_meters.clamp(MIN_WALK_METERS, MAX_WALK_METERS)
    }

    /// Number of concurrent event plans, at least one.
    pub fn workers(&self) -> usize {
        self.worker_count.max(1)
    }

    /// Returns the per-event time budget as a Duration.
    pub fn event_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.event_timeout_secs)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_walk_meters: 800.0, // about a 10 minute walk
            walking_speed_mps: DEFAULT_WALKING_SPEED_MPS,
            worker_count: 4,
            event_timeout_secs: 10,
        }
    }
}
