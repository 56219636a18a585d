//! Timetable lookup errors.

use chrono::Weekday;

use crate::domain::{RouteId, StopId, TripId};

/// Errors from timetable lookups.
///
/// `NoService` and `NoStopsNearby` describe the query; the `*NotFound`
/// variants mean the loaded tables reference something they do not contain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimetableError {
    /// No trip runs on this weekday
    #[error("no transit service runs on {weekday}")]
    NoService { weekday: Weekday },

    /// No stop lies within the search radius
    #[error("no stops within {radius_meters:.0} m")]
    NoStopsNearby { radius_meters: f64 },

    /// Trip id has no stop times loaded
    #[error("trip {0} not found in timetable")]
    TripNotFound(TripId),

    /// Trip references a route that was not loaded
    #[error("route {0} not found in timetable")]
    RouteNotFound(RouteId),

    /// Trip calls at a stop that was not loaded
    #[error("stop {0} not found in timetable")]
    StopNotFound(StopId),
}
