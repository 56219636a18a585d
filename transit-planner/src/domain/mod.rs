//! Domain types for the route planner.
//!
//! This module contains the value types shared by the timetable, walking
//! and planner layers. Types that carry invariants enforce them at
//! construction time.

mod error;
mod event;
mod geo;
mod ids;
mod stop;
mod time;
mod trip;

pub use error::DomainError;
pub use event::ClassEvent;
pub use geo::{
    Coordinate, DEFAULT_WALKING_SPEED_MPS, EARTH_RADIUS_METERS, distance_meters, estimated_walk,
    estimated_walk_seconds,
};
pub use ids::{RouteId, ServiceId, StopId, TripId};
pub use stop::Stop;
pub(crate) use time::serialize_duration_secs;
pub use time::{ServiceTime, TimeError};
pub use trip::{Route, StopTime, Trip};
