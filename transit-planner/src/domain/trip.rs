//! Routes, trips and the stop times that make up a trip.

use serde::{Deserialize, Serialize};

use super::{RouteId, ServiceId, ServiceTime, StopId, TripId};

/// A route as passengers know it ("99 B-Line").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
}

impl Route {
    /// Name shown to riders: short name, then long name, then the raw id.
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.long_name.as_deref().filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// One scheduled run of a vehicle along a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
    pub service_id: ServiceId,
    #[serde(default)]
    pub headsign: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
}

/// A scheduled call of a trip at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub arrival: ServiceTime,
    pub departure: ServiceTime,
    pub sequence: u32,
}
