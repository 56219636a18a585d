//! In-memory timetable indices.
//!
//! Built once from already-parsed tables before planning starts, then only
//! read. Everything here is `Sync`, so concurrent planners share one
//! `Timetable` behind a plain reference or `Arc`.

mod calendar;
mod error;
mod stop_index;
mod trips;

use std::collections::{BTreeSet, HashMap};

use tracing::{info, warn};

use crate::domain::{Route, RouteId, Stop, StopId, StopTime, Trip, TripId};

pub use calendar::{CalendarEntry, InvalidWeekdayMask, ServiceCalendar, WeekdayMask};
pub use error::TimetableError;
pub use stop_index::{NearbyStop, StopIndex};
pub use trips::TripTimetable;

/// All timetable tables, indexed for planning.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    pub calendar: ServiceCalendar,
    pub stops: StopIndex,
    pub trips: TripTimetable,
    routes: HashMap<RouteId, Route>,
}

impl Timetable {
    /// Index the raw tables.
    pub fn new(
        stops: Vec<Stop>,
        routes: Vec<Route>,
        trips: Vec<Trip>,
        stop_times: Vec<StopTime>,
        calendar: Vec<CalendarEntry>,
    ) -> Self {
        let stops = StopIndex::new(stops);
        let calendar = ServiceCalendar::new(calendar, &trips);
        let routes: HashMap<RouteId, Route> =
            routes.into_iter().map(|r| (r.id.clone(), r)).collect();
        let mut trips = TripTimetable::new(trips, stop_times);
        let withheld = trips.mark_unknown_stops(&stops);

        info!(
            stops = stops.len(),
            routes = routes.len(),
            trips = trips.trip_count(),
            withheld,
            "timetable indexed"
        );

        Self {
            calendar,
            stops,
            trips,
            routes,
        }
    }

    /// Look up a route.
    pub fn route(&self, id: &RouteId) -> Result<&Route, TimetableError> {
        self.routes
            .get(id)
            .ok_or_else(|| TimetableError::RouteNotFound(id.clone()))
    }

    /// Routes with at least one trip calling at any of `stops`.
    ///
    /// Sorted and deduplicated. Trips with no metadata are skipped.
    pub fn routes_serving<'a>(&self, stops: impl IntoIterator<Item = &'a StopId>) -> Vec<RouteId> {
        let routes: BTreeSet<RouteId> = stops
            .into_iter()
            .flat_map(|stop| self.trips.trips_serving(stop))
            .filter_map(|trip_id| self.trips.trip(trip_id).ok())
            .map(|trip| trip.route_id.clone())
            .collect();
        routes.into_iter().collect()
    }

    /// Rider-facing description: "<route> to <headsign> (<direction>)".
    ///
    /// A missing headsign or direction is left out. A missing route is
    /// logged and its id used as the name.
    pub fn describe_trip(&self, trip_id: &TripId) -> Result<String, TimetableError> {
        let trip = self.trips.trip(trip_id)?;

        let route_name = match self.route(&trip.route_id) {
            Ok(route) => route.display_name().to_string(),
            Err(e) => {
                warn!(trip = %trip_id, error = %e, "describing trip without route data");
                trip.route_id.to_string()
            }
        };

        let mut description = route_name;
        if let Some(headsign) = trip.headsign.as_deref().filter(|h| !h.trim().is_empty()) {
            description.push_str(" to ");
            description.push_str(headsign.trim());
        }
        if let Some(direction) = trip.direction.as_deref().filter(|d| !d.trim().is_empty()) {
            description.push_str(" (");
            description.push_str(direction.trim());
            description.push(')');
        }
        Ok(description)
    }
}
