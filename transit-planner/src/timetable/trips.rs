//! Trips and their ordered stop-time sequences.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::domain::{StopId, StopTime, Trip, TripId};

use super::error::TimetableError;
use super::stop_index::StopIndex;

/// Per-trip stop-time sequences, ordered by sequence number.
#[derive(Debug, Clone, Default)]
pub struct TripTimetable {
    trips: HashMap<TripId, Trip>,

    /// Stop times per trip, sorted by sequence number, unique sequences.
    stop_times: HashMap<TripId, Vec<StopTime>>,

    /// Trips calling at each stop.
    trips_by_stop: HashMap<StopId, BTreeSet<TripId>>,

    /// First call of each trip whose stop is missing from the stop table.
    unknown_stops: HashMap<TripId, StopId>,
}

impl TripTimetable {
    /// Group stop times by trip and sort each group.
    ///
    /// Rows repeating a (trip, sequence) pair are dropped after the first.
    pub fn new(trips: Vec<Trip>, stop_times: Vec<StopTime>) -> Self {
        let mut grouped: HashMap<TripId, Vec<StopTime>> = HashMap::new();
        for stop_time in stop_times {
            grouped
                .entry(stop_time.trip_id.clone())
                .or_default()
                .push(stop_time);
        }

        let mut trips_by_stop: HashMap<StopId, BTreeSet<TripId>> = HashMap::new();
        for (trip_id, calls) in grouped.iter_mut() {
            // Sort in case the file isn't in order
            calls.sort_by_key(|st| st.sequence);
            let before = calls.len();
            calls.dedup_by_key(|st| st.sequence);
            if calls.len() != before {
                warn!(
                    trip = %trip_id,
                    dropped = before - calls.len(),
                    "duplicate stop sequence numbers"
                );
            }
            for call in calls.iter() {
                trips_by_stop
                    .entry(call.stop_id.clone())
                    .or_default()
                    .insert(trip_id.clone());
            }
        }

        let trips = trips
            .into_iter()
            .map(|trip| (trip.id.clone(), trip))
            .collect();

        Self {
            trips,
            stop_times: grouped,
            trips_by_stop,
            unknown_stops: HashMap::new(),
        }
    }

    /// Flag trips that call at a stop `stops` does not know.
    ///
    /// Their stop times are withheld from then on. Returns how many trips
    /// were flagged.
    pub fn mark_unknown_stops(&mut self, stops: &StopIndex) -> usize {
        for (trip_id, calls) in &self.stop_times {
            if let Some(call) = calls.iter().find(|call| !stops.contains(&call.stop_id)) {
                warn!(
                    trip = %trip_id,
                    stop = %call.stop_id,
                    "trip calls at an unknown stop"
                );
                self.unknown_stops.insert(trip_id.clone(), call.stop_id.clone());
            }
        }
        self.unknown_stops.len()
    }

    /// The trip's stop times in sequence order.
    ///
    /// Fails with `StopNotFound` for a trip flagged by `mark_unknown_stops`.
    pub fn stop_times_for_trip(&self, trip_id: &TripId) -> Result<&[StopTime], TimetableError> {
        if let Some(stop) = self.unknown_stops.get(trip_id) {
            return Err(TimetableError::StopNotFound(stop.clone()));
        }
        self.stop_times
            .get(trip_id)
            .map(Vec::as_slice)
            .ok_or_else(|| TimetableError::TripNotFound(trip_id.clone()))
    }

    /// Trip metadata.
    pub fn trip(&self, trip_id: &TripId) -> Result<&Trip, TimetableError> {
        self.trips
            .get(trip_id)
            .ok_or_else(|| TimetableError::TripNotFound(trip_id.clone()))
    }

    /// Trips that call at `stop`, sorted by id.
    pub fn trips_serving(&self, stop: &StopId) -> impl Iterator<Item = &TripId> {
        self.trips_by_stop.get(stop).into_iter().flatten()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }
}
