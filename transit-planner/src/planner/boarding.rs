//! Where to get on each feasible trip.

use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::domain::{ServiceTime, StopId};
use crate::timetable::TripTimetable;

use super::feasibility::FeasibleTrip;
use super::plan::{BoardingOption, CandidateStop};

/// Pair each feasible trip with a stop near the origin that it calls at
/// before the alighting stop.
///
/// At most one option per trip: the latest departure, then the shorter
/// walk, then the later sequence. With `ready_at`, only stops the rider can
/// walk to before the bus leaves are considered. Trips that never pass such
/// a stop before alighting produce nothing.
pub fn boarding_options(
    trips: &TripTimetable,
    feasible: &[FeasibleTrip],
    origins: &[CandidateStop],
    ready_at: Option<ServiceTime>,
) -> Vec<BoardingOption> {
    let by_stop: HashMap<&StopId, &CandidateStop> =
        origins.iter().map(|c| (&c.stop.id, c)).collect();

    let mut options = Vec::with_capacity(feasible.len());
    for trip in feasible {
        let calls = match trips.stop_times_for_trip(&trip.trip_id) {
            Ok(calls) => calls,
            Err(e) => {
                warn!(trip = %trip.trip_id, error = %e, "skipping trip without usable stop times");
                continue;
            }
        };

        let best = calls
            .iter()
            .take_while(|call| call.sequence < trip.alight_sequence)
            .filter_map(|call| {
                let candidate = by_stop.get(&call.stop_id)?;
                let reachable = match ready_at {
                    Some(ready) => ready
                        .checked_add(candidate.walk.duration)
                        .is_some_and(|at_stop| at_stop <= call.departure),
                    None => true,
                };
                (reachable && call.departure <= trip.alight_time).then_some((call, *candidate))
            })
            .max_by_key(|(call, candidate)| {
                (call.departure, Reverse(candidate.walk.duration), call.sequence)
            });

        let Some((call, candidate)) = best else {
            trace!(trip = %trip.trip_id, "no origin stop before alighting");
            continue;
        };

        options.push(BoardingOption {
            trip_id: trip.trip_id.clone(),
            origin_stop: (*candidate.stop).clone(),
            board_time: call.departure,
            board_sequence: call.sequence,
            destination_stop: (*trip.alight_stop).clone(),
            alight_time: trip.alight_time,
            alight_sequence: trip.alight_sequence,
            walk_to_board: candidate.walk,
            walk_from_alight: trip.walk_from_alight,
        });
    }

    debug!(
        feasible = feasible.len(),
        options = options.len(),
        "enumerated boarding options"
    );
    options
}
