//! Which active trips can get the rider to class on time.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{ServiceTime, Stop, StopId, TripId};
use crate::timetable::TripTimetable;
use crate::walking::WalkEstimate;

use super::plan::{CandidateStop, PlanFailure};

/// A trip that reaches a stop near the class early enough to walk in.
#[derive(Debug, Clone, PartialEq)]
pub struct FeasibleTrip {
    pub trip_id: TripId,
    pub alight_stop: Arc<Stop>,
    pub alight_time: ServiceTime,
    pub alight_sequence: u32,
    pub walk_from_alight: WalkEstimate,
}

/// Keep trips that call at a destination candidate in time for `class_start`.
///
/// A call is on time when its arrival plus the walk to the building is no
/// later than the class start. Each trip keeps its best call: the latest
/// arrival, then the shorter walk, then the earlier sequence.
///
/// Active trips with no stop times are logged and skipped.
pub fn feasible_trips(
    trips: &TripTimetable,
    active: &BTreeSet<TripId>,
    destinations: &[CandidateStop],
    class_start: ServiceTime,
) -> Result<Vec<FeasibleTrip>, PlanFailure> {
    let by_stop: HashMap<&StopId, &CandidateStop> =
        destinations.iter().map(|c| (&c.stop.id, c)).collect();

    let mut feasible = Vec::new();
    for trip_id in active {
        let calls = match trips.stop_times_for_trip(trip_id) {
            Ok(calls) => calls,
            Err(e) => {
                warn!(trip = %trip_id, error = %e, "skipping trip without usable stop times");
                continue;
            }
        };

        let best = calls
            .iter()
            .filter_map(|call| {
                let candidate = by_stop.get(&call.stop_id)?;
                let in_building = call.arrival.checked_add(candidate.walk.duration)?;
                (in_building <= class_start).then_some((call, *candidate))
            })
            .max_by_key(|(call, candidate)| {
                (call.arrival, Reverse(candidate.walk.duration), Reverse(call.sequence))
            });

        if let Some((call, candidate)) = best {
            feasible.push(FeasibleTrip {
                trip_id: trip_id.clone(),
                alight_stop: candidate.stop.clone(),
                alight_time: call.arrival,
                alight_sequence: call.sequence,
                walk_from_alight: candidate.walk,
            });
        }
    }

    debug!(
        active = active.len(),
        feasible = feasible.len(),
        "filtered trips by arrival deadline"
    );

    if feasible.is_empty() {
        return Err(PlanFailure::NoViableTrip);
    }
    Ok(feasible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, ServiceId, StopTime, Trip};
    use crate::walking::WalkSource;
    use chrono::Duration;

    fn t(s: &str) -> ServiceTime {
        ServiceTime::parse(s).unwrap()
    }

    fn trip(id: &str) -> Trip {
        Trip {
            id: TripId::new(id),
            route_id: RouteId::new("R1"),
            service_id: ServiceId::new("WK"),
            headsign: None,
            direction: None,
        }
    }

    fn st(trip: &str, stop: &str, time: &str, seq: u32) -> StopTime {
        StopTime {
            trip_id: TripId::new(trip),
            stop_id: StopId::new(stop),
            arrival: t(time),
            departure: t(time),
            sequence: seq,
        }
    }

    fn candidate(id: &str, walk_secs: i64) -> CandidateStop {
        CandidateStop {
            stop: Arc::new(Stop::new(id, id, 49.0, -123.0)),
            distance_meters: 100.0,
            walk: WalkEstimate {
                duration: Duration::seconds(walk_secs),
                source: WalkSource::Measured,
            },
        }
    }

    fn active(ids: &[&str]) -> BTreeSet<TripId> {
        ids.iter().map(|id| TripId::new(*id)).collect()
    }

    #[test]
    fn keeps_trips_arriving_in_time() {
        let tt = TripTimetable::new(
            vec![trip("T1"), trip("T2")],
            vec![
                st("T1", "A", "08:00:00", 1),
                st("T1", "B", "08:10:00", 2),
                st("T2", "A", "08:05:00", 1),
                st("T2", "B", "08:14:00", 2),
            ],
        );
        let found =
            feasible_trips(&tt, &active(&["T1", "T2"]), &[candidate("B", 120)], t("08:15:00"))
                .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].trip_id.as_str(), "T1");
        assert_eq!(found[0].alight_time, t("08:10:00"));
        assert_eq!(found[0].alight_stop.id.as_str(), "B");
    }

    #[test]
    fn arrival_exactly_at_start_is_on_time() {
        let tt = TripTimetable::new(
            vec![trip("T1")],
            vec![st("T1", "A", "08:00:00", 1), st("T1", "B", "08:13:00", 2)],
        );
        let found =
            feasible_trips(&tt, &active(&["T1"]), &[candidate("B", 120)], t("08:15:00")).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn prefers_latest_arrival_then_shorter_walk() {
        let tt = TripTimetable::new(
            vec![trip("T1")],
            vec![
                st("T1", "A", "08:00:00", 1),
                st("T1", "B", "08:05:00", 2),
                st("T1", "C", "08:08:00", 3),
                st("T1", "D", "08:08:00", 4),
            ],
        );
        let destinations = [candidate("B", 60), candidate("C", 300), candidate("D", 200)];
        let found =
            feasible_trips(&tt, &active(&["T1"]), &destinations, t("08:15:00")).unwrap();
        assert_eq!(found[0].alight_stop.id.as_str(), "D");
        assert_eq!(found[0].alight_sequence, 4);
    }

    #[test]
    fn trips_without_stop_times_are_skipped() {
        let tt = TripTimetable::new(
            vec![trip("T1"), trip("GHOST")],
            vec![st("T1", "B", "08:10:00", 2)],
        );
        let found = feasible_trips(
            &tt,
            &active(&["GHOST", "T1"]),
            &[candidate("B", 120)],
            t("08:15:00"),
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].trip_id.as_str(), "T1");
    }

    #[test]
    fn nothing_on_time_is_no_viable_trip() {
        let tt = TripTimetable::new(
            vec![trip("T1")],
            vec![st("T1", "A", "08:00:00", 1), st("T1", "B", "08:14:00", 2)],
        );
        let result = feasible_trips(&tt, &active(&["T1"]), &[candidate("B", 120)], t("08:15:00"));
        assert_eq!(result, Err(PlanFailure::NoViableTrip));
    }

    #[test]
    fn trips_not_calling_near_class_are_dropped() {
        let tt = TripTimetable::new(
            vec![trip("T1")],
            vec![st("T1", "A", "08:00:00", 1), st("T1", "C", "08:05:00", 2)],
        );
        let result = feasible_trips(&tt, &active(&["T1"]), &[candidate("B", 60)], t("09:00:00"));
        assert_eq!(result, Err(PlanFailure::NoViableTrip));
    }
}
