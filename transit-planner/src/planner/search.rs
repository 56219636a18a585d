//! Per-event route planning.
//!
//! For each class event the planner first checks whether the building is
//! close enough to walk. Otherwise it searches the day's trips for one
//! that gets the rider there on time, working backwards from the class:
//! stops near the building, trips reaching them early enough, stops near
//! the rider where those trips can be boarded.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, trace, warn};

use crate::domain::{ClassEvent, TripId, distance_meters};
use crate::timetable::{NearbyStop, Timetable};
use crate::walking::{WalkTimeProvider, WalkTimes};

use super::boarding::boarding_options;
use super::config::PlannerConfig;
use super::evaluate::{JourneyEvaluator, WalkLeg};
use super::feasibility::feasible_trips;
use super::plan::{
    JourneyPlan, PlanFailure, PlanOutcome, PlanRequest, StopSide, TravelMode, suggest_mode,
};
use super::rank::select_best;

/// Where an event's planning has got to.
#[derive(Debug)]
enum Step {
    /// Is the building within walking distance?
    CheckDirectWalk,
    /// Look for a bus.
    SearchTransit,
    Done(PlanOutcome),
}

/// Route planner over a prepared timetable.
pub struct RoutePlanner<'a, P> {
    timetable: &'a Timetable,
    walks: &'a WalkTimes<P>,
    config: &'a PlannerConfig,
}

impl<'a, P: WalkTimeProvider> RoutePlanner<'a, P> {
    /// Create a new planner.
    pub fn new(timetable: &'a Timetable, walks: &'a WalkTimes<P>, config: &'a PlannerConfig) -> Self {
        Self {
            timetable,
            walks,
            config,
        }
    }

    /// Plan every event, returning one plan per event in input order.
    ///
    /// Up to `worker_count` events are planned at once. An event that runs
    /// over its time budget gets a `Timeout` plan; the others are unaffected.
    pub async fn plan_all(&self, request: &PlanRequest, events: &[ClassEvent]) -> Vec<JourneyPlan> {
        let plans: Vec<JourneyPlan> = stream::iter(events)
            .map(|event| self.plan_with_timeout(request, event))
            .buffered(self.config.workers())
            .collect()
            .await;

        let count = |mode: Option<TravelMode>| plans.iter().filter(|p| p.mode() == mode).count();
        info!(
            events = plans.len(),
            walk = count(Some(TravelMode::Walk)),
            bus = count(Some(TravelMode::Bus)),
            unplanned = count(None),
            estimated_walks = self.walks.fallback_count(),
            "planning complete"
        );

        plans
    }

    async fn plan_with_timeout(&self, request: &PlanRequest, event: &ClassEvent) -> JourneyPlan {
        match tokio::time::timeout(self.config.event_timeout(), self.plan_event(request, event)).await {
            Ok(plan) => plan,
            Err(_) => {
                warn!(
                    course = %event.course_code,
                    timeout_secs = self.config.event_timeout_secs,
                    "planning timed out"
                );
                JourneyPlan::new(
                    event,
                    PlanOutcome::NoPlan {
                        reason: PlanFailure::Timeout,
                    },
                )
            }
        }
    }

    /// Plan a single event.
    pub async fn plan_event(&self, request: &PlanRequest, event: &ClassEvent) -> JourneyPlan {
        let mut step = Step::CheckDirectWalk;
        let outcome = loop {
            step = match step {
                Step::CheckDirectWalk => self.check_direct_walk(request, event).await,
                Step::SearchTransit => match self.search_transit(request, event).await {
                    Ok(outcome) => Step::Done(outcome),
                    Err(reason) => {
                        debug!(course = %event.course_code, %reason, "no plan");
                        Step::Done(PlanOutcome::NoPlan { reason })
                    }
                },
                Step::Done(outcome) => break outcome,
            };
        };

        JourneyPlan::new(event, outcome)
    }

    /// Walk if the building is near enough. The timetable is not consulted.
    async fn check_direct_walk(&self, request: &PlanRequest, event: &ClassEvent) -> Step {
        let distance = distance_meters(request.origin, event.location);
        match suggest_mode(distance, self.config.walk_radius()) {
            TravelMode::Walk => {
                let walk = self.walks.measure(request.origin, event.location).await;
                debug!(
                    course = %event.course_code,
                    distance_meters = distance,
                    walk_secs = walk.duration.num_seconds(),
                    "walking"
                );
                let Some(latest_departure) = event.start_time.checked_sub(walk.duration) else {
                    debug!(course = %event.course_code, "walk would start before midnight");
                    return Step::Done(PlanOutcome::NoPlan {
                        reason: PlanFailure::NoViableTrip,
                    });
                };
                Step::Done(PlanOutcome::Walk {
                    total_duration: walk.duration,
                    latest_departure,
                    walk,
                })
            }
            TravelMode::Bus => Step::SearchTransit,
        }
    }

    async fn search_transit(
        &self,
        request: &PlanRequest,
        event: &ClassEvent,
    ) -> Result<PlanOutcome, PlanFailure> {
        let radius = self.config.walk_radius();
        let evaluator = JourneyEvaluator::new(self.walks, request.ready_at);

        let active = self
            .timetable
            .calendar
            .active_trip_ids(event.weekday)
            .map_err(|_| PlanFailure::NoService {
                weekday: event.weekday,
            })?;

        let near_class = self
            .timetable
            .stops
            .nearby_stops(event.location, radius)
            .map_err(|_| PlanFailure::NoStopsNearby {
                side: StopSide::Destination,
            })?;
        // Only stops some trip running today calls at are worth a walk lookup
        let near_class = self.served_by(near_class, |trip| active.contains(trip));
        let destinations = evaluator
            .candidates(near_class, event.location, WalkLeg::Egress)
            .await;

        let feasible = feasible_trips(
            &self.timetable.trips,
            &active,
            &destinations,
            event.start_time,
        )?;

        let near_rider = self
            .timetable
            .stops
            .nearby_stops(request.origin, radius)
            .map_err(|_| PlanFailure::NoStopsNearby {
                side: StopSide::Origin,
            })?;
        let feasible_ids: HashSet<&TripId> = feasible.iter().map(|f| &f.trip_id).collect();
        let near_rider = self.served_by(near_rider, |trip| feasible_ids.contains(trip));
        let origins = evaluator
            .candidates(near_rider, request.origin, WalkLeg::Access)
            .await;

        let evaluated = boarding_options(
            &self.timetable.trips,
            &feasible,
            &origins,
            request.ready_at,
        )
        .into_iter()
        .filter_map(|option| evaluator.evaluate(option))
        .collect();
        let journey = select_best(evaluated)?;

        let route = self
            .timetable
            .describe_trip(&journey.option.trip_id)
            .unwrap_or_else(|e| {
                warn!(trip = %journey.option.trip_id, error = %e, "no trip metadata");
                journey.option.trip_id.to_string()
            });

        debug!(
            course = %event.course_code,
            trip = %journey.option.trip_id,
            board = %journey.option.origin_stop.id,
            alight = %journey.option.destination_stop.id,
            leave_by = %journey.latest_departure,
            "bus"
        );

        Ok(PlanOutcome::Bus { journey, route })
    }

    /// Keep stops called at by at least one trip matching `keep`.
    fn served_by(
        &self,
        nearby: Vec<NearbyStop>,
        keep: impl Fn(&TripId) -> bool,
    ) -> Vec<NearbyStop> {
        let before = nearby.len();
        let served: Vec<NearbyStop> = nearby
            .into_iter()
            .filter(|n| self.timetable.trips.trips_serving(&n.stop.id).any(&keep))
            .collect();
        trace!(before, after = served.len(), "dropped unserved stops");
        served
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
