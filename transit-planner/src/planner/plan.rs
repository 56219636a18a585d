//! Planner inputs and outputs.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Weekday};
use serde::Serialize;

use crate::domain::{
    ClassEvent, Coordinate, ServiceTime, Stop, TripId, serialize_duration_secs,
};
use crate::walking::WalkEstimate;

/// How to get to a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walk,
    Bus,
}

/// Walk when the building is within `threshold_meters`, otherwise take the bus.
pub fn suggest_mode(distance_meters: f64, threshold_meters: f64) -> TravelMode {
    if distance_meters <= threshold_meters {
        TravelMode::Walk
    } else {
        TravelMode::Bus
    }
}

/// Which end of the journey a stop search was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopSide {
    /// Near the rider's starting location
    Origin,
    /// Near the class building
    Destination,
}

impl fmt::Display for StopSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopSide::Origin => f.write_str("origin"),
            StopSide::Destination => f.write_str("destination"),
        }
    }
}

/// Why no plan could be produced for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum PlanFailure {
    /// No service pattern covers the weekday
    #[error("no transit service runs on {weekday}")]
    NoService { weekday: Weekday },

    /// No stop within walking distance
    #[error("no stops within walking distance of the {side}")]
    NoStopsNearby { side: StopSide },

    /// No trip gets the rider there in time
    #[error("no trip reaches the class in time")]
    NoViableTrip,

    /// Planning ran over its time budget
    #[error("planning timed out")]
    Timeout,
}

/// What the rider asks for: where they start, and optionally when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanRequest {
    /// The rider's starting location.
    pub origin: Coordinate,

    /// Earliest time the rider can leave. When absent, each option is
    /// evaluated as if the rider leaves at its latest safe departure.
    pub ready_at: Option<ServiceTime>,
}

impl PlanRequest {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            ready_at: None,
        }
    }

    /// Set the earliest departure time.
    pub fn ready_at(mut self, time: ServiceTime) -> Self {
        self.ready_at = Some(time);
        self
    }
}

/// A stop within walking distance of one end of the journey.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateStop {
    pub stop: Arc<Stop>,
    /// Straight-line distance from the point searched around.
    pub distance_meters: f64,
    /// Walking time between the stop and the point, in the direction walked.
    pub walk: WalkEstimate,
}

/// One way of catching a trip: board here, ride, get off there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardingOption {
    pub trip_id: TripId,
    pub origin_stop: Stop,
    pub board_time: ServiceTime,
    pub board_sequence: u32,
    pub destination_stop: Stop,
    pub alight_time: ServiceTime,
    pub alight_sequence: u32,
    pub walk_to_board: WalkEstimate,
    pub walk_from_alight: WalkEstimate,
}

impl BoardingOption {
    /// Time on board.
    pub fn ride(&self) -> Duration {
        self.alight_time.signed_duration_since(self.board_time)
    }

    /// True if either walk is a straight-line estimate.
    pub fn is_estimated(&self) -> bool {
        self.walk_to_board.is_estimated() || self.walk_from_alight.is_estimated()
    }
}

/// A boarding option with its journey times worked out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedOption {
    #[serde(flatten)]
    pub option: BoardingOption,

    /// Walk + wait + ride + walk.
    #[serde(rename = "total_seconds", serialize_with = "serialize_duration_secs")]
    pub total_duration: Duration,

    #[serde(rename = "wait_seconds", serialize_with = "serialize_duration_secs")]
    pub wait: Duration,

    #[serde(rename = "ride_seconds", serialize_with = "serialize_duration_secs")]
    pub ride: Duration,

    /// Latest time to leave the origin and still catch the trip.
    pub latest_departure: ServiceTime,
}

/// The planner's answer for one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlanOutcome {
    Walk {
        #[serde(rename = "total_seconds", serialize_with = "serialize_duration_secs")]
        total_duration: Duration,
        latest_departure: ServiceTime,
        walk: WalkEstimate,
    },
    Bus {
        journey: EvaluatedOption,
        /// Rider-facing trip description, e.g. "99 to UBC (Westbound)".
        route: String,
    },
    NoPlan {
        reason: PlanFailure,
    },
}

/// A plan for one class event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyPlan {
    pub course_code: String,
    pub weekday: Weekday,
    pub class_start: ServiceTime,
    pub building: String,
    #[serde(flatten)]
    pub outcome: PlanOutcome,
}

impl JourneyPlan {
    pub fn new(event: &ClassEvent, outcome: PlanOutcome) -> Self {
        Self {
            course_code: event.course_code.clone(),
            weekday: event.weekday,
            class_start: event.start_time,
            building: event.building.clone(),
            outcome,
        }
    }

    /// The chosen mode, or `None` if planning failed.
    pub fn mode(&self) -> Option<TravelMode> {
        match self.outcome {
            PlanOutcome::Walk { .. } => Some(TravelMode::Walk),
            PlanOutcome::Bus { .. } => Some(TravelMode::Bus),
            PlanOutcome::NoPlan { .. } => None,
        }
    }

    pub fn total_duration(&self) -> Option<Duration> {
        match &self.outcome {
            PlanOutcome::Walk { total_duration, .. } => Some(*total_duration),
            PlanOutcome::Bus { journey, .. } => Some(journey.total_duration),
            PlanOutcome::NoPlan { .. } => None,
        }
    }

    pub fn latest_departure(&self) -> Option<ServiceTime> {
        match &self.outcome {
            PlanOutcome::Walk {
                latest_departure, ..
            } => Some(*latest_departure),
            PlanOutcome::Bus { journey, .. } => Some(journey.latest_departure),
            PlanOutcome::NoPlan { .. } => None,
        }
    }

    /// The chosen bus journey, if any.
    pub fn journey(&self) -> Option<&EvaluatedOption> {
        match &self.outcome {
            PlanOutcome::Bus { journey, .. } => Some(journey),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<PlanFailure> {
        match self.outcome {
            PlanOutcome::NoPlan { reason } => Some(reason),
            _ => None,
        }
    }

    /// True if any walking time in the plan is a straight-line estimate.
    pub fn is_estimated(&self) -> bool {
        match &self.outcome {
            PlanOutcome::Walk { walk, .. } => walk.is_estimated(),
            PlanOutcome::Bus { journey, .. } => journey.option.is_estimated(),
            PlanOutcome::NoPlan { .. } => false,
        }
    }
}
