//! Class-to-class route planning.
//!
//! This module answers "how do I get to this class on time?" for each of a
//! rider's class events. Nearby classes are walked to. Otherwise the search
//! works backwards from the class start through the day's bus trips and
//! picks the journey with the shortest total time.

mod boarding;
mod config;
mod evaluate;
mod feasibility;
mod plan;
mod rank;
mod search;

pub use boarding::boarding_options;
pub use config::{MAX_WALK_METERS, MIN_WALK_METERS, PlannerConfig};
pub use evaluate::{JourneyEvaluator, WalkLeg};
pub use feasibility::{FeasibleTrip, feasible_trips};
pub use plan::{
    BoardingOption, CandidateStop, EvaluatedOption, JourneyPlan, PlanFailure, PlanOutcome,
    PlanRequest, StopSide, TravelMode, suggest_mode,
};
pub use rank::{compare_options, rank_options, select_best};
pub use search::RoutePlanner;
