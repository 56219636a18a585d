//! Journey timing for boarding options.

use futures::future::join_all;
use tracing::trace;

use crate::domain::{Coordinate, ServiceTime};
use crate::timetable::NearbyStop;
use crate::walking::{WalkTimeProvider, WalkTimes};

use super::plan::{BoardingOption, CandidateStop, EvaluatedOption};

/// Which way the rider walks between a stop and a fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkLeg {
    /// From the point to the stop (getting on)
    Access,
    /// From the stop to the point (getting off)
    Egress,
}

/// Works out walking times and journey totals for one event.
pub struct JourneyEvaluator<'a, P> {
    walks: &'a WalkTimes<P>,
    ready_at: Option<ServiceTime>,
}

impl<'a, P: WalkTimeProvider> JourneyEvaluator<'a, P> {
    /// Evaluate against `ready_at`, or against each option's own latest
    /// departure when the rider gave no time.
    pub fn new(walks: &'a WalkTimes<P>, ready_at: Option<ServiceTime>) -> Self {
        Self { walks, ready_at }
    }

    /// Attach walking times to nearby stops.
    ///
    /// Lookups run concurrently. Order is preserved.
    pub async fn candidates(
        &self,
        nearby: Vec<NearbyStop>,
        point: Coordinate,
        leg: WalkLeg,
    ) -> Vec<CandidateStop> {
        let lookups = nearby.iter().map(|n| {
            let stop = n.stop.coordinate();
            match leg {
                WalkLeg::Access => self.walks.measure(point, stop),
                WalkLeg::Egress => self.walks.measure(stop, point),
            }
        });
        let walks = join_all(lookups).await;

        nearby
            .into_iter()
            .zip(walks)
            .map(|(n, walk)| CandidateStop {
                stop: n.stop,
                distance_meters: n.distance_meters,
                walk,
            })
            .collect()
    }

    /// Time the journey for one option.
    ///
    /// Returns `None` if the rider, leaving at `ready_at`, reaches the
    /// boarding stop after the bus has gone.
    pub fn evaluate(&self, option: BoardingOption) -> Option<EvaluatedOption> {
        let walk_to_board = option.walk_to_board.duration;
        let latest_departure = option.board_time.saturating_sub(walk_to_board);

        let leave_at = self.ready_at.unwrap_or(latest_departure);
        let at_stop = leave_at.checked_add(walk_to_board)?;
        if option.board_time.is_before(at_stop) {
            trace!(
                trip = %option.trip_id,
                board = %option.board_time,
                at_stop = %at_stop,
                "too late to board"
            );
            return None;
        }

        let wait = option.board_time.signed_duration_since(at_stop);
        let ride = option.ride();
        let total_duration = walk_to_board + wait + ride + option.walk_from_alight.duration;

        Some(EvaluatedOption {
            option,
            total_duration,
            wait,
            ride,
            latest_departure,
        })
    }
}
