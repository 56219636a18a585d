//! Option ranking for a single event.
//!
//! Orders evaluated boarding options so the most useful one comes first.

use std::cmp::Ordering;

use super::plan::{EvaluatedOption, PlanFailure};

/// Compare two options by preference.
///
/// Options are ranked by:
/// 1. Total duration (shorter is better)
/// 2. Latest safe departure (later is better)
/// 3. Trip id (for a stable result)
pub fn compare_options(a: &EvaluatedOption, b: &EvaluatedOption) -> Ordering {
    // Primary: total duration
    let total_cmp = a.total_duration.cmp(&b.total_duration);
    if total_cmp != Ordering::Equal {
        return total_cmp;
    }

    // Secondary: leave as late as possible
    let departure_cmp = b.latest_departure.cmp(&a.latest_departure);
    if departure_cmp != Ordering::Equal {
        return departure_cmp;
    }

    a.option.trip_id.cmp(&b.option.trip_id)
}

/// Sort options best-first.
pub fn rank_options(mut options: Vec<EvaluatedOption>) -> Vec<EvaluatedOption> {
    options.sort_by(compare_options);
    options
}

/// Pick the best option.
///
/// Fails with `NoViableTrip` when there is nothing to choose from.
pub fn select_best(options: Vec<EvaluatedOption>) -> Result<EvaluatedOption, PlanFailure> {
    options
        .into_iter()
        .min_by(compare_options)
        .ok_or(PlanFailure::NoViableTrip)
}
