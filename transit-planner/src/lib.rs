//! Class schedule transit planner.
//!
//! Answers, for each of a rider's weekly class meetings: "should I walk or
//! take the bus, which bus, and when do I have to leave?"

pub mod domain;
pub mod planner;
pub mod snapshot;
pub mod timetable;
pub mod walking;
