//! Class events: the fixed points a rider has to reach.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{Coordinate, DomainError, ServiceTime};

/// A weekly class meeting with a resolved building location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClassEvent")]
pub struct ClassEvent {
    pub course_code: String,
    pub weekday: Weekday,
    pub start_time: ServiceTime,
    pub end_time: ServiceTime,
    pub building: String,
    pub location: Coordinate,
}

impl ClassEvent {
    /// Create an event. The class must start strictly before it ends.
    pub fn new(
        course_code: impl Into<String>,
        weekday: Weekday,
        start_time: ServiceTime,
        end_time: ServiceTime,
        building: impl Into<String>,
        location: Coordinate,
    ) -> Result<Self, DomainError> {
        let course_code = course_code.into();
        if !start_time.is_before(end_time) {
            return Err(DomainError::EventEndsBeforeStart {
                course_code,
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            course_code,
            weekday,
            start_time,
            end_time,
            building: building.into(),
            location,
        })
    }
}

#[derive(Deserialize)]
struct RawClassEvent {
    course_code: String,
    weekday: Weekday,
    start_time: ServiceTime,
    end_time: ServiceTime,
    building: String,
    location: Coordinate,
}

impl TryFrom<RawClassEvent> for ClassEvent {
    type Error = DomainError;

    fn try_from(raw: RawClassEvent) -> Result<Self, Self::Error> {
        ClassEvent::new(
            raw.course_code,
            raw.weekday,
            raw.start_time,
            raw.end_time,
            raw.building,
            raw.location,
        )
    }
}
