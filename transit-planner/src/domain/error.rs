//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from timetable lookups and network errors.

use super::ServiceTime;

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A class event must start before it ends
    #[error("class {course_code} starts at {start} but ends at {end}")]
    EventEndsBeforeStart {
        course_code: String,
        start: ServiceTime,
        end: ServiceTime,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::EventEndsBeforeStart {
            course_code: "CPSC 110".into(),
            start: ServiceTime::parse("10:00:00").unwrap(),
            end: ServiceTime::parse("09:00:00").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "class CPSC 110 starts at 10:00:00 but ends at 09:00:00"
        );
    }
}
