//! Planning input documents.
//!
//! The binary reads everything it needs from one JSON file: the timetable
//! tables, the rider's class events, and where the rider starts.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{ClassEvent, Coordinate, Route, ServiceTime, Stop, StopTime, Trip};
use crate::planner::{PlanRequest, PlannerConfig};
use crate::timetable::{CalendarEntry, Timetable};

/// Error loading a planning input document.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid planning input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything needed for one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningInput {
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub calendar: Vec<CalendarEntry>,
    pub events: Vec<ClassEvent>,

    /// Where the rider starts.
    pub location: Coordinate,

    /// Overrides the configured walking-distance preference.
    #[serde(default)]
    pub max_walk_meters: Option<f64>,

    #[serde(default)]
    pub ready_at: Option<ServiceTime>,
}

/// A planning input split into the pieces the planner takes.
#[derive(Debug)]
pub struct PlanningParts {
    pub timetable: Timetable,
    pub events: Vec<ClassEvent>,
    pub request: PlanRequest,
    pub config: PlannerConfig,
}

impl PlanningInput {
    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let input = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            events = input.events.len(),
            "loaded planning input"
        );
        Ok(input)
    }

    /// Index the timetable and build the request, starting from `config`.
    pub fn into_parts(self, config: PlannerConfig) -> PlanningParts {
        let config = match self.max_walk_meters {
            Some(meters) => config.with_max_walk_meters(meters),
            None => config,
        };
        let request = PlanRequest {
            origin: self.location,
            ready_at: self.ready_at,
        };
        let timetable = Timetable::new(
            self.stops,
            self.routes,
            self.trips,
            self.stop_times,
            self.calendar,
        );

        PlanningParts {
            timetable,
            events: self.events,
            request,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StopId, TripId};
    use chrono::Weekday;
    use std::io::Write;

    const INPUT: &str = r#"{
        "stops": [
            {"id": "A", "name": "Home Stop", "lat": 49.0, "lon": -123.0},
            {"id": "B", "name": "Campus Stop", "lat": 49.01, "lon": -123.0}
        ],
        "routes": [{"id": "R99", "short_name": "99"}],
        "trips": [{"id": "T1", "route_id": "R99", "service_id": "WK", "headsign": "UBC"}],
        "stop_times": [
            {"trip_id": "T1", "stop_id": "A", "arrival": "08:00:00", "departure": "08:00:00", "sequence": 1},
            {"trip_id": "T1", "stop_id": "B", "arrival": "08:10:00", "departure": "08:10:00", "sequence": 2}
        ],
        "calendar": [{"service_id": "WK", "days": 31}],
        "events": [{
            "course_code": "CPSC 110", "weekday": "Mon",
            "start_time": "08:15:00", "end_time": "09:30:00",
            "building": "ICCS", "location": {"lat": 49.011, "lon": -123.0}
        }],
        "location": {"lat": 49.0, "lon": -123.0},
        "ready_at": "07:30"
    }"#;

    #[test]
    fn parses_full_document() {
        let input = PlanningInput::from_json(INPUT).unwrap();
        assert_eq!(input.stops.len(), 2);
        assert_eq!(input.events[0].weekday, Weekday::Mon);
        assert_eq!(input.ready_at, Some(ServiceTime::parse("07:30:00").unwrap()));
        assert!(input.max_walk_meters.is_none());
    }

    #[test]
    fn builds_timetable_and_request() {
        let parts = PlanningInput::from_json(INPUT)
            .unwrap()
            .into_parts(PlannerConfig::default());

        assert!(parts.timetable.stops.contains(&StopId::new("A")));
        assert_eq!(
            parts.timetable.describe_trip(&TripId::new("T1")).unwrap(),
            "99 to UBC"
        );
        assert_eq!(parts.request.origin, Coordinate::new(49.0, -123.0));
        assert_eq!(parts.request.ready_at, Some(ServiceTime::parse("07:30:00").unwrap()));
        assert_eq!(parts.config.walk_radius(), 800.0);
        assert_eq!(parts.events.len(), 1);
    }

    #[test]
    fn walk_override_applies() {
        let mut input = PlanningInput::from_json(INPUT).unwrap();
        input.max_walk_meters = Some(5000.0);
        let parts = input.into_parts(PlannerConfig::default());
        assert_eq!(parts.config.walk_radius(), 2000.0);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(INPUT.as_bytes()).unwrap();

        let input = PlanningInput::from_path(file.path()).unwrap();
        assert_eq!(input.trips.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PlanningInput::from_path(dir.path().join("nope.json"));
        assert!(matches!(result, Err(SnapshotError::Io { .. })));
    }

    #[test]
    fn invalid_event_is_rejected() {
        let bad = INPUT.replace("\"09:30:00\"", "\"08:00:00\"");
        assert!(matches!(
            PlanningInput::from_json(&bad),
            Err(SnapshotError::Json(_))
        ));
    }
}
