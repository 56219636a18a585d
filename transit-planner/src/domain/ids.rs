//! Opaque timetable identifiers.
//!
//! Timetable feeds use free-form strings for every identifier column. They
//! are kept as strings, but each kind gets its own type so a stop id can
//! never be passed where a trip id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a stop (`stop_id`).
    StopId
);
opaque_id!(
    /// Identifier of a trip (`trip_id`).
    TripId
);
opaque_id!(
    /// Identifier of a route (`route_id`).
    RouteId
);
opaque_id!(
    /// Identifier of a weekday service pattern (`service_id`).
    ServiceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_debug() {
        let id = StopId::new("1234");
        assert_eq!(id.to_string(), "1234");
        assert_eq!(format!("{id:?}"), "StopId(1234)");
        assert_eq!(id.as_str(), "1234");
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = TripId::from("T10");
        let b = TripId::from("T2");
        // Identifiers are opaque strings, not numbers
        assert!(a < b);
    }

    #[test]
    fn serde_transparent() {
        let id: RouteId = serde_json::from_str("\"R7\"").unwrap();
        assert_eq!(id, RouteId::new("R7"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"R7\"");
    }
}
