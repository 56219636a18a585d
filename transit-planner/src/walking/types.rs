//! Distance Matrix API response DTOs.
//!
//! These map directly to the JSON returned by the Google Distance Matrix
//! endpoint. Fields the planner never reads are left out.

use serde::Deserialize;

/// Top-level response.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceMatrixResponse {
    /// Request-level status ("OK", "REQUEST_DENIED", "OVER_QUERY_LIMIT", ...).
    pub status: String,

    /// Present when the request itself failed.
    pub error_message: Option<String>,

    /// One row per origin.
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

/// Results for one origin, one element per destination.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

/// One origin/destination pair.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixElement {
    /// Element-level status ("OK", "ZERO_RESULTS", "NOT_FOUND").
    pub status: String,

    /// Travel time; absent unless status is "OK".
    pub duration: Option<TextValue>,

    /// Route length; absent unless status is "OK".
    pub distance: Option<TextValue>,
}

/// A measured quantity with its display text.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    /// Seconds for durations, meters for distances.
    pub value: i64,

    pub text: Option<String>,
}

impl DistanceMatrixResponse {
    /// The single element of a one-origin, one-destination request.
    pub fn first_element(&self) -> Option<&MatrixElement> {
        self.rows.first().and_then(|row| row.elements.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ok_response() {
        let json = r#"{
            "destination_addresses": ["x"],
            "origin_addresses": ["y"],
            "rows": [{"elements": [{
                "distance": {"text": "0.4 km", "value": 412},
                "duration": {"text": "5 mins", "value": 298},
                "status": "OK"
            }]}],
            "status": "OK"
        }"#;
        let response: DistanceMatrixResponse = serde_json::from_str(json).unwrap();
        let element = response.first_element().unwrap();
        assert_eq!(element.status, "OK");
        assert_eq!(element.duration.as_ref().unwrap().value, 298);
        assert_eq!(element.distance.as_ref().unwrap().value, 412);
    }

    #[test]
    fn parse_denied_response() {
        let json = r#"{
            "error_message": "The provided API key is invalid.",
            "rows": [],
            "status": "REQUEST_DENIED"
        }"#;
        let response: DistanceMatrixResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "REQUEST_DENIED");
        assert!(response.first_element().is_none());
        assert!(response.error_message.is_some());
    }
}
