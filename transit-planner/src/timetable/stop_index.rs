//! Radius search over the stop table.
//!
//! Stops live in an R-tree keyed on `[lon, lat]` degrees. A radius query
//! first takes every stop inside a bounding box around the search circle,
//! then keeps those within the radius by haversine distance.

use std::collections::HashMap;
use std::sync::Arc;

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use crate::domain::{Coordinate, EARTH_RADIUS_METERS, Stop, StopId, distance_meters};

use super::error::TimetableError;

/// A stop found by a radius search, with its straight-line distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStop {
    pub stop: Arc<Stop>,
    pub distance_meters: f64,
}

/// Stops indexed by id, searchable by distance from a point.
#[derive(Debug, Clone, Default)]
pub struct StopIndex {
    /// Stops sorted by id so scans are deterministic.
    stops: Vec<Arc<Stop>>,

    by_id: HashMap<StopId, usize>,

    /// Positions of `stops`, as indices into it.
    tree: RTree<GeomWithData<[f64; 2], usize>>,
}

/// Slack on the bounding box so rounding never clips a stop on the edge.
const ENVELOPE_SLACK: f64 = 1.001;

/// Box around every point within `radius_meters` of `point`.
///
/// `None` when the circle reaches a pole or crosses the antimeridian; the
/// caller then has to look at every stop.
fn search_envelope(point: Coordinate, radius_meters: f64) -> Option<AABB<[f64; 2]>> {
    let angle = radius_meters.max(0.0) / EARTH_RADIUS_METERS;
    // Widest longitude offset of a spherical cap centred at this latitude
    let sin_lon = angle.sin() / point.lat.to_radians().cos();
    if sin_lon.is_nan() || sin_lon >= 1.0 {
        return None;
    }

    let dlat = angle.to_degrees() * ENVELOPE_SLACK;
    let dlon = sin_lon.asin().to_degrees() * ENVELOPE_SLACK;
    if point.lon - dlon < -180.0 || point.lon + dlon > 180.0 {
        return None;
    }

    Some(AABB::from_corners(
        [point.lon - dlon, point.lat - dlat],
        [point.lon + dlon, point.lat + dlat],
    ))
}

impl StopIndex {
    /// Build the index. A repeated stop id keeps the first row.
    pub fn new(stops: Vec<Stop>) -> Self {
        let mut stops: Vec<Arc<Stop>> = stops.into_iter().map(Arc::new).collect();
        stops.sort_by(|a, b| a.id.cmp(&b.id));
        stops.dedup_by(|later, earlier| {
            let dup = later.id == earlier.id;
            if dup {
                tracing::warn!(stop = %later.id, "duplicate stop id, keeping first");
            }
            dup
        });

        let by_id = stops
            .iter()
            .enumerate()
            .map(|(idx, stop)| (stop.id.clone(), idx))
            .collect();

        let points = stops
            .iter()
            .enumerate()
            .map(|(idx, stop)| GeomWithData::new([stop.lon, stop.lat], idx))
            .collect();
        let tree = RTree::bulk_load(points);

        Self { stops, by_id, tree }
    }

    /// Look up a stop by id.
    pub fn get(&self, id: &StopId) -> Option<&Arc<Stop>> {
        self.by_id.get(id).map(|&idx| &self.stops[idx])
    }

    pub fn contains(&self, id: &StopId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Every stop within `radius_meters` of `point`, nearest first.
    ///
    /// Equal distances are ordered by stop id. Fails with `NoStopsNearby`
    /// when nothing is in range.
    pub fn nearby_stops(
        &self,
        point: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<NearbyStop>, TimetableError> {
        let in_box: Vec<usize> = match search_envelope(point, radius_meters) {
            Some(envelope) => self
                .tree
                .locate_in_envelope(&envelope)
                .map(|entry| entry.data)
                .collect(),
            None => (0..self.stops.len()).collect(),
        };

        let mut nearby: Vec<NearbyStop> = in_box
            .into_iter()
            .filter_map(|idx| {
                let stop = &self.stops[idx];
                let distance = distance_meters(point, stop.coordinate());
                (distance <= radius_meters).then(|| NearbyStop {
                    stop: stop.clone(),
                    distance_meters: distance,
                })
            })
            .collect();

        if nearby.is_empty() {
            return Err(TimetableError::NoStopsNearby { radius_meters });
        }

        nearby.sort_by(|a, b| {
            a.distance_meters
                .total_cmp(&b.distance_meters)
                .then_with(|| a.stop.id.cmp(&b.stop.id))
        });
        Ok(nearby)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Roughly 111 m per 0.001 degree of latitude
    fn index() -> StopIndex {
        StopIndex::new(vec![
            Stop::new("far", "Far Stop", 49.010, -123.0),
            Stop::new("b", "B Stop", 49.001, -123.0),
            Stop::new("a", "A Stop", 49.001, -123.0),
            Stop::new("near", "Near Stop", 49.0005, -123.0),
        ])
    }

    #[test]
    fn sorted_by_distance_then_id() {
        let idx = index();
        let found = idx.nearby_stops(Coordinate::new(49.0, -123.0), 200.0).unwrap();
        let ids: Vec<&str> = found.iter().map(|n| n.stop.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "a", "b"]);
    }

    #[test]
    fn excludes_stops_outside_radius() {
        let idx = index();
        let found = idx.nearby_stops(Coordinate::new(49.0, -123.0), 100.0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].stop.id.as_str(), "near");
        assert!(found[0].distance_meters <= 100.0);
    }

    #[test]
    fn empty_result_is_error() {
        let idx = index();
        let result = idx.nearby_stops(Coordinate::new(0.0, 0.0), 500.0);
        assert!(matches!(result, Err(TimetableError::NoStopsNearby { .. })));
    }

    #[test]
    fn lookup_by_id() {
        let idx = index();
        assert_eq!(idx.len(), 4);
        assert_eq!(idx.get(&StopId::new("a")).unwrap().name, "A Stop");
        assert!(idx.get(&StopId::new("zzz")).is_none());
    }

    #[test]
    fn search_near_antimeridian_and_pole() {
        let idx = StopIndex::new(vec![
            Stop::new("west", "West", 10.0, 179.9995),
            Stop::new("east", "East", 10.0, -179.9995),
            Stop::new("pole", "Pole", 89.9995, 45.0),
        ]);

        let found = idx.nearby_stops(Coordinate::new(10.0, 179.9999), 200.0).unwrap();
        let ids: Vec<&str> = found.iter().map(|n| n.stop.id.as_str()).collect();
        assert_eq!(ids, vec!["west", "east"]);

        let found = idx.nearby_stops(Coordinate::new(89.9995, -135.0), 200.0).unwrap();
        assert_eq!(found[0].stop.id.as_str(), "pole");
    }

    #[test]
    fn envelope_covers_the_circle() {
        let point = Coordinate::new(49.0, -123.0);
        let envelope = search_envelope(point, 800.0).unwrap();
        let lower = envelope.lower();
        let upper = envelope.upper();
        assert!(lower[0] < -123.0 && upper[0] > -123.0);
        // 800 m is about 0.0072 degrees of latitude
        assert!(upper[1] - 49.0 > 0.0072 && upper[1] - 49.0 < 0.0073);
        assert!(search_envelope(Coordinate::new(90.0, 0.0), 800.0).is_none());
        assert!(search_envelope(Coordinate::new(0.0, 180.0), 800.0).is_none());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let idx = StopIndex::new(vec![
            Stop::new("x", "First", 49.0, -123.0),
            Stop::new("x", "Second", 50.0, -123.0),
        ]);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.get(&StopId::new("x")).unwrap().name, "First");
    }
}
