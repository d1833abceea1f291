use std::collections::HashMap;

use itertools::Itertools;

use super::{Route, RouteShape, Stop, StopTime, Trip};
use crate::error::QualificationError;

/// in-memory snapshot of the normalized input tables. identifiers are expected to be
/// unique across all agencies in the snapshot (upstream normalization prefixes them).
///
/// the tables are never mutated once built; combining feeds produces a new value.
#[derive(Clone, Debug, Default)]
pub struct FeedTables {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    trips: Vec<Trip>,
    stop_times: Vec<StopTime>,
    shapes: Vec<RouteShape>,
    stop_lookup: HashMap<String, usize>,
    route_lookup: HashMap<String, usize>,
    trip_lookup: HashMap<String, usize>,
    shape_lookup: HashMap<String, usize>,
}

impl FeedTables {
    /// builds the snapshot and its id lookups. duplicate identifiers are rejected since
    /// they would make every downstream join ambiguous.
    pub fn new(
        stops: Vec<Stop>,
        routes: Vec<Route>,
        trips: Vec<Trip>,
        stop_times: Vec<StopTime>,
        shapes: Vec<RouteShape>,
    ) -> Result<FeedTables, QualificationError> {
        let stop_lookup = build_lookup("stop", stops.iter().map(|s| s.stop_id.as_str()))?;
        let route_lookup = build_lookup("route", routes.iter().map(|r| r.route_id.as_str()))?;
        let trip_lookup = build_lookup("trip", trips.iter().map(|t| t.trip_id.as_str()))?;
        let shape_lookup = build_lookup("shape", shapes.iter().map(|s| s.shape_id.as_str()))?;
        Ok(FeedTables {
            stops,
            routes,
            trips,
            stop_times,
            shapes,
            stop_lookup,
            route_lookup,
            trip_lookup,
            shape_lookup,
        })
    }

    /// combines two snapshots into a new one.
    pub fn merge(&self, other: &FeedTables) -> Result<FeedTables, QualificationError> {
        FeedTables::new(
            self.stops.iter().chain(other.stops.iter()).cloned().collect_vec(),
            self.routes.iter().chain(other.routes.iter()).cloned().collect_vec(),
            self.trips.iter().chain(other.trips.iter()).cloned().collect_vec(),
            self.stop_times
                .iter()
                .chain(other.stop_times.iter())
                .cloned()
                .collect_vec(),
            self.shapes.iter().chain(other.shapes.iter()).cloned().collect_vec(),
        )
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn stop_times(&self) -> &[StopTime] {
        &self.stop_times
    }

    pub fn shapes(&self) -> &[RouteShape] {
        &self.shapes
    }

    pub fn get_stop(&self, stop_id: &str) -> Option<&Stop> {
        self.stop_lookup.get(stop_id).and_then(|i| self.stops.get(*i))
    }

    pub fn get_route(&self, route_id: &str) -> Option<&Route> {
        self.route_lookup
            .get(route_id)
            .and_then(|i| self.routes.get(*i))
    }

    pub fn get_trip(&self, trip_id: &str) -> Option<&Trip> {
        self.trip_lookup.get(trip_id).and_then(|i| self.trips.get(*i))
    }

    pub fn get_shape(&self, shape_id: &str) -> Option<&RouteShape> {
        self.shape_lookup
            .get(shape_id)
            .and_then(|i| self.shapes.get(*i))
    }

    /// the distinct agencies found on stops and routes, sorted
    pub fn agencies(&self) -> Vec<String> {
        self.stops
            .iter()
            .map(|s| s.agency.clone())
            .chain(self.routes.iter().map(|r| r.agency.clone()))
            .sorted()
            .dedup()
            .collect_vec()
    }
}

fn build_lookup<'a>(
    table: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>, QualificationError> {
    let mut lookup = HashMap::new();
    for (idx, id) in ids.enumerate() {
        if lookup.insert(id.to_string(), idx).is_some() {
            return Err(QualificationError::InvalidData(format!(
                "duplicate {table} id '{id}'"
            )));
        }
    }
    Ok(lookup)
}

#[cfg(test)]
mod test {
    use super::FeedTables;
    use crate::model::{Route, RouteType, Stop};

    #[test]
    fn test_duplicate_ids_rejected() {
        let stops = vec![
            Stop::new("a", "Main & 1st", 34.0, -118.0, "metro"),
            Stop::new("a", "Main & 2nd", 34.1, -118.0, "metro"),
        ];
        let result = FeedTables::new(stops, vec![], vec![], vec![], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_and_lookup() {
        let a = FeedTables::new(
            vec![Stop::new("a:1", "Main & 1st", 34.0, -118.0, "a")],
            vec![Route::new("a:r1", "a", RouteType::Bus)],
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        let b = FeedTables::new(
            vec![Stop::new("b:1", "Main & 1st", 34.0, -118.0, "b")],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.stops().len(), 2);
        assert!(merged.get_stop("b:1").is_some());
        assert!(merged.get_route("a:r1").is_some());
        assert_eq!(merged.agencies(), vec!["a".to_string(), "b".to_string()]);
    }
}
