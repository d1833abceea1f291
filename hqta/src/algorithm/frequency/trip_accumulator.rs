use std::collections::{HashMap, HashSet};

use hqta_core::model::{DirectionKey, Trip};

use super::{compute_interval, DirectionalTrips, PeriodMetrics};

/// collects the distinct trips and routes of a group (a cluster, a route) within one
/// peak window.
#[derive(Debug, Default)]
pub struct TripAccumulator<'a> {
    trips: HashMap<&'a str, DirectionKey>,
    routes: HashSet<&'a str>,
    undirected_trips: usize,
}

impl<'a> TripAccumulator<'a> {
    pub fn new() -> TripAccumulator<'a> {
        TripAccumulator::default()
    }

    pub fn add(&mut self, trip: &'a Trip) {
        let key = DirectionKey::from(trip.direction);
        if self.trips.insert(trip.trip_id.as_str(), key).is_none() {
            self.routes.insert(trip.route_id.as_str());
            if trip.direction.is_none() {
                self.undirected_trips += 1;
            }
        }
    }

    /// metrics over a window of the given duration. when every trip carries a
    /// direction the interval comes from the busiest direction, otherwise from
    /// all trips.
    pub fn finish(&self, duration_minutes: f64) -> PeriodMetrics {
        let mut direction_trips = DirectionalTrips::default();
        for key in self.trips.values() {
            direction_trips.add(*key, 1);
        }
        let direction_split = !self.trips.is_empty() && self.undirected_trips == 0;
        let mut metrics = PeriodMetrics {
            trips: self.trips.len(),
            routes: self.routes.len(),
            duration_minutes,
            direction_trips,
            direction_split,
            interval_minutes: f64::INFINITY,
        };
        metrics.interval_minutes = compute_interval(duration_minutes, metrics.interval_trips());
        metrics
    }
}

#[cfg(test)]
mod test {
    use super::TripAccumulator;
    use hqta_core::model::{TravelDirection, Trip};

    #[test]
    fn test_busiest_direction() {
        let trips = (0..6)
            .map(|i| {
                let direction = if i < 4 {
                    TravelDirection::Zero
                } else {
                    TravelDirection::One
                };
                Trip::new(&format!("t{i}"), "r1", "a").with_direction(direction)
            })
            .collect::<Vec<_>>();
        let mut acc = TripAccumulator::new();
        for trip in trips.iter() {
            acc.add(trip);
            acc.add(trip);
        }
        let metrics = acc.finish(120.0);
        assert_eq!(metrics.trips, 6);
        assert_eq!(metrics.routes, 1);
        assert!(metrics.direction_split);
        assert_eq!(metrics.direction_trips.dir0, 4);
        assert_eq!(metrics.interval_minutes, 30.0);
    }

    #[test]
    fn test_missing_direction_uses_all_trips() {
        let trips = vec![
            Trip::new("t1", "r1", "a").with_direction(TravelDirection::Zero),
            Trip::new("t2", "r1", "a"),
            Trip::new("t3", "r2", "a"),
            Trip::new("t4", "r2", "a"),
        ];
        let mut acc = TripAccumulator::new();
        trips.iter().for_each(|t| acc.add(t));
        let metrics = acc.finish(120.0);
        assert!(!metrics.direction_split);
        assert_eq!(metrics.direction_trips.combined, 3);
        assert_eq!(metrics.routes, 2);
        assert_eq!(metrics.interval_minutes, 30.0);
    }
}
