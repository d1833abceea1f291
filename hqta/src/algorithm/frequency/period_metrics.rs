use serde::{Deserialize, Serialize};

use super::DirectionalTrips;

/// service observed during one peak window.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PeriodMetrics {
    /// distinct trips in the window
    pub trips: usize,
    /// distinct routes in the window
    pub routes: usize,
    pub duration_minutes: f64,
    /// trips by direction bucket
    pub direction_trips: DirectionalTrips,
    /// true when every trip carried a direction, in which case the interval is
    /// computed from the busiest direction
    pub direction_split: bool,
    /// minutes between trips. infinite (serialized as null) when there is no service.
    #[serde(with = "crate::algorithm::frequency::interval_serde")]
    pub interval_minutes: f64,
}

impl PeriodMetrics {
    /// metrics of a window without service
    pub fn empty(duration_minutes: f64) -> PeriodMetrics {
        PeriodMetrics {
            trips: 0,
            routes: 0,
            duration_minutes,
            direction_trips: DirectionalTrips::default(),
            direction_split: false,
            interval_minutes: f64::INFINITY,
        }
    }

    /// the trip count the interval is computed from
    pub fn interval_trips(&self) -> usize {
        if self.direction_split {
            self.direction_trips.dir0.max(self.direction_trips.dir1)
        } else {
            self.trips
        }
    }
}

/// average minutes between trips over a window. infinite when there are no trips.
pub fn compute_interval(duration_minutes: f64, trips: usize) -> f64 {
    if trips == 0 {
        f64::INFINITY
    } else {
        duration_minutes / trips as f64
    }
}
