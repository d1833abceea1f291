use serde::{Deserialize, Serialize};

use super::{compute_interval, PeriodMetrics};

/// AM and PM service at a hub candidate along with their combination.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QualificationMetrics {
    pub am: PeriodMetrics,
    pub pm: PeriodMetrics,
    /// the larger of the AM and PM route counts
    pub routes_total: usize,
    /// AM plus PM trips
    pub trips_total: usize,
    /// combined duration over combined trips
    #[serde(with = "crate::algorithm::frequency::interval_serde")]
    pub interval_combined: f64,
}

impl QualificationMetrics {
    pub fn combine(am: PeriodMetrics, pm: PeriodMetrics) -> QualificationMetrics {
        let routes_total = am.routes.max(pm.routes);
        let trips_total = am.trips + pm.trips;
        let interval_combined =
            compute_interval(am.duration_minutes + pm.duration_minutes, trips_total);
        QualificationMetrics {
            am,
            pm,
            routes_total,
            trips_total,
            interval_combined,
        }
    }

    /// enough routes in either peak
    pub fn qualifies_routes(&self, min_routes: usize) -> bool {
        self.am.routes >= min_routes || self.pm.routes >= min_routes
    }

    /// frequent enough service in either peak
    pub fn qualifies_frequency(&self, threshold_minutes: f64) -> bool {
        self.am.interval_minutes <= threshold_minutes || self.pm.interval_minutes <= threshold_minutes
    }
}
