use geo::MultiLineString;
use hqta_core::model::DirectionKey;
use serde::{Deserialize, Serialize};

use crate::algorithm::frequency::{compute_interval, DirectionalTrips};

/// how a segment was produced.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// a shape that meets no other shape of its group, kept whole
    Isolated,
    /// a run of noded linework shared by one or more shapes
    Noded,
    /// the overlapping shapes of a group that could not be noded
    Unsegmented,
}

/// minutes between trips per direction bucket. infinite when a bucket has no trips.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DirectionalIntervals {
    #[serde(with = "crate::algorithm::frequency::interval_serde")]
    pub dir0: f64,
    #[serde(with = "crate::algorithm::frequency::interval_serde")]
    pub dir1: f64,
    #[serde(with = "crate::algorithm::frequency::interval_serde")]
    pub combined: f64,
}

impl DirectionalIntervals {
    pub fn new(trips: &DirectionalTrips, duration_minutes: f64) -> DirectionalIntervals {
        DirectionalIntervals {
            dir0: compute_interval(duration_minutes, trips.dir0),
            dir1: compute_interval(duration_minutes, trips.dir1),
            combined: compute_interval(duration_minutes, trips.combined),
        }
    }

    pub fn min(&self) -> f64 {
        self.dir0.min(self.dir1).min(self.combined)
    }
}

/// a stretch of route geometry with the combined service of the shapes covering it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CorridorSegment {
    pub segment_id: String,
    pub agency: String,
    pub direction: DirectionKey,
    pub kind: SegmentKind,
    /// WGS84 geometry
    pub geometry: MultiLineString<f64>,
    pub length_feet: f64,
    pub route_ids: Vec<String>,
    pub shape_ids: Vec<String>,
    pub route_count: usize,
    pub trips_am: DirectionalTrips,
    pub trips_pm: DirectionalTrips,
    pub intervals_am: DirectionalIntervals,
    pub intervals_pm: DirectionalIntervals,
    pub qualifies: bool,
}

impl CorridorSegment {
    pub fn length_miles(&self) -> f64 {
        uom::si::f64::Length::new::<uom::si::length::foot>(self.length_feet)
            .get::<uom::si::length::mile>()
    }
}
