use hqta_core::model::DirectionKey;
use serde::{Deserialize, Serialize};
use wkt::ToWkt;

use crate::algorithm::{
    corridor::{CorridorSegment, DirectionalIntervals, SegmentKind},
    frequency::DirectionalTrips,
};

/// a corridor segment as written to corridors.json, with a WKT geometry.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SegmentRecord {
    pub segment_id: String,
    pub agency: String,
    pub direction: DirectionKey,
    pub kind: SegmentKind,
    pub geometry: String,
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

impl From<&CorridorSegment> for SegmentRecord {
    fn from(segment: &CorridorSegment) -> Self {
        SegmentRecord {
            segment_id: segment.segment_id.clone(),
            agency: segment.agency.clone(),
            direction: segment.direction,
            kind: segment.kind,
            geometry: segment.geometry.wkt_string(),
            length_feet: segment.length_feet,
            route_ids: segment.route_ids.clone(),
            shape_ids: segment.shape_ids.clone(),
            route_count: segment.route_count,
            trips_am: segment.trips_am,
            trips_pm: segment.trips_pm,
            intervals_am: segment.intervals_am,
            intervals_pm: segment.intervals_pm,
            qualifies: segment.qualifies,
        }
    }
}
