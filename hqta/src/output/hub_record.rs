use serde::{Deserialize, Serialize};
use wkt::ToWkt;

use crate::algorithm::{
    frequency::QualificationMetrics,
    hub::{Hub, HubKind},
    overlap::RouteOverlap,
};

/// a hub as written to hubs.json, with its location as a WKT point.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HubRecord {
    pub hub_id: String,
    pub kind: HubKind,
    pub agencies: Vec<String>,
    pub lon: f64,
    pub lat: f64,
    pub geometry: String,
    pub stop_ids: Vec<String>,
    pub metrics: QualificationMetrics,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overlap: Option<RouteOverlap>,
}

impl From<&Hub> for HubRecord {
    fn from(hub: &Hub) -> Self {
        HubRecord {
            hub_id: hub.hub_id.clone(),
            kind: hub.kind,
            agencies: hub.agencies.clone(),
            lon: hub.location.x(),
            lat: hub.location.y(),
            geometry: hub.location.wkt_string(),
            stop_ids: hub.stop_ids.clone(),
            metrics: hub.metrics.clone(),
            overlap: hub.overlap.clone(),
        }
    }
}
