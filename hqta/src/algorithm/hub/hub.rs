use geo::Point;
use serde::{Deserialize, Serialize};

use crate::algorithm::{
    clustering::ClusterId, frequency::QualificationMetrics, overlap::RouteOverlap,
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HubKind {
    Rail,
    Bus,
}

impl std::fmt::Display for HubKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HubKind::Rail => write!(f, "rail"),
            HubKind::Bus => write!(f, "bus"),
        }
    }
}

/// a qualifying hub.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Hub {
    pub hub_id: String,
    pub kind: HubKind,
    pub agencies: Vec<String>,
    /// WGS84 location: the station, or the cluster centroid
    pub location: Point<f64>,
    pub stop_ids: Vec<String>,
    pub metrics: QualificationMetrics,
    /// street overlap evidence, for bus hubs
    pub overlap: Option<RouteOverlap>,
}

/// the outcome of testing one bus stop cluster.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClusterEvaluation {
    pub cluster_id: ClusterId,
    pub metrics: QualificationMetrics,
    pub qualifies_routes: bool,
    pub qualifies_frequency: bool,
    /// only computed for clusters passing both the route and frequency tests
    pub overlap: Option<RouteOverlap>,
}

impl ClusterEvaluation {
    pub fn qualifies(&self) -> bool {
        self.qualifies_routes
            && self.qualifies_frequency
            && self.overlap.as_ref().map(|o| o.has_overlap).unwrap_or(false)
    }
}
