use std::collections::HashMap;

use geo::Point;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub usize);

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// stops connected through chains of neighbors within the clustering radius.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StopCluster {
    pub cluster_id: ClusterId,
    /// member stop ids, sorted
    pub stop_ids: Vec<String>,
    /// WGS84 mean location of the members
    pub centroid: Point<f64>,
    pub member_count: usize,
}

/// the result of clustering: every stop with a valid location belongs to exactly one
/// cluster. stops without a valid location are listed as excluded.
#[derive(Clone, Debug, Default)]
pub struct ClusterAssignment {
    pub clusters: Vec<StopCluster>,
    pub excluded: Vec<String>,
    stop_lookup: HashMap<String, ClusterId>,
}

impl ClusterAssignment {
    pub fn new(clusters: Vec<StopCluster>, excluded: Vec<String>) -> ClusterAssignment {
        let stop_lookup = clusters
            .iter()
            .flat_map(|c| c.stop_ids.iter().map(|s| (s.clone(), c.cluster_id)))
            .collect();
        ClusterAssignment {
            clusters,
            excluded,
            stop_lookup,
        }
    }

    pub fn cluster_of(&self, stop_id: &str) -> Option<ClusterId> {
        self.stop_lookup.get(stop_id).copied()
    }

    pub fn n_stops(&self) -> usize {
        self.stop_lookup.len()
    }
}
