//! spatial clustering of stops into candidate hubs.
mod stop_cluster;
mod stop_clusterer;

pub use stop_cluster::{ClusterAssignment, ClusterId, StopCluster};
pub use stop_clusterer::cluster_stops;
