use std::collections::{HashMap, HashSet, VecDeque};

use geo::{Centroid, MultiPoint, Point};
use hqta_core::{
    error::QualificationError,
    geometry::{GeometryEngine, PointBuffer},
    model::Stop,
};
use itertools::Itertools;
use kdam::{Bar, BarExt};
use rstar::{primitives::GeomWithData, RTree, RTreeObject};
use uom::si::f64::Length;

use super::{ClusterAssignment, ClusterId, StopCluster};

type UndirectedAdjacencyList = HashMap<usize, HashSet<usize>>;

/// groups stops into clusters of transitively-neighboring stops. two stops neighbor
/// each other when they are no more than `radius` apart, which is tested by buffering
/// each stop by half of the radius and intersecting the buffers. buffers are geodesic,
/// so feeds spanning several regions cluster the same way as a single city.
///
/// stops are visited in stop id order so that cluster ids are stable across runs.
/// stops without a valid location are excluded with a warning.
///
/// # Arguments
///
/// * `stops`  - stops to cluster
/// * `radius` - maximum distance between neighboring stops
/// * `engine` - geometry operations
///
/// # Returns
///
/// the assignment of stops to clusters
pub fn cluster_stops(
    stops: &[&Stop],
    radius: Length,
    engine: &dyn GeometryEngine,
) -> Result<ClusterAssignment, QualificationError> {
    let mut excluded = vec![];
    let mut located: Vec<(&Stop, Point<f64>)> = vec![];
    for stop in stops.iter().sorted_by(|a, b| a.stop_id.cmp(&b.stop_id)) {
        match stop.valid_point() {
            Some(point) => located.push((*stop, point)),
            None => {
                log::warn!(
                    "stop '{}' ({}) has no valid location, excluding from clustering",
                    stop.stop_id,
                    stop.name
                );
                excluded.push(stop.stop_id.clone());
            }
        }
    }
    if located.is_empty() {
        log::info!("no stops with valid locations to cluster");
        return Ok(ClusterAssignment::new(vec![], excluded));
    }

    let buffers = located
        .iter()
        .map(|(_, p)| engine.buffer_point(*p, radius / 2.0))
        .collect_vec();
    let adjacency = build_adjacency(&buffers, engine);

    let mut bar = Bar::builder()
        .total(located.len())
        .desc(format!(
            "stop clustering ({} feet)",
            radius.get::<uom::si::length::foot>()
        ))
        .build()
        .map_err(QualificationError::Internal)?;

    let mut assigned: HashSet<usize> = HashSet::new();
    let mut clusters = vec![];
    for idx in 0..located.len() {
        if !assigned.contains(&idx) {
            let component = bfs_undirected(idx, &adjacency);
            assigned.extend(component.iter().copied());
            let cluster_id = ClusterId(clusters.len());
            if let Some(cluster) = build_cluster(cluster_id, &component, &located) {
                clusters.push(cluster);
            }
        }
        let _ = bar.update(1);
    }
    eprintln!();

    log::info!(
        "clustered {} stops into {} clusters, {} stops excluded",
        located.len(),
        clusters.len(),
        excluded.len()
    );
    Ok(ClusterAssignment::new(clusters, excluded))
}

/// pairs of stops whose buffers intersect. candidates come from an R-tree query
/// over the buffer envelopes.
fn build_adjacency(buffers: &[PointBuffer], engine: &dyn GeometryEngine) -> UndirectedAdjacencyList {
    let tree = RTree::bulk_load(
        buffers
            .iter()
            .enumerate()
            .map(|(idx, b)| GeomWithData::new(*b, idx))
            .collect_vec(),
    );
    let mut adjacency: UndirectedAdjacencyList = HashMap::new();
    for (idx, buffer) in buffers.iter().enumerate() {
        for candidate in tree.locate_in_envelope_intersecting(&buffer.envelope()) {
            if candidate.data > idx && engine.buffers_intersect(buffer, candidate.geom()) {
                add_undirected_edge(idx, candidate.data, &mut adjacency);
            }
        }
    }
    adjacency
}

fn add_undirected_edge(src: usize, dst: usize, g: &mut UndirectedAdjacencyList) {
    g.entry(src).or_default().insert(dst);
    g.entry(dst).or_default().insert(src);
}

/// breadth-first search for every stop reachable from the source. the result is sorted.
fn bfs_undirected(source: usize, graph: &UndirectedAdjacencyList) -> Vec<usize> {
    let mut visited: HashSet<usize> = HashSet::from([source]);
    let mut frontier: VecDeque<usize> = graph.get(&source).into_iter().flatten().copied().collect();
    while let Some(next) = frontier.pop_front() {
        if visited.insert(next) {
            for n in graph.get(&next).into_iter().flatten() {
                if !visited.contains(n) {
                    frontier.push_back(*n);
                }
            }
        }
    }
    visited.into_iter().sorted().collect_vec()
}

/// a cluster over the component's stops, located at the centroid of its members.
/// None for an empty component.
fn build_cluster(
    cluster_id: ClusterId,
    component: &[usize],
    located: &[(&Stop, Point<f64>)],
) -> Option<StopCluster> {
    let centroid = component
        .iter()
        .map(|idx| located[*idx].1)
        .collect::<MultiPoint<f64>>()
        .centroid()?;
    let stop_ids = component
        .iter()
        .map(|idx| located[*idx].0.stop_id.clone())
        .sorted()
        .collect_vec();
    Some(StopCluster {
        cluster_id,
        stop_ids,
        centroid,
        member_count: component.len(),
    })
}
