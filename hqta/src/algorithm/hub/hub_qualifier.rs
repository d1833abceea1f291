use std::collections::{BTreeMap, BTreeSet, HashSet};

use hqta_core::{
    error::QualificationError,
    geometry::GeometryEngine,
    model::{FeedTables, LocationType},
};
use itertools::Itertools;
use rayon::prelude::*;

use super::{ClusterEvaluation, Hub, HubKind};
use crate::{
    algorithm::{
        clustering::{cluster_stops, ClusterAssignment, StopCluster},
        frequency::{stop_set_metrics, PeakService},
        overlap::{verify_route_overlap, StreetNameParser},
    },
    config::{AgencyProfile, HqtaConfig, RailStationRule},
};

/// the hubs found in a feed snapshot along with the intermediate clustering results.
pub struct HubQualification {
    pub hubs: Vec<Hub>,
    pub clusters: ClusterAssignment,
    pub evaluations: Vec<ClusterEvaluation>,
}

impl HubQualification {
    pub fn rail_hubs(&self) -> impl Iterator<Item = &Hub> {
        self.hubs.iter().filter(|h| h.kind == HubKind::Rail)
    }

    pub fn bus_hubs(&self) -> impl Iterator<Item = &Hub> {
        self.hubs.iter().filter(|h| h.kind == HubKind::Bus)
    }
}

/// finds the qualifying hubs of a feed snapshot.
///
/// rail stations of each agency qualify unconditionally. all other boarding stops
/// are clustered, and a cluster qualifies when it has enough routes, frequent
/// enough service and routes that meet on a common street.
///
/// # Arguments
///
/// * `tables`  - feed snapshot
/// * `config`  - validated run configuration
/// * `service` - peak service of the snapshot
/// * `engine`  - geometry operations
pub fn qualify_hubs(
    tables: &FeedTables,
    config: &HqtaConfig,
    service: &PeakService,
    engine: &dyn GeometryEngine,
) -> Result<HubQualification, QualificationError> {
    let mut hubs = vec![];
    let mut rail_stop_ids: HashSet<String> = HashSet::new();
    for agency in tables.agencies() {
        let profile = config.profile(&agency).cloned().unwrap_or_else(|| {
            log::debug!("no profile for agency '{agency}', assuming no rail service");
            AgencyProfile::new(&agency, RailStationRule::None)
        });
        let stations = profile.identify_rail_stations(tables);
        let station_stops = profile.rail_stop_ids(&stations, tables);
        for station_id in stations.iter() {
            let Some(location) = tables.get_stop(station_id).and_then(|s| s.valid_point()) else {
                continue;
            };
            let members = station_stops
                .iter()
                .filter(|id| {
                    *id == station_id
                        || tables
                            .get_stop(id)
                            .and_then(|s| s.parent_station.as_ref())
                            .map(|p| p == station_id)
                            .unwrap_or(false)
                })
                .cloned()
                .sorted()
                .collect_vec();
            hubs.push(Hub {
                hub_id: format!("rail:{station_id}"),
                kind: HubKind::Rail,
                agencies: vec![agency.clone()],
                location,
                metrics: stop_set_metrics(&members, service),
                stop_ids: members,
                overlap: None,
            });
        }
        rail_stop_ids.extend(station_stops);
    }
    log::info!("identified {} rail station hubs", hubs.len());

    let bus_stops = tables
        .stops()
        .iter()
        .filter(|s| s.location_type == LocationType::Platform && !rail_stop_ids.contains(&s.stop_id))
        .collect_vec();
    let clusters = cluster_stops(&bus_stops, config.cluster_radius(), engine)?;

    let parser = StreetNameParser::new()?;
    let evaluations = clusters
        .clusters
        .par_iter()
        .map(|cluster| evaluate_cluster(cluster, tables, config, service, &parser))
        .collect::<Vec<_>>();

    for (cluster, evaluation) in clusters.clusters.iter().zip(evaluations.iter()) {
        if !evaluation.qualifies() {
            continue;
        }
        let agencies = cluster
            .stop_ids
            .iter()
            .filter_map(|id| tables.get_stop(id))
            .map(|s| s.agency.clone())
            .sorted()
            .dedup()
            .collect_vec();
        hubs.push(Hub {
            hub_id: format!("bus:{}", cluster.cluster_id),
            kind: HubKind::Bus,
            agencies,
            location: cluster.centroid,
            stop_ids: cluster.stop_ids.clone(),
            metrics: evaluation.metrics.clone(),
            overlap: evaluation.overlap.clone(),
        });
    }

    let n_passing_service = evaluations
        .iter()
        .filter(|e| e.qualifies_routes && e.qualifies_frequency)
        .count();
    let result = HubQualification {
        hubs,
        clusters,
        evaluations,
    };
    log::info!(
        "{} of {} clusters passed the route and frequency tests, {} verified as bus hubs",
        n_passing_service,
        result.clusters.clusters.len(),
        result.bus_hubs().count()
    );
    Ok(result)
}

/// tests a single bus stop cluster. the street overlap check only runs for clusters
/// passing both the route count and the frequency tests.
pub fn evaluate_cluster(
    cluster: &StopCluster,
    tables: &FeedTables,
    config: &HqtaConfig,
    service: &PeakService,
    parser: &StreetNameParser,
) -> ClusterEvaluation {
    let metrics = stop_set_metrics(&cluster.stop_ids, service);
    let qualifies_routes = metrics.qualifies_routes(config.min_hub_routes);
    let qualifies_frequency = metrics.qualifies_frequency(config.frequency_threshold_minutes);
    let overlap = if qualifies_routes && qualifies_frequency {
        let mut route_stop_names: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for stop_id in cluster.stop_ids.iter() {
            let Some(stop) = tables.get_stop(stop_id) else {
                continue;
            };
            for route_id in service.routes_at_stop(stop_id) {
                route_stop_names
                    .entry(route_id.to_string())
                    .or_default()
                    .insert(stop.name.clone());
            }
        }
        Some(verify_route_overlap(&route_stop_names, parser))
    } else {
        None
    };
    ClusterEvaluation {
        cluster_id: cluster.cluster_id,
        metrics,
        qualifies_routes,
        qualifies_frequency,
        overlap,
    }
}
