use std::collections::BTreeSet;

use hqta_core::model::FeedTables;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{algorithm::qualification_ops::QualificationResult, config::HqtaConfig};

/// summarizes a qualification run.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QualificationSummary {
    /// information describing how this run was produced
    pub source: RunSource,
    /// counts over all agencies
    pub totals: AgencyStats,
    /// counts for each agency, sorted by agency
    pub agencies: IndexMap<String, AgencyStats>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "snake_case")]
pub struct RunSource {
    /// GTFS inputs as path=agency pairs
    pub inputs: Vec<String>,
    /// date and time this run was created
    pub created: String,
    pub config: HqtaConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct AgencyStats {
    /// stops assigned to a bus stop cluster
    pub stops_clustered: usize,
    /// clusters containing a stop of the agency
    pub clusters: usize,
    pub rail_hubs: usize,
    pub bus_hubs: usize,
    pub segments: usize,
    pub qualifying_segments: usize,
    /// total miles of qualifying segments
    pub qualifying_miles: f64,
}

impl RunSource {
    pub fn new(inputs: &[String], config: &HqtaConfig) -> Self {
        Self {
            inputs: inputs.to_vec(),
            created: chrono::Utc::now().to_rfc3339(),
            config: config.clone(),
        }
    }
}

impl QualificationSummary {
    pub fn new(source: RunSource, result: &QualificationResult, tables: &FeedTables) -> Self {
        let agencies = tables
            .agencies()
            .into_iter()
            .map(|agency| {
                let stats = AgencyStats::new(result, tables, |a| a == agency);
                (agency, stats)
            })
            .collect();
        let totals = AgencyStats::new(result, tables, |_| true);
        QualificationSummary {
            source,
            totals,
            agencies,
        }
    }
}

impl AgencyStats {
    /// counts the results belonging to the agencies accepted by the predicate
    fn new(result: &QualificationResult, tables: &FeedTables, accept: impl Fn(&str) -> bool) -> Self {
        let clusters = &result.hubs.clusters;
        let stop_accepted = |stop_id: &String| {
            tables
                .get_stop(stop_id)
                .map(|s| accept(&s.agency))
                .unwrap_or(false)
        };
        let stops_clustered = clusters
            .clusters
            .iter()
            .flat_map(|c| c.stop_ids.iter())
            .filter(|id| stop_accepted(id))
            .count();
        let cluster_ids: BTreeSet<_> = clusters
            .clusters
            .iter()
            .filter(|c| c.stop_ids.iter().any(|id| stop_accepted(id)))
            .map(|c| c.cluster_id)
            .collect();
        let hub_accepted = |agencies: &[String]| agencies.iter().any(|a| accept(a));
        let rail_hubs = result
            .hubs
            .rail_hubs()
            .filter(|h| hub_accepted(&h.agencies))
            .count();
        let bus_hubs = result
            .hubs
            .bus_hubs()
            .filter(|h| hub_accepted(&h.agencies))
            .count();
        let segments = result
            .segments
            .iter()
            .filter(|s| accept(&s.agency))
            .collect::<Vec<_>>();
        let qualifying = segments.iter().filter(|s| s.qualifies).collect::<Vec<_>>();
        AgencyStats {
            stops_clustered,
            clusters: cluster_ids.len(),
            rail_hubs,
            bus_hubs,
            segments: segments.len(),
            qualifying_segments: qualifying.len(),
            qualifying_miles: qualifying.iter().map(|s| s.length_miles()).sum(),
        }
    }
}
