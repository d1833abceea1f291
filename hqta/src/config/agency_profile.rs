use std::collections::{BTreeSet, HashSet};

use hqta_core::{config::BoundingBox, error::QualificationError, model::FeedTables};
use serde::{Deserialize, Serialize};

use super::RailStationRule;

/// agency-specific qualification settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AgencyProfile {
    pub agency: String,
    #[serde(default)]
    pub rail: RailStationRule,
    /// stations outside of this extent are not considered, which removes
    /// stations across a border that are served by the same feed
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
}

impl AgencyProfile {
    pub fn new(agency: &str, rail: RailStationRule) -> AgencyProfile {
        AgencyProfile {
            agency: agency.to_string(),
            rail,
            bbox: None,
        }
    }

    pub fn validate(&self) -> Result<(), QualificationError> {
        if let Some(bbox) = &self.bbox {
            bbox.validate()?;
        }
        Ok(())
    }

    /// finds the rail stations of this agency. stations without a valid location
    /// or outside of the profile bounding box are dropped.
    pub fn identify_rail_stations(&self, tables: &FeedTables) -> BTreeSet<String> {
        let stations = self.rail.stations(&self.agency, tables);
        let n_found = stations.len();
        let result: BTreeSet<String> = stations
            .into_iter()
            .filter(|id| {
                let point = tables.get_stop(id).and_then(|s| s.valid_point());
                match (point, &self.bbox) {
                    (None, _) => {
                        log::warn!("rail station '{id}' has no valid location, skipping");
                        false
                    }
                    (Some(p), Some(bbox)) => bbox.covers(&p),
                    (Some(_), None) => true,
                }
            })
            .collect();
        if result.len() < n_found {
            log::info!(
                "agency '{}': kept {} of {n_found} rail stations",
                self.agency,
                result.len()
            );
        }
        result
    }

    /// the rail stations and every stop whose parent is one of them
    pub fn rail_stop_ids(&self, stations: &BTreeSet<String>, tables: &FeedTables) -> HashSet<String> {
        tables
            .stops()
            .iter()
            .filter(|s| {
                stations.contains(&s.stop_id)
                    || s.parent_station
                        .as_ref()
                        .map(|p| stations.contains(p))
                        .unwrap_or(false)
            })
            .map(|s| s.stop_id.clone())
            .collect()
    }
}
