use std::collections::{BTreeSet, HashSet};

use hqta_core::model::{FeedTables, LocationType, RouteType, Stop};
use serde::{Deserialize, Serialize};

/// how the rail stations of an agency are identified.
///
/// # Example
///
/// ```toml
/// rail = { type = "route_type", route_types = ["tram", "subway", "rail"] }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum RailStationRule {
    /// every stop tagged as a station, plus the parent stations of platforms
    ParentStation,
    /// stops served by routes of the listed route types. platforms resolve to
    /// their parent station when one exists.
    RouteType {
        #[serde(default = "RouteType::default_rail_types")]
        route_types: Vec<RouteType>,
    },
    /// an explicit list of station stop ids. ids may be given with or without
    /// the agency prefix.
    StopIds { stop_ids: Vec<String> },
    /// the agency operates no rail service
    #[default]
    None,
}

impl RailStationRule {
    /// the stop ids of the rail stations of an agency, before any spatial filtering
    pub fn stations(&self, agency: &str, tables: &FeedTables) -> BTreeSet<String> {
        let agency_stops = || tables.stops().iter().filter(move |s| s.agency == agency);
        match self {
            RailStationRule::ParentStation => agency_stops()
                .filter_map(|s| match s.location_type {
                    LocationType::Station => Some(s.stop_id.clone()),
                    LocationType::Platform => s
                        .parent_station
                        .as_ref()
                        .filter(|p| tables.get_stop(p).is_some())
                        .cloned(),
                    _ => None,
                })
                .collect(),
            RailStationRule::RouteType { route_types } => {
                let routes: HashSet<&str> = tables
                    .routes()
                    .iter()
                    .filter(|r| r.agency == agency && route_types.contains(&r.route_type))
                    .map(|r| r.route_id.as_str())
                    .collect();
                let trips: HashSet<&str> = tables
                    .trips()
                    .iter()
                    .filter(|t| routes.contains(t.route_id.as_str()))
                    .map(|t| t.trip_id.as_str())
                    .collect();
                tables
                    .stop_times()
                    .iter()
                    .filter(|st| trips.contains(st.trip_id.as_str()))
                    .filter_map(|st| tables.get_stop(&st.stop_id))
                    .map(|stop| station_of(stop, tables))
                    .collect()
            }
            RailStationRule::StopIds { stop_ids } => stop_ids
                .iter()
                .filter_map(|id| {
                    let prefixed = format!("{agency}:{id}");
                    tables
                        .get_stop(id)
                        .or_else(|| tables.get_stop(&prefixed))
                        .filter(|s| s.agency == agency)
                })
                .map(|s| s.stop_id.clone())
                .collect(),
            RailStationRule::None => BTreeSet::new(),
        }
    }
}

/// the parent station of a stop when it has one, otherwise the stop itself
fn station_of(stop: &Stop, tables: &FeedTables) -> String {
    stop.parent_station
        .as_ref()
        .and_then(|p| tables.get_stop(p))
        .map(|p| p.stop_id.clone())
        .unwrap_or_else(|| stop.stop_id.clone())
}
