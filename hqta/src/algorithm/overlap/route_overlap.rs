use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::StreetNameParser;

/// street-level evidence that the routes of a cluster meet.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RouteOverlap {
    /// true when at least one street is shared by two or more routes
    pub has_overlap: bool,
    /// streets served by two or more routes
    pub shared_streets: BTreeSet<String>,
    /// routes serving at least one shared street
    pub routes_on_shared_streets: BTreeSet<String>,
    /// streets found at the stops of each route
    pub streets_by_route: BTreeMap<String, BTreeSet<String>>,
}

/// checks whether the routes serving a cluster share a street.
///
/// # Arguments
///
/// * `route_stop_names` - for each route serving the cluster, the display names of
///   the member stops it serves
/// * `parser`           - street name extraction
pub fn verify_route_overlap(
    route_stop_names: &BTreeMap<String, BTreeSet<String>>,
    parser: &StreetNameParser,
) -> RouteOverlap {
    let streets_by_route: BTreeMap<String, BTreeSet<String>> = route_stop_names
        .iter()
        .map(|(route_id, names)| {
            let streets = names
                .iter()
                .flat_map(|n| parser.parse_street_names(n))
                .collect();
            (route_id.clone(), streets)
        })
        .collect();

    let mut routes_by_street: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (route_id, streets) in streets_by_route.iter() {
        for street in streets.iter() {
            routes_by_street
                .entry(street.as_str())
                .or_default()
                .insert(route_id.as_str());
        }
    }
    let shared = routes_by_street
        .into_iter()
        .filter(|(_, routes)| routes.len() >= 2)
        .collect::<Vec<_>>();
    let shared_streets: BTreeSet<String> = shared.iter().map(|(s, _)| s.to_string()).collect();
    let routes_on_shared_streets: BTreeSet<String> = shared
        .iter()
        .flat_map(|(_, routes)| routes.iter().map(|r| r.to_string()))
        .collect();
    let has_overlap = !shared_streets.is_empty() && routes_on_shared_streets.len() >= 2;

    RouteOverlap {
        has_overlap,
        shared_streets,
        routes_on_shared_streets,
        streets_by_route,
    }
}
