use std::collections::{BTreeMap, BTreeSet, HashSet};

use hqta_core::model::{DirectionKey, Trip};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{PeakPeriod, PeakService, QualificationMetrics};

/// peak service of one route in one direction bucket.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteDirectionMetrics {
    pub agency: String,
    pub route_id: String,
    pub direction: DirectionKey,
    pub trips_am: usize,
    pub trips_pm: usize,
    /// shapes traveled by the peak trips of this route and direction
    pub shape_ids: BTreeSet<String>,
}

/// AM and PM service at a set of stops, such as the members of a cluster.
pub fn stop_set_metrics(stop_ids: &[String], service: &PeakService) -> QualificationMetrics {
    let am = service.stop_metrics(PeakPeriod::Am, stop_ids.iter().map(|s| s.as_str()));
    let pm = service.stop_metrics(PeakPeriod::Pm, stop_ids.iter().map(|s| s.as_str()));
    QualificationMetrics::combine(am, pm)
}

/// peak trip counts per route and direction. a route is split by direction only when
/// every one of its peak trips carries a direction; otherwise all of its trips are
/// counted in the combined bucket. routes without peak service are omitted.
pub fn route_direction_metrics(service: &PeakService) -> Vec<RouteDirectionMetrics> {
    // route -> period -> trips
    let mut by_route: BTreeMap<(&str, &str), BTreeMap<PeakPeriod, Vec<&Trip>>> = BTreeMap::new();
    for period in PeakPeriod::ALL {
        for trip in service.trips(period).iter().copied() {
            by_route
                .entry((trip.agency.as_str(), trip.route_id.as_str()))
                .or_default()
                .entry(period)
                .or_default()
                .push(trip);
        }
    }

    let mut result = vec![];
    for ((agency, route_id), periods) in by_route.into_iter() {
        let directed = periods.values().flatten().all(|t| t.direction.is_some());
        let key_of = |t: &Trip| {
            if directed {
                DirectionKey::from(t.direction)
            } else {
                DirectionKey::Combined
            }
        };
        let keys: BTreeSet<DirectionKey> = periods.values().flatten().map(|t| key_of(t)).collect();
        for direction in keys {
            let count = |period: PeakPeriod| -> usize {
                periods
                    .get(&period)
                    .map(|trips| {
                        trips
                            .iter()
                            .filter(|t| key_of(t) == direction)
                            .map(|t| t.trip_id.as_str())
                            .collect::<HashSet<_>>()
                            .len()
                    })
                    .unwrap_or(0)
            };
            let shape_ids = periods
                .values()
                .flatten()
                .filter(|t| key_of(t) == direction)
                .filter_map(|t| t.shape_id.clone())
                .collect();
            result.push(RouteDirectionMetrics {
                agency: agency.to_string(),
                route_id: route_id.to_string(),
                direction,
                trips_am: count(PeakPeriod::Am),
                trips_pm: count(PeakPeriod::Pm),
                shape_ids,
            });
        }
    }
    log::info!(
        "computed peak service for {} route directions over {} routes",
        result.len(),
        result.iter().map(|r| &r.route_id).unique().count()
    );
    result
}
