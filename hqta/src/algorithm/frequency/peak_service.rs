use std::collections::{BTreeSet, HashMap, HashSet};

use hqta_core::{
    config::PeakWindow,
    model::{FeedTables, Trip},
};
use itertools::Itertools;
use kdam::tqdm;
use serde::{Deserialize, Serialize};

use super::{PeriodMetrics, TripAccumulator};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PeakPeriod {
    Am,
    Pm,
}

impl PeakPeriod {
    pub const ALL: [PeakPeriod; 2] = [PeakPeriod::Am, PeakPeriod::Pm];
}

struct PeriodService<'a> {
    window: PeakWindow,
    trips: Vec<&'a Trip>,
    by_stop: HashMap<&'a str, Vec<&'a Trip>>,
}

/// the trips scheduled at each stop during the AM and PM peak windows. a stop time
/// is sampled at its departure time, falling back to its arrival time.
pub struct PeakService<'a> {
    am: PeriodService<'a>,
    pm: PeriodService<'a>,
}

impl<'a> PeakService<'a> {
    pub fn new(tables: &'a FeedTables, am: &PeakWindow, pm: &PeakWindow) -> PeakService<'a> {
        let mut visits: HashMap<PeakPeriod, HashSet<(&'a str, &'a str)>> = HashMap::new();
        let mut unknown_trips: HashSet<&str> = HashSet::new();
        let n = tables.stop_times().len();
        for stop_time in tqdm!(tables.stop_times().iter(), total = n, desc = "peak stop times") {
            let Some(time) = stop_time.time() else {
                continue;
            };
            if tables.get_trip(&stop_time.trip_id).is_none() {
                unknown_trips.insert(&stop_time.trip_id);
                continue;
            }
            for (period, window) in [(PeakPeriod::Am, am), (PeakPeriod::Pm, pm)] {
                if window.contains(time) {
                    visits
                        .entry(period)
                        .or_default()
                        .insert((stop_time.trip_id.as_str(), stop_time.stop_id.as_str()));
                }
            }
        }
        eprintln!();
        if !unknown_trips.is_empty() {
            log::warn!(
                "ignored stop times of {} trips not found in the trips table",
                unknown_trips.len()
            );
        }

        let mut build = |period: PeakPeriod, window: &PeakWindow| {
            let pairs = visits.remove(&period).unwrap_or_default();
            PeriodService::new(tables, window, pairs)
        };
        let result = PeakService {
            am: build(PeakPeriod::Am, am),
            pm: build(PeakPeriod::Pm, pm),
        };
        log::info!(
            "found {} AM peak trips and {} PM peak trips",
            result.am.trips.len(),
            result.pm.trips.len()
        );
        result
    }

    fn period(&self, period: PeakPeriod) -> &PeriodService<'a> {
        match period {
            PeakPeriod::Am => &self.am,
            PeakPeriod::Pm => &self.pm,
        }
    }

    pub fn window(&self, period: PeakPeriod) -> &PeakWindow {
        &self.period(period).window
    }

    /// distinct trips with at least one stop time in the window, ordered by trip id
    pub fn trips(&self, period: PeakPeriod) -> &[&'a Trip] {
        &self.period(period).trips
    }

    /// distinct trips stopping at a stop during the window
    pub fn trips_at_stop(&self, period: PeakPeriod, stop_id: &str) -> &[&'a Trip] {
        self.period(period)
            .by_stop
            .get(stop_id)
            .map(|t| t.as_slice())
            .unwrap_or(&[])
    }

    /// routes stopping at a stop during either window
    pub fn routes_at_stop(&self, stop_id: &str) -> BTreeSet<&'a str> {
        PeakPeriod::ALL
            .iter()
            .flat_map(|p| self.trips_at_stop(*p, stop_id))
            .copied()
            .map(|t| t.route_id.as_str())
            .collect()
    }

    /// service over a set of stops during one window
    pub fn stop_metrics<'s>(
        &self,
        period: PeakPeriod,
        stop_ids: impl Iterator<Item = &'s str>,
    ) -> PeriodMetrics {
        let mut acc = TripAccumulator::new();
        for stop_id in stop_ids {
            for trip in self.trips_at_stop(period, stop_id) {
                acc.add(trip);
            }
        }
        acc.finish(self.window(period).duration_minutes)
    }
}

impl<'a> PeriodService<'a> {
    fn new(
        tables: &'a FeedTables,
        window: &PeakWindow,
        pairs: HashSet<(&'a str, &'a str)>,
    ) -> PeriodService<'a> {
        let mut by_stop: HashMap<&'a str, Vec<&'a Trip>> = HashMap::new();
        let mut trip_ids: HashSet<&'a str> = HashSet::new();
        for (trip_id, stop_id) in pairs.into_iter().sorted() {
            if let Some(trip) = tables.get_trip(trip_id) {
                by_stop.entry(stop_id).or_default().push(trip);
                trip_ids.insert(trip_id);
            }
        }
        let trips = trip_ids
            .into_iter()
            .sorted()
            .filter_map(|id| tables.get_trip(id))
            .collect_vec();
        PeriodService {
            window: window.clone(),
            trips,
            by_stop,
        }
    }
}
