use std::collections::HashSet;

use gtfs_structures::{DirectionType, Gtfs};
use hqta_core::model::{
    FeedTables, LocationType, Route, RouteShape, RouteType, ShapePoint, Stop, StopTime,
    TravelDirection, Trip,
};
use itertools::Itertools;

use super::{FeedError, ServiceDay};

/// reads a GTFS archive (zip file, directory or URL) and converts it into feed tables
/// for the provided agency. only trips running on the service day are kept.
///
/// # Arguments
///
/// * `gtfs_file`   - path to the archive
/// * `agency`      - agency name attached to every record; identifiers are prefixed
///   with it so that several archives can be merged into one snapshot
/// * `service_day` - weekday to sample service on
pub fn read_feed(
    gtfs_file: &str,
    agency: &str,
    service_day: &ServiceDay,
) -> Result<FeedTables, FeedError> {
    let gtfs = Gtfs::new(gtfs_file)?;
    log::info!(
        "read GTFS archive '{gtfs_file}' for agency '{agency}' with {} stops, {} routes, {} trips",
        gtfs.stops.len(),
        gtfs.routes.len(),
        gtfs.trips.len()
    );
    convert_gtfs(&gtfs, agency, service_day)
}

/// converts an in-memory GTFS archive into feed tables. see [`read_feed`].
pub fn convert_gtfs(
    gtfs: &Gtfs,
    agency: &str,
    service_day: &ServiceDay,
) -> Result<FeedTables, FeedError> {
    let stops = gtfs
        .stops
        .values()
        .sorted_by(|a, b| a.id.cmp(&b.id))
        .map(|stop| {
            let parent = stop
                .parent_station
                .as_ref()
                .and_then(|p| gtfs.stops.get(p))
                .map(|p| (p.latitude, p.longitude));
            let (lat, lon) = coordinates_with_fallback((stop.latitude, stop.longitude), parent);
            Stop {
                stop_id: qualify(agency, &stop.id),
                name: stop.name.clone().unwrap_or_default(),
                lat,
                lon,
                agency: agency.to_string(),
                parent_station: stop.parent_station.as_ref().map(|p| qualify(agency, p)),
                location_type: location_type(&stop.location_type),
            }
        })
        .collect_vec();

    let routes = gtfs
        .routes
        .values()
        .sorted_by(|a, b| a.id.cmp(&b.id))
        .map(|route| Route {
            route_id: qualify(agency, &route.id),
            agency: agency.to_string(),
            short_name: route.short_name.clone(),
            long_name: route.long_name.clone(),
            route_type: route_type(&route.route_type),
        })
        .collect_vec();

    let mut trips = vec![];
    let mut stop_times = vec![];
    let mut dropped_trips = 0;
    for trip in gtfs.trips.values().sorted_by(|a, b| a.id.cmp(&b.id)) {
        let calendar = gtfs.calendar.get(&trip.service_id);
        let calendar_dates = gtfs
            .calendar_dates
            .get(&trip.service_id)
            .map(|d| d.as_slice())
            .unwrap_or(&[]);
        if !service_day.runs(calendar, calendar_dates) {
            dropped_trips += 1;
            continue;
        }
        if !gtfs.routes.contains_key(&trip.route_id) {
            return Err(FeedError::MalformedGtfs(format!(
                "trip '{}' references unknown route '{}'",
                trip.id, trip.route_id
            )));
        }
        let trip_id = qualify(agency, &trip.id);
        trips.push(Trip {
            trip_id: trip_id.clone(),
            route_id: qualify(agency, &trip.route_id),
            agency: agency.to_string(),
            direction: trip.direction_id.as_ref().map(travel_direction),
            shape_id: trip.shape_id.as_ref().map(|s| qualify(agency, s)),
            service_id: trip.service_id.clone(),
        });
        let ordered = trip.stop_times.iter().sorted_by_key(|st| st.stop_sequence);
        for st in ordered {
            stop_times.push(StopTime {
                trip_id: trip_id.clone(),
                stop_id: qualify(agency, &st.stop.id),
                arrival_time: st.arrival_time,
                departure_time: st.departure_time,
                stop_sequence: st.stop_sequence,
            });
        }
    }
    if dropped_trips > 0 {
        log::info!(
            "agency '{agency}': dropped {dropped_trips} trips not running on {:?}",
            service_day.weekday
        );
    }

    let used_shapes: HashSet<&str> = trips
        .iter()
        .filter_map(|t: &Trip| t.shape_id.as_deref())
        .collect();
    let shapes = gtfs
        .shapes
        .iter()
        .filter(|(shape_id, _)| used_shapes.contains(qualify(agency, shape_id).as_str()))
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(shape_id, points)| {
            let points = points
                .iter()
                .map(|p| ShapePoint {
                    lat: p.latitude,
                    lon: p.longitude,
                    sequence: p.sequence,
                })
                .sorted_by_key(|p| p.sequence)
                .collect_vec();
            RouteShape::new(&qualify(agency, shape_id), agency, points)
        })
        .collect_vec();

    let tables = FeedTables::new(stops, routes, trips, stop_times, shapes)?;
    log::info!(
        "agency '{agency}': {} stops, {} routes, {} trips, {} stop times, {} shapes",
        tables.stops().len(),
        tables.routes().len(),
        tables.trips().len(),
        tables.stop_times().len(),
        tables.shapes().len()
    );
    Ok(tables)
}

/// prefixes a GTFS identifier with its agency
pub fn qualify(agency: &str, id: &str) -> String {
    format!("{agency}:{id}")
}

/// lat/lon of a stop, or of its parent station when the stop has no location.
/// the fallback looks only one level up the station hierarchy.
fn coordinates_with_fallback(
    own: (Option<f64>, Option<f64>),
    parent: Option<(Option<f64>, Option<f64>)>,
) -> (Option<f64>, Option<f64>) {
    match (own, parent) {
        ((Some(lat), Some(lon)), _) => (Some(lat), Some(lon)),
        (_, Some((Some(lat), Some(lon)))) => (Some(lat), Some(lon)),
        (own, _) => own,
    }
}

fn location_type(location_type: &gtfs_structures::LocationType) -> LocationType {
    use gtfs_structures::LocationType as L;
    match location_type {
        L::StopPoint => LocationType::Platform,
        L::StopArea => LocationType::Station,
        L::StationEntrance => LocationType::Entrance,
        _ => LocationType::Other,
    }
}

fn route_type(route_type: &gtfs_structures::RouteType) -> RouteType {
    use gtfs_structures::RouteType as R;
    match route_type {
        R::Tramway => RouteType::Tram,
        R::Subway => RouteType::Subway,
        R::Rail => RouteType::Rail,
        R::Bus | R::Coach => RouteType::Bus,
        R::Ferry => RouteType::Ferry,
        R::CableCar => RouteType::CableCar,
        R::Gondola => RouteType::Gondola,
        R::Funicular => RouteType::Funicular,
        _ => RouteType::Other,
    }
}

fn travel_direction(direction: &DirectionType) -> TravelDirection {
    match direction {
        DirectionType::Outbound => TravelDirection::Zero,
        DirectionType::Inbound => TravelDirection::One,
    }
}
