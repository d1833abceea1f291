use geo::Point;
use serde::{Deserialize, Serialize};

/// role of a stop within the GTFS station hierarchy.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// a boarding location (GTFS location_type 0). the default.
    #[default]
    Platform,
    /// a station containing platforms (GTFS location_type 1)
    Station,
    /// station entrance or exit
    Entrance,
    /// generic nodes, boarding areas and unknown values
    Other,
}

/// a normalized stop record. immutable once loaded.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Stop {
    pub stop_id: String,
    /// display name, used for street name heuristics
    pub name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub agency: String,
    pub parent_station: Option<String>,
    #[serde(default)]
    pub location_type: LocationType,
}

impl Stop {
    pub fn new(stop_id: &str, name: &str, lat: f64, lon: f64, agency: &str) -> Stop {
        Stop {
            stop_id: stop_id.to_string(),
            name: name.to_string(),
            lat: Some(lat),
            lon: Some(lon),
            agency: agency.to_string(),
            parent_station: None,
            location_type: LocationType::Platform,
        }
    }

    /// the WGS84 location of this stop in x,y (lon,lat) ordering, if the coordinates
    /// are present, finite and within the valid lat/lon ranges.
    pub fn valid_point(&self) -> Option<Point<f64>> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat))
                if lon.is_finite()
                    && lat.is_finite()
                    && (-180.0..=180.0).contains(&lon)
                    && (-90.0..=90.0).contains(&lat)
                    // (0, 0) is a common placeholder for unknown locations
                    && !(lon == 0.0 && lat == 0.0) =>
            {
                Some(Point::new(lon, lat))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Stop;

    #[test]
    fn test_valid_point() {
        let stop = Stop::new("a", "Main & 1st", 34.05, -118.25, "metro");
        let point = stop.valid_point().expect("stop should have a valid location");
        assert_eq!(point.x(), -118.25);
        assert_eq!(point.y(), 34.05);

        let mut missing = stop.clone();
        missing.lat = None;
        assert!(missing.valid_point().is_none());

        let mut nan = stop.clone();
        nan.lon = Some(f64::NAN);
        assert!(nan.valid_point().is_none());

        let null_island = Stop::new("b", "nowhere", 0.0, 0.0, "metro");
        assert!(null_island.valid_point().is_none());
    }
}
