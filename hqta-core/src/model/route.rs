use serde::{Deserialize, Serialize};

/// GTFS route_type, reduced to the categories used by qualification rules.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    Tram,
    Subway,
    Rail,
    #[default]
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
    Other,
}

impl RouteType {
    /// route types that run on rails and are candidates for the rail pathway by default.
    pub fn default_rail_types() -> Vec<RouteType> {
        vec![RouteType::Tram, RouteType::Subway, RouteType::Rail]
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Route {
    pub route_id: String,
    pub agency: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub route_type: RouteType,
}

impl Route {
    pub fn new(route_id: &str, agency: &str, route_type: RouteType) -> Route {
        Route {
            route_id: route_id.to_string(),
            agency: agency.to_string(),
            short_name: None,
            long_name: None,
            route_type,
        }
    }

    /// a display name, preferring the short name
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .or(self.long_name.as_deref())
            .unwrap_or(&self.route_id)
    }
}
