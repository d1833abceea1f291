use serde::{Deserialize, Serialize};

use super::TravelDirection;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Trip {
    pub trip_id: String,
    pub route_id: String,
    pub agency: String,
    pub direction: Option<TravelDirection>,
    pub shape_id: Option<String>,
    pub service_id: String,
}

impl Trip {
    pub fn new(trip_id: &str, route_id: &str, agency: &str) -> Trip {
        Trip {
            trip_id: trip_id.to_string(),
            route_id: route_id.to_string(),
            agency: agency.to_string(),
            direction: None,
            shape_id: None,
            service_id: String::from("weekday"),
        }
    }

    pub fn with_direction(mut self, direction: TravelDirection) -> Trip {
        self.direction = Some(direction);
        self
    }

    pub fn with_shape(mut self, shape_id: &str) -> Trip {
        self.shape_id = Some(shape_id.to_string());
        self
    }
}
