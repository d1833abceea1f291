use serde::{Deserialize, Serialize};

pub const SECONDS_PER_DAY: u32 = 86_400;

/// a scheduled visit of a trip to a stop. times are seconds since the start of
/// the service day and may exceed 24:00:00 for next-day service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub arrival_time: Option<u32>,
    pub departure_time: Option<u32>,
    pub stop_sequence: u32,
}

impl StopTime {
    pub fn new(trip_id: &str, stop_id: &str, departure_time: u32, stop_sequence: u32) -> StopTime {
        StopTime {
            trip_id: trip_id.to_string(),
            stop_id: stop_id.to_string(),
            arrival_time: Some(departure_time),
            departure_time: Some(departure_time),
            stop_sequence,
        }
    }

    /// the time used for peak window sampling: departure, falling back to arrival.
    pub fn time(&self) -> Option<u32> {
        self.departure_time.or(self.arrival_time)
    }
}
