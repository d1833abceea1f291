mod agency_profile;
mod hqta_config;
mod rail_station_rule;

pub use agency_profile::AgencyProfile;
pub use hqta_config::HqtaConfig;
pub use rail_station_rule::RailStationRule;
