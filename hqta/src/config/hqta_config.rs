use std::collections::HashSet;

use hqta_core::{
    config::{PeakWindow, SegmentationConfig},
    error::QualificationError,
};
use hqta_gtfs::feed::ServiceDay;
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use super::AgencyProfile;

/// run parameters of hub and corridor qualification. validated once with
/// [`HqtaConfig::validate`] and then shared read-only by every component.
///
/// # Example
///
/// ```toml
/// cluster_radius_feet = 150.0
/// frequency_threshold_minutes = 15.0
/// min_hub_routes = 2
///
/// [am_peak]
/// start = "07:00:00"
/// end = "09:00:00"
/// duration_minutes = 120.0
///
/// [[agencies]]
/// agency = "metro"
/// rail = { type = "parent_station" }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HqtaConfig {
    #[serde(default = "default_cluster_radius_feet")]
    pub cluster_radius_feet: f64,
    #[serde(default = "default_frequency_threshold_minutes")]
    pub frequency_threshold_minutes: f64,
    #[serde(default = "default_min_hub_routes")]
    pub min_hub_routes: usize,
    #[serde(default = "PeakWindow::default_am")]
    pub am_peak: PeakWindow,
    #[serde(default = "PeakWindow::default_pm")]
    pub pm_peak: PeakWindow,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub service_day: ServiceDay,
    #[serde(default)]
    pub agencies: Vec<AgencyProfile>,
}

fn default_cluster_radius_feet() -> f64 {
    150.0
}

fn default_frequency_threshold_minutes() -> f64 {
    15.0
}

fn default_min_hub_routes() -> usize {
    2
}

impl Default for HqtaConfig {
    fn default() -> Self {
        Self {
            cluster_radius_feet: default_cluster_radius_feet(),
            frequency_threshold_minutes: default_frequency_threshold_minutes(),
            min_hub_routes: default_min_hub_routes(),
            am_peak: PeakWindow::default_am(),
            pm_peak: PeakWindow::default_pm(),
            segmentation: SegmentationConfig::default(),
            service_day: ServiceDay::default(),
            agencies: vec![],
        }
    }
}

impl HqtaConfig {
    pub fn cluster_radius(&self) -> Length {
        Length::new::<uom::si::length::foot>(self.cluster_radius_feet)
    }

    /// the profile of an agency, if one is configured
    pub fn profile(&self, agency: &str) -> Option<&AgencyProfile> {
        self.agencies.iter().find(|p| p.agency == agency)
    }

    pub fn validate(&self) -> Result<(), QualificationError> {
        use QualificationError as E;
        if !(self.cluster_radius_feet.is_finite() && self.cluster_radius_feet > 0.0) {
            return Err(E::InvalidConfig(format!(
                "cluster_radius_feet must be positive, found {}",
                self.cluster_radius_feet
            )));
        }
        if !(self.frequency_threshold_minutes.is_finite() && self.frequency_threshold_minutes > 0.0)
        {
            return Err(E::InvalidConfig(format!(
                "frequency_threshold_minutes must be positive, found {}",
                self.frequency_threshold_minutes
            )));
        }
        if self.min_hub_routes == 0 {
            return Err(E::InvalidConfig(String::from(
                "min_hub_routes must be at least 1",
            )));
        }
        self.am_peak.validate("am")?;
        self.pm_peak.validate("pm")?;
        self.segmentation.validate()?;
        let mut seen = HashSet::new();
        for profile in self.agencies.iter() {
            if !seen.insert(profile.agency.as_str()) {
                return Err(E::InvalidConfig(format!(
                    "agency '{}' has more than one profile",
                    profile.agency
                )));
            }
            profile.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::HqtaConfig;
    use crate::config::RailStationRule;
    use hqta_core::model::RouteType;

    #[test]
    fn test_defaults_from_empty_document() {
        let config: HqtaConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, HqtaConfig::default());
        assert_eq!(config.cluster_radius_feet, 150.0);
        assert_eq!(config.am_peak.duration_minutes, 120.0);
        assert_eq!(config.segmentation.coverage_tolerance, 0.9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_agency_profiles() {
        let json = r#"{
            "min_hub_routes": 3,
            "agencies": [
                { "agency": "metro", "rail": { "type": "route_type" } },
                { "agency": "bus", "rail": { "type": "none" } },
                { "agency": "border", "rail": { "type": "stop_ids", "stop_ids": ["80211"] },
                  "bbox": { "xmin": -118.0, "xmax": -117.0, "ymin": 32.5, "ymax": 33.0 } }
            ]
        }"#;
        let config: HqtaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.min_hub_routes, 3);
        let metro = config.profile("metro").unwrap();
        assert_eq!(
            metro.rail,
            RailStationRule::RouteType {
                route_types: RouteType::default_rail_types()
            }
        );
        assert!(config.profile("border").unwrap().bbox.is_some());
        assert!(config.profile("unknown").is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = HqtaConfig::default();
        config.cluster_radius_feet = -1.0;
        assert!(config.validate().is_err());

        let mut config = HqtaConfig::default();
        config.pm_peak.duration_minutes = 0.0;
        assert!(config.validate().is_err());

        let mut config = HqtaConfig::default();
        config.segmentation.coverage_tolerance = 1.5;
        assert!(config.validate().is_err());
    }
}
