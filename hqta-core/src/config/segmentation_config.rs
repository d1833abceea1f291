use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use crate::error::QualificationError;

/// parameters of corridor segmentation. distances are in feet.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    /// noded segments shorter than this are discarded as slivers
    pub min_segment_length_feet: f64,
    /// fraction of a segment a shape must traverse to be counted on it
    pub coverage_tolerance: f64,
    /// Douglas-Peucker tolerance applied before noding. disabled when None.
    pub simplify_tolerance_feet: Option<f64>,
    /// distance within which two linework features are considered coincident
    pub snap_tolerance_feet: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_segment_length_feet: 30.0,
            coverage_tolerance: 0.9,
            simplify_tolerance_feet: Some(5.0),
            snap_tolerance_feet: 10.0,
        }
    }
}

impl SegmentationConfig {
    pub fn min_segment_length(&self) -> Length {
        Length::new::<uom::si::length::foot>(self.min_segment_length_feet)
    }

    pub fn snap_tolerance(&self) -> Length {
        Length::new::<uom::si::length::foot>(self.snap_tolerance_feet)
    }

    pub fn validate(&self) -> Result<(), QualificationError> {
        use QualificationError as E;
        if !(self.min_segment_length_feet >= 0.0) {
            return Err(E::InvalidConfig(format!(
                "min_segment_length_feet must be non-negative, found {}",
                self.min_segment_length_feet
            )));
        }
        if !(self.coverage_tolerance > 0.0 && self.coverage_tolerance <= 1.0) {
            return Err(E::InvalidConfig(format!(
                "coverage_tolerance must be in (0, 1], found {}",
                self.coverage_tolerance
            )));
        }
        if let Some(tol) = self.simplify_tolerance_feet {
            if !(tol >= 0.0) {
                return Err(E::InvalidConfig(format!(
                    "simplify_tolerance_feet must be non-negative, found {tol}"
                )));
            }
        }
        if !(self.snap_tolerance_feet > 0.0) {
            return Err(E::InvalidConfig(format!(
                "snap_tolerance_feet must be positive, found {}",
                self.snap_tolerance_feet
            )));
        }
        Ok(())
    }
}
