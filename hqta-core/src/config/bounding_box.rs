use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::QualificationError;

/// WGS84 extent used to keep or reject features, for example stations across
/// a national border that share an agency feed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> BoundingBox {
        BoundingBox {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    pub fn validate(&self) -> Result<(), QualificationError> {
        if self.xmin >= self.xmax || self.ymin >= self.ymax {
            return Err(QualificationError::InvalidConfig(format!(
                "bounding box must have xmin < xmax and ymin < ymax, found {self:?}"
            )));
        }
        Ok(())
    }

    /// true if the point lies inside or on the boundary of this extent
    pub fn covers(&self, point: &Point<f64>) -> bool {
        (self.xmin..=self.xmax).contains(&point.x()) && (self.ymin..=self.ymax).contains(&point.y())
    }
}

#[cfg(test)]
mod test {
    use super::BoundingBox;
    use geo::Point;

    #[test]
    fn test_covers_includes_boundary() {
        let bbox = BoundingBox::new(-118.0, -117.0, 32.5, 33.5);
        assert!(bbox.covers(&Point::new(-117.5, 33.0)));
        assert!(bbox.covers(&Point::new(-117.0, 32.5)));
        // a station south of the border
        assert!(!bbox.covers(&Point::new(-117.0, 32.4)));
        assert!(BoundingBox::new(1.0, 0.0, 0.0, 1.0).validate().is_err());
    }
}
