use geo::{Coord, LineString};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ShapePoint {
    pub lat: f64,
    pub lon: f64,
    pub sequence: usize,
}

/// ordered points of one route variant.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteShape {
    pub shape_id: String,
    pub agency: String,
    pub points: Vec<ShapePoint>,
}

impl RouteShape {
    pub fn new(shape_id: &str, agency: &str, points: Vec<ShapePoint>) -> RouteShape {
        RouteShape {
            shape_id: shape_id.to_string(),
            agency: agency.to_string(),
            points,
        }
    }

    /// builds a shape from (lat, lon) pairs given in traversal order
    pub fn from_lat_lon(shape_id: &str, agency: &str, coords: &[(f64, f64)]) -> RouteShape {
        let points = coords
            .iter()
            .enumerate()
            .map(|(sequence, (lat, lon))| ShapePoint {
                lat: *lat,
                lon: *lon,
                sequence,
            })
            .collect_vec();
        RouteShape::new(shape_id, agency, points)
    }

    /// the WGS84 polyline of this shape in sequence order. points with non-finite
    /// coordinates are skipped. returns None when fewer than two points remain.
    pub fn to_linestring(&self) -> Option<LineString<f64>> {
        let coords = self
            .points
            .iter()
            .sorted_by_key(|p| p.sequence)
            .filter(|p| p.lat.is_finite() && p.lon.is_finite())
            .map(|p| Coord { x: p.lon, y: p.lat })
            .dedup()
            .collect_vec();
        if coords.len() < 2 {
            None
        } else {
            Some(LineString::new(coords))
        }
    }
}

#[cfg(test)]
mod test {
    use super::{RouteShape, ShapePoint};

    #[test]
    fn test_to_linestring_orders_by_sequence() {
        let shape = RouteShape::new(
            "s1",
            "metro",
            vec![
                ShapePoint {
                    lat: 1.0,
                    lon: 1.0,
                    sequence: 2,
                },
                ShapePoint {
                    lat: 0.0,
                    lon: 0.0,
                    sequence: 1,
                },
            ],
        );
        let line = shape.to_linestring().expect("two points is a valid shape");
        assert_eq!(line.0[0].x, 0.0);
        assert_eq!(line.0[1].x, 1.0);
    }

    #[test]
    fn test_single_point_shape_is_invalid() {
        let shape = RouteShape::from_lat_lon("s1", "metro", &[(1.0, 1.0), (1.0, 1.0)]);
        assert!(shape.to_linestring().is_none());
    }
}
