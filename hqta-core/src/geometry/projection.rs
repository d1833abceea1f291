use geo::{Centroid, Coord, Distance, Haversine, LineString, MultiLineString, MultiPoint, Point};
use itertools::Itertools;
use uom::si::{
    f64::Length,
    length::{foot, meter},
};

use super::GeometryError;

/// half-width in degrees of the span measured to find the scale at the origin
const SCALE_SPAN_DEGREES: f64 = 0.01;

/// east-west scale below which the origin is treated as polar
const MIN_FEET_PER_DEGREE: f64 = 1.0;

/// an equirectangular projection centered on a group of linework. distances are
/// preserved in feet to within a fraction of a percent across a metropolitan region,
/// so a projection should only be centered on geometry from one such region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalProjection {
    origin_lon: f64,
    origin_lat: f64,
    feet_per_degree_x: f64,
    feet_per_degree_y: f64,
}

impl LocalProjection {
    /// creates a projection with its origin at the given WGS84 point
    pub fn new(origin: Point<f64>) -> Result<LocalProjection, GeometryError> {
        let (lon, lat) = (origin.x(), origin.y());
        if !lon.is_finite() || !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeometryError::Projection(format!(
                "invalid projection origin ({lon}, {lat})"
            )));
        }
        let feet_per_degree_y = feet_per_degree(&origin, 0.0, SCALE_SPAN_DEGREES);
        let feet_per_degree_x = feet_per_degree(&origin, SCALE_SPAN_DEGREES, 0.0);
        if feet_per_degree_x < MIN_FEET_PER_DEGREE {
            return Err(GeometryError::Projection(format!(
                "projection origin latitude {lat} is too close to a pole"
            )));
        }
        Ok(LocalProjection {
            origin_lon: lon,
            origin_lat: lat,
            feet_per_degree_x,
            feet_per_degree_y,
        })
    }

    /// creates a projection centered on the mean of the provided WGS84 points
    pub fn centered_on<'a>(
        points: impl Iterator<Item = &'a Point<f64>>,
    ) -> Result<LocalProjection, GeometryError> {
        let center = points.copied().collect::<MultiPoint<f64>>().centroid();
        match center {
            Some(origin) => LocalProjection::new(origin),
            None => Err(GeometryError::Projection(String::from(
                "cannot center a projection on an empty set of points",
            ))),
        }
    }

    /// WGS84 (lon, lat) to planar feet
    pub fn project(&self, point: &Point<f64>) -> Coord<f64> {
        Coord {
            x: (point.x() - self.origin_lon) * self.feet_per_degree_x,
            y: (point.y() - self.origin_lat) * self.feet_per_degree_y,
        }
    }

    /// planar feet to WGS84 (lon, lat)
    pub fn unproject(&self, coord: &Coord<f64>) -> Point<f64> {
        Point::new(
            self.origin_lon + coord.x / self.feet_per_degree_x,
            self.origin_lat + coord.y / self.feet_per_degree_y,
        )
    }

    pub fn project_linestring(&self, line: &LineString<f64>) -> LineString<f64> {
        LineString::new(
            line.coords()
                .map(|c| self.project(&Point::from(*c)))
                .collect_vec(),
        )
    }

    pub fn unproject_linestring(&self, line: &LineString<f64>) -> LineString<f64> {
        LineString::new(line.coords().map(|c| self.unproject(c).0).collect_vec())
    }

    pub fn unproject_multilinestring(&self, lines: &MultiLineString<f64>) -> MultiLineString<f64> {
        MultiLineString::new(
            lines
                .iter()
                .map(|l| self.unproject_linestring(l))
                .collect_vec(),
        )
    }
}

/// haversine feet per degree across a span centered on `origin`
fn feet_per_degree(origin: &Point<f64>, half_dx: f64, half_dy: f64) -> f64 {
    let lat = |y: f64| y.clamp(-90.0, 90.0);
    let a = Point::new(origin.x() - half_dx, lat(origin.y() - half_dy));
    let b = Point::new(origin.x() + half_dx, lat(origin.y() + half_dy));
    let degrees = (b.x() - a.x()) + (b.y() - a.y());
    if degrees <= 0.0 {
        return 0.0;
    }
    Length::new::<meter>(Haversine.distance(a, b)).get::<foot>() / degrees
}

#[cfg(test)]
mod test {
    use super::LocalProjection;
    use geo::Point;

    #[test]
    fn test_round_trip_and_scale() {
        let origin = Point::new(-118.25, 34.05);
        let projection = LocalProjection::new(origin).unwrap();
        let p = Point::new(-118.2490, 34.0510);
        let c = projection.project(&p);
        let back = projection.unproject(&c);
        assert!((back.x() - p.x()).abs() < 1e-12);
        assert!((back.y() - p.y()).abs() < 1e-12);

        // 0.001 degrees of latitude is roughly 364.8 feet
        let north = projection.project(&Point::new(-118.25, 34.051));
        assert!((north.y - 364.8).abs() < 1.0, "found {}", north.y);
        assert!(north.x.abs() < 1e-9);
    }

    #[test]
    fn test_scale_matches_haversine() {
        use geo::{Distance, Haversine};
        use uom::si::{
            f64::Length,
            length::{foot, meter},
        };

        let origin = Point::new(-90.20, 38.63);
        let projection = LocalProjection::new(origin).unwrap();
        let east = Point::new(-90.19, 38.63);
        let expected = Length::new::<meter>(Haversine.distance(origin, east)).get::<foot>();
        let c = projection.project(&east);
        assert!((c.x - expected).abs() / expected < 1e-4, "found {} expected {expected}", c.x);
    }

    #[test]
    fn test_polar_origin_fails() {
        assert!(LocalProjection::new(Point::new(0.0, 90.0)).is_err());
        assert!(LocalProjection::new(Point::new(0.0, f64::NAN)).is_err());
    }

    #[test]
    fn test_empty_center_fails() {
        let points: Vec<Point<f64>> = vec![];
        assert!(LocalProjection::centered_on(points.iter()).is_err());
    }
}
