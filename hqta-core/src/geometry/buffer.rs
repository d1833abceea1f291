use geo::{Destination, Distance, Haversine, Point};
use rstar::{RTreeObject, AABB};
use uom::si::{f64::Length, length::meter};

/// a circular buffer around a WGS84 point with a geodesic radius. the buffer is
/// kept in its exact (center, radius) form rather than a polygon approximation so
/// that intersection tests between buffers do not depend on where the study area lies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointBuffer {
    pub center: Point<f64>,
    pub radius: Length,
}

impl PointBuffer {
    pub fn new(center: Point<f64>, radius: Length) -> PointBuffer {
        PointBuffer { center, radius }
    }

    /// two circular buffers intersect when the great-circle distance between their
    /// centers is no more than the sum of their radii.
    pub fn intersects(&self, other: &PointBuffer) -> bool {
        let distance = Haversine.distance(self.center, other.center);
        distance <= (self.radius + other.radius).get::<meter>()
    }
}

impl RTreeObject for PointBuffer {
    type Envelope = AABB<[f64; 2]>;

    /// degree bounds of the buffer, found by walking the radius out along each
    /// cardinal bearing
    fn envelope(&self) -> Self::Envelope {
        let r = self.radius.get::<meter>();
        let north = Haversine.destination(self.center, 0.0, r);
        let east = Haversine.destination(self.center, 90.0, r);
        let south = Haversine.destination(self.center, 180.0, r);
        let west = Haversine.destination(self.center, 270.0, r);
        AABB::from_corners([west.x(), south.y()], [east.x(), north.y()])
    }
}

#[cfg(test)]
mod test {
    use super::PointBuffer;
    use geo::{Destination, Haversine, Point};
    use rstar::{Envelope, RTreeObject, AABB};
    use uom::si::{
        f64::Length,
        length::{foot, meter},
    };

    fn feet(value: f64) -> Length {
        Length::new::<foot>(value)
    }

    fn east_of(origin: Point<f64>, distance: Length) -> Point<f64> {
        Haversine.destination(origin, 90.0, distance.get::<meter>())
    }

    #[test]
    fn test_buffer_intersection() {
        let origin = Point::new(-87.63, 41.88);
        let a = PointBuffer::new(origin, feet(75.0));
        let b = PointBuffer::new(east_of(origin, feet(140.0)), feet(75.0));
        let c = PointBuffer::new(east_of(origin, feet(280.0)), feet(75.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&c));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_intersection_is_independent_of_latitude() {
        for lat in [0.0, 37.7, 41.9, 64.8] {
            let origin = Point::new(-90.0, lat);
            let a = PointBuffer::new(origin, feet(75.0));
            let near = PointBuffer::new(east_of(origin, feet(146.0)), feet(75.0));
            let far = PointBuffer::new(east_of(origin, feet(155.0)), feet(75.0));
            assert!(a.intersects(&near), "latitude {lat}");
            assert!(!a.intersects(&far), "latitude {lat}");
        }
    }

    #[test]
    fn test_envelope_contains_buffer() {
        let origin = Point::new(-89.22, 37.73);
        let buffer = PointBuffer::new(origin, feet(500.0));
        let envelope = buffer.envelope();
        for bearing in [0.0, 45.0, 135.0, 225.0, 315.0] {
            let edge = Haversine.destination(origin, bearing, feet(499.0).get::<meter>());
            let point = AABB::from_point([edge.x(), edge.y()]);
            assert!(envelope.contains_envelope(&point), "bearing {bearing}");
        }
    }
}
