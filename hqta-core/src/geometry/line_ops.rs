//! measurements over feet-projected line segments, built on geo's euclidean metric space.
use geo::{Coord, Distance, Euclidean, Line, LineLocatePoint, Point};
use rstar::AABB;

/// the fraction along `line` of the point closest to `coord`, clamped to [0, 1],
/// along with the distance to that closest point.
pub fn locate_on_line(coord: &Coord<f64>, line: &Line<f64>) -> (f64, f64) {
    let point = Point::from(*coord);
    let fraction = line.line_locate_point(&point).unwrap_or(0.0);
    (fraction, Euclidean.distance(&point, line))
}

/// bounding envelope of a segment, grown on all sides by `pad`
pub fn padded_envelope(line: &Line<f64>, pad: f64) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [line.start.x.min(line.end.x) - pad, line.start.y.min(line.end.y) - pad],
        [line.start.x.max(line.end.x) + pad, line.start.y.max(line.end.y) + pad],
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::{coord, Line};

    #[test]
    fn test_locate_on_line() {
        let line = Line::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 });
        let (t, d) = locate_on_line(&coord! { x: 2.5, y: 3.0 }, &line);
        assert!((t - 0.25).abs() < 1e-12);
        assert!((d - 3.0).abs() < 1e-12);
        let (t, d) = locate_on_line(&coord! { x: -4.0, y: 3.0 }, &line);
        assert_eq!(t, 0.0);
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_padded_envelope() {
        let line = Line::new(coord! { x: 10.0, y: 5.0 }, coord! { x: 0.0, y: 0.0 });
        let envelope = padded_envelope(&line, 2.0);
        assert_eq!(envelope.lower(), [-2.0, -2.0]);
        assert_eq!(envelope.upper(), [12.0, 7.0]);
    }
}
