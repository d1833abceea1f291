use geo::{
    line_measures::LengthMeasurable, BoundingRect, Coord, Distance, Euclidean, InterpolatableLine,
    Intersects, LineString, Point, Rect, RemoveRepeatedPoints, Simplify,
};
use itertools::Itertools;
use rstar::{primitives::GeomWithData, RTree, RTreeObject, AABB};
use uom::si::f64::Length;

use super::{line_ops::padded_envelope, noding, GeometryEngine, GeometryError, PointBuffer};

mod consts {
    pub const COVERAGE_EPSILON: f64 = 1e-9;
    pub const MIN_COVERAGE_STEP_FEET: f64 = 1.0;
}

type IndexedLine = GeomWithData<rstar::primitives::Line<[f64; 2]>, usize>;

/// [`GeometryEngine`] backed by the `geo` and `rstar` crates. linework is measured
/// in feet-projected coordinates with the euclidean metric, buffers with haversine.
#[derive(Clone, Debug)]
pub struct PlanarGeometryEngine {
    snap_tolerance_feet: f64,
}

impl PlanarGeometryEngine {
    pub fn new(snap_tolerance: Length) -> PlanarGeometryEngine {
        PlanarGeometryEngine {
            snap_tolerance_feet: snap_tolerance.get::<uom::si::length::foot>(),
        }
    }

    /// spatial index over the segments of a polyline, keyed by segment index
    fn index_segments(line: &LineString<f64>) -> RTree<IndexedLine> {
        let segments = line
            .lines()
            .enumerate()
            .map(|(idx, l)| {
                let segment = rstar::primitives::Line::new(
                    [l.start.x, l.start.y],
                    [l.end.x, l.end.y],
                );
                GeomWithData::new(segment, idx)
            })
            .collect_vec();
        RTree::bulk_load(segments)
    }

    fn padded_rect(line: &LineString<f64>, pad: f64) -> Option<Rect<f64>> {
        line.bounding_rect().map(|r| {
            Rect::new(
                Coord {
                    x: r.min().x - pad,
                    y: r.min().y - pad,
                },
                Coord {
                    x: r.max().x + pad,
                    y: r.max().y + pad,
                },
            )
        })
    }
}

impl GeometryEngine for PlanarGeometryEngine {
    fn buffer_point(&self, center: Point<f64>, radius: Length) -> PointBuffer {
        PointBuffer::new(center, radius)
    }

    fn buffers_intersect(&self, a: &PointBuffer, b: &PointBuffer) -> bool {
        a.intersects(b)
    }

    fn length(&self, line: &LineString<f64>) -> Length {
        Length::new::<uom::si::length::foot>(line.length(&Euclidean))
    }

    fn repair(&self, line: &LineString<f64>) -> Option<LineString<f64>> {
        let finite = LineString::new(
            line.coords()
                .filter(|c| c.x.is_finite() && c.y.is_finite())
                .cloned()
                .collect_vec(),
        );
        let repaired = finite.remove_repeated_points();
        if repaired.0.len() < 2 || repaired.length(&Euclidean) <= 0.0 {
            None
        } else {
            Some(repaired)
        }
    }

    fn simplify(&self, line: &LineString<f64>, tolerance: Length) -> LineString<f64> {
        let epsilon = tolerance.get::<uom::si::length::foot>();
        if epsilon <= 0.0 {
            return line.clone();
        }
        line.simplify(epsilon)
    }

    fn intersects(&self, a: &LineString<f64>, b: &LineString<f64>) -> bool {
        let tol = self.snap_tolerance_feet;
        let (Some(rect_a), Some(rect_b)) = (Self::padded_rect(a, tol), b.bounding_rect()) else {
            return false;
        };
        if !rect_a.intersects(&rect_b) {
            return false;
        }
        if a.intersects(b) {
            return true;
        }
        let index = Self::index_segments(b);
        let b_lines = b.lines().collect_vec();
        a.lines().any(|la| {
            index
                .locate_in_envelope_intersecting(&padded_envelope(&la, tol))
                .any(|candidate| {
                    b_lines
                        .get(candidate.data)
                        .map(|lb| Euclidean.distance(&la, lb) <= tol)
                        .unwrap_or(false)
                })
        })
    }

    fn node(&self, lines: &[LineString<f64>]) -> Result<Vec<LineString<f64>>, GeometryError> {
        noding::node_linework(lines, self.snap_tolerance_feet)
    }

    fn coverage_ratio(&self, segment: &LineString<f64>, shape: &LineString<f64>) -> f64 {
        let total = segment.length(&Euclidean);
        if total <= 0.0 {
            return 0.0;
        }
        let tol = self.snap_tolerance_feet;
        let index = Self::index_segments(shape);
        let shape_lines = shape.lines().collect_vec();
        let near = |c: &Coord<f64>| -> bool {
            let query = AABB::from_corners([c.x - tol, c.y - tol], [c.x + tol, c.y + tol]);
            index
                .locate_in_envelope_intersecting(&query)
                .any(|candidate| {
                    shape_lines
                        .get(candidate.data)
                        .map(|l| {
                            Euclidean.distance(&Point::from(*c), l) <= tol + consts::COVERAGE_EPSILON
                        })
                        .unwrap_or(false)
                })
        };

        // sample the segment in steps no longer than half the tolerance and count
        // the length of every step whose midpoint lies near the shape.
        let step = (tol / 2.0).max(consts::MIN_COVERAGE_STEP_FEET);
        let mut covered = 0.0;
        for line in segment.lines() {
            let len = line.length(&Euclidean);
            if len <= 0.0 {
                continue;
            }
            let n = (len / step).ceil().max(1.0) as usize;
            let piece = len / n as f64;
            for k in 0..n {
                let t = (k as f64 + 0.5) / n as f64;
                if near(&line.point_at_ratio_from_start(&Euclidean, t).0) {
                    covered += piece;
                }
            }
        }
        (covered / total).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod test {
    use super::PlanarGeometryEngine;
    use crate::geometry::GeometryEngine;
    use geo::{coord, line_string, Destination, Haversine, Point};
    use uom::si::f64::Length;

    fn engine() -> PlanarGeometryEngine {
        PlanarGeometryEngine::new(Length::new::<uom::si::length::foot>(10.0))
    }

    #[test]
    fn test_coverage_ratio() {
        let segment = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        let full = line_string![(x: -50.0, y: 2.0), (x: 150.0, y: 2.0)];
        let partial = line_string![(x: 0.0, y: 0.0), (x: 40.0, y: 0.0), (x: 40.0, y: 500.0)];
        let far = line_string![(x: 0.0, y: 300.0), (x: 100.0, y: 300.0)];
        let e = engine();
        assert_eq!(e.coverage_ratio(&segment, &full), 1.0);
        let ratio = e.coverage_ratio(&segment, &partial);
        // covered up to x = 40 plus the 10 foot tolerance
        assert!((ratio - 0.5).abs() <= 0.05, "found {ratio}");
        assert_eq!(e.coverage_ratio(&segment, &far), 0.0);
    }

    #[test]
    fn test_intersects_within_tolerance() {
        let e = engine();
        let a = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        let near = line_string![(x: 0.0, y: 8.0), (x: 100.0, y: 8.0)];
        let far = line_string![(x: 0.0, y: 80.0), (x: 100.0, y: 80.0)];
        let crossing = line_string![(x: 50.0, y: -80.0), (x: 50.0, y: 80.0)];
        assert!(e.intersects(&a, &near));
        assert!(!e.intersects(&a, &far));
        assert!(e.intersects(&a, &crossing));
    }

    #[test]
    fn test_repair() {
        let e = engine();
        let repeated = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.0), (x: 5.0, y: 0.0)];
        assert_eq!(e.repair(&repeated).map(|l| l.0.len()), Some(2));
        let collapsed = line_string![(x: 1.0, y: 1.0), (x: 1.0, y: 1.0)];
        assert!(e.repair(&collapsed).is_none());
        let nan = line_string![(x: 0.0, y: 0.0), (x: f64::NAN, y: 1.0), (x: 3.0, y: 4.0)];
        let repaired = e.repair(&nan).expect("two finite points remain");
        assert_eq!(repaired.0[1], coord! { x: 3.0, y: 4.0 });
    }

    #[test]
    fn test_intersects_crossing_without_shared_vertex() {
        let e = engine();
        let a = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 200.0, y: 50.0)];
        let b = line_string![(x: 150.0, y: -100.0), (x: 150.0, y: 100.0)];
        assert!(e.intersects(&a, &b));
        let length = e.length(&a).get::<uom::si::length::foot>();
        // 100 feet plus the 100 by 50 diagonal
        assert!((length - 211.803_398_874_989_5).abs() < 1e-9);
    }

    #[test]
    fn test_buffers() {
        let e = engine();
        let radius = Length::new::<uom::si::length::foot>(75.0);
        let origin = Point::new(-118.25, 34.05);
        let east = |feet: f64| Haversine.destination(origin, 90.0, feet * 0.3048);
        let a = e.buffer_point(origin, radius);
        let b = e.buffer_point(east(149.9), radius);
        let c = e.buffer_point(east(150.1), radius);
        assert!(e.buffers_intersect(&a, &b));
        assert!(!e.buffers_intersect(&a, &c));
    }
}
