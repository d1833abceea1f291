use geo::{LineString, Point};
use uom::si::f64::Length;

use super::{GeometryError, PointBuffer};

/// geometry operations required by the qualification engine. point buffers are
/// geodesic over WGS84 coordinates. linework operations work on planar coordinates
/// in feet (see [`super::LocalProjection`]) so that any geometry library able to
/// intersect and node linework can be substituted.
pub trait GeometryEngine: Send + Sync {
    /// buffers a WGS84 point by a geodesic radius
    fn buffer_point(&self, center: Point<f64>, radius: Length) -> PointBuffer;

    /// true if two point buffers share any area
    fn buffers_intersect(&self, a: &PointBuffer, b: &PointBuffer) -> bool;

    /// planar length of a polyline
    fn length(&self, line: &LineString<f64>) -> Length;

    /// attempts to make a polyline valid by dropping non-finite and repeated
    /// coordinates. None if the result cannot be a valid polyline.
    fn repair(&self, line: &LineString<f64>) -> Option<LineString<f64>>;

    /// simplifies a polyline within a tolerance, preserving its endpoints
    fn simplify(&self, line: &LineString<f64>, tolerance: Length) -> LineString<f64>;

    /// true if the two polylines cross or come within the engine's snap tolerance
    fn intersects(&self, a: &LineString<f64>, b: &LineString<f64>) -> bool;

    /// unions the linework and splits it at every intersection, returning the
    /// maximal runs of linework between junctions.
    fn node(&self, lines: &[LineString<f64>]) -> Result<Vec<LineString<f64>>, GeometryError>;

    /// fraction of `segment`'s length that lies within the engine's snap tolerance of `shape`
    fn coverage_ratio(&self, segment: &LineString<f64>, shape: &LineString<f64>) -> f64;
}
