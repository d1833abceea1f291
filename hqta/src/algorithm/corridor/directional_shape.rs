use geo::LineString;
use hqta_core::{
    geometry::{GeometryEngine, LocalProjection},
    model::{DirectionKey, FeedTables},
};

use crate::algorithm::frequency::RouteDirectionMetrics;

/// one shape traveled by a route in one direction, with the peak trips of that
/// route and direction.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalShape {
    pub agency: String,
    pub route_id: String,
    pub direction: DirectionKey,
    pub shape_id: String,
    /// geometry in feet, projected with the projection of its (agency, direction) group
    pub geometry: LineString<f64>,
    pub trips_am: usize,
    pub trips_pm: usize,
}

/// links every route direction with peak service to the shapes of its peak trips,
/// projecting each shape with the projection of its group. shapes that are missing
/// or cannot be repaired into a valid polyline are skipped with a warning.
pub fn build_directional_shapes(
    route_metrics: &[&RouteDirectionMetrics],
    tables: &FeedTables,
    projection: &LocalProjection,
    engine: &dyn GeometryEngine,
) -> Vec<DirectionalShape> {
    let mut result = vec![];
    for metrics in route_metrics.iter() {
        if metrics.trips_am + metrics.trips_pm == 0 {
            continue;
        }
        for shape_id in metrics.shape_ids.iter() {
            let Some(shape) = tables.get_shape(shape_id) else {
                log::warn!(
                    "route '{}' references shape '{shape_id}' which is not in the feed",
                    metrics.route_id
                );
                continue;
            };
            let repaired = shape
                .to_linestring()
                .map(|line| projection.project_linestring(&line))
                .and_then(|line| engine.repair(&line));
            match repaired {
                Some(geometry) => result.push(DirectionalShape {
                    agency: metrics.agency.clone(),
                    route_id: metrics.route_id.clone(),
                    direction: metrics.direction,
                    shape_id: shape_id.clone(),
                    geometry,
                    trips_am: metrics.trips_am,
                    trips_pm: metrics.trips_pm,
                }),
                None => log::warn!(
                    "shape '{shape_id}' of route '{}' has fewer than two valid points, skipping",
                    metrics.route_id
                ),
            }
        }
    }
    result
}
