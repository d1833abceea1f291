use std::collections::{BTreeMap, BTreeSet};

use hqta_core::model::DirectionKey;

use super::DirectionalShape;
use crate::algorithm::frequency::DirectionalTrips;

/// the shapes covering a segment, given each candidate shape's coverage ratio of the
/// segment. every shape at or above the tolerance covers the segment. when none
/// reaches it, the shape with the highest positive ratio is kept alone, the first
/// one in case of a tie.
pub fn select_covering_shapes(ratios: &[f64], tolerance: f64) -> Vec<usize> {
    let covering = ratios
        .iter()
        .enumerate()
        .filter(|(_, r)| **r >= tolerance)
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();
    if !covering.is_empty() {
        return covering;
    }
    let best = ratios
        .iter()
        .enumerate()
        .filter(|(_, r)| **r > 0.0)
        .fold(None, |best: Option<(usize, f64)>, (idx, r)| match best {
            Some((_, b)) if b >= *r => best,
            _ => Some((idx, *r)),
        });
    best.map(|(idx, _)| vec![idx]).unwrap_or_default()
}

/// combined peak trips of a set of shapes, counting each route direction once.
///
/// # Returns
///
/// AM trips, PM trips and the sorted distinct route ids
pub fn aggregate_service(
    shapes: &[&DirectionalShape],
) -> (DirectionalTrips, DirectionalTrips, Vec<String>) {
    let unique: BTreeMap<(&str, DirectionKey), (usize, usize)> = shapes
        .iter()
        .map(|s| ((s.route_id.as_str(), s.direction), (s.trips_am, s.trips_pm)))
        .collect();
    let mut am = DirectionalTrips::default();
    let mut pm = DirectionalTrips::default();
    let mut routes = BTreeSet::new();
    for ((route_id, direction), (trips_am, trips_pm)) in unique.into_iter() {
        am.add(direction, trips_am);
        pm.add(direction, trips_pm);
        routes.insert(route_id.to_string());
    }
    (am, pm, routes.into_iter().collect())
}

#[cfg(test)]
mod test {
    use super::{aggregate_service, select_covering_shapes};
    use crate::algorithm::corridor::DirectionalShape;
    use geo::line_string;
    use hqta_core::model::DirectionKey;

    #[test]
    fn test_covering_shapes() {
        assert_eq!(select_covering_shapes(&[0.95, 0.4], 0.9), vec![0]);
        assert_eq!(select_covering_shapes(&[0.95, 0.92, 0.1], 0.9), vec![0, 1]);
        // nobody reaches the tolerance, the best shape is kept
        assert_eq!(select_covering_shapes(&[0.5, 0.4], 0.9), vec![0]);
        assert_eq!(select_covering_shapes(&[0.2, 0.4], 0.9), vec![1]);
        assert_eq!(select_covering_shapes(&[0.4, 0.4], 0.9), vec![0]);
        assert!(select_covering_shapes(&[0.0, 0.0], 0.9).is_empty());
    }

    fn shape(route: &str, shape_id: &str, direction: DirectionKey, am: usize) -> DirectionalShape {
        DirectionalShape {
            agency: String::from("a"),
            route_id: route.to_string(),
            direction,
            shape_id: shape_id.to_string(),
            geometry: line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)],
            trips_am: am,
            trips_pm: 1,
        }
    }

    #[test]
    fn test_aggregate_deduplicates_route_directions() {
        // two shapes of the same route direction only count once
        let a1 = shape("a", "a-1", DirectionKey::Zero, 8);
        let a2 = shape("a", "a-2", DirectionKey::Zero, 8);
        let b = shape("b", "b-1", DirectionKey::Zero, 4);
        let c = shape("c", "c-1", DirectionKey::Combined, 3);
        let (am, pm, routes) = aggregate_service(&[&a1, &a2, &b, &c]);
        assert_eq!(am.dir0, 12);
        assert_eq!(am.combined, 3);
        assert_eq!(am.dir1, 0);
        assert_eq!(pm.total(), 3);
        assert_eq!(routes, vec!["a", "b", "c"]);
    }
}
