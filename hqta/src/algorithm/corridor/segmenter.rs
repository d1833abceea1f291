use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, Mutex},
};

use geo::{line_measures::LengthMeasurable, BoundingRect, Haversine, LineString, MultiLineString};
use hqta_core::{
    error::QualificationError,
    geometry::{GeometryEngine, LocalProjection},
    model::{DirectionKey, FeedTables},
};
use itertools::Itertools;
use kdam::{Bar, BarExt};
use rayon::prelude::*;
use rstar::{
    primitives::{GeomWithData, Rectangle},
    RTree,
};
use uom::si::{
    f64::Length,
    length::{foot, meter},
};

use super::{
    aggregate_service, build_directional_shapes, select_covering_shapes, CorridorSegment,
    DirectionalIntervals, DirectionalShape, SegmentKind,
};
use crate::{algorithm::frequency::RouteDirectionMetrics, config::HqtaConfig};

type GroupKey = (String, DirectionKey);

/// a segment before its id is assigned, in projected feet
struct SegmentDraft<'a> {
    kind: SegmentKind,
    lines: Vec<LineString<f64>>,
    shapes: Vec<&'a DirectionalShape>,
}

/// splits the route shapes of each (agency, direction) group into corridor segments
/// and qualifies each segment on the combined service of the shapes covering it.
/// every group is noded on its own plane, centered on the group's shapes.
///
/// # Arguments
///
/// * `route_metrics` - peak service by route and direction
/// * `tables`        - feed snapshot holding the shapes
/// * `config`        - validated run configuration
/// * `engine`        - geometry operations
///
/// # Returns
///
/// the segments of every group, ordered by agency, direction and position of the
/// segment within its group
pub fn segment_corridors(
    route_metrics: &[RouteDirectionMetrics],
    tables: &FeedTables,
    config: &HqtaConfig,
    engine: &dyn GeometryEngine,
) -> Result<Vec<CorridorSegment>, QualificationError> {
    let mut groups: BTreeMap<GroupKey, Vec<&RouteDirectionMetrics>> = BTreeMap::new();
    for metrics in route_metrics.iter().filter(|m| m.trips_am + m.trips_pm > 0) {
        groups
            .entry((metrics.agency.clone(), metrics.direction))
            .or_default()
            .push(metrics);
    }
    if groups.is_empty() {
        log::info!("no route shapes with peak service, skipping corridor segmentation");
        return Ok(vec![]);
    }
    log::info!("segmenting route shapes in {} (agency, direction) groups", groups.len());

    let bar = Arc::new(Mutex::new(
        Bar::builder()
            .total(groups.len())
            .desc("corridor segmentation")
            .build()
            .map_err(QualificationError::Internal)?,
    ));
    let group_segments = groups
        .into_iter()
        .collect_vec()
        .into_par_iter()
        .map(|(key, metrics)| {
            let segments = segment_route_group(&key, &metrics, tables, config, engine);
            if let Ok(mut b) = bar.clone().lock() {
                let _ = b.update(1);
            }
            segments
        })
        .collect::<Vec<_>>();
    eprintln!();

    let mut result = vec![];
    for segments in group_segments.into_iter() {
        result.extend(segments?);
    }
    log::info!(
        "created {} corridor segments, {} qualifying",
        result.len(),
        result.iter().filter(|s| s.qualifies).count()
    );
    Ok(result)
}

/// projects the shapes of one group onto a plane centered on their vertices,
/// segments them and qualifies each segment.
fn segment_route_group(
    key: &GroupKey,
    metrics: &[&RouteDirectionMetrics],
    tables: &FeedTables,
    config: &HqtaConfig,
    engine: &dyn GeometryEngine,
) -> Result<Vec<CorridorSegment>, QualificationError> {
    let vertices = metrics
        .iter()
        .flat_map(|m| m.shape_ids.iter())
        .filter_map(|id| tables.get_shape(id))
        .filter_map(|s| s.to_linestring())
        .flat_map(|l| l.into_points())
        .filter(|p| p.x().is_finite() && p.y().is_finite())
        .collect_vec();
    if vertices.is_empty() {
        log::debug!("group {key:?}: no shapes with valid points");
        return Ok(vec![]);
    }
    let projection = LocalProjection::centered_on(vertices.iter())?;
    let shapes = build_directional_shapes(metrics, tables, &projection, engine);
    let group = shapes.iter().collect_vec();
    log::debug!("group {key:?}: segmenting {} directional shapes", group.len());

    let (agency, direction) = key;
    let segments = segment_group(key, &group, config, engine)
        .into_iter()
        .enumerate()
        .map(|(idx, draft)| {
            let segment_id = format!("{agency}:{direction}:{idx}");
            finish_segment(segment_id, agency, *direction, draft, &projection, config)
        })
        .collect_vec();
    Ok(segments)
}

/// segments the shapes of one group. shapes meeting no other shape are kept whole
/// and the remaining shapes are noded together.
fn segment_group<'a>(
    key: &GroupKey,
    group: &[&'a DirectionalShape],
    config: &HqtaConfig,
    engine: &dyn GeometryEngine,
) -> Vec<SegmentDraft<'a>> {
    let intersecting = find_intersecting(group, config.segmentation.snap_tolerance_feet, engine);
    let (overlapping, isolated): (Vec<_>, Vec<_>) =
        (0..group.len()).partition(|idx| intersecting.contains(idx));

    let mut drafts = isolated
        .into_iter()
        .map(|idx| SegmentDraft {
            kind: SegmentKind::Isolated,
            lines: vec![group[idx].geometry.clone()],
            shapes: vec![group[idx]],
        })
        .collect_vec();
    if overlapping.is_empty() {
        return drafts;
    }

    let shapes = overlapping.iter().map(|idx| group[*idx]).collect_vec();
    let lines = shapes
        .iter()
        .map(|s| match config.segmentation.simplify_tolerance_feet {
            Some(tol) => engine.simplify(&s.geometry, Length::new::<foot>(tol)),
            None => s.geometry.clone(),
        })
        .collect_vec();

    match engine.node(&lines) {
        Ok(pieces) => {
            let min_length = config.segmentation.min_segment_length();
            let mut n_slivers = 0;
            for piece in pieces.into_iter() {
                if engine.length(&piece) < min_length {
                    n_slivers += 1;
                    continue;
                }
                let ratios = lines
                    .iter()
                    .map(|line| engine.coverage_ratio(&piece, line))
                    .collect_vec();
                let covering =
                    select_covering_shapes(&ratios, config.segmentation.coverage_tolerance);
                if covering.is_empty() {
                    log::debug!("group {key:?}: noded piece not covered by any shape, dropping");
                    continue;
                }
                drafts.push(SegmentDraft {
                    kind: SegmentKind::Noded,
                    lines: vec![piece],
                    shapes: covering.into_iter().map(|idx| shapes[idx]).collect_vec(),
                });
            }
            log::debug!(
                "group {key:?}: {} overlapping shapes noded, {n_slivers} slivers dropped",
                shapes.len()
            );
        }
        Err(e) => {
            log::warn!(
                "group {key:?}: noding {} overlapping shapes failed, keeping them as one unsegmented segment: {e}",
                shapes.len()
            );
            drafts.push(SegmentDraft {
                kind: SegmentKind::Unsegmented,
                lines,
                shapes,
            });
        }
    }
    drafts
}

/// indices of the shapes that meet at least one other shape of the group.
/// candidates come from an R-tree over the shape extents.
fn find_intersecting(
    group: &[&DirectionalShape],
    tolerance: f64,
    engine: &dyn GeometryEngine,
) -> HashSet<usize> {
    let extents = group
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| {
            s.geometry.bounding_rect().map(|r| {
                let rect = Rectangle::from_corners(
                    [r.min().x - tolerance, r.min().y - tolerance],
                    [r.max().x + tolerance, r.max().y + tolerance],
                );
                GeomWithData::new(rect, idx)
            })
        })
        .collect_vec();
    let tree = RTree::bulk_load(extents.clone());
    let mut result = HashSet::new();
    for extent in extents.iter() {
        let envelope = rstar::RTreeObject::envelope(extent.geom());
        for candidate in tree.locate_in_envelope_intersecting(&envelope) {
            if candidate.data <= extent.data {
                continue;
            }
            let (a, b) = (group[extent.data], group[candidate.data]);
            if engine.intersects(&a.geometry, &b.geometry) {
                result.insert(extent.data);
                result.insert(candidate.data);
            }
        }
    }
    result
}

fn finish_segment(
    segment_id: String,
    agency: &str,
    direction: DirectionKey,
    draft: SegmentDraft,
    projection: &LocalProjection,
    config: &HqtaConfig,
) -> CorridorSegment {
    let (trips_am, trips_pm, route_ids) = aggregate_service(&draft.shapes);
    let intervals_am = DirectionalIntervals::new(&trips_am, config.am_peak.duration_minutes);
    let intervals_pm = DirectionalIntervals::new(&trips_pm, config.pm_peak.duration_minutes);
    let threshold = config.frequency_threshold_minutes;
    let qualifies = intervals_am.min() <= threshold || intervals_pm.min() <= threshold;
    let shape_ids = draft
        .shapes
        .iter()
        .map(|s| s.shape_id.clone())
        .sorted()
        .dedup()
        .collect_vec();
    let geometry = projection.unproject_multilinestring(&MultiLineString::new(draft.lines));
    let meters = geometry.iter().map(|l| l.length(&Haversine)).sum::<f64>();
    let length_feet = Length::new::<meter>(meters).get::<foot>();
    CorridorSegment {
        segment_id,
        agency: agency.to_string(),
        direction,
        kind: draft.kind,
        geometry,
        length_feet,
        route_count: route_ids.len(),
        route_ids,
        shape_ids,
        trips_am,
        trips_pm,
        intervals_am,
        intervals_pm,
        qualifies,
    }
}

#[cfg(test)]
mod test {
    use super::{finish_segment, segment_group, GroupKey};
    use crate::{
        algorithm::corridor::{DirectionalShape, SegmentKind},
        config::HqtaConfig,
    };
    use geo::{line_string, LineString, Point};
    use hqta_core::{
        geometry::{GeometryEngine, GeometryError, LocalProjection, PlanarGeometryEngine, PointBuffer},
        model::DirectionKey,
    };
    use uom::si::{f64::Length, length::foot};

    fn shape(route: &str, geometry: LineString<f64>, am: usize) -> DirectionalShape {
        shape_variant(route, &format!("{route}-shape"), geometry, am)
    }

    fn shape_variant(route: &str, shape_id: &str, geometry: LineString<f64>, am: usize) -> DirectionalShape {
        DirectionalShape {
            agency: String::from("a"),
            route_id: route.to_string(),
            direction: DirectionKey::Zero,
            shape_id: shape_id.to_string(),
            geometry,
            trips_am: am,
            trips_pm: 0,
        }
    }

    fn group_key() -> GroupKey {
        (String::from("a"), DirectionKey::Zero)
    }

    fn projection() -> LocalProjection {
        LocalProjection::new(Point::new(-87.63, 41.88)).unwrap()
    }

    /// b runs along the middle third of a, leaving and rejoining at right angles
    fn crossing_route_b(am: usize) -> DirectionalShape {
        shape(
            "b",
            line_string![(x: 1000.0, y: 500.0), (x: 1000.0, y: 0.0), (x: 2000.0, y: 0.0), (x: 2000.0, y: -500.0)],
            am,
        )
    }

    /// planar engine whose noding always fails
    struct FailingNoder(PlanarGeometryEngine);

    impl GeometryEngine for FailingNoder {
        fn buffer_point(&self, center: Point<f64>, radius: Length) -> PointBuffer {
            self.0.buffer_point(center, radius)
        }

        fn buffers_intersect(&self, a: &PointBuffer, b: &PointBuffer) -> bool {
            self.0.buffers_intersect(a, b)
        }

        fn length(&self, line: &LineString<f64>) -> Length {
            self.0.length(line)
        }

        fn repair(&self, line: &LineString<f64>) -> Option<LineString<f64>> {
            self.0.repair(line)
        }

        fn simplify(&self, line: &LineString<f64>, tolerance: Length) -> LineString<f64> {
            self.0.simplify(line, tolerance)
        }

        fn intersects(&self, a: &LineString<f64>, b: &LineString<f64>) -> bool {
            self.0.intersects(a, b)
        }

        fn node(&self, _lines: &[LineString<f64>]) -> Result<Vec<LineString<f64>>, GeometryError> {
            Err(GeometryError::Noding(String::from("topology exception")))
        }

        fn coverage_ratio(&self, segment: &LineString<f64>, shape: &LineString<f64>) -> f64 {
            self.0.coverage_ratio(segment, shape)
        }
    }

    #[test]
    fn test_shared_run_is_split() {
        let config = HqtaConfig::default();
        let engine = PlanarGeometryEngine::new(config.segmentation.snap_tolerance());
        let a = shape("a", line_string![(x: 0.0, y: 0.0), (x: 3000.0, y: 0.0)], 4);
        let b = crossing_route_b(4);
        let group = vec![&a, &b];
        let drafts = segment_group(&group_key(), &group, &config, &engine);
        assert!(drafts.iter().all(|d| d.kind == SegmentKind::Noded));
        let shared = drafts
            .iter()
            .filter(|d| d.shapes.len() == 2)
            .collect::<Vec<_>>();
        assert_eq!(shared.len(), 1);
        let shared_length = engine.length(&shared[0].lines[0]).get::<foot>();
        assert!((shared_length - 1000.0).abs() < 1e-6);
        // a before, a after, b's two legs and the shared run
        assert_eq!(drafts.len(), 5);
    }

    #[test]
    fn test_shared_run_qualifies_on_combined_routes() {
        let config = HqtaConfig::default();
        let engine = PlanarGeometryEngine::new(config.segmentation.snap_tolerance());
        // two variants of route a, the second with an extra leg from the south
        let a1 = shape_variant("a", "a1", line_string![(x: 0.0, y: 0.0), (x: 3000.0, y: 0.0)], 4);
        let a2 = shape_variant(
            "a",
            "a2",
            line_string![(x: 0.0, y: -500.0), (x: 0.0, y: 0.0), (x: 3000.0, y: 0.0)],
            4,
        );
        let b1 = shape_variant(
            "b",
            "b1",
            line_string![(x: 1000.0, y: 500.0), (x: 1000.0, y: 0.0), (x: 2000.0, y: 0.0), (x: 2000.0, y: -500.0)],
            4,
        );
        let group = vec![&a1, &a2, &b1];
        let (agency, direction) = group_key();
        let drafts = segment_group(&group_key(), &group, &config, &engine);
        // a2's leg, a before, the shared run, a after and b's two legs
        assert_eq!(drafts.len(), 6);
        let segments = drafts
            .into_iter()
            .enumerate()
            .map(|(idx, draft)| {
                finish_segment(format!("a:0:{idx}"), &agency, direction, draft, &projection(), &config)
            })
            .collect::<Vec<_>>();

        let (shared, legs): (Vec<_>, Vec<_>) = segments.iter().partition(|s| s.route_count == 2);
        assert_eq!(shared.len(), 1);
        let shared = shared[0];
        assert_eq!(shared.kind, SegmentKind::Noded);
        assert_eq!(shared.trips_am.dir0, 8);
        assert_eq!(shared.route_ids, vec!["a", "b"]);
        assert_eq!(shared.shape_ids, vec!["a1", "a2", "b1"]);
        assert_eq!(shared.intervals_am.dir0, 15.0);
        assert!(shared.qualifies);
        assert!((shared.length_feet - 1000.0).abs() < 1.0, "found {}", shared.length_feet);

        assert_eq!(legs.len(), 5);
        for leg in legs.iter() {
            assert_eq!(leg.trips_am.dir0, 4, "segment {}", leg.segment_id);
            assert!(!leg.qualifies, "segment {}", leg.segment_id);
        }
    }

    #[test]
    fn test_noding_failure_keeps_group_unsegmented() {
        let config = HqtaConfig::default();
        let engine = FailingNoder(PlanarGeometryEngine::new(config.segmentation.snap_tolerance()));
        let a = shape("a", line_string![(x: 0.0, y: 0.0), (x: 3000.0, y: 0.0)], 4);
        let b = crossing_route_b(4);
        let far = shape("c", line_string![(x: 0.0, y: 5000.0), (x: 3000.0, y: 5000.0)], 2);
        let group = vec![&a, &b, &far];
        let drafts = segment_group(&group_key(), &group, &config, &engine);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].kind, SegmentKind::Isolated);
        assert_eq!(drafts[0].shapes[0].route_id, "c");

        let (agency, direction) = group_key();
        let draft = drafts.into_iter().nth(1).unwrap();
        assert_eq!(draft.kind, SegmentKind::Unsegmented);
        let segment = finish_segment(String::from("a:0:1"), &agency, direction, draft, &projection(), &config);
        assert_eq!(segment.kind, SegmentKind::Unsegmented);
        assert_eq!(segment.geometry.0.len(), 2);
        assert_eq!(segment.route_ids, vec!["a", "b"]);
        assert_eq!(segment.trips_am.dir0, 8);
        assert!(segment.qualifies);
        // a is 3000 feet, b is 2000 feet
        assert!((segment.length_feet - 5000.0).abs() < 2.0, "found {}", segment.length_feet);
    }

    #[test]
    fn test_isolated_shapes_kept_whole() {
        let config = HqtaConfig::default();
        let engine = PlanarGeometryEngine::new(config.segmentation.snap_tolerance());
        let a = shape("a", line_string![(x: 0.0, y: 0.0), (x: 3000.0, y: 0.0)], 8);
        let b = shape("b", line_string![(x: 0.0, y: 900.0), (x: 3000.0, y: 900.0)], 2);
        let group = vec![&a, &b];
        let drafts = segment_group(&group_key(), &group, &config, &engine);
        assert_eq!(drafts.len(), 2);
        assert!(drafts.iter().all(|d| d.kind == SegmentKind::Isolated));
        assert_eq!(drafts[0].shapes[0].route_id, "a");
        assert_eq!(drafts[0].lines[0], a.geometry);
    }

    #[test]
    fn test_parallel_route_outside_snap_tolerance_is_separate() {
        let config = HqtaConfig::default();
        let engine = PlanarGeometryEngine::new(config.segmentation.snap_tolerance());
        // b runs one block over, well beyond the snap tolerance
        let a = shape("a", line_string![(x: 0.0, y: 0.0), (x: 3000.0, y: 0.0)], 8);
        let b = shape("b", line_string![(x: 0.0, y: 200.0), (x: 3000.0, y: 200.0)], 2);
        let group = vec![&a, &b];
        let (agency, direction) = group_key();
        let segments = segment_group(&group_key(), &group, &config, &engine)
            .into_iter()
            .enumerate()
            .map(|(idx, draft)| {
                finish_segment(format!("a:0:{idx}"), &agency, direction, draft, &projection(), &config)
            })
            .collect::<Vec<_>>();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.kind == SegmentKind::Isolated));
        assert_eq!(segments[0].route_ids, vec!["a"]);
        assert_eq!(segments[0].trips_am.dir0, 8);
        assert!(segments[0].qualifies);
        assert_eq!(segments[1].route_ids, vec!["b"]);
        assert_eq!(segments[1].trips_am.dir0, 2);
        assert!(!segments[1].qualifies);
    }
}
