//! linework noding: unions a set of polylines, splits them at every point where
//! they meet and merges the resulting pieces into maximal runs between junctions.
//!
//! coordinates are first snapped together within the snap tolerance so that two
//! routes drawn a few feet apart along the same street produce shared linework.
use std::collections::{BTreeSet, HashMap, HashSet};

use geo::{
    algorithm::line_intersection::{line_intersection, LineIntersection},
    line_measures::LengthMeasurable,
    Coord, Euclidean, Line, LineLocatePoint, LineString, Point,
};
use itertools::Itertools;
use rstar::{primitives::GeomWithData, RTree, RTreeObject, AABB};

use super::{line_ops, GeometryError};

/// node coordinates are compared on a grid of this size (feet)
const NODE_GRID: f64 = 1e-6;

type NodeKey = (i64, i64);

fn node_key(c: &Coord<f64>) -> NodeKey {
    ((c.x / NODE_GRID).round() as i64, (c.y / NODE_GRID).round() as i64)
}

/// one segment of an input polyline
struct IndexedSegment {
    /// position of this segment in the flattened segment list
    idx: usize,
    /// input polyline this segment belongs to
    line_idx: usize,
    /// position of this segment along its polyline
    seg_idx: usize,
    line: Line<f64>,
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        line_ops::padded_envelope(&self.line, 0.0)
    }
}

/// an atomic piece of the noded linework along with the input polylines it came from
struct Piece {
    a: NodeKey,
    b: NodeKey,
    a_coord: Coord<f64>,
    b_coord: Coord<f64>,
    sources: BTreeSet<usize>,
}

impl Piece {
    fn other_end(&self, node: &NodeKey) -> (NodeKey, Coord<f64>) {
        if &self.a == node {
            (self.b, self.b_coord)
        } else {
            (self.a, self.a_coord)
        }
    }
}

/// nodes the provided linework. see the module documentation.
///
/// # Arguments
///
/// * `lines`     - projected polylines, each with at least two coordinates
/// * `tolerance` - snap tolerance in feet
///
/// # Returns
///
/// the maximal runs of noded linework. a run ends wherever more than two pieces meet,
/// or where the set of input polylines traversing the linework changes.
pub fn node_linework(
    lines: &[LineString<f64>],
    tolerance: f64,
) -> Result<Vec<LineString<f64>>, GeometryError> {
    validate(lines)?;
    let snapped = snap_vertices(lines, tolerance);
    let segments = flatten_segments(&snapped);
    if segments.is_empty() {
        return Err(GeometryError::Noding(String::from(
            "linework collapsed to nothing after snapping",
        )));
    }

    let tree = RTree::bulk_load(segments);
    let mut splits: Vec<Vec<Coord<f64>>> = vec![vec![]; tree.size()];
    collect_intersections(&tree, &mut splits);
    collect_near_vertices(&tree, &snapped, tolerance, &mut splits);

    let mut ordered = tree.iter().collect_vec();
    ordered.sort_by_key(|s| s.idx);
    let pieces = build_pieces(&ordered, &splits);
    if pieces.is_empty() {
        return Err(GeometryError::Noding(String::from(
            "noding produced no pieces of positive length",
        )));
    }
    Ok(merge_pieces(&pieces))
}

fn validate(lines: &[LineString<f64>]) -> Result<(), GeometryError> {
    for (idx, line) in lines.iter().enumerate() {
        if let Some(c) = line.coords().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate {
                x: c.x,
                y: c.y,
                context: format!("noding input line {idx}"),
            });
        }
        if line.0.len() < 2 {
            return Err(GeometryError::Degenerate(format!(
                "noding input line {idx} has {} coordinates",
                line.0.len()
            )));
        }
    }
    Ok(())
}

/// moves every vertex within `tolerance` of an earlier vertex onto that earlier vertex.
/// lines that collapse to a single point are dropped.
fn snap_vertices(lines: &[LineString<f64>], tolerance: f64) -> Vec<(usize, LineString<f64>)> {
    let vertices = lines
        .iter()
        .flat_map(|l| l.coords().cloned())
        .collect_vec();
    let tree = RTree::bulk_load(
        vertices
            .iter()
            .enumerate()
            .map(|(idx, c)| GeomWithData::new([c.x, c.y], idx))
            .collect_vec(),
    );
    let mut canonical: Vec<Option<Coord<f64>>> = vec![None; vertices.len()];
    for (idx, c) in vertices.iter().enumerate() {
        if canonical[idx].is_some() {
            continue;
        }
        canonical[idx] = Some(*c);
        for neighbor in tree.locate_within_distance([c.x, c.y], tolerance * tolerance) {
            if canonical[neighbor.data].is_none() {
                canonical[neighbor.data] = Some(*c);
            }
        }
    }

    let mut offset = 0;
    let mut result = vec![];
    for (line_idx, line) in lines.iter().enumerate() {
        let n = line.0.len();
        let coords = (offset..offset + n)
            .filter_map(|i| canonical.get(i).copied().flatten())
            .dedup_by(|a, b| node_key(a) == node_key(b))
            .collect_vec();
        offset += n;
        if coords.len() >= 2 {
            result.push((line_idx, LineString::new(coords)));
        } else {
            log::debug!("noding input line {line_idx} collapsed to a point while snapping");
        }
    }
    result
}

fn flatten_segments(lines: &[(usize, LineString<f64>)]) -> Vec<IndexedSegment> {
    lines
        .iter()
        .flat_map(|(line_idx, line)| {
            line.lines()
                .enumerate()
                .filter(|(_, l)| l.length(&Euclidean) > 0.0)
                .map(|(seg_idx, l)| (*line_idx, seg_idx, l))
                .collect_vec()
        })
        .enumerate()
        .map(|(idx, (line_idx, seg_idx, line))| IndexedSegment {
            idx,
            line_idx,
            seg_idx,
            line,
        })
        .collect_vec()
}

/// crossing and collinear-overlap points between every pair of segments. each pair is
/// computed once and the same coordinate is registered on both segments so that the
/// pieces on either side share their end nodes exactly.
fn collect_intersections(tree: &RTree<IndexedSegment>, splits: &mut [Vec<Coord<f64>>]) {
    for segment in tree.iter() {
        for candidate in tree.locate_in_envelope_intersecting(&segment.envelope()) {
            if candidate.idx <= segment.idx {
                continue;
            }
            let consecutive = candidate.line_idx == segment.line_idx
                && candidate.seg_idx.abs_diff(segment.seg_idx) == 1;
            if consecutive {
                continue;
            }
            let points = match line_intersection(segment.line, candidate.line) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => vec![intersection],
                Some(LineIntersection::Collinear { intersection }) => {
                    vec![intersection.start, intersection.end]
                }
                None => continue,
            };
            for p in points {
                splits[segment.idx].push(p);
                splits[candidate.idx].push(p);
            }
        }
    }
}

/// vertices lying within `tolerance` of the interior of another segment split that
/// segment at the vertex itself, gluing nearly-coincident linework together.
fn collect_near_vertices(
    tree: &RTree<IndexedSegment>,
    lines: &[(usize, LineString<f64>)],
    tolerance: f64,
    splits: &mut [Vec<Coord<f64>>],
) {
    let mut seen: HashSet<NodeKey> = HashSet::new();
    for (_, line) in lines.iter() {
        for v in line.coords() {
            if !seen.insert(node_key(v)) {
                continue;
            }
            let query = AABB::from_corners(
                [v.x - tolerance, v.y - tolerance],
                [v.x + tolerance, v.y + tolerance],
            );
            for segment in tree.locate_in_envelope_intersecting(&query) {
                let at_endpoint =
                    node_key(&segment.line.start) == node_key(v) || node_key(&segment.line.end) == node_key(v);
                if at_endpoint {
                    continue;
                }
                let (t, distance) = line_ops::locate_on_line(v, &segment.line);
                if distance <= tolerance && t > 0.0 && t < 1.0 {
                    splits[segment.idx].push(*v);
                }
            }
        }
    }
}

/// splits each segment at its collected coordinates and deduplicates the resulting
/// pieces, remembering every input polyline that produced each piece.
fn build_pieces(segments: &[&IndexedSegment], splits: &[Vec<Coord<f64>>]) -> Vec<Piece> {
    let mut pieces: Vec<Piece> = vec![];
    let mut lookup: HashMap<(NodeKey, NodeKey), usize> = HashMap::new();
    for segment in segments.iter() {
        let line = segment.line;
        let param = |c: &Coord<f64>| line.line_locate_point(&Point::from(*c)).unwrap_or(0.0);
        let interior = splits[segment.idx]
            .iter()
            .filter(|c| {
                let k = node_key(c);
                k != node_key(&line.start) && k != node_key(&line.end)
            })
            .sorted_by(|a, b| param(a).total_cmp(&param(b)))
            .cloned();
        let coords = std::iter::once(line.start)
            .chain(interior)
            .chain(std::iter::once(line.end))
            .dedup_by(|a, b| node_key(a) == node_key(b))
            .collect_vec();

        for (a_coord, b_coord) in coords.into_iter().tuple_windows() {
            let (a, b) = (node_key(&a_coord), node_key(&b_coord));
            if a == b {
                continue;
            }
            let key = if a < b { (a, b) } else { (b, a) };
            match lookup.get(&key) {
                Some(piece_idx) => {
                    pieces[*piece_idx].sources.insert(segment.line_idx);
                }
                None => {
                    lookup.insert(key, pieces.len());
                    pieces.push(Piece {
                        a,
                        b,
                        a_coord,
                        b_coord,
                        sources: BTreeSet::from([segment.line_idx]),
                    });
                }
            }
        }
    }
    pieces
}

/// joins pieces into maximal runs. a node ends a run unless exactly two pieces meet
/// there and both carry the same source polylines.
fn merge_pieces(pieces: &[Piece]) -> Vec<LineString<f64>> {
    let mut incident: HashMap<NodeKey, Vec<usize>> = HashMap::new();
    for (idx, piece) in pieces.iter().enumerate() {
        incident.entry(piece.a).or_default().push(idx);
        incident.entry(piece.b).or_default().push(idx);
    }
    let is_break = |node: &NodeKey| -> bool {
        match incident.get(node).map(|v| v.as_slice()) {
            Some([p, q]) => pieces[*p].sources != pieces[*q].sources,
            _ => true,
        }
    };

    let mut visited = vec![false; pieces.len()];
    let mut result = vec![];

    // open runs begin at a break node
    for start_idx in 0..pieces.len() {
        if visited[start_idx] {
            continue;
        }
        let piece = &pieces[start_idx];
        let start = if is_break(&piece.a) {
            Some((piece.a, piece.a_coord))
        } else if is_break(&piece.b) {
            Some((piece.b, piece.b_coord))
        } else {
            None
        };
        if let Some(start) = start {
            result.push(walk(start, start_idx, pieces, &incident, &mut visited, &is_break));
        }
    }

    // whatever remains forms closed rings with no break node
    for start_idx in 0..pieces.len() {
        if visited[start_idx] {
            continue;
        }
        let piece = &pieces[start_idx];
        let start = (piece.a, piece.a_coord);
        result.push(walk(start, start_idx, pieces, &incident, &mut visited, &|_: &NodeKey| false));
    }
    result
}

fn walk(
    start: (NodeKey, Coord<f64>),
    first_piece: usize,
    pieces: &[Piece],
    incident: &HashMap<NodeKey, Vec<usize>>,
    visited: &mut [bool],
    is_break: &dyn Fn(&NodeKey) -> bool,
) -> LineString<f64> {
    let (mut node, start_coord) = start;
    let mut coords = vec![start_coord];
    let mut current = Some(first_piece);
    while let Some(piece_idx) = current {
        visited[piece_idx] = true;
        let (next_node, next_coord) = pieces[piece_idx].other_end(&node);
        coords.push(next_coord);
        node = next_node;
        if is_break(&node) {
            break;
        }
        current = incident
            .get(&node)
            .and_then(|adjacent| adjacent.iter().find(|p| !visited[**p]).copied());
    }
    LineString::new(coords)
}
