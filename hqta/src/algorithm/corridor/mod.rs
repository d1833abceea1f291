//! corridor segmentation: splits overlapping route shapes of the same direction
//! into shared segments and qualifies each segment on its combined service.
mod corridor_segment;
mod coverage;
mod directional_shape;
mod segmenter;

pub use corridor_segment::{CorridorSegment, DirectionalIntervals, SegmentKind};
pub use coverage::{aggregate_service, select_covering_shapes};
pub use directional_shape::{build_directional_shapes, DirectionalShape};
pub use segmenter::segment_corridors;
