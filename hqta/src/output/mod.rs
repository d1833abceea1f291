//! serializable outputs of a qualification run.
mod hub_record;
pub mod output_ops;
mod segment_record;
mod summary;

pub use hub_record::HubRecord;
pub use segment_record::SegmentRecord;
pub use summary::{AgencyStats, QualificationSummary, RunSource};
