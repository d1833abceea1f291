//! conversion of GTFS archives into the normalized tables consumed by the
//! qualification engine.
mod feed_error;
pub mod feed_ops;
mod service_day;

pub use feed_error::FeedError;
pub use service_day::ServiceDay;
