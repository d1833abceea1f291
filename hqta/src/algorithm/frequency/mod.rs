//! peak period service counts and intervals.
mod directional_trips;
mod frequency_ops;
pub mod interval_serde;
mod peak_service;
mod period_metrics;
mod qualification_metrics;
mod trip_accumulator;

pub use directional_trips::DirectionalTrips;
pub use frequency_ops::{route_direction_metrics, stop_set_metrics, RouteDirectionMetrics};
pub use peak_service::{PeakPeriod, PeakService};
pub use period_metrics::{compute_interval, PeriodMetrics};
pub use qualification_metrics::QualificationMetrics;
pub use trip_accumulator::TripAccumulator;
