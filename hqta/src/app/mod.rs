mod app_error;
mod gtfs_input;
mod hqta_app;
pub mod run;

pub use app_error::HqtaAppError;
pub use gtfs_input::{parse_gtfs_input, GtfsInput};
pub use hqta_app::{HqtaApp, HqtaOperation};
