use std::path::PathBuf;

use hqta_core::error::QualificationError;
use hqta_gtfs::feed::FeedError;

#[derive(thiserror::Error, Debug)]
pub enum HqtaAppError {
    #[error("Invalid input: {0}")]
    InvalidUserInput(String),
    #[error("failure reading GTFS input: {source}")]
    Feed {
        #[from]
        source: FeedError,
    },
    #[error("qualification failed: {source}")]
    Qualification {
        #[from]
        source: QualificationError,
    },
    #[error("Error writing to '{path}': {message}")]
    WriteError { path: PathBuf, message: String },
}
