use hqta_core::error::QualificationError;

#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("Failed to parse gtfs archive into `Gtfs` struct: {0}")]
    ArchiveRead(#[from] gtfs_structures::Error),
    #[error("GTFS archive is malformed: {0}")]
    MalformedGtfs(String),
    #[error("failure building feed tables: {source}")]
    Tables {
        #[from]
        source: QualificationError,
    },
}
