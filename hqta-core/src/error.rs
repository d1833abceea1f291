use crate::geometry::GeometryError;

#[derive(thiserror::Error, Debug)]
pub enum QualificationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("error due to dataset contents: {0}")]
    InvalidData(String),
    #[error("geometry operation failed: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },
    #[error("Internal Error: {0}")]
    Internal(String),
}
