#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("non-finite coordinate ({x}, {y}) in {context}")]
    NonFiniteCoordinate { x: f64, y: f64, context: String },
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
    #[error("noding failed: {0}")]
    Noding(String),
    #[error("projection failed: {0}")]
    Projection(String),
}
