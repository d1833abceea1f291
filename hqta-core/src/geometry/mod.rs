//! geometry capability used by clustering and corridor segmentation.
//! stop buffers are geodesic. linework operations work in a local projected
//! coordinate system in feet, see [`LocalProjection`].
mod buffer;
mod engine;
mod error;
mod noding;
mod planar_engine;
mod projection;

pub mod line_ops;

pub use buffer::PointBuffer;
pub use engine::GeometryEngine;
pub use error::GeometryError;
pub use planar_engine::PlanarGeometryEngine;
pub use projection::LocalProjection;
