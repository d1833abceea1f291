//! data model, configuration primitives and the geometry capability used by the
//! hub and corridor qualification engine.
pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
