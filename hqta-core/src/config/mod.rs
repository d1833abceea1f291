mod bounding_box;
mod peak_window;
mod segmentation_config;

pub use bounding_box::BoundingBox;
pub use peak_window::PeakWindow;
pub use segmentation_config::SegmentationConfig;
