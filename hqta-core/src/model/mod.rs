mod direction;
mod feed_tables;
mod route;
mod route_shape;
mod stop;
mod stop_time;
mod trip;

pub use direction::{DirectionKey, TravelDirection};
pub use feed_tables::FeedTables;
pub use route::{Route, RouteType};
pub use route_shape::{RouteShape, ShapePoint};
pub use stop::{LocationType, Stop};
pub use stop_time::{StopTime, SECONDS_PER_DAY};
pub use trip::Trip;
