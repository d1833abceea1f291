//! verification that the routes of a cluster meet on a common street rather than
//! running along nearby parallel streets.
mod route_overlap;
mod street_name;

pub use route_overlap::{verify_route_overlap, RouteOverlap};
pub use street_name::StreetNameParser;
