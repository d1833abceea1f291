//! hub qualification: rail stations plus bus stop clusters with frequent service
//! on intersecting routes.
mod hub;
mod hub_qualifier;

pub use hub::{ClusterEvaluation, Hub, HubKind};
pub use hub_qualifier::{evaluate_cluster, qualify_hubs, HubQualification};
