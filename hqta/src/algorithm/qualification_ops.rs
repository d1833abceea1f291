use hqta_core::{error::QualificationError, geometry::GeometryEngine, model::FeedTables};

use crate::{
    algorithm::{
        corridor::{segment_corridors, CorridorSegment},
        frequency::{route_direction_metrics, PeakService, RouteDirectionMetrics},
        hub::{qualify_hubs, HubQualification},
    },
    config::HqtaConfig,
};

/// the outputs of both qualification pathways
pub struct QualificationResult {
    pub hubs: HubQualification,
    pub route_metrics: Vec<RouteDirectionMetrics>,
    pub segments: Vec<CorridorSegment>,
}

/// runs hub and corridor qualification over a feed snapshot. the configuration is
/// validated before any work is done.
pub fn run_qualification(
    tables: &FeedTables,
    config: &HqtaConfig,
    engine: &dyn GeometryEngine,
) -> Result<QualificationResult, QualificationError> {
    config.validate()?;
    let service = PeakService::new(tables, &config.am_peak, &config.pm_peak);
    let hubs = qualify_hubs(tables, config, &service, engine)?;
    let route_metrics = route_direction_metrics(&service);
    let segments = segment_corridors(&route_metrics, tables, config, engine)?;
    Ok(QualificationResult {
        hubs,
        route_metrics,
        segments,
    })
}
