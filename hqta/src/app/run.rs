use std::path::Path;

use hqta_core::{geometry::PlanarGeometryEngine, model::FeedTables};
use hqta_gtfs::feed::feed_ops;
use itertools::Itertools;

use super::{GtfsInput, HqtaAppError};
use crate::{
    algorithm::qualification_ops::run_qualification,
    config::HqtaConfig,
    output::{output_ops, QualificationSummary, RunSource},
};

/// reads every GTFS input, runs hub and corridor qualification and writes the
/// results to the output directory.
pub fn run(
    config: &HqtaConfig,
    inputs: &[GtfsInput],
    output_directory: &Path,
) -> Result<(), HqtaAppError> {
    config.validate()?;
    let tables = read_inputs(inputs, config)?;
    let engine = PlanarGeometryEngine::new(config.segmentation.snap_tolerance());
    let result = run_qualification(&tables, config, &engine)?;

    let source = RunSource::new(&inputs.iter().map(|i| i.to_string()).collect_vec(), config);
    let summary = QualificationSummary::new(source, &result, &tables);
    log::info!(
        "{} rail hubs, {} bus hubs, {} of {} corridor segments qualifying ({:.2} miles)",
        summary.totals.rail_hubs,
        summary.totals.bus_hubs,
        summary.totals.qualifying_segments,
        summary.totals.segments,
        summary.totals.qualifying_miles
    );
    output_ops::write_outputs(&result, &summary, output_directory)
}

/// reads each archive and merges them into a single snapshot
fn read_inputs(inputs: &[GtfsInput], config: &HqtaConfig) -> Result<FeedTables, HqtaAppError> {
    let duplicate = inputs.iter().map(|i| &i.agency).duplicates().next();
    if let Some(agency) = duplicate {
        return Err(HqtaAppError::InvalidUserInput(format!(
            "agency '{agency}' is assigned to more than one GTFS input"
        )));
    }
    let mut tables = FeedTables::default();
    for input in inputs.iter() {
        let feed = feed_ops::read_feed(&input.path, &input.agency, &config.service_day)?;
        tables = tables.merge(&feed)?;
    }
    Ok(tables)
}
