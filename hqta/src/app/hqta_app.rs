use std::path::Path;

use clap::{Parser, Subcommand};
use config::{Config, File};

use super::{parse_gtfs_input, GtfsInput, HqtaAppError};
use crate::config::HqtaConfig;

/// Command line tool qualifying high quality transit hubs and corridors from GTFS schedules
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct HqtaApp {
    #[command(subcommand)]
    pub op: HqtaOperation,
}

#[derive(Debug, Clone, Subcommand)]
pub enum HqtaOperation {
    /// run hub and corridor qualification over one or more GTFS archives
    Run {
        /// TOML file with the qualification parameters and agency profiles. if not
        /// provided, the default parameters are used.
        #[arg(short, long)]
        config: Option<String>,

        /// GTFS archive and the agency name for its records, as path=agency.
        /// may be repeated.
        #[arg(short, long, value_parser = parse_gtfs_input, required = true)]
        gtfs: Vec<GtfsInput>,

        /// location on disk to write output files. if not provided,
        /// use the current working directory.
        #[arg(short, long)]
        output_directory: Option<String>,
    },
}

impl HqtaOperation {
    pub fn run(&self) -> Result<(), HqtaAppError> {
        match self {
            HqtaOperation::Run {
                config,
                gtfs,
                output_directory,
            } => {
                let hqta_config = match config {
                    Some(file) => read_config(file)?,
                    None => HqtaConfig::default(),
                };
                let outdir = match output_directory {
                    Some(out) => Path::new(out),
                    None => Path::new(""),
                };
                crate::app::run::run(&hqta_config, gtfs, outdir)
            }
        }
    }
}

/// loads a [`HqtaConfig`] from a TOML file. missing keys take their default values.
pub fn read_config(configuration_file: &str) -> Result<HqtaConfig, HqtaAppError> {
    let filepath = Path::new(configuration_file);
    let config = Config::builder()
        .add_source(File::from(filepath))
        .build()
        .map_err(|e| {
            let msg = format!("file '{configuration_file}' produced error: {e}");
            HqtaAppError::InvalidUserInput(msg)
        })?;
    let hqta_config = config.try_deserialize::<HqtaConfig>().map_err(|e| {
        let msg = format!("error reading configuration in '{configuration_file}': {e}");
        HqtaAppError::InvalidUserInput(msg)
    })?;
    hqta_config.validate()?;
    Ok(hqta_config)
}
