//! Command implementations for the species range CLI.
//!
//! Provides subcommands for building a species range map from iNaturalist
//! observations and for inspecting what the feature store holds.

use clap::{Args, Subcommand, ValueEnum};
use srm_inat::config::{DEFAULT_MAX_RECORDS, INATURALIST_OBSERVATIONS_URL, MAX_PAGE_SIZE};
use srm_inat::FetchConfig;
use srm_utils::distance::{Distance, DEFAULT_BUFFER_DISTANCE};
use std::path::PathBuf;
use std::time::Duration;

pub mod count;
pub mod export;
pub mod range_map;

/// Observations API settings shared by the commands that fetch.
#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// Observations endpoint URL
    #[arg(long, default_value = INATURALIST_OBSERVATIONS_URL)]
    pub api_url: String,

    /// Record cap applied when more observations match
    #[arg(long, default_value_t = DEFAULT_MAX_RECORDS)]
    pub max_records: u32,

    /// Observations per page request (at most 200)
    #[arg(long, default_value_t = MAX_PAGE_SIZE)]
    pub page_size: u32,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ApiArgs {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            base_url: self.api_url.clone(),
            page_size: self.page_size,
            max_records: self.max_records,
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Geojson,
    Csv,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch observations of a taxon and store them as points with an optional range buffer
    RangeMap {
        /// Feature store (SQLite file) to write into
        #[arg(short = 'd', long)]
        database: PathBuf,

        /// Taxon name, e.g. "Rubus ursinus"
        #[arg(short = 't', long)]
        taxon: String,

        /// iNaturalist place id (10 is Oregon)
        #[arg(long, default_value_t = 10)]
        place_id: u64,

        /// Name of the point feature class to create
        #[arg(short = 'p', long)]
        points: String,

        /// Name of the buffer polygon feature class; no buffer when omitted
        #[arg(short = 'b', long)]
        buffer: Option<String>,

        /// Buffer distance around the outermost points
        #[arg(long, default_value = DEFAULT_BUFFER_DISTANCE)]
        buffer_distance: Distance,

        /// Replace feature classes that already exist
        #[arg(long)]
        overwrite: bool,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Report how many observations match and how many pages would be fetched
    Count {
        #[arg(short = 't', long)]
        taxon: String,

        #[arg(long, default_value_t = 10)]
        place_id: u64,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Write a stored feature class as GeoJSON or CSV
    Export {
        #[arg(short = 'd', long)]
        database: PathBuf,

        /// Feature class to export
        #[arg(short = 'c', long)]
        class: String,

        #[arg(short = 'f', long, value_enum, default_value_t = ExportFormat::Geojson)]
        format: ExportFormat,

        /// Output file; stdout when omitted
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// List the feature classes in a feature store
    List {
        #[arg(short = 'd', long)]
        database: PathBuf,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::RangeMap {
            database,
            taxon,
            place_id,
            points,
            buffer,
            buffer_distance,
            overwrite,
            api,
        } => {
            let request = range_map::RangeMapRequest {
                taxon_name: taxon,
                place_id,
                points_name: points,
                buffer_name: buffer.filter(|name| !name.trim().is_empty()),
                buffer_distance,
            };
            range_map::run_range_map(&database, overwrite, &api, &request).await
        }
        Command::Count {
            taxon,
            place_id,
            api,
        } => count::run_count(&taxon, place_id, &api).await,
        Command::Export {
            database,
            class,
            format,
            output,
        } => export::run_export(&database, &class, format, output.as_deref()),
        Command::List { database } => export::run_list(&database),
    }
}
