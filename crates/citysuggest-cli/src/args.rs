use clap::{Parser, Subcommand};

/// CLI arguments for citysuggest
#[derive(Debug, Parser)]
#[command(
    name = "citysuggest",
    version,
    about = "Query and inspect the citysuggest city autocomplete engine"
)]
pub struct CliArgs {
    /// Catalog file: GeoNames .tsv/.txt, .json or .bin, optionally .gz
    /// (default: the bundled sample dataset)
    #[arg(short = 'i', long = "input", global = true, env = "CITYSUGGEST_DATA")]
    pub input: Option<String>,

    /// Optional comma-separated list of ISO2 country codes to keep (e.g. CA,US)
    #[arg(short = 'f', long = "filter", global = true)]
    pub filter: Option<String>,

    /// Drop cities below this population
    #[arg(long = "min-population", global = true, default_value_t = 0)]
    pub min_population: u64,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "log-level", global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the catalog and its index
    Stats,

    /// Suggest cities for a (partial) name
    Suggest {
        /// Query text, e.g. "Mont" or "québec"
        query: String,

        /// Latitude of the caller, in degrees
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<String>,

        /// Longitude of the caller, in degrees
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<String>,

        /// Maximum number of suggestions
        #[arg(short = 'n', long)]
        limit: Option<String>,

        /// Print the response body as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the loaded (and filtered) catalog as a binary snapshot
    BuildCache {
        /// Output path, e.g. cities.catalog.bin
        output: String,
    },
}
