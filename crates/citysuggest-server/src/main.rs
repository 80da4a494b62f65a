//! citysuggest-server: serves `GET /suggestions` over HTTP.
//!
//! ```text
//! citysuggest-server                                   # bundled sample, 127.0.0.1:2345
//! citysuggest-server --input cities15000.txt.gz --filter CA,US --min-population 5000
//! CITYSUGGEST_BIND=0.0.0.0:8080 citysuggest-server --empty-status ok
//! curl 'http://127.0.0.1:2345/suggestions?q=Mont&latitude=45.50884&longitude=-73.58781'
//! ```
use anyhow::Context;
use citysuggest_core::{init_logging, Catalog, LoadOptions, SuggestConfig, Suggester};
use citysuggest_server::{serve, AppState, EmptyStatus};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "citysuggest-server", version, about = "City autocomplete over HTTP")]
struct ServerArgs {
    /// Address to listen on
    #[arg(short = 'b', long, env = "CITYSUGGEST_BIND", default_value = "127.0.0.1:2345")]
    bind: SocketAddr,

    /// Catalog file: GeoNames .tsv/.txt, .json or .bin, optionally .gz
    /// (default: the bundled sample dataset)
    #[arg(short = 'i', long, env = "CITYSUGGEST_DATA")]
    input: Option<PathBuf>,

    /// Optional comma-separated list of ISO2 country codes to keep (e.g. CA,US)
    #[arg(short = 'f', long, env = "CITYSUGGEST_FILTER")]
    filter: Option<String>,

    /// Drop cities below this population
    #[arg(long, env = "CITYSUGGEST_MIN_POPULATION", default_value_t = 0)]
    min_population: u64,

    /// Number of suggestions when the request has no `limit`
    #[arg(long, default_value_t = 10)]
    default_limit: usize,

    /// Upper bound applied to the request `limit`
    #[arg(long, default_value_t = 100)]
    max_limit: usize,

    /// Status for a valid request with no match
    #[arg(long, value_enum, default_value_t = EmptyStatus::NotFound)]
    empty_status: EmptyStatus,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "CITYSUGGEST_LOG", default_value = "info")]
    log_level: tracing::Level,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_logging(args.log_level)?;

    let mut options = LoadOptions::default().with_min_population(args.min_population);
    if let Some(filter) = args.filter.as_deref() {
        options = options.with_country_list(filter);
    }
    let catalog = Catalog::open(args.input.as_deref(), &options).context("loading catalog")?;
    let stats = catalog.stats();
    info!(
        cities = stats.cities,
        countries = stats.countries,
        regions = stats.regions,
        "catalog ready"
    );

    let config = SuggestConfig::builder()
        .max_limit(args.max_limit)
        .default_limit(args.default_limit)
        .build();
    let suggester = Arc::new(Suggester::new(catalog, config));

    serve(AppState::new(suggester, args.empty_status), args.bind).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        ServerArgs::command().debug_assert();
    }

    #[test]
    fn empty_status_values() {
        let args = ServerArgs::try_parse_from(["citysuggest-server", "--empty-status", "ok"]).unwrap();
        assert_eq!(args.empty_status, EmptyStatus::Ok);

        let args = ServerArgs::try_parse_from(["citysuggest-server", "--empty-status", "not-found"]).unwrap();
        assert_eq!(args.empty_status, EmptyStatus::NotFound);
    }
}
