//! citysuggest: command-line front end for citysuggest-core
//!
//! Usage examples
//! --------------
//!
//! - Show catalog and index statistics
//!   $ citysuggest stats
//!
//! - Suggest cities, optionally biased toward a position
//!   $ citysuggest suggest mont
//!   $ citysuggest suggest mont --latitude 45.50884 --longitude -73.58781 --limit 5
//!   $ citysuggest suggest québec --json
//!
//! - Snapshot a large dataset for fast startup
//!   $ citysuggest --input cities15000.txt.gz --filter CA,US build-cache cities.catalog.bin
//!
//! Data source
//! -----------
//!
//! By default the bundled sample dataset of `citysuggest-core` is used. With
//! `--input <path>` any GeoNames dump, JSON array or binary snapshot is
//! loaded; a binary cache is written next to it for faster subsequent runs.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use citysuggest_core::{init_logging, Catalog, LoadOptions, RawParams, SuggestOutcome, Suggester};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

fn main() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    let level = args
        .log_level
        .parse::<tracing::Level>()
        .with_context(|| format!("invalid --log-level {:?}", args.log_level))?;
    init_logging(level)?;

    let mut options = LoadOptions::default().with_min_population(args.min_population);
    if let Some(filter) = args.filter.as_deref() {
        options = options.with_country_list(filter);
    }

    let catalog = Catalog::open(args.input.as_deref().map(Path::new), &options)
        .with_context(|| match &args.input {
            Some(path) => format!("loading catalog from {path}"),
            None => "loading the bundled catalog".to_owned(),
        })?;
    debug!(cities = catalog.len(), "catalog ready");

    match args.command {
        Commands::Stats => {
            let stats = catalog.stats();
            let suggester = Suggester::with_defaults(catalog);
            let index = suggester.index_stats();
            println!("Catalog statistics:");
            println!("  Cities: {}", stats.cities);
            println!("  Countries: {}", stats.countries);
            println!("  Regions: {}", stats.regions);
            println!("Index statistics:");
            println!("  Tokens: {}", index.tokens);
            println!("  Grams: {}", index.grams);
            println!("  Terms: {}", index.terms);
        }

        Commands::Suggest {
            query,
            latitude,
            longitude,
            limit,
            json,
        } => {
            let params = RawParams {
                q: Some(query),
                latitude,
                longitude,
                limit,
            };
            let suggester = Suggester::with_defaults(catalog);
            let outcome = suggester.suggest(&params);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
            if outcome.is_rejected() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::BuildCache { output } => {
            catalog
                .save_as(&output)
                .with_context(|| format!("writing {output}"))?;
            println!("Wrote {} cities to {output}", catalog.len());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_outcome(outcome: &SuggestOutcome<'_>) {
    match outcome {
        SuggestOutcome::Rejected { errors } => {
            for (field, error) in errors.iter() {
                eprintln!("{field}: {error}");
            }
        }
        SuggestOutcome::Served { suggestions } if suggestions.is_empty() => {
            println!("No cities found");
        }
        SuggestOutcome::Served { suggestions } => {
            for s in suggestions {
                let region = match (s.city.region(), s.city.country()) {
                    ("", country) => country.to_string(),
                    (region, country) => format!("{region}, {country}"),
                };
                println!(
                    "{:.4}  {} ({region})  {:.5}, {:.5}",
                    s.score,
                    s.name(),
                    s.city.latitude(),
                    s.city.longitude()
                );
            }
        }
    }
}
