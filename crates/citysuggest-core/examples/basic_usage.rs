//! Basic usage example for citysuggest-core
//!
//! This example demonstrates how to:
//! - Load the bundled catalog
//! - Ask for suggestions with and without a coordinate
//! - Inspect validation errors
//!
//! Run with: cargo run -p citysuggest-core --example basic_usage

use citysuggest_core::{init_logging, Catalog, RawParams, SuggestOutcome, Suggester};
use tracing::Level;

fn main() -> citysuggest_core::Result<()> {
    init_logging(Level::INFO)?;
    println!("=== citysuggest Basic Usage Example ===\n");

    let catalog = Catalog::load()?;
    let stats = catalog.stats();
    println!(
        "Loaded {} cities in {} countries ({} regions)\n",
        stats.cities, stats.countries, stats.regions
    );
    let suggester = Suggester::with_defaults(catalog);

    println!("--- Example 1: plain prefix query ---");
    print_outcome(&suggester.suggest(&RawParams::query("Mont")));

    println!("--- Example 2: same query near downtown Montréal ---");
    print_outcome(
        &suggester.suggest(&RawParams::query("Mont").with_coordinate("45.50884", "-73.58781")),
    );

    println!("--- Example 3: accents are optional ---");
    print_outcome(&suggester.suggest(&RawParams::query("quebec")));

    println!("--- Example 4: a typo ---");
    print_outcome(&suggester.suggest(&RawParams::query("Vancuver").with_limit("3")));

    println!("--- Example 5: invalid request ---");
    print_outcome(&suggester.suggest(&RawParams::default().with_limit("toto")));

    Ok(())
}

fn print_outcome(outcome: &SuggestOutcome<'_>) {
    match outcome {
        SuggestOutcome::Rejected { errors } => {
            for (field, error) in errors.iter() {
                println!("  {field}: {error}");
            }
        }
        SuggestOutcome::Served { suggestions } if suggestions.is_empty() => {
            println!("  (no match)");
        }
        SuggestOutcome::Served { suggestions } => {
            for (i, s) in suggestions.iter().enumerate() {
                println!(
                    "  {}. {} [{}] ({:.4}, {:.4}) score {:.4}",
                    i + 1,
                    s.name(),
                    s.city.country(),
                    s.city.latitude(),
                    s.city.longitude(),
                    s.score
                );
            }
        }
    }
    println!();
}
