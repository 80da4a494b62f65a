// crates/citysuggest-core/src/lib.rs

//! City-name autocomplete.
//!
//! Give it a partial, possibly accented query and an optional latitude /
//! longitude, get back a ranked list of cities.
//!
//! ```rust
//! use citysuggest_core::{Catalog, RawParams, Suggester};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::load()?; // bundled sample dataset
//! let suggester = Suggester::with_defaults(catalog);
//!
//! let params = RawParams::query("Mont").with_coordinate("45.50884", "-73.58781");
//! let outcome = suggester.suggest(&params);
//! for s in outcome.suggestions() {
//!     println!("{} ({:.3})", s.name(), s.score);
//! }
//! # Ok(()) }
//! ```
//!
//! Layers, leaf first: [`model`] (catalog), [`text`] (folding, distance),
//! [`index`] (candidate generation), [`score`], [`query`] (validation) and
//! [`suggest`] (the pipeline). [`loader`] is the startup-time collaborator
//! that turns files into a [`Catalog`].

pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod logging;
pub mod model;
pub mod query;
pub mod score;
pub mod suggest;
pub mod text;

// Re-exports
pub use crate::config::{ScoreParams, SuggestConfig, SuggestConfigBuilder};
pub use crate::error::{CitySuggestError, Result};
pub use crate::index::{IndexStats, TextIndex};
pub use crate::loader::{CatalogSource, GeoNamesTsv, LoadOptions};
#[cfg(feature = "json")]
pub use crate::loader::JsonRecords;
pub use crate::logging::init_logging;
pub use crate::model::{Catalog, CatalogStats, CityId, CityRecord, Coordinate};
pub use crate::query::{Field, FieldErrors, Query, RawParams, ValidationError};
pub use crate::score::Scorer;
pub use crate::suggest::{SuggestOutcome, Suggester, Suggestion};
