// crates/citysuggest-core/src/loader/mod.rs

//! # Catalog Loader
//!
//! Handles the physical layer (I/O, decompression, binary cache) and
//! delegates to a format parser (GeoNames TSV or JSON). The suggestion
//! pipeline never reads files itself: it is handed a finished [`Catalog`].

use crate::error::{CitySuggestError, Result};
use crate::model::{Catalog, CityRecord};
use once_cell::sync::OnceCell;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

mod cache;
mod geonames;
#[cfg(feature = "json")]
mod json;

pub use geonames::GeoNamesTsv;
#[cfg(feature = "json")]
pub use json::JsonRecords;

/// Suffix appended to a source file name for its binary cache.
pub const CACHE_SUFFIX: &str = "catalog.bin";

static DEFAULT_CATALOG: OnceCell<Arc<Catalog>> = OnceCell::new();

/// Anything that can produce the city records at startup.
pub trait CatalogSource {
    fn load(&self) -> Result<Vec<CityRecord>>;
}

/// Load-time filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keep only these ISO2 country codes (case-insensitive).
    pub countries: Option<Vec<String>>,
    /// Drop cities below this population.
    pub min_population: u64,
}

impl LoadOptions {
    /// Parse a comma separated ISO2 list such as `"CA, us"`.
    pub fn with_country_list(mut self, list: &str) -> Self {
        let codes: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_ascii_uppercase)
            .collect();
        self.countries = (!codes.is_empty()).then_some(codes);
        self
    }

    pub fn with_min_population(mut self, min_population: u64) -> Self {
        self.min_population = min_population;
        self
    }

    fn apply(&self, catalog: &mut Catalog) {
        if let Some(countries) = &self.countries {
            catalog.retain_countries(countries);
        }
        catalog.retain_min_population(self.min_population);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Tsv,
    #[cfg(feature = "json")]
    Json,
    Binary,
}

impl Format {
    fn detect(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);

        if name.ends_with(".tsv") || name.ends_with(".txt") {
            Ok(Self::Tsv)
        } else if name.ends_with(".bin") {
            Ok(Self::Binary)
        } else if name.ends_with(".json") {
            #[cfg(feature = "json")]
            {
                Ok(Self::Json)
            }
            #[cfg(not(feature = "json"))]
            {
                Err(CitySuggestError::UnsupportedFormat(format!(
                    "{} (JSON support requires the 'json' feature)",
                    path.display()
                )))
            }
        } else {
            Err(CitySuggestError::UnsupportedFormat(path.display().to_string()))
        }
    }
}

impl Catalog {
    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    pub fn default_dataset_filename() -> &'static str {
        "cities_sample.tsv"
    }

    pub fn default_dataset_path() -> PathBuf {
        Self::default_data_dir().join(Self::default_dataset_filename())
    }

    /// The bundled sample dataset, parsed once per process.
    pub fn load() -> Result<Arc<Self>> {
        DEFAULT_CATALOG
            .get_or_try_init(|| {
                let path = Self::default_dataset_path();
                let source = GeoNamesTsv::new(path);
                Ok(Arc::new(Self::from_source(&source, &LoadOptions::default())?))
            })
            .cloned()
    }

    /// Startup entry point for binaries: `path` when given, otherwise the
    /// bundled dataset (shared and unfiltered when `options` is the default).
    pub fn open(path: Option<&Path>, options: &LoadOptions) -> Result<Arc<Self>> {
        match path {
            Some(path) => Ok(Arc::new(Self::load_from_path(path, options)?)),
            None if *options == LoadOptions::default() => Self::load(),
            None => {
                let source = GeoNamesTsv::new(Self::default_dataset_path());
                Ok(Arc::new(Self::from_source(&source, options)?))
            }
        }
    }

    /// Run any [`CatalogSource`] and apply the filters.
    pub fn from_source(source: &dyn CatalogSource, options: &LoadOptions) -> Result<Self> {
        let mut catalog = Self::new(source.load()?)?;
        options.apply(&mut catalog);
        Ok(catalog)
    }

    /// **Smart Load:** picks the parser from the extension and keeps a
    /// sibling binary cache (`<file>.catalog.bin`) for text sources.
    pub fn load_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let started = Instant::now();

        let mut catalog = match Format::detect(path)? {
            Format::Binary => cache::read(path)?,
            format => {
                let cache_path = cache::cache_path(path);
                match cache::read_if_fresh(path, &cache_path) {
                    Some(catalog) => catalog,
                    None => {
                        let catalog = Self::new(parse(path, format)?)?;
                        if let Err(e) = cache::write(&cache_path, &catalog) {
                            warn!(path = %cache_path.display(), error = %e, "could not write catalog cache");
                        }
                        catalog
                    }
                }
            }
        };

        options.apply(&mut catalog);
        info!(
            path = %path.display(),
            cities = catalog.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Write a binary snapshot that [`Catalog::load_from_path`] reads back.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        cache::write(path.as_ref(), self)
    }
}

fn parse(path: &Path, format: Format) -> Result<Vec<CityRecord>> {
    match format {
        Format::Tsv => GeoNamesTsv::new(path).load(),
        #[cfg(feature = "json")]
        Format::Json => JsonRecords::new(path).load(),
        Format::Binary => Ok(cache::read(path)?.cities().to_vec()),
    }
}

/// Opens a file, buffers it, and wraps it in a gzip decoder for `*.gz`.
/// Returns a generic reader so parsers don't care about the compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        CitySuggestError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    if !is_gzip(path) {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        use flate2::read::GzDecoder;
        Ok(Box::new(BufReader::new(GzDecoder::new(reader))))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(CitySuggestError::UnsupportedFormat(format!(
            "{} is gzip compressed but the 'compact' feature is disabled",
            path.display()
        )))
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}
