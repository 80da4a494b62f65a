// crates/citysuggest-core/src/loader/json.rs

// ---------------------------------------------------------------------------
// FILE GUARD: compiled only with the 'json' feature (see loader/mod.rs).
// ---------------------------------------------------------------------------

use super::{open_stream, CatalogSource};
use crate::error::{CitySuggestError, Result};
use crate::model::CityRecord;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Raw city structure as it comes from JSON.
#[derive(Debug, Deserialize)]
struct CityRaw {
    #[serde(default)]
    id: Option<u64>,
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    population: Option<u64>,
    /// Overrides the population-derived importance.
    #[serde(default)]
    importance: Option<f64>,
}

/// A JSON array of city objects:
///
/// ```json
/// [{"name": "Montréal", "latitude": 45.50884, "longitude": -73.58781,
///   "country": "CA", "region": "10", "population": 3268513}]
/// ```
#[derive(Debug, Clone)]
pub struct JsonRecords {
    path: PathBuf,
}

impl JsonRecords {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonRecords {
    fn load(&self) -> Result<Vec<CityRecord>> {
        let reader = open_stream(&self.path)?;
        let raw: Vec<CityRaw> = serde_json::from_reader(reader)?;
        raw.into_iter()
            .enumerate()
            .map(|(i, raw)| {
                into_record(raw, i).map_err(|e| CitySuggestError::InvalidRecord {
                    line: i + 1,
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

fn into_record(raw: CityRaw, position: usize) -> Result<CityRecord> {
    let city = CityRecord::new(
        raw.id.unwrap_or(position as u64),
        &raw.name,
        raw.latitude,
        raw.longitude,
    )?
    .with_location(
        raw.country.as_deref().unwrap_or_default(),
        raw.region.as_deref().unwrap_or_default(),
    )
    .with_population(raw.population.unwrap_or(0));

    match raw.importance {
        Some(importance) => city.with_importance(importance),
        None => Ok(city),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(contents: &str) -> Result<Vec<CityRecord>> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.json");
        std::fs::write(&path, contents).unwrap();
        JsonRecords::new(&path).load()
    }

    #[test]
    fn loads_records() {
        let cities = load(
            r#"[
                {"name": "Montreal", "latitude": 45.5017, "longitude": -73.5673, "importance": 0.9},
                {"id": 7, "name": "Laval", "latitude": 45.56995, "longitude": -73.692,
                 "country": "ca", "region": "10", "population": 376845}
            ]"#,
        )
        .unwrap();

        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].id(), 0);
        assert_eq!(cities[0].importance(), 0.9);
        assert_eq!(cities[1].id(), 7);
        assert_eq!(cities[1].country(), "CA");
        assert_eq!(cities[1].population(), 376_845);
    }

    #[test]
    fn invalid_record_reports_position() {
        let err = load(r#"[{"name": "Ok", "latitude": 1, "longitude": 1},
                           {"name": "Bad", "latitude": 100, "longitude": 1}]"#)
        .unwrap_err();
        assert!(matches!(err, CitySuggestError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(load("{not json"), Err(CitySuggestError::Json(_))));
    }
}
