// crates/citysuggest-core/src/model.rs
use crate::error::{CitySuggestError, Result};
use crate::text::normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Population at which [`CityRecord::importance`] saturates at `1.0` (10^7).
const IMPORTANCE_LOG10_CEILING: f64 = 7.0;

/// Dense catalog position of a city. Postings lists in the index store these.
pub type CityId = u32;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Checked constructor: both values finite and within geographic range.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

/// One city in the catalog.
///
/// Immutable once built: fields are private and only readable through the
/// accessors. `normalized_name` is derived from `name` at construction so the
/// index and scorer never re-fold catalog text per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    id: u64,
    name: String,
    normalized_name: String,
    country: String,
    region: String,
    coordinate: Coordinate,
    population: u64,
    importance: f64,
}

impl CityRecord {
    /// Build a record, validating the coordinate range.
    ///
    /// Importance defaults to a population proxy, see [`importance_from_population`].
    pub fn new(id: u64, name: &str, latitude: f64, longitude: f64) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CitySuggestError::InvalidData(format!(
                "city {id} has an empty name"
            )));
        }
        let coordinate = Coordinate::new(latitude, longitude).ok_or_else(|| {
            CitySuggestError::InvalidData(format!(
                "city {id} ({name}) has out-of-range coordinate ({latitude}, {longitude})"
            ))
        })?;

        Ok(Self {
            id,
            name: name.to_owned(),
            normalized_name: normalize(name),
            country: String::new(),
            region: String::new(),
            coordinate,
            population: 0,
            importance: 0.0,
        })
    }

    /// Set the country ISO2 code and admin1 region code.
    pub fn with_location(mut self, country: &str, region: &str) -> Self {
        self.country = country.trim().to_ascii_uppercase();
        self.region = region.trim().to_owned();
        self
    }

    /// Set the population; importance follows unless overridden afterwards.
    pub fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self.importance = importance_from_population(population);
        self
    }

    /// Override the importance weight. Must be finite and non-negative.
    pub fn with_importance(mut self, importance: f64) -> Result<Self> {
        if !importance.is_finite() || importance < 0.0 {
            return Err(CitySuggestError::InvalidData(format!(
                "city {} ({}) has invalid importance {importance}",
                self.id, self.name
            )));
        }
        self.importance = importance;
        Ok(self)
    }

    /// Re-check what the constructors guarantee. Records decoded from a
    /// binary snapshot bypass `new`, so they go through this instead.
    pub(crate) fn check(&self) -> Result<()> {
        let invalid = |what: String| {
            Err(CitySuggestError::InvalidData(format!(
                "city {} ({}) {what}",
                self.id, self.name
            )))
        };
        if self.name.trim().is_empty() || self.name.trim() != self.name {
            return invalid("has an empty or untrimmed name".to_owned());
        }
        if Coordinate::new(self.coordinate.latitude, self.coordinate.longitude).is_none() {
            return invalid(format!(
                "has out-of-range coordinate ({}, {})",
                self.coordinate.latitude, self.coordinate.longitude
            ));
        }
        if !self.importance.is_finite() || self.importance < 0.0 {
            return invalid(format!("has invalid importance {}", self.importance));
        }
        if self.normalized_name != normalize(&self.name) {
            return invalid(format!(
                "has a stale normalized name {:?}",
                self.normalized_name
            ));
        }
        Ok(())
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Display name as found in the source data (accents preserved).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercase, accent-folded name used for all matching.
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// ISO2 country code, or an empty string when unknown.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Admin1 region code (e.g. "10" for Quebec in GeoNames, "CA" in the US).
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    /// Static tie-break weight, normally in `[0, 1]`.
    pub fn importance(&self) -> f64 {
        self.importance
    }
}

/// `log10(population + 1) / 7`, capped at 1.
pub fn importance_from_population(population: u64) -> f64 {
    ((population as f64 + 1.0).log10() / IMPORTANCE_LOG10_CEILING).min(1.0)
}

/// Simple aggregate statistics for the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub cities: usize,
    pub countries: usize,
    pub regions: usize,
}

/// The immutable, preloaded set of cities.
///
/// Built once at startup and shared read-only afterwards (wrap it in an
/// `Arc` to hand it to several pipelines or threads).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    cities: Vec<CityRecord>,
}

impl Catalog {
    /// Fails when there are more cities than [`CityId`] can address.
    pub fn new(cities: Vec<CityRecord>) -> Result<Self> {
        ensure_addressable(cities.len())?;
        Ok(Self { cities })
    }

    /// Validate a catalog that was decoded rather than constructed.
    pub(crate) fn validated(self) -> Result<Self> {
        ensure_addressable(self.cities.len())?;
        for city in &self.cities {
            city.check()?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn get(&self, id: CityId) -> Option<&CityRecord> {
        self.cities.get(id as usize)
    }

    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    /// Iterate cities together with their dense catalog id.
    pub fn iter(&self) -> impl Iterator<Item = (CityId, &CityRecord)> {
        // Every position fits a CityId: checked in `new` and `validated`.
        (0..).zip(self.cities.iter())
    }

    pub fn stats(&self) -> CatalogStats {
        let countries: BTreeSet<&str> = self
            .cities
            .iter()
            .map(CityRecord::country)
            .filter(|c| !c.is_empty())
            .collect();
        let regions: BTreeSet<(&str, &str)> = self
            .cities
            .iter()
            .filter(|c| !c.region().is_empty())
            .map(|c| (c.country(), c.region()))
            .collect();

        CatalogStats {
            cities: self.cities.len(),
            countries: countries.len(),
            regions: regions.len(),
        }
    }

    /// Keep only cities whose ISO2 country code is in `iso2` (case-insensitive).
    pub(crate) fn retain_countries(&mut self, iso2: &[String]) {
        self.cities
            .retain(|c| iso2.iter().any(|code| code.eq_ignore_ascii_case(c.country())));
    }

    pub(crate) fn retain_min_population(&mut self, min_population: u64) {
        if min_population > 0 {
            self.cities.retain(|c| c.population() >= min_population);
        }
    }
}

fn ensure_addressable(len: usize) -> Result<()> {
    match CityId::try_from(len) {
        Ok(_) => Ok(()),
        Err(_) => Err(CitySuggestError::InvalidData(format!(
            "catalog has {len} cities, more than the {} a CityId can address",
            CityId::MAX
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_derives_normalized_name() {
        let city = CityRecord::new(1, " Québec ", 46.81228, -71.21454).unwrap();
        assert_eq!(city.name(), "Québec");
        assert_eq!(city.normalized_name(), "quebec");
    }

    #[test]
    fn record_rejects_out_of_range_coordinates() {
        assert!(CityRecord::new(1, "Nowhere", 91.0, 0.0).is_err());
        assert!(CityRecord::new(1, "Nowhere", 0.0, -180.5).is_err());
        assert!(CityRecord::new(1, "Nowhere", f64::NAN, 0.0).is_err());
        assert!(CityRecord::new(1, "Edge", -90.0, 180.0).is_ok());
    }

    #[test]
    fn record_rejects_empty_name_and_bad_importance() {
        assert!(CityRecord::new(1, "  ", 0.0, 0.0).is_err());
        let city = CityRecord::new(1, "Laval", 45.56995, -73.692).unwrap();
        assert!(city.clone().with_importance(-0.1).is_err());
        assert!(city.clone().with_importance(f64::INFINITY).is_err());
        assert_eq!(city.with_importance(0.5).unwrap().importance(), 0.5);
    }

    #[test]
    fn importance_follows_population() {
        assert_eq!(importance_from_population(0), 0.0);
        assert!(importance_from_population(1_000) < importance_from_population(100_000));
        assert_eq!(importance_from_population(50_000_000), 1.0);
    }

    #[test]
    fn stats_count_distinct_countries_and_regions() {
        let cities: Vec<CityRecord> = [
            ("Montréal", "CA", "10"),
            ("Laval", "CA", "10"),
            ("Toronto", "CA", "08"),
            ("Boston", "US", "MA"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (name, country, region))| {
            CityRecord::new(i as u64, name, 45.0, -73.0)
                .unwrap()
                .with_location(country, region)
        })
        .collect();
        let catalog = Catalog::new(cities).unwrap();

        assert_eq!(
            catalog.stats(),
            CatalogStats {
                cities: 4,
                countries: 2,
                regions: 3,
            }
        );
    }

    #[test]
    fn filters_by_country_and_population() {
        let mut catalog = Catalog::new(vec![
            CityRecord::new(1, "Montréal", 45.5, -73.5)
                .unwrap()
                .with_location("ca", "10")
                .with_population(1_600_000),
            CityRecord::new(2, "Boston", 42.3, -71.0)
                .unwrap()
                .with_location("US", "MA")
                .with_population(600_000),
            CityRecord::new(3, "Tiny", 45.0, -73.0)
                .unwrap()
                .with_location("CA", "10")
                .with_population(300),
        ])
        .unwrap();

        catalog.retain_countries(&["CA".to_owned()]);
        assert_eq!(catalog.len(), 2);
        catalog.retain_min_population(5_000);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).map(CityRecord::name), Some("Montréal"));
    }

    #[test]
    fn id_space_is_checked_up_front() {
        assert!(ensure_addressable(0).is_ok());
        assert!(ensure_addressable(CityId::MAX as usize).is_ok());
        assert!(matches!(
            ensure_addressable(CityId::MAX as usize + 1),
            Err(CitySuggestError::InvalidData(_))
        ));
    }

    #[test]
    fn decoded_records_are_rechecked() {
        let good = CityRecord::new(1, "Lévis", 46.80326, -71.17793).unwrap();
        assert!(Catalog { cities: vec![good.clone()] }.validated().is_ok());

        let mut off_the_map = good.clone();
        off_the_map.coordinate.latitude = 123.0;
        let mut negative = good.clone();
        negative.importance = -1.0;
        let mut not_a_number = good.clone();
        not_a_number.importance = f64::NAN;
        let mut stale = good.clone();
        stale.normalized_name = "Lévis".to_owned();
        let mut blank = good;
        blank.name = " ".to_owned();

        for city in [off_the_map, negative, not_a_number, stale, blank] {
            let catalog = Catalog { cities: vec![city] };
            assert!(matches!(
                catalog.validated(),
                Err(CitySuggestError::InvalidData(_))
            ));
        }
    }
}
