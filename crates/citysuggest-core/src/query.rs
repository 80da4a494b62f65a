// crates/citysuggest-core/src/query.rs

//! # Query Validator
//!
//! Turns raw request parameters into a [`Query`] or a non-empty
//! [`FieldErrors`]. Every field is checked; violations accumulate instead of
//! failing on the first one.

use crate::config::SuggestConfig;
use crate::model::Coordinate;
use crate::text::normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Request parameters exactly as the adapter received them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl RawParams {
    /// Parameters with only `q` set.
    pub fn query(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    pub fn with_coordinate(mut self, latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        self.latitude = Some(latitude.into());
        self.longitude = Some(longitude.into());
        self
    }

    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Q,
    Latitude,
    Longitude,
    Limit,
}

impl Field {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Q => "q",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Limit => "limit",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationError {
    MissingQuery,
    InvalidCoordinate,
    InvalidLimit,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingQuery => "query text is required",
            Self::InvalidCoordinate => {
                "latitude and longitude must be given together as numbers within range"
            }
            Self::InvalidLimit => "limit must be a positive integer",
        })
    }
}

/// Non-empty mapping of field → error kind. Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, ValidationError>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<ValidationError> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, kind: ValidationError) -> bool {
        self.0.values().any(|k| *k == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, ValidationError)> + '_ {
        self.0.iter().map(|(f, k)| (*f, *k))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: an empty set of errors is a valid query instead.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, kind)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {kind}")?;
        }
        Ok(())
    }
}

/// A validated request.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    raw_text: String,
    normalized_text: String,
    coordinate: Option<Coordinate>,
    limit: usize,
}

impl Query {
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Lowercase, accent-folded, trimmed text. Never empty.
    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    /// Between 1 and the configured maximum.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Validate `params` against `config`.
///
/// ```rust
/// use citysuggest_core::config::SuggestConfig;
/// use citysuggest_core::query::{validate, Field, RawParams, ValidationError};
///
/// let config = SuggestConfig::default();
/// let query = validate(&RawParams::query("Québec"), &config).unwrap();
/// assert_eq!(query.normalized_text(), "quebec");
/// assert_eq!(query.limit(), 10);
///
/// let errors = validate(&RawParams::default().with_limit("toto"), &config).unwrap_err();
/// assert_eq!(errors.get(Field::Q), Some(ValidationError::MissingQuery));
/// assert_eq!(errors.get(Field::Limit), Some(ValidationError::InvalidLimit));
/// ```
pub fn validate(params: &RawParams, config: &SuggestConfig) -> Result<Query, FieldErrors> {
    let mut errors = BTreeMap::new();

    let text = params.q.as_deref().map(str::trim).unwrap_or_default();
    let normalized_text = normalize(text);
    if normalized_text.is_empty() {
        errors.insert(Field::Q, ValidationError::MissingQuery);
    }

    let coordinate = match validate_coordinate(params) {
        Ok(coordinate) => coordinate,
        Err(fields) => {
            for field in fields {
                errors.insert(field, ValidationError::InvalidCoordinate);
            }
            None
        }
    };

    let limit = match params.limit.as_deref() {
        None => config.default_limit,
        Some(raw) => match parse_limit(raw) {
            Some(limit) => limit.min(config.max_limit),
            None => {
                errors.insert(Field::Limit, ValidationError::InvalidLimit);
                config.default_limit
            }
        },
    };

    if !errors.is_empty() {
        return Err(FieldErrors(errors));
    }

    Ok(Query {
        raw_text: params.q.clone().unwrap_or_default(),
        normalized_text,
        coordinate,
        limit,
    })
}

/// `Ok(None)` when neither value is given; otherwise both must be valid.
/// On failure returns the offending fields (a missing partner counts).
fn validate_coordinate(params: &RawParams) -> Result<Option<Coordinate>, Vec<Field>> {
    let lat = params.latitude.as_deref();
    let lon = params.longitude.as_deref();
    if lat.is_none() && lon.is_none() {
        return Ok(None);
    }

    let lat_value = lat.and_then(|s| parse_degrees(s, 90.0));
    let lon_value = lon.and_then(|s| parse_degrees(s, 180.0));

    match (lat_value, lon_value) {
        (Some(latitude), Some(longitude)) => Ok(Coordinate::new(latitude, longitude)),
        (lat_value, lon_value) => {
            let mut bad = Vec::with_capacity(2);
            if lat_value.is_none() {
                bad.push(Field::Latitude);
            }
            if lon_value.is_none() {
                bad.push(Field::Longitude);
            }
            Err(bad)
        }
    }
}

/// Parses a finite float with `|value| <= bound`.
fn parse_degrees(s: &str, bound: f64) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= bound)
}

/// Positive decimal integer. Values too large for `usize` saturate; the caller
/// clamps to the configured maximum anyway.
fn parse_limit(s: &str) -> Option<usize> {
    let digits = s.trim();
    let digits = digits.strip_prefix('+').unwrap_or(digits);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.bytes().all(|b| b == b'0') {
        return None;
    }
    Some(digits.parse::<usize>().unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SuggestConfig {
        SuggestConfig::default()
    }

    #[test]
    fn accepts_text_only() {
        let query = validate(&RawParams::query("  Montréal "), &config()).unwrap();
        assert_eq!(query.raw_text(), "  Montréal ");
        assert_eq!(query.normalized_text(), "montreal");
        assert_eq!(query.coordinate(), None);
        assert_eq!(query.limit(), 10);
    }

    #[test]
    fn missing_or_blank_query() {
        for params in [RawParams::default(), RawParams::query(""), RawParams::query("   ")] {
            let errors = validate(&params, &config()).unwrap_err();
            assert_eq!(errors.get(Field::Q), Some(ValidationError::MissingQuery));
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn accepts_coordinate_pair() {
        let params = RawParams::query("Mont").with_coordinate("45.50884", " -73.58781 ");
        let query = validate(&params, &config()).unwrap();
        assert_eq!(query.coordinate(), Coordinate::new(45.50884, -73.58781));
    }

    #[test]
    fn rejects_non_numeric_coordinate() {
        let params = RawParams::query("Mont").with_coordinate("toto", "-73.58781");
        let errors = validate(&params, &config()).unwrap_err();
        assert_eq!(errors.get(Field::Latitude), Some(ValidationError::InvalidCoordinate));
        assert_eq!(errors.get(Field::Longitude), None);
    }

    #[test]
    fn rejects_lone_latitude_or_longitude() {
        let lat_only = RawParams {
            latitude: Some("45.5".into()),
            ..RawParams::query("Mont")
        };
        let errors = validate(&lat_only, &config()).unwrap_err();
        assert_eq!(errors.get(Field::Longitude), Some(ValidationError::InvalidCoordinate));

        let lon_only = RawParams {
            longitude: Some("-73.5".into()),
            ..RawParams::query("Mont")
        };
        let errors = validate(&lon_only, &config()).unwrap_err();
        assert_eq!(errors.get(Field::Latitude), Some(ValidationError::InvalidCoordinate));
    }

    #[test]
    fn rejects_out_of_range_and_non_finite_coordinates() {
        for (lat, lon) in [("91", "0"), ("0", "-180.1"), ("NaN", "0"), ("0", "inf"), ("", "")] {
            let params = RawParams::query("Mont").with_coordinate(lat, lon);
            let errors = validate(&params, &config()).unwrap_err();
            assert!(errors.contains(ValidationError::InvalidCoordinate), "{lat},{lon}");
        }
        let edge = RawParams::query("Mont").with_coordinate("-90", "180");
        assert!(validate(&edge, &config()).is_ok());
    }

    #[test]
    fn limit_parsing() {
        let q = |limit: &str| validate(&RawParams::query("va").with_limit(limit), &config());

        assert_eq!(q("5").unwrap().limit(), 5);
        assert_eq!(q(" +7 ").unwrap().limit(), 7);
        assert_eq!(q("1000").unwrap().limit(), 100);
        assert_eq!(q("99999999999999999999999").unwrap().limit(), 100);

        for bad in ["toto", "0", "000", "-3", "2.5", "", "1e3"] {
            let errors = q(bad).unwrap_err();
            assert_eq!(errors.get(Field::Limit), Some(ValidationError::InvalidLimit), "{bad:?}");
        }
    }

    #[test]
    fn errors_accumulate() {
        let params = RawParams {
            q: None,
            latitude: Some("north".into()),
            longitude: None,
            limit: Some("-1".into()),
        };
        let errors = validate(&params, &config()).unwrap_err();
        assert_eq!(errors.get(Field::Q), Some(ValidationError::MissingQuery));
        assert_eq!(errors.get(Field::Latitude), Some(ValidationError::InvalidCoordinate));
        assert_eq!(errors.get(Field::Longitude), Some(ValidationError::InvalidCoordinate));
        assert_eq!(errors.get(Field::Limit), Some(ValidationError::InvalidLimit));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn errors_serialize_as_field_map() {
        let errors = validate(&RawParams::default().with_limit("x"), &config()).unwrap_err();
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"q":"MissingQuery","limit":"InvalidLimit"}"#);
        assert_eq!(errors.to_string(), "q: query text is required; limit: limit must be a positive integer");
    }
}
