// crates/citysuggest-core/src/score.rs

//! # Scorer
//!
//! Pure scoring of a (query, city) pair. Higher is more relevant, zero means
//! "no match" and the pipeline drops the city.
//!
//! # Tiers (textual component)
//!
//! | tier      | condition                                         | range         |
//! |-----------|---------------------------------------------------|---------------|
//! | Exact     | normalized name equals the query                  | 1.0           |
//! | Prefix    | name starts with the query                        | (0.60, 0.75]  |
//! | Token     | each query token starts some name token           | (0.45, 0.55]  |
//! | Substring | name contains the query                           | (0.30, 0.40]  |
//! | Fuzzy     | name or one of its tokens within the edit budget  | (0.10, 0.20]  |
//!
//! Inside a tier the score grows with coverage (query length over name
//! length) or, for fuzzy matches, with fewer edits.
//!
//! Importance is not part of the score. It only orders cities whose scores
//! are equal, see [`Suggestion`](crate::suggest::Suggestion).

use crate::config::ScoreParams;
use crate::model::{CityRecord, Coordinate};
use crate::text::{bounded_levenshtein, char_len, edit_budget, tokenize};

/// Mean Earth radius (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    Fuzzy,
    Substring,
    Token,
    Prefix,
    Exact,
}

impl MatchTier {
    /// Lower bound (exclusive, except for Exact) and width of the tier.
    const fn band(self) -> (f64, f64) {
        match self {
            Self::Exact => (1.0, 0.0),
            Self::Prefix => (0.60, 0.15),
            Self::Token => (0.45, 0.10),
            Self::Substring => (0.30, 0.10),
            Self::Fuzzy => (0.10, 0.10),
        }
    }
}

/// Classify how `query` matches `name`; both already normalized.
pub fn match_tier(query: &str, name: &str) -> Option<(MatchTier, usize)> {
    if query.is_empty() {
        return None;
    }
    if name == query {
        return Some((MatchTier::Exact, 0));
    }
    if name.starts_with(query) {
        return Some((MatchTier::Prefix, 0));
    }

    let name_tokens = tokenize(name);
    let query_tokens = tokenize(query);
    if !query_tokens.is_empty()
        && query_tokens
            .iter()
            .all(|q| name_tokens.iter().any(|n| n.starts_with(q)))
    {
        return Some((MatchTier::Token, 0));
    }

    if name.contains(query) {
        return Some((MatchTier::Substring, 0));
    }

    let budget = edit_budget(char_len(query));
    if budget == 0 {
        return None;
    }
    std::iter::once(name)
        .chain(name_tokens.iter().copied())
        .filter_map(|candidate| bounded_levenshtein(query, candidate, budget))
        .min()
        .map(|distance| (MatchTier::Fuzzy, distance))
}

/// Textual similarity in `[0, 1]` between a normalized query and a normalized name.
///
/// ```rust
/// use citysuggest_core::score::text_similarity;
///
/// assert_eq!(text_similarity("montreal", "montreal"), 1.0);
/// assert!(text_similarity("mont", "montreal") > text_similarity("real", "montreal"));
/// assert_eq!(text_similarity("toronto", "montreal"), 0.0);
/// ```
pub fn text_similarity(query: &str, name: &str) -> f64 {
    let Some((tier, distance)) = match_tier(query, name) else {
        return 0.0;
    };
    let (floor, width) = tier.band();

    let closeness = match tier {
        MatchTier::Exact => 0.0,
        MatchTier::Fuzzy => {
            let budget = edit_budget(char_len(query)) as f64;
            (budget + 1.0 - distance as f64) / (budget + 1.0)
        }
        _ => (char_len(query) as f64 / char_len(name).max(1) as f64).min(1.0),
    };

    floor + width * closeness
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// `1 / (1 + distance / scale)`: 1 on top of the city, 0.5 at `scale_km`.
pub fn geo_proximity(origin: Coordinate, city: Coordinate, scale_km: f64) -> f64 {
    1.0 / (1.0 + haversine_km(origin, city) / scale_km)
}

/// Combines text and geography into one relevance score.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    params: ScoreParams,
}

impl Scorer {
    pub fn new(params: ScoreParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScoreParams {
        &self.params
    }

    /// Score of `city` for `query`, or `None` when the name does not match.
    ///
    /// Returned scores are always strictly positive and never rounded, so a
    /// better textual match keeps a strictly higher score.
    pub fn score(
        &self,
        normalized_query: &str,
        origin: Option<Coordinate>,
        city: &CityRecord,
    ) -> Option<f64> {
        let text = text_similarity(normalized_query, city.normalized_name());
        if text <= 0.0 {
            return None;
        }

        let relevance = match origin {
            Some(origin) => {
                let w = self.params.geo_weight;
                let geo = geo_proximity(origin, city.coordinate(), self.params.geo_scale_km);
                (1.0 - w) * text + w * geo
            }
            None => text,
        };

        (relevance > 0.0).then_some(relevance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn tiers_are_ordered() {
        let exact = text_similarity("laval", "laval");
        let prefix = text_similarity("lav", "laval");
        let token = text_similarity("royal", "mont-royal");
        let substring = text_similarity("ava", "laval");
        let fuzzy = text_similarity("lavak", "laval");

        assert_eq!(exact, 1.0);
        assert!(exact > prefix, "{exact} > {prefix}");
        assert!(prefix > token, "{prefix} > {token}");
        assert!(token > substring, "{token} > {substring}");
        assert!(substring > fuzzy, "{substring} > {fuzzy}");
        assert!(fuzzy > 0.0);
    }

    #[test]
    fn tier_classification() {
        assert_eq!(match_tier("mont", "mont-royal"), Some((MatchTier::Prefix, 0)));
        assert_eq!(match_tier("mont roy", "mont-royal"), Some((MatchTier::Token, 0)));
        assert_eq!(match_tier("ntreal", "montreal"), Some((MatchTier::Substring, 0)));
        assert_eq!(match_tier("monreal", "montreal-ouest"), Some((MatchTier::Fuzzy, 1)));
        assert_eq!(match_tier("xyz", "montreal"), None);
        assert_eq!(match_tier("", "montreal"), None);
    }

    #[test]
    fn longer_prefix_never_scores_lower() {
        let name = "montreal-ouest";
        let mut previous = 0.0;
        for end in 1..name.len() {
            let score = text_similarity(&name[..end], name);
            assert!(score >= previous, "prefix {} dropped", &name[..end]);
            previous = score;
        }
        assert!(text_similarity(name, name) > previous);
    }

    #[test]
    fn fewer_edits_score_higher() {
        let one = text_similarity("montreak", "montreal");
        let two = text_similarity("montrezk", "montreal");
        assert!(one > two);
        assert!(two > 0.0);
        assert_eq!(text_similarity("mxntrezk", "montreal"), 0.0);
    }

    #[test]
    fn haversine_known_distances() {
        let montreal = coord(45.50884, -73.58781);
        let quebec = coord(46.81228, -71.21454);
        let d = haversine_km(montreal, quebec);
        assert!((d - 233.0).abs() < 5.0, "montreal-quebec = {d}");
        assert_eq!(haversine_km(montreal, montreal), 0.0);

        let antipode = haversine_km(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!((antipode - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn proximity_is_bounded_and_decreasing() {
        let origin = coord(45.5, -73.6);
        let near = geo_proximity(origin, coord(45.52, -73.65), 100.0);
        let far = geo_proximity(origin, coord(34.05, -118.24), 100.0);
        assert!(near <= 1.0 && near > far && far > 0.0);
        assert_eq!(geo_proximity(origin, origin, 100.0), 1.0);
    }

    #[test]
    fn exact_match_beats_nearby_prefix_match() {
        let scorer = Scorer::default();
        let far_exact = CityRecord::new(1, "Laval", 34.0, -118.0).unwrap();
        let near_prefix = CityRecord::new(2, "Lavaltrie", 45.88, -73.28).unwrap();
        let origin = Some(coord(45.88, -73.28));

        let exact = scorer.score("laval", origin, &far_exact).unwrap();
        let prefix = scorer.score("laval", origin, &near_prefix).unwrap();
        assert!(exact > prefix, "{exact} > {prefix}");
    }

    #[test]
    fn geo_reorders_within_a_tier() {
        let scorer = Scorer::default();
        let near = CityRecord::new(1, "Springfield", 42.10, -72.59).unwrap();
        let far = CityRecord::new(2, "Springfield", 39.80, -89.64).unwrap();
        let origin = Some(coord(42.36, -71.06));

        assert!(scorer.score("springfield", origin, &near) > scorer.score("springfield", origin, &far));
        assert_eq!(
            scorer.score("springfield", None, &near),
            scorer.score("springfield", None, &far)
        );
    }

    #[test]
    fn importance_does_not_change_the_score() {
        let scorer = Scorer::default();
        let big = CityRecord::new(1, "Vaughan", 43.8, -79.5)
            .unwrap()
            .with_importance(1.0)
            .unwrap();
        let small = CityRecord::new(2, "Vallejo", 38.1, -122.2)
            .unwrap()
            .with_importance(0.0)
            .unwrap();

        // Same tier, same coverage.
        assert_eq!(scorer.score("va", None, &big), scorer.score("va", None, &small));
    }

    #[test]
    fn tiny_textual_gap_survives_in_the_score() {
        let scorer = Scorer::default();
        let shorter = CityRecord::new(1, &format!("Saint-{}", "a".repeat(22)), 45.0, -73.0).unwrap();
        let longer = CityRecord::new(2, &format!("Saint-{}b", "a".repeat(22)), 45.0, -73.0)
            .unwrap()
            .with_importance(1.0)
            .unwrap();

        let a = scorer.score("sain", None, &shorter).unwrap();
        let b = scorer.score("sain", None, &longer).unwrap();
        assert!(b < a && a - b < 1e-3, "{a} vs {b}");
    }

    #[test]
    fn no_textual_match_means_no_score() {
        let scorer = Scorer::default();
        let city = CityRecord::new(1, "Toronto", 43.7, -79.4).unwrap();
        let origin = Some(city.coordinate());
        assert_eq!(scorer.score("montreal", origin, &city), None);
    }

    #[test]
    fn scores_are_deterministic() {
        let scorer = Scorer::default();
        let city = CityRecord::new(1, "Montréal", 45.50884, -73.58781)
            .unwrap()
            .with_population(1_600_000);
        let origin = Some(coord(45.4, -73.9));
        let first = scorer.score("mont", origin, &city);
        assert_eq!(first, scorer.score("mont", origin, &city));
        assert!(first.unwrap() > 0.0);
    }
}
