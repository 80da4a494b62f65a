// crates/citysuggest-core/src/suggest.rs

//! # Suggestion Pipeline
//!
//! validate → candidates → score → sort → truncate.
//!
//! A [`Suggester`] owns the shared catalog handle, the text index built over
//! it and the configuration. It holds no mutable state, so one instance
//! (usually behind an `Arc`) serves any number of concurrent requests.

use crate::config::SuggestConfig;
use crate::index::{IndexStats, TextIndex};
use crate::model::{Catalog, CityRecord};
use crate::query::{validate, FieldErrors, Query, RawParams};
use crate::score::Scorer;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A scored, ranked city. Borrows the record from the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suggestion<'a> {
    pub city: &'a CityRecord,
    pub score: f64,
}

impl Suggestion<'_> {
    pub fn name(&self) -> &str {
        self.city.name()
    }

    /// Total order: score desc, importance desc, name asc, then source id.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.city.importance().total_cmp(&self.city.importance()))
            .then_with(|| self.city.name().cmp(other.city.name()))
            .then_with(|| self.city.id().cmp(&other.city.id()))
    }
}

impl Serialize for Suggestion<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Suggestion", 4)?;
        s.serialize_field("name", self.city.name())?;
        s.serialize_field("latitude", &self.city.latitude())?;
        s.serialize_field("longitude", &self.city.longitude())?;
        s.serialize_field("score", &self.score)?;
        s.end()
    }
}

/// The two terminal states of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestOutcome<'a> {
    /// Validation failed; the index was not touched.
    Rejected { errors: FieldErrors },
    /// Validation passed. An empty list is still a served response.
    Served { suggestions: Vec<Suggestion<'a>> },
}

impl<'a> SuggestOutcome<'a> {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Rejected { errors } => Some(errors),
            Self::Served { .. } => None,
        }
    }

    /// Served suggestions; always empty for a rejected request.
    pub fn suggestions(&self) -> &[Suggestion<'a>] {
        match self {
            Self::Rejected { .. } => &[],
            Self::Served { suggestions } => suggestions,
        }
    }
}

/// `{"suggestions": [...]}` or `{"errors": {...}, "suggestions": []}`.
impl Serialize for SuggestOutcome<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Rejected { errors } => {
                let mut s = serializer.serialize_struct("SuggestOutcome", 2)?;
                s.serialize_field("errors", errors)?;
                s.serialize_field("suggestions", &[] as &[Suggestion<'_>])?;
                s.end()
            }
            Self::Served { suggestions } => {
                let mut s = serializer.serialize_struct("SuggestOutcome", 1)?;
                s.serialize_field("suggestions", suggestions)?;
                s.end()
            }
        }
    }
}

#[derive(Debug)]
pub struct Suggester {
    catalog: Arc<Catalog>,
    index: TextIndex,
    scorer: Scorer,
    config: SuggestConfig,
}

impl Suggester {
    /// Build the text index over `catalog`. Runs once, before serving.
    pub fn new(catalog: Arc<Catalog>, config: SuggestConfig) -> Self {
        let started = Instant::now();
        let index = TextIndex::build(&catalog);
        let stats = index.stats();
        info!(
            cities = stats.cities,
            tokens = stats.tokens,
            grams = stats.grams,
            terms = stats.terms,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "text index built"
        );

        Self {
            catalog,
            index,
            scorer: Scorer::new(config.score),
            config,
        }
    }

    pub fn with_defaults(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, SuggestConfig::default())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    pub fn index_stats(&self) -> IndexStats {
        self.index.stats()
    }

    /// Full pipeline for one request.
    pub fn suggest(&self, params: &RawParams) -> SuggestOutcome<'_> {
        match validate(params, &self.config) {
            Err(errors) => {
                debug!(%errors, "suggestion request rejected");
                SuggestOutcome::Rejected { errors }
            }
            Ok(query) => SuggestOutcome::Served {
                suggestions: self.suggest_query(&query),
            },
        }
    }

    /// Served path for an already validated query.
    pub fn suggest_query(&self, query: &Query) -> Vec<Suggestion<'_>> {
        let candidates = self.index.candidates(query.normalized_text());

        let mut suggestions: Vec<Suggestion<'_>> = candidates
            .iter()
            .filter_map(|&id| self.catalog.get(id))
            .filter_map(|city| {
                self.scorer
                    .score(query.normalized_text(), query.coordinate(), city)
                    .map(|score| Suggestion { city, score })
            })
            .collect();

        let matched = suggestions.len();
        suggestions.sort_by(Suggestion::rank);
        suggestions.truncate(query.limit());

        debug!(
            q = query.normalized_text(),
            candidates = candidates.len(),
            matched,
            served = suggestions.len(),
            "suggestions served"
        );
        suggestions
    }
}
