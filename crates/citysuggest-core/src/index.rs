// crates/citysuggest-core/src/index.rs

//! # Text Index
//!
//! Candidate generation over a [`Catalog`]. The index is built once and is
//! read-only afterwards; a lookup is a handful of map probes instead of a
//! scan over every city.
//!
//! Three postings structures cover the three ways a name can match:
//!
//! - **grams**: every 1-, 2- and 3-character substring of each normalized
//!   name. A query of up to three characters is answered exactly by a single
//!   probe; a longer query intersects the postings of all its trigrams, which
//!   yields a superset of the names containing it.
//! - **tokens**: word tokens in a `BTreeMap`, so "every token starting with
//!   `mont`" is a range scan.
//! - **terms by length**: the vocabulary of tokens and full names bucketed by
//!   character count, so the fuzzy pass only runs the bounded Levenshtein on
//!   terms whose length is within the edit budget.
//!
//! The index over-selects on purpose. Filtering and ranking happen in the
//! scorer.

use crate::model::{Catalog, CityId};
use crate::text::{bounded_levenshtein, char_len, edit_budget, tokenize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

/// Longest gram stored in the gram postings.
const GRAM_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub cities: usize,
    pub tokens: usize,
    pub grams: usize,
    pub terms: usize,
}

#[derive(Debug, Default)]
pub struct TextIndex {
    cities: usize,
    grams: HashMap<String, Vec<CityId>>,
    tokens: BTreeMap<String, Vec<CityId>>,
    terms: HashMap<String, Vec<CityId>>,
    terms_by_len: BTreeMap<usize, Vec<String>>,
}

impl TextIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = Self {
            cities: catalog.len(),
            ..Self::default()
        };

        for (id, city) in catalog.iter() {
            let name = city.normalized_name();
            let chars: Vec<char> = name.chars().collect();

            for n in 1..=GRAM_LEN {
                for window in chars.windows(n) {
                    push_posting(index.grams.entry(window.iter().collect()).or_default(), id);
                }
            }

            push_posting(index.terms.entry(name.to_owned()).or_default(), id);
            for token in tokenize(name) {
                push_posting(index.tokens.entry(token.to_owned()).or_default(), id);
                push_posting(index.terms.entry(token.to_owned()).or_default(), id);
            }
        }

        for term in index.terms.keys() {
            index
                .terms_by_len
                .entry(char_len(term))
                .or_default()
                .push(term.clone());
        }
        for bucket in index.terms_by_len.values_mut() {
            bucket.sort_unstable();
        }

        index
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            cities: self.cities,
            tokens: self.tokens.len(),
            grams: self.grams.len(),
            terms: self.terms.len(),
        }
    }

    /// Candidate city ids for a normalized, non-empty query.
    ///
    /// Sorted and de-duplicated. Guaranteed to contain every city whose
    /// normalized name contains the query, starts with it, has each query
    /// token as a prefix of one of its tokens, or is (in full or by one of
    /// its tokens) within [`edit_budget`] edits of the query.
    pub fn candidates(&self, query: &str) -> Vec<CityId> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut out = self.substring_candidates(query);
        out.extend(self.token_prefix_candidates(query));
        out.extend(self.fuzzy_candidates(query));

        out.sort_unstable();
        out.dedup();
        out
    }

    /// Names containing `query`, plus (for queries over three chars) names
    /// that merely contain all its trigrams.
    fn substring_candidates(&self, query: &str) -> Vec<CityId> {
        let chars: Vec<char> = query.chars().collect();
        if chars.len() <= GRAM_LEN {
            return self.grams.get(query).cloned().unwrap_or_default();
        }

        let mut lists = Vec::with_capacity(chars.len() - GRAM_LEN + 1);
        for window in chars.windows(GRAM_LEN) {
            let gram: String = window.iter().collect();
            match self.grams.get(&gram) {
                Some(list) => lists.push(list.as_slice()),
                None => return Vec::new(),
            }
        }
        intersect_all(lists)
    }

    /// Names where every query token prefixes some name token.
    fn token_prefix_candidates(&self, query: &str) -> Vec<CityId> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let per_token: Vec<Vec<CityId>> = tokens
            .iter()
            .map(|token| {
                let mut ids: Vec<CityId> = self
                    .tokens
                    .range::<str, _>((Bound::Included(*token), Bound::Unbounded))
                    .take_while(|(key, _)| key.starts_with(token))
                    .flat_map(|(_, ids)| ids.iter().copied())
                    .collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            })
            .collect();

        intersect_all(per_token.iter().map(Vec::as_slice).collect())
    }

    /// Names or tokens within the edit budget of the query.
    fn fuzzy_candidates(&self, query: &str) -> Vec<CityId> {
        let len = char_len(query);
        let budget = edit_budget(len);
        if budget == 0 {
            return Vec::new();
        }

        let mut out = Vec::new();
        for (_, bucket) in self.terms_by_len.range(len.saturating_sub(budget)..=len + budget) {
            for term in bucket {
                if bounded_levenshtein(query, term, budget).is_some() {
                    if let Some(ids) = self.terms.get(term) {
                        out.extend_from_slice(ids);
                    }
                }
            }
        }
        out
    }
}

/// Catalog ids are visited in increasing order during build, so a list only
/// ever needs to check its last element to stay sorted and unique.
fn push_posting(list: &mut Vec<CityId>, id: CityId) {
    if list.last() != Some(&id) {
        list.push(id);
    }
}

/// Intersection of sorted, de-duplicated lists. Shortest list drives.
fn intersect_all(mut lists: Vec<&[CityId]>) -> Vec<CityId> {
    if lists.is_empty() {
        return Vec::new();
    }
    lists.sort_by_key(|l| l.len());

    let mut acc = lists[0].to_vec();
    for other in &lists[1..] {
        acc.retain(|id| other.binary_search(id).is_ok());
        if acc.is_empty() {
            break;
        }
    }
    acc
}
