// crates/citysuggest-core/src/config.rs
use serde::{Deserialize, Serialize};

/// Upper bound for [`ScoreParams::geo_weight`]. Above roughly 0.2 a nearby
/// prefix match could outrank a distant exact match.
pub const MAX_GEO_WEIGHT: f64 = 0.16;

/// Weights used by the [`Scorer`](crate::score::Scorer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreParams {
    /// Share of the geographic component when the query has a coordinate.
    pub geo_weight: f64,
    /// Distance (km) at which the geographic component drops to one half.
    pub geo_scale_km: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            geo_weight: 0.15,
            geo_scale_km: 100.0,
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Result count when the request has no `limit`.
    pub default_limit: usize,
    /// Hard cap on `limit`; larger requests are clamped.
    pub max_limit: usize,
    pub score: ScoreParams,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
            score: ScoreParams::default(),
        }
    }
}

impl SuggestConfig {
    pub fn builder() -> SuggestConfigBuilder {
        SuggestConfigBuilder::new()
    }
}

/// Builder for [`SuggestConfig`] with clamping setters.
#[derive(Debug, Clone, Default)]
pub struct SuggestConfigBuilder {
    config: SuggestConfig,
}

impl SuggestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SuggestConfig::default(),
        }
    }

    /// Default result count, at least 1. Raises `max_limit` if needed.
    pub fn default_limit(mut self, limit: usize) -> Self {
        self.config.default_limit = limit.max(1);
        self.config.max_limit = self.config.max_limit.max(self.config.default_limit);
        self
    }

    /// Cap on requested limits, at least 1. Lowers `default_limit` if needed.
    pub fn max_limit(mut self, limit: usize) -> Self {
        self.config.max_limit = limit.max(1);
        self.config.default_limit = self.config.default_limit.min(self.config.max_limit);
        self
    }

    pub fn geo_weight(mut self, weight: f64) -> Self {
        self.config.score.geo_weight = clamp_or(weight, 0.0, MAX_GEO_WEIGHT, 0.0);
        self
    }

    pub fn geo_scale_km(mut self, km: f64) -> Self {
        if km.is_finite() && km > 0.0 {
            self.config.score.geo_scale_km = km;
        }
        self
    }

    pub fn build(self) -> SuggestConfig {
        self.config
    }
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
