use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, ensure_non_negative, ScoringError};

/// One sampled point of a discrete gap-to-score mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GapScorePair {
    pub gap: f64,
    pub score: f64,
}

impl GapScorePair {
    pub fn new(gap: f64, score: f64) -> Self {
        Self { gap, score }
    }
}

/// How a gap that is not in the table gets resolved.
///
/// An exact table hit always wins over the handling method.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingMethod {
    /// Alias of `NearestNeighbor`
    #[default]
    Basic,
    /// Linear interpolation between the neighbouring pairs, clamped at the table ends
    Interpolation,
    /// Closest pair by absolute distance; ties go to the lower gap
    NearestNeighbor,
    /// Pair with the largest gap not above the query
    Threshold,
    /// Fixed fallback score, table geometry ignored
    DefaultValue(f64),
}

/// A validated lookup table sorted ascending by gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableDefinition", into = "TableDefinition")]
pub struct DiscreteTable {
    pairs: Vec<GapScorePair>,
    handling: HandlingMethod,
}

/// Unvalidated wire shape of a discrete table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    pub table: Vec<GapScorePair>,
    #[serde(default)]
    pub handling: HandlingMethod,
}

impl TryFrom<TableDefinition> for DiscreteTable {
    type Error = ScoringError;

    fn try_from(def: TableDefinition) -> Result<Self, Self::Error> {
        DiscreteTable::new(def.table, def.handling)
    }
}

impl From<DiscreteTable> for TableDefinition {
    fn from(table: DiscreteTable) -> Self {
        Self {
            table: table.pairs,
            handling: table.handling,
        }
    }
}

impl DiscreteTable {
    /// Sort and validate the pairs.
    ///
    /// Fails on non-finite numbers, negative scores, duplicate gaps, or an
    /// empty table that is not backed by `DefaultValue`.
    pub fn new(
        mut pairs: Vec<GapScorePair>,
        handling: HandlingMethod,
    ) -> Result<Self, ScoringError> {
        for (i, pair) in pairs.iter().enumerate() {
            ensure_finite(format!("table[{}].gap", i), pair.gap)?;
            ensure_finite(format!("table[{}].score", i), pair.score)?;
            ensure_non_negative(format!("table[{}].score", i), pair.score)?;
        }
        if let HandlingMethod::DefaultValue(score) = handling {
            ensure_finite("handling.default_value", score)?;
            ensure_non_negative("handling.default_value", score)?;
        }

        pairs.sort_by(|a, b| a.gap.total_cmp(&b.gap));

        if let Some(dup) = pairs.windows(2).find(|w| w[0].gap == w[1].gap) {
            return Err(ScoringError::DuplicateGap { gap: dup[0].gap });
        }

        if pairs.is_empty() && !matches!(handling, HandlingMethod::DefaultValue(_)) {
            return Err(ScoringError::EmptyTable);
        }

        Ok(Self { pairs, handling })
    }

    pub fn pairs(&self) -> &[GapScorePair] {
        &self.pairs
    }

    pub fn handling(&self) -> HandlingMethod {
        self.handling
    }

    /// Highest score any lookup can return.
    pub fn max_score(&self) -> f64 {
        let table_max = self
            .pairs
            .iter()
            .map(|p| p.score)
            .fold(f64::NEG_INFINITY, f64::max);
        match self.handling {
            HandlingMethod::DefaultValue(score) => table_max.max(score),
            _ => table_max,
        }
    }

    /// Resolve a gap to a score.
    pub fn score(&self, gap: f64) -> f64 {
        if let Some(pair) = self.exact(gap) {
            return pair.score;
        }

        let resolved = match self.handling {
            HandlingMethod::DefaultValue(score) => Some(score),
            HandlingMethod::Basic | HandlingMethod::NearestNeighbor => self.nearest(gap),
            HandlingMethod::Interpolation => self.interpolate(gap),
            HandlingMethod::Threshold => self.threshold(gap),
        };

        // Only default_value tables may be empty, so this never falls through
        resolved.unwrap_or(0.0)
    }

    fn exact(&self, gap: f64) -> Option<&GapScorePair> {
        let idx = self.pairs.partition_point(|p| p.gap < gap);
        self.pairs.get(idx).filter(|p| p.gap == gap)
    }

    fn nearest(&self, gap: f64) -> Option<f64> {
        let idx = self.pairs.partition_point(|p| p.gap < gap);
        let lower = idx.checked_sub(1).and_then(|i| self.pairs.get(i));
        let upper = self.pairs.get(idx);

        match (lower, upper) {
            (Some(lo), Some(hi)) => {
                if (hi.gap - gap).abs() < (gap - lo.gap).abs() {
                    Some(hi.score)
                } else {
                    Some(lo.score)
                }
            }
            (Some(only), None) | (None, Some(only)) => Some(only.score),
            (None, None) => None,
        }
    }

    fn interpolate(&self, gap: f64) -> Option<f64> {
        let first = self.pairs.first()?;
        let last = self.pairs.last()?;
        if gap <= first.gap {
            return Some(first.score);
        }
        if gap >= last.gap {
            return Some(last.score);
        }

        let idx = self.pairs.partition_point(|p| p.gap < gap);
        let lo = self.pairs.get(idx - 1)?;
        let hi = self.pairs.get(idx)?;
        Some(lo.score + (hi.score - lo.score) * (gap - lo.gap) / (hi.gap - lo.gap))
    }

    fn threshold(&self, gap: f64) -> Option<f64> {
        let idx = self.pairs.partition_point(|p| p.gap <= gap);
        match idx.checked_sub(1) {
            Some(i) => self.pairs.get(i).map(|p| p.score),
            None => self.pairs.first().map(|p| p.score),
        }
    }
}
