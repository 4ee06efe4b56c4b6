use serde::{Deserialize, Serialize};

use super::discrete::DiscreteTable;
use super::error::{ensure_finite, ensure_non_negative, ScoringError};
use crate::profile::CriterionKind;

/// Perfect-match score of the standard and simple curves.
pub const PERFECT_SCORE: f64 = 5.0;

/// Ceiling for core criteria that exceed their target.
const CORE_EXCEEDS_CAP: f64 = 4.5;

/// Parameters of a caller-defined linear gap curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomCurve {
    /// Score for a gap of exactly zero
    pub perfect_match: f64,
    /// Points lost per unit above the target
    pub exceeds_penalty: f64,
    /// Points lost per unit below the target
    pub below_penalty: f64,
    /// Upper clamp for non-zero gaps
    pub max_score: f64,
}

impl CustomCurve {
    pub fn new(perfect_match: f64, exceeds_penalty: f64, below_penalty: f64, max_score: f64) -> Self {
        Self {
            perfect_match,
            exceeds_penalty,
            below_penalty,
            max_score,
        }
    }

    fn validate(&self) -> Result<(), ScoringError> {
        ensure_finite("strategy.perfect_match", self.perfect_match)?;
        ensure_finite("strategy.exceeds_penalty", self.exceeds_penalty)?;
        ensure_finite("strategy.below_penalty", self.below_penalty)?;
        ensure_finite("strategy.max_score", self.max_score)?;
        // Returned unclamped at gap 0
        ensure_non_negative("strategy.perfect_match", self.perfect_match)?;
        if self.max_score < 0.0 {
            return Err(ScoringError::InvalidScoreRange {
                min: 0.0,
                max: self.max_score,
            });
        }
        Ok(())
    }

    pub fn score(&self, gap: f64) -> f64 {
        if gap == 0.0 {
            return self.perfect_match;
        }
        let raw = if gap > 0.0 {
            self.perfect_match - self.exceeds_penalty * gap
        } else {
            self.perfect_match + self.below_penalty * gap
        };
        raw.max(0.0).min(self.max_score)
    }
}

/// Converts a (target, actual) gap into a bounded score.
///
/// Example YAML:
/// ```yaml
/// strategy:
///   type: custom
///   perfect_match: 10
///   exceeds_penalty: 1
///   below_penalty: 2
///   max_score: 10
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GapStrategy {
    /// Kind-sensitive piecewise curve on a 0-5 scale
    #[default]
    Standard,
    /// Symmetric linear penalty on a 0-5 scale
    Simple,
    Custom(CustomCurve),
    Discrete(DiscreteTable),
}

impl GapStrategy {
    pub fn validate(&self) -> Result<(), ScoringError> {
        match self {
            GapStrategy::Custom(curve) => curve.validate(),
            // Tables are validated when they are built
            GapStrategy::Standard | GapStrategy::Simple | GapStrategy::Discrete(_) => Ok(()),
        }
    }

    /// Score a gap. Only `Standard` looks at the criterion kind.
    pub fn score(&self, gap: f64, kind: CriterionKind) -> f64 {
        match self {
            GapStrategy::Standard => standard_score(gap, kind),
            GapStrategy::Simple => PERFECT_SCORE - gap.abs().min(PERFECT_SCORE),
            GapStrategy::Custom(curve) => curve.score(gap),
            GapStrategy::Discrete(table) => table.score(gap),
        }
    }

    /// Highest score this strategy can produce.
    pub fn ceiling(&self) -> f64 {
        match self {
            GapStrategy::Standard | GapStrategy::Simple => PERFECT_SCORE,
            GapStrategy::Custom(curve) => curve.max_score.max(curve.perfect_match),
            GapStrategy::Discrete(table) => table.max_score(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GapStrategy::Standard => "standard",
            GapStrategy::Simple => "simple",
            GapStrategy::Custom(_) => "custom",
            GapStrategy::Discrete(_) => "discrete",
        }
    }
}

fn standard_score(gap: f64, kind: CriterionKind) -> f64 {
    if gap == 0.0 {
        return PERFECT_SCORE;
    }
    let score = match kind {
        CriterionKind::Core if gap > 0.0 => (PERFECT_SCORE - 0.5 * gap).min(CORE_EXCEEDS_CAP),
        CriterionKind::Core => PERFECT_SCORE + gap,
        CriterionKind::Secondary if gap > 0.0 => (PERFECT_SCORE - 0.25 * gap).min(PERFECT_SCORE),
        CriterionKind::Secondary => PERFECT_SCORE + 0.75 * gap,
    };
    // Large surpluses would otherwise go negative
    score.max(0.0)
}
