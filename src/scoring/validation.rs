use std::collections::HashSet;
use std::fmt;
use tracing::warn;

use super::config::{ScoringSettings, FACTOR_WEIGHT_TOLERANCE};
use super::discrete::HandlingMethod;
use super::gap::GapStrategy;
use crate::profile::{Alternative, Criterion, CriterionKind};

/// How far a direct-mode kind total may drift from 100 before a warning.
pub const KIND_WEIGHT_TOLERANCE: f64 = 0.1;

/// Advisory finding: a kind group's weights do not total ~100 in direct mode.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightWarning {
    pub kind: CriterionKind,
    pub total: f64,
}

impl fmt::Display for WeightWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} criterion weights total {} instead of 100",
            self.kind, self.total
        )
    }
}

/// Check per-kind weight totals. Kinds with no criteria are not reported.
pub fn check_kind_weights(criteria: &[Criterion]) -> Vec<WeightWarning> {
    [CriterionKind::Core, CriterionKind::Secondary]
        .into_iter()
        .filter_map(|kind| {
            let mut group = criteria.iter().filter(|c| c.kind == kind).peekable();
            group.peek()?;
            let total: f64 = group.map(|c| c.weight).sum();
            ((total - 100.0).abs() > KIND_WEIGHT_TOLERANCE).then_some(WeightWarning { kind, total })
        })
        .collect()
}

/// Validate scoring settings before building a configuration.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(settings: &ScoringSettings) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("core_factor_weight", settings.core_factor_weight),
        ("secondary_factor_weight", settings.secondary_factor_weight),
    ] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            errors.push(format!("scoring.{}: must be within [0, 1], got {}", field, value));
        }
    }

    let sum = settings.core_factor_weight + settings.secondary_factor_weight;
    if (sum - 1.0).abs() > FACTOR_WEIGHT_TOLERANCE {
        errors.push(format!(
            "scoring: core_factor_weight + secondary_factor_weight must equal 1.0, got {}",
            sum
        ));
    }

    let range = settings.score_range;
    if !range.min.is_finite() || !range.max.is_finite() || range.min >= range.max {
        errors.push(format!(
            "scoring.score_range: min ({}) must be below max ({})",
            range.min, range.max
        ));
    }

    match &settings.strategy {
        GapStrategy::Custom(curve) => {
            for (field, value) in [
                ("perfect_match", curve.perfect_match),
                ("exceeds_penalty", curve.exceeds_penalty),
                ("below_penalty", curve.below_penalty),
                ("max_score", curve.max_score),
            ] {
                if !value.is_finite() {
                    errors.push(format!("scoring.strategy.{}: must be finite", field));
                }
            }
            if curve.perfect_match < 0.0 {
                errors.push(format!(
                    "scoring.strategy.perfect_match: must be non-negative, got {}",
                    curve.perfect_match
                ));
            }
            if curve.max_score < 0.0 {
                errors.push("scoring.strategy.max_score: must be non-negative".to_string());
            }
        }
        GapStrategy::Discrete(table) => {
            for (i, pair) in table.pairs().iter().enumerate() {
                if pair.score < 0.0 {
                    errors.push(format!(
                        "scoring.strategy.table[{}].score: must be non-negative, got {}",
                        i, pair.score
                    ));
                }
            }
            if let HandlingMethod::DefaultValue(score) = table.handling() {
                if score < 0.0 {
                    errors.push(format!(
                        "scoring.strategy.handling.default_value: must be non-negative, got {}",
                        score
                    ));
                }
            }
        }
        GapStrategy::Standard | GapStrategy::Simple => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a criteria set and an alternative batch together.
pub fn validate_profile(
    criteria: &[Criterion],
    alternatives: &[Alternative],
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for (i, criterion) in criteria.iter().enumerate() {
        if criterion.name.trim().is_empty() {
            errors.push(format!("criteria[{}].name: must not be empty", i));
        }
        if !names.insert(criterion.name.as_str()) {
            errors.push(format!(
                "criteria[{}].name: duplicate criterion '{}'",
                i, criterion.name
            ));
        }
        if !criterion.target.is_finite() {
            errors.push(format!("criteria[{}].target: must be finite", i));
        }
        if !criterion.weight.is_finite() || criterion.weight < 0.0 {
            errors.push(format!(
                "criteria[{}].weight: must be a non-negative number, got {}",
                i, criterion.weight
            ));
        }
    }

    let mut ids = HashSet::new();
    for (i, alt) in alternatives.iter().enumerate() {
        if !ids.insert(alt.id.as_str()) {
            errors.push(format!("alternatives[{}].id: duplicate id '{}'", i, alt.id));
        }
        // Extra values are ignored by the engine, so they only warn
        for name in alt.values.keys() {
            if !names.contains(name.as_str()) {
                warn!(
                    alternative = %alt.id,
                    criterion = %name,
                    "value for unknown criterion ignored"
                );
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
