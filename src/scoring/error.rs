use thiserror::Error;

/// Hard failures when building a scoring configuration or engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("factor weights must sum to 1.0 (core {core} + secondary {secondary} = {sum})")]
    FactorWeightSum { core: f64, secondary: f64, sum: f64 },

    #[error("{field} must be within [0, 1], got {value}")]
    FactorWeightOutOfRange { field: &'static str, value: f64 },

    #[error("score range min ({min}) must be below max ({max})")]
    InvalidScoreRange { min: f64, max: f64 },

    #[error("discrete table is empty; only the default_value handling method can resolve it")]
    EmptyTable,

    #[error("discrete table has duplicate gap {gap}")]
    DuplicateGap { gap: f64 },

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: String, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    NegativeScore { field: String, value: f64 },

    #[error("duplicate criterion name '{0}'")]
    DuplicateCriterion(String),

    #[error("normalization mode '{0}' requires a normalizer to be attached")]
    NormalizerRequired(String),
}

/// Reject a score below zero for a named field.
pub(crate) fn ensure_non_negative(field: impl Into<String>, value: f64) -> Result<f64, ScoringError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ScoringError::NegativeScore {
            field: field.into(),
            value,
        })
    }
}

/// Reject NaN and infinities for a named field.
pub(crate) fn ensure_finite(field: impl Into<String>, value: f64) -> Result<f64, ScoringError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoringError::NonFinite {
            field: field.into(),
            value,
        })
    }
}
