use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ensure_finite, ScoringError};
use super::gap::GapStrategy;

/// Allowed drift of `core_factor_weight + secondary_factor_weight` from 1.0.
pub const FACTOR_WEIGHT_TOLERANCE: f64 = 0.001;

/// How criterion weights inside a kind group are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightHandling {
    /// Weights are taken as given and expected to total ~100 per kind
    #[default]
    Direct,
    /// Weights are rescaled per kind to total 100
    Normalized,
}

/// Rescaling applied to raw values before gaps are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    #[default]
    None,
    /// Rescale across alternatives
    Global,
    /// Rescale across criteria of one alternative
    Local,
}

impl fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationMode::None => write!(f, "none"),
            NormalizationMode::Global => write!(f, "global"),
            NormalizationMode::Local => write!(f, "local"),
        }
    }
}

/// Score bounds used by reporting and analysis. The gap formulas do not read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self { min: 0.0, max: 5.0 }
    }
}

impl ScoreRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Unvalidated scoring settings, as written by hand or read from YAML.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   strategy: { type: standard }
///   core_factor_weight: 0.6
///   secondary_factor_weight: 0.4
///   weight_handling: direct
///   normalization: none
///   score_range: { min: 0, max: 5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringSettings {
    #[serde(default)]
    pub strategy: GapStrategy,

    #[serde(default = "default_core_factor_weight")]
    pub core_factor_weight: f64,

    #[serde(default = "default_secondary_factor_weight")]
    pub secondary_factor_weight: f64,

    #[serde(default)]
    pub weight_handling: WeightHandling,

    #[serde(default)]
    pub normalization: NormalizationMode,

    #[serde(default)]
    pub score_range: ScoreRange,
}

fn default_core_factor_weight() -> f64 {
    0.6
}

fn default_secondary_factor_weight() -> f64 {
    0.4
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            strategy: GapStrategy::default(),
            core_factor_weight: default_core_factor_weight(),
            secondary_factor_weight: default_secondary_factor_weight(),
            weight_handling: WeightHandling::default(),
            normalization: NormalizationMode::default(),
            score_range: ScoreRange::default(),
        }
    }
}

impl ScoringSettings {
    pub fn build(self) -> Result<ScoringConfiguration, ScoringError> {
        ScoringConfiguration::new(self)
    }
}

/// Validated, immutable scoring configuration shared by every evaluation in a run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "ScoringSettings", into = "ScoringSettings")]
pub struct ScoringConfiguration {
    settings: ScoringSettings,
}

impl TryFrom<ScoringSettings> for ScoringConfiguration {
    type Error = ScoringError;

    fn try_from(settings: ScoringSettings) -> Result<Self, Self::Error> {
        Self::new(settings)
    }
}

impl From<ScoringConfiguration> for ScoringSettings {
    fn from(config: ScoringConfiguration) -> Self {
        config.settings
    }
}

impl ScoringConfiguration {
    /// Validate settings. Fails when the factor weights do not sum to 1.0
    /// within [`FACTOR_WEIGHT_TOLERANCE`], a weight leaves [0, 1], the score
    /// range is empty, or the strategy parameters are unusable.
    pub fn new(settings: ScoringSettings) -> Result<Self, ScoringError> {
        settings.strategy.validate()?;

        let core = ensure_finite("core_factor_weight", settings.core_factor_weight)?;
        let secondary = ensure_finite("secondary_factor_weight", settings.secondary_factor_weight)?;
        for (field, value) in [
            ("core_factor_weight", core),
            ("secondary_factor_weight", secondary),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScoringError::FactorWeightOutOfRange { field, value });
            }
        }

        let sum = core + secondary;
        if (sum - 1.0).abs() > FACTOR_WEIGHT_TOLERANCE {
            return Err(ScoringError::FactorWeightSum {
                core,
                secondary,
                sum,
            });
        }

        let range = settings.score_range;
        ensure_finite("score_range.min", range.min)?;
        ensure_finite("score_range.max", range.max)?;
        if range.min >= range.max {
            return Err(ScoringError::InvalidScoreRange {
                min: range.min,
                max: range.max,
            });
        }

        Ok(Self { settings })
    }

    pub fn strategy(&self) -> &GapStrategy {
        &self.settings.strategy
    }

    pub fn core_factor_weight(&self) -> f64 {
        self.settings.core_factor_weight
    }

    pub fn secondary_factor_weight(&self) -> f64 {
        self.settings.secondary_factor_weight
    }

    pub fn weight_handling(&self) -> WeightHandling {
        self.settings.weight_handling
    }

    pub fn normalization(&self) -> NormalizationMode {
        self.settings.normalization
    }

    pub fn score_range(&self) -> ScoreRange {
        self.settings.score_range
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }
}
