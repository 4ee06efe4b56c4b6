use rayon::prelude::*;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{debug, trace, warn};

use super::aggregate::factor_score;
use super::config::{NormalizationMode, ScoringConfiguration, WeightHandling};
use super::error::{ensure_finite, ScoringError};
use super::validation::{check_kind_weights, WeightWarning};
use crate::normalize::Normalizer;
use crate::profile::{Alternative, Criterion, CriterionKind};

/// Outcome of scoring one alternative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchingResult<'a> {
    pub alternative: &'a Alternative,
    pub final_score: f64,
    pub core_factor_score: f64,
    pub secondary_factor_score: f64,
    /// Criterion name -> gap score, only for criteria the alternative has
    pub gap_details: BTreeMap<String, f64>,
}

impl MatchingResult<'_> {
    pub fn gap_score(&self, criterion: &str) -> Option<f64> {
        self.gap_details.get(criterion).copied()
    }
}

/// Scores alternatives against a fixed criteria set.
///
/// The engine holds no mutable state, so `evaluate` and `rank` can be called
/// any number of times and from several threads.
pub struct MatchingEngine {
    config: ScoringConfiguration,
    criteria: Vec<Criterion>,
    normalizer: Option<Box<dyn Normalizer>>,
    weight_warnings: Vec<WeightWarning>,
}

impl fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("config", &self.config)
            .field("criteria", &self.criteria)
            .field("normalizer", &self.normalizer.is_some())
            .field("weight_warnings", &self.weight_warnings)
            .finish()
    }
}

impl MatchingEngine {
    /// Build an engine for `none` normalization.
    ///
    /// `global` and `local` need a caller-supplied normalizer, see
    /// [`MatchingEngine::with_normalizer`].
    pub fn new(config: ScoringConfiguration, criteria: Vec<Criterion>) -> Result<Self, ScoringError> {
        // TODO: ship built-in global/local rescaling once target ranges are part of the criteria model
        match config.normalization() {
            NormalizationMode::None => Self::build(config, criteria, None),
            mode => Err(ScoringError::NormalizerRequired(mode.to_string())),
        }
    }

    /// Build an engine that rescales values with `normalizer` in `global` or
    /// `local` mode. In `none` mode the normalizer is never called.
    pub fn with_normalizer(
        config: ScoringConfiguration,
        criteria: Vec<Criterion>,
        normalizer: Box<dyn Normalizer>,
    ) -> Result<Self, ScoringError> {
        Self::build(config, criteria, Some(normalizer))
    }

    fn build(
        config: ScoringConfiguration,
        mut criteria: Vec<Criterion>,
        normalizer: Option<Box<dyn Normalizer>>,
    ) -> Result<Self, ScoringError> {
        let mut seen = HashSet::new();
        for criterion in &criteria {
            if !seen.insert(criterion.name.as_str()) {
                return Err(ScoringError::DuplicateCriterion(criterion.name.clone()));
            }
            ensure_finite(format!("{}.target", criterion.name), criterion.target)?;
            ensure_finite(format!("{}.weight", criterion.name), criterion.weight)?;
        }

        let weight_warnings = match config.weight_handling() {
            WeightHandling::Direct => {
                let warnings = check_kind_weights(&criteria);
                for w in &warnings {
                    warn!(kind = %w.kind, total = w.total, "criterion weights do not total 100");
                }
                warnings
            }
            WeightHandling::Normalized => {
                normalize_kind_weights(&mut criteria);
                Vec::new()
            }
        };

        Ok(Self {
            config,
            criteria,
            normalizer,
            weight_warnings,
        })
    }

    pub fn config(&self) -> &ScoringConfiguration {
        &self.config
    }

    /// Criteria as used for scoring (weights rescaled in normalized mode)
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Advisory weight findings from construction. Never blocks evaluation.
    pub fn weight_warnings(&self) -> &[WeightWarning] {
        &self.weight_warnings
    }

    fn values_for<'v>(&self, alternative: &'v Alternative) -> Cow<'v, BTreeMap<String, f64>> {
        match (self.config.normalization(), &self.normalizer) {
            (NormalizationMode::None, _) | (_, None) => Cow::Borrowed(&alternative.values),
            (_, Some(normalizer)) => {
                Cow::Owned(normalizer.normalize(&alternative.values, &self.criteria))
            }
        }
    }

    /// Score one alternative.
    pub fn evaluate<'a>(&self, alternative: &'a Alternative) -> MatchingResult<'a> {
        let values = self.values_for(alternative);
        let strategy = self.config.strategy();

        let mut gap_details = BTreeMap::new();
        for criterion in &self.criteria {
            match values.get(&criterion.name) {
                Some(actual) if actual.is_finite() => {
                    let score = strategy.score(criterion.gap(*actual), criterion.kind);
                    gap_details.insert(criterion.name.clone(), score);
                }
                Some(actual) => {
                    warn!(
                        alternative = %alternative.id,
                        criterion = %criterion.name,
                        value = actual,
                        "skipping non-finite criterion value"
                    );
                }
                None => {
                    trace!(
                        alternative = %alternative.id,
                        criterion = %criterion.name,
                        "criterion missing, skipped"
                    );
                }
            }
        }

        let (final_score, core_factor_score, secondary_factor_score) = match self.criteria.as_slice() {
            // A lone criterion is reported directly, no factor weighting
            [only] => {
                let score = gap_details.get(&only.name).copied().unwrap_or(0.0);
                match only.kind {
                    CriterionKind::Core => (score, score, 0.0),
                    CriterionKind::Secondary => (score, 0.0, score),
                }
            }
            _ => self.combine_factors(&gap_details),
        };

        debug!(
            alternative = %alternative.id,
            final_score,
            core_factor_score,
            secondary_factor_score,
            "evaluated alternative"
        );

        MatchingResult {
            alternative,
            final_score,
            core_factor_score,
            secondary_factor_score,
            gap_details,
        }
    }

    fn combine_factors(&self, gap_details: &BTreeMap<String, f64>) -> (f64, f64, f64) {
        let (core, secondary): (Vec<&Criterion>, Vec<&Criterion>) = self
            .criteria
            .iter()
            .partition(|c| c.kind == CriterionKind::Core);

        let core_score = factor_score(&core, gap_details);
        let secondary_score = factor_score(&secondary, gap_details);

        let final_score = if core.is_empty() {
            secondary_score
        } else if secondary.is_empty() {
            core_score
        } else {
            self.config.core_factor_weight() * core_score
                + self.config.secondary_factor_weight() * secondary_score
        };

        (final_score, core_score, secondary_score)
    }

    /// Score every alternative and order by final score, highest first.
    /// Equal scores keep their input order.
    pub fn rank<'a>(&self, alternatives: &'a [Alternative]) -> Vec<MatchingResult<'a>> {
        let mut results: Vec<MatchingResult<'a>> = alternatives
            .par_iter()
            .map(|alt| self.evaluate(alt))
            .collect();

        results.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results
    }
}

/// Rescale weights within each kind so they total 100.
fn normalize_kind_weights(criteria: &mut [Criterion]) {
    for kind in [CriterionKind::Core, CriterionKind::Secondary] {
        let total: f64 = criteria.iter().filter(|c| c.kind == kind).map(|c| c.weight).sum();
        if total == 0.0 {
            continue;
        }
        for criterion in criteria.iter_mut().filter(|c| c.kind == kind) {
            criterion.weight = criterion.weight / total * 100.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::ScoringSettings;
    use crate::scoring::discrete::{DiscreteTable, GapScorePair, HandlingMethod};
    use crate::scoring::gap::{CustomCurve, GapStrategy};
    use pretty_assertions::assert_eq;

    fn engine(criteria: Vec<Criterion>) -> MatchingEngine {
        MatchingEngine::new(ScoringConfiguration::default(), criteria).unwrap()
    }

    fn engine_with(settings: ScoringSettings, criteria: Vec<Criterion>) -> MatchingEngine {
        MatchingEngine::new(settings.build().unwrap(), criteria).unwrap()
    }

    fn sample_criteria() -> Vec<Criterion> {
        vec![
            Criterion::core("experience", 3.0, 60.0),
            Criterion::core("skill", 4.0, 40.0),
            Criterion::secondary("attitude", 3.0, 50.0),
            Criterion::secondary("teamwork", 2.0, 50.0),
        ]
    }

    #[test]
    fn test_single_criterion_bypasses_weighting() {
        let engine = engine(vec![Criterion::core("iq", 3.0, 100.0)]);
        let alt = Alternative::new("a1", "Alice").with_value("iq", 3.0);

        let result = engine.evaluate(&alt);
        assert_eq!(result.final_score, 5.0);
        assert_eq!(result.core_factor_score, 5.0);
        assert_eq!(result.secondary_factor_score, 0.0);
    }

    #[test]
    fn test_single_secondary_criterion() {
        let engine = engine(vec![Criterion::secondary("iq", 3.0, 0.0)]);
        let alt = Alternative::new("a1", "Alice").with_value("iq", 2.0);

        let result = engine.evaluate(&alt);
        assert_eq!(result.final_score, 4.25);
        assert_eq!(result.core_factor_score, 0.0);
        assert_eq!(result.secondary_factor_score, 4.25);
    }

    #[test]
    fn test_single_criterion_missing_value() {
        let engine = engine(vec![Criterion::core("iq", 3.0, 100.0)]);
        let alt = Alternative::new("a1", "Alice");

        let result = engine.evaluate(&alt);
        assert_eq!(result.final_score, 0.0);
        assert!(result.gap_details.is_empty());
    }

    #[test]
    fn test_full_evaluation() {
        let engine = engine(sample_criteria());
        let alt = Alternative::new("a1", "Alice")
            .with_value("experience", 4.0) // gap +1 core -> 4.5
            .with_value("skill", 4.0) // gap 0 -> 5.0
            .with_value("attitude", 2.0) // gap -1 secondary -> 4.25
            .with_value("teamwork", 2.0); // gap 0 -> 5.0

        let result = engine.evaluate(&alt);
        assert_eq!(result.gap_score("experience"), Some(4.5));
        assert_eq!(result.gap_score("skill"), Some(5.0));
        assert_eq!(result.gap_score("attitude"), Some(4.25));
        assert_eq!(result.gap_score("teamwork"), Some(5.0));

        assert!((result.core_factor_score - 4.7).abs() < 1e-9);
        assert!((result.secondary_factor_score - 4.625).abs() < 1e-9);
        // 0.6 * 4.7 + 0.4 * 4.625
        assert!((result.final_score - 4.67).abs() < 1e-9);
    }

    #[test]
    fn test_core_only_uses_core_score() {
        let engine = engine(vec![
            Criterion::core("a", 3.0, 50.0),
            Criterion::core("b", 3.0, 50.0),
        ]);
        let alt = Alternative::new("x", "X").with_value("a", 2.0).with_value("b", 3.0);

        let result = engine.evaluate(&alt);
        assert_eq!(result.secondary_factor_score, 0.0);
        assert_eq!(result.final_score, result.core_factor_score);
        assert!((result.final_score - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_secondary_only_uses_secondary_score() {
        let engine = engine(vec![
            Criterion::secondary("a", 3.0, 50.0),
            Criterion::secondary("b", 3.0, 50.0),
        ]);
        let alt = Alternative::new("x", "X").with_value("a", 3.0).with_value("b", 3.0);

        let result = engine.evaluate(&alt);
        assert_eq!(result.core_factor_score, 0.0);
        assert_eq!(result.final_score, 5.0);
    }

    #[test]
    fn test_missing_criterion_skipped() {
        let engine = engine(sample_criteria());
        let alt = Alternative::new("a1", "Alice")
            .with_value("skill", 4.0)
            .with_value("attitude", 3.0)
            .with_value("teamwork", 2.0);

        let result = engine.evaluate(&alt);
        assert_eq!(result.gap_score("experience"), None);
        assert_eq!(result.gap_details.len(), 3);
        // Only "skill" contributes to the core factor
        assert!((result.core_factor_score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_value_skipped() {
        let engine = engine(sample_criteria());
        let alt = Alternative::new("a1", "Alice")
            .with_value("experience", f64::NAN)
            .with_value("skill", 4.0);

        let result = engine.evaluate(&alt);
        assert_eq!(result.gap_score("experience"), None);
        assert_eq!(result.gap_score("skill"), Some(5.0));
    }

    #[test]
    fn test_factor_weights_applied() {
        let settings = ScoringSettings {
            core_factor_weight: 1.0,
            secondary_factor_weight: 0.0,
            ..Default::default()
        };
        let engine = engine_with(settings, sample_criteria());
        let alt = Alternative::new("a1", "Alice")
            .with_value("experience", 3.0)
            .with_value("skill", 4.0)
            .with_value("attitude", 0.0)
            .with_value("teamwork", 0.0);

        let result = engine.evaluate(&alt);
        assert!((result.final_score - 5.0).abs() < 1e-9);
        assert!(result.secondary_factor_score < 5.0);
    }

    #[test]
    fn test_custom_strategy_through_engine() {
        let settings = ScoringSettings {
            strategy: GapStrategy::Custom(CustomCurve::new(10.0, 1.0, 2.0, 10.0)),
            ..Default::default()
        };
        let engine = engine_with(settings, vec![Criterion::secondary("a", 5.0, 100.0)]);
        let alt = Alternative::new("x", "X").with_value("a", 4.0);
        assert_eq!(engine.evaluate(&alt).final_score, 8.0);
    }

    #[test]
    fn test_discrete_strategy_through_engine() {
        let table = DiscreteTable::new(
            vec![GapScorePair::new(-2.0, 3.0), GapScorePair::new(-1.0, 4.0)],
            HandlingMethod::Interpolation,
        )
        .unwrap();
        let settings = ScoringSettings {
            strategy: GapStrategy::Discrete(table),
            ..Default::default()
        };
        let engine = engine_with(settings, vec![Criterion::core("a", 3.0, 100.0)]);
        let alt = Alternative::new("x", "X").with_value("a", 1.5);
        assert_eq!(engine.evaluate(&alt).final_score, 3.5);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let engine = engine(sample_criteria());
        let alt = Alternative::new("a1", "Alice")
            .with_value("experience", 1.7)
            .with_value("skill", 4.3)
            .with_value("attitude", 2.9)
            .with_value("teamwork", 5.1);

        let first = engine.evaluate(&alt);
        let second = engine.evaluate(&alt);
        assert_eq!(first, second);
        assert_eq!(first.final_score.to_bits(), second.final_score.to_bits());
    }

    #[test]
    fn test_rank_descending() {
        let engine = engine(vec![Criterion::core("a", 3.0, 100.0)]);
        let alternatives = vec![
            Alternative::new("low", "Low").with_value("a", 0.0),
            Alternative::new("best", "Best").with_value("a", 3.0),
            Alternative::new("mid", "Mid").with_value("a", 2.0),
        ];

        let ranked = engine.rank(&alternatives);
        let ids: Vec<&str> = ranked.iter().map(|r| r.alternative.id.as_str()).collect();
        assert_eq!(ids, vec!["best", "mid", "low"]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let engine = engine(vec![Criterion::core("a", 3.0, 100.0)]);
        let alternatives = vec![
            Alternative::new("first", "First").with_value("a", 2.0),
            Alternative::new("top", "Top").with_value("a", 3.0),
            Alternative::new("second", "Second").with_value("a", 2.0),
            Alternative::new("third", "Third").with_value("a", 2.0),
        ];

        let ranked = engine.rank(&alternatives);
        let ids: Vec<&str> = ranked.iter().map(|r| r.alternative.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_rank_matches_sequential_evaluation() {
        let engine = engine(sample_criteria());
        let alternatives: Vec<Alternative> = (0..64)
            .map(|i| {
                let v = i as f64 / 10.0;
                Alternative::new(format!("a{}", i), format!("Alt {}", i))
                    .with_value("experience", v)
                    .with_value("skill", 6.0 - v)
                    .with_value("attitude", (v * 3.0) % 5.0)
            })
            .collect();

        let ranked = engine.rank(&alternatives);
        for result in &ranked {
            assert_eq!(result, &engine.evaluate(result.alternative));
        }
        assert!(ranked
            .windows(2)
            .all(|w| w[0].final_score >= w[1].final_score));
    }

    #[test]
    fn test_rank_empty() {
        let engine = engine(sample_criteria());
        assert!(engine.rank(&[]).is_empty());
    }

    #[test]
    fn test_direct_mode_warns_without_blocking() {
        let engine = engine(vec![
            Criterion::core("a", 3.0, 70.0),
            Criterion::core("b", 3.0, 70.0),
        ]);
        assert_eq!(engine.weight_warnings().len(), 1);
        assert_eq!(engine.weight_warnings()[0].total, 140.0);

        let alt = Alternative::new("x", "X").with_value("a", 3.0).with_value("b", 3.0);
        assert!((engine.evaluate(&alt).final_score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_mode_rescales_weights() {
        let settings = ScoringSettings {
            weight_handling: WeightHandling::Normalized,
            ..Default::default()
        };
        let engine = engine_with(
            settings,
            vec![
                Criterion::core("a", 3.0, 3.0),
                Criterion::core("b", 3.0, 1.0),
                Criterion::secondary("c", 3.0, 0.0),
            ],
        );

        assert!(engine.weight_warnings().is_empty());
        let weights: Vec<f64> = engine.criteria().iter().map(|c| c.weight).collect();
        assert_eq!(weights, vec![75.0, 25.0, 0.0]);
    }

    #[test]
    fn test_duplicate_criterion_rejected() {
        let err = MatchingEngine::new(
            ScoringConfiguration::default(),
            vec![Criterion::core("a", 3.0, 50.0), Criterion::secondary("a", 3.0, 50.0)],
        )
        .unwrap_err();
        assert_eq!(err, ScoringError::DuplicateCriterion("a".to_string()));
    }

    #[test]
    fn test_global_mode_requires_normalizer() {
        let config = ScoringSettings {
            normalization: NormalizationMode::Global,
            ..Default::default()
        }
        .build()
        .unwrap();
        let err = MatchingEngine::new(config, sample_criteria()).unwrap_err();
        assert_eq!(err, ScoringError::NormalizerRequired("global".to_string()));
    }

    struct Halve;

    impl Normalizer for Halve {
        fn normalize(
            &self,
            values: &BTreeMap<String, f64>,
            _criteria: &[Criterion],
        ) -> BTreeMap<String, f64> {
            values.iter().map(|(k, v)| (k.clone(), v / 2.0)).collect()
        }
    }

    #[test]
    fn test_attached_normalizer_applied_in_local_mode() {
        let config = ScoringSettings {
            normalization: NormalizationMode::Local,
            ..Default::default()
        }
        .build()
        .unwrap();
        let engine = MatchingEngine::with_normalizer(
            config,
            vec![Criterion::core("a", 3.0, 100.0)],
            Box::new(Halve),
        )
        .unwrap();

        let alt = Alternative::new("x", "X").with_value("a", 6.0);
        assert_eq!(engine.evaluate(&alt).final_score, 5.0);
    }

    #[test]
    fn test_normalizer_ignored_in_none_mode() {
        let engine = MatchingEngine::with_normalizer(
            ScoringConfiguration::default(),
            vec![Criterion::core("a", 3.0, 100.0)],
            Box::new(Halve),
        )
        .unwrap();

        let alt = Alternative::new("x", "X").with_value("a", 3.0);
        assert_eq!(engine.evaluate(&alt).final_score, 5.0);
    }
}
