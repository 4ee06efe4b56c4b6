use serde::Serialize;

use crate::scoring::{MatchingResult, ScoreRange};

/// Criteria an alternative does notably well or badly on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrengthProfile {
    pub strengths: Vec<(String, f64)>,
    pub weaknesses: Vec<(String, f64)>,
}

/// Split a result's gap scores into strengths and weaknesses.
///
/// A strength scores at least `threshold`. A weakness scores at most
/// `range.max - threshold`, so with a low threshold a criterion can land in
/// both lists.
pub fn strengths_and_weaknesses(
    result: &MatchingResult<'_>,
    threshold: f64,
    range: ScoreRange,
) -> StrengthProfile {
    let weakness_ceiling = range.max - threshold;
    let mut profile = StrengthProfile::default();

    for (name, &score) in &result.gap_details {
        if score >= threshold {
            profile.strengths.push((name.clone(), score));
        }
        if score <= weakness_ceiling {
            profile.weaknesses.push((name.clone(), score));
        }
    }
    profile
}
