use std::collections::BTreeMap;

use crate::profile::Criterion;

/// Combine the gap scores of one kind group into a factor score.
///
/// A lone criterion passes its gap score through untouched. Larger groups
/// use a weighted mean over the criteria that actually have a gap score, so
/// a missing value drops out of both numerator and denominator.
pub fn factor_score(group: &[&Criterion], gap_scores: &BTreeMap<String, f64>) -> f64 {
    match group {
        [] => 0.0,
        [only] => gap_scores.get(&only.name).copied().unwrap_or(0.0),
        _ => {
            let (weighted, total_weight) = group
                .iter()
                .filter_map(|c| gap_scores.get(&c.name).map(|score| (c.weight / 100.0, *score)))
                .fold((0.0, 0.0), |(sum, weights), (w, score)| {
                    (sum + w * score, weights + w)
                });

            if total_weight == 0.0 {
                0.0
            } else {
                weighted / total_weight
            }
        }
    }
}
