//! Per-criterion statistics across a batch of results.
//!
//! Both functions only look at alternatives that actually produced a gap
//! score for a criterion. Output is keyed by criterion name.

use std::collections::BTreeMap;

use crate::scoring::{MatchingResult, ScoreRange};

fn scores_by_criterion(results: &[MatchingResult<'_>]) -> BTreeMap<String, Vec<f64>> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for result in results {
        for (name, score) in &result.gap_details {
            grouped.entry(name.clone()).or_default().push(*score);
        }
    }
    grouped
}

/// Mean absolute deviation of each criterion's gap scores from the middle
/// of the score range. High values mean the criterion pushes scores hard in
/// one direction or the other.
pub fn influence(results: &[MatchingResult<'_>], range: ScoreRange) -> BTreeMap<String, f64> {
    let midpoint = range.midpoint();
    scores_by_criterion(results)
        .into_iter()
        .map(|(name, scores)| {
            let mad = scores.iter().map(|s| (s - midpoint).abs()).sum::<f64>() / scores.len() as f64;
            (name, mad)
        })
        .collect()
}

/// Population variance of each criterion's gap scores. A criterion every
/// alternative scores the same on has zero differentiation power.
pub fn differentiation_power(results: &[MatchingResult<'_>]) -> BTreeMap<String, f64> {
    scores_by_criterion(results)
        .into_iter()
        .map(|(name, scores)| {
            let n = scores.len() as f64;
            let mean = scores.iter().sum::<f64>() / n;
            let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
            (name, variance)
        })
        .collect()
}
