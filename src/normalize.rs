//! Value rescaling applied before gaps are computed.
//!
//! With [`NormalizationMode::None`](crate::scoring::NormalizationMode) the
//! engine reads raw values as they are. The `global` and `local` modes are
//! extension points: callers attach their own
//! [`Normalizer`] that receives an alternative's raw values together with the
//! criteria set and returns rescaled values keyed by the same criterion names.
//! Keys it leaves out are treated as missing for that alternative.

use std::collections::BTreeMap;

use crate::profile::Criterion;

/// Rescales one alternative's raw criterion values.
pub trait Normalizer: Send + Sync {
    fn normalize(
        &self,
        values: &BTreeMap<String, f64>,
        criteria: &[Criterion],
    ) -> BTreeMap<String, f64>;
}

/// Min-max rescale `value` from `[min, max]` into `[target_min, target_max]`.
/// A degenerate source range maps to the middle of the target range.
pub fn min_max(value: f64, min: f64, max: f64, target_min: f64, target_max: f64) -> f64 {
    if (max - min).abs() < 1e-10 {
        return (target_min + target_max) / 2.0;
    }
    target_min + (value - min) / (max - min) * (target_max - target_min)
}

/// Standard scores using the population standard deviation.
/// Zero variance yields all zeros.
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return vec![];
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev < 1e-10 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / std_dev).collect()
}
