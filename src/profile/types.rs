use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which factor group a criterion belongs to.
///
/// Core criteria are the essential ones and get the stricter penalty curve
/// under the standard gap strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    Core,
    Secondary,
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionKind::Core => write!(f, "core"),
            CriterionKind::Secondary => write!(f, "secondary"),
        }
    }
}

/// One dimension of the ideal profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Criterion {
    pub name: String,
    /// The ideal value an alternative should have
    pub target: f64,
    pub kind: CriterionKind,
    /// Percentage-like weight, only meaningful relative to criteria of the same kind
    pub weight: f64,
}

impl Criterion {
    pub fn new(name: impl Into<String>, target: f64, kind: CriterionKind, weight: f64) -> Self {
        Self {
            name: name.into(),
            target,
            kind,
            weight,
        }
    }

    pub fn core(name: impl Into<String>, target: f64, weight: f64) -> Self {
        Self::new(name, target, CriterionKind::Core, weight)
    }

    pub fn secondary(name: impl Into<String>, target: f64, weight: f64) -> Self {
        Self::new(name, target, CriterionKind::Secondary, weight)
    }

    /// Gap between an actual value and this criterion's target.
    /// Positive means the alternative exceeds the target.
    pub fn gap(&self, actual: f64) -> f64 {
        actual - self.target
    }
}

/// A candidate being scored against the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alternative {
    pub id: String,
    pub name: String,
    /// Criterion name -> actual value. Missing criteria are skipped during scoring.
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

impl Alternative {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style helper for attaching a criterion value
    pub fn with_value(mut self, criterion: impl Into<String>, value: f64) -> Self {
        self.values.insert(criterion.into(), value);
        self
    }

    pub fn value(&self, criterion: &str) -> Option<f64> {
        self.values.get(criterion).copied()
    }
}
