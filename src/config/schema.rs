use serde::{Deserialize, Serialize};

use crate::profile::{Alternative, Criterion};
use crate::scoring::ScoringSettings;

/// A profile file: scoring settings, the ideal profile, and the candidates.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileFile {
    #[serde(default)]
    pub scoring: ScoringSettings,
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}
