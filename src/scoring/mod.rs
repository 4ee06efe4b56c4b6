pub mod aggregate;
pub mod config;
pub mod discrete;
pub mod engine;
pub mod error;
pub mod gap;
pub mod validation;

pub use aggregate::factor_score;
pub use config::*;
pub use discrete::{DiscreteTable, GapScorePair, HandlingMethod};
pub use engine::{MatchingEngine, MatchingResult};
pub use error::ScoringError;
pub use gap::{CustomCurve, GapStrategy, PERFECT_SCORE};
pub use validation::{check_kind_weights, validate_profile, validate_scoring, WeightWarning};
