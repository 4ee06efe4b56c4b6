//! Profile Matching: score and rank alternatives against an ideal profile.
//!
//! Each criterion has a target value. The gap between an alternative's actual
//! value and that target is turned into a bounded score by a [`GapStrategy`],
//! the scores are averaged per factor group (core and secondary), and the two
//! factor scores are blended into a final score used for ranking.
//!
//! ```
//! use profile_match::{Alternative, Criterion, MatchingEngine, ScoringConfiguration};
//!
//! let engine = MatchingEngine::new(
//!     ScoringConfiguration::default(),
//!     vec![Criterion::core("experience", 3.0, 100.0)],
//! )
//! .unwrap();
//!
//! let alice = Alternative::new("a1", "Alice").with_value("experience", 3.0);
//! assert_eq!(engine.evaluate(&alice).final_score, 5.0);
//! ```

pub mod analysis;
pub mod config;
pub mod normalize;
pub mod output;
pub mod profile;
pub mod scoring;

pub use normalize::Normalizer;
pub use profile::{Alternative, Criterion, CriterionKind};
pub use scoring::{
    GapStrategy, MatchingEngine, MatchingResult, ScoringConfiguration, ScoringError,
    ScoringSettings,
};
