pub mod types;

pub use types::{Alternative, Criterion, CriterionKind};
