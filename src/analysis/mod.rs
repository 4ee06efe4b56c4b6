pub mod classify;
pub mod spread;

pub use classify::{strengths_and_weaknesses, StrengthProfile};
pub use spread::{differentiation_power, influence};
