//! Scoring: dice multipliers and combo evaluation.
//!
//! ## Key Types
//!
//! - `MultiplierBreakdown`: Product of per-die bonuses with reasons
//! - `Combo`: The fourteen named combos, strongest first
//! - `HandEvaluation`: Combo, sum and final score of a submission

pub mod multiplier;
pub mod evaluator;

pub use multiplier::{compose, MultiplierBreakdown, MultiplierEntry};
pub use evaluator::{classify, evaluate_hand, Combo, HandEvaluation};
