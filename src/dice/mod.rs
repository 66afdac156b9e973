//! Dice system: variants, instances, and catalog.
//!
//! ## Key Types
//!
//! - `DiceKind`: The closed set of roll behaviors
//! - `VariantState`: Private per-variant bookkeeping
//! - `Die`: Runtime die state (value, lock, cooldown)
//! - `DiceTier`: Rarity classification
//!
//! The `catalog` module drafts pools and reward offers from the kind set.

pub mod variant;
pub mod die;
pub mod catalog;

pub use variant::{roll_variant, DiceKind, VariantState, WeightTable};
pub use die::{DiceTier, Die};
