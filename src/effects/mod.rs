//! Dice effects applied after a roll.
//!
//! - `EffectSlot`: Snapshot of one die in the hand
//! - `EffectResolver`: Runs the ordered effect pass
//! - `Resolution`: New values plus the list of changes made
//!
//! The pass never touches `Die` directly. The battle controller snapshots
//! the hand, resolves and writes the values back.

mod resolver;

pub use resolver::{AppliedEffect, EffectResolver, EffectSlot, Resolution};
