//! Battle facade and automatic play.
//!
//! `Battle` is the entry point hosts drive. `autoplay` is a baseline
//! strategy used by the command-line simulator.

mod controller;
pub mod autoplay;

pub use controller::{Battle, DieView, HandResult, RollOutcome};
