//! Core engine types: RNG, configuration, errors.
//!
//! These are the rules-agnostic building blocks every other module uses.
//! Battles configure the engine via `BattleConfig` rather than constants
//! scattered through the rules.

pub mod rng;
pub mod config;
pub mod error;

pub use rng::{GameRng, GameRngState};
pub use config::{BattleConfig, MAX_HAND_SIZE, POOL_SIZE};
pub use error::{BattleError, ConfigError};
