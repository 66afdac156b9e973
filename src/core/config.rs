//! Battle configuration.
//!
//! Hosts configure a battle at startup with a `BattleConfig`, either through
//! the builder methods or from a TOML document:
//!
//! ```toml
//! hand_size = 5
//! max_rolls = 3
//! max_hands = 5
//! cooldown_turns = 1
//! seed = 42
//! ```
//!
//! The pool size and the hard cap on dice per hand are rules constants, not
//! configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Number of dice in a battle pool.
pub const POOL_SIZE: usize = 8;

/// Maximum number of dice that can be selected for one hand.
pub const MAX_HAND_SIZE: usize = 5;

/// Complete battle configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Dice drawn into each hand (1-5).
    pub hand_size: usize,

    /// Rolls allowed per hand.
    pub max_rolls: u32,

    /// Hands per pool cycle before every cooldown resets.
    pub max_hands: u32,

    /// Cooldown-after-use applied to every die entering the pool.
    pub cooldown_turns: u32,

    /// Seed for the battle RNG. `None` means seed 0.
    pub seed: Option<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            hand_size: MAX_HAND_SIZE,
            max_rolls: 3,
            max_hands: 5,
            cooldown_turns: 1,
            seed: None,
        }
    }
}

impl BattleConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of dice drawn per hand.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set the reroll budget per hand.
    #[must_use]
    pub fn with_max_rolls(mut self, max_rolls: u32) -> Self {
        self.max_rolls = max_rolls;
        self
    }

    /// Set the number of hands per pool cycle.
    #[must_use]
    pub fn with_max_hands(mut self, max_hands: u32) -> Self {
        self.max_hands = max_hands;
        self
    }

    /// Set the cooldown applied to dice after use.
    #[must_use]
    pub fn with_cooldown_turns(mut self, cooldown_turns: u32) -> Self {
        self.cooldown_turns = cooldown_turns;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The effective seed.
    #[must_use]
    pub fn seed_or_default(&self) -> u64 {
        self.seed.unwrap_or(0)
    }

    /// Check that every field is within the rules' bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hand_size == 0 || self.hand_size > MAX_HAND_SIZE {
            return Err(ConfigError::Invalid(format!(
                "hand_size must be 1..={}, got {}",
                MAX_HAND_SIZE, self.hand_size
            )));
        }
        if self.max_rolls == 0 {
            return Err(ConfigError::Invalid("max_rolls must be at least 1".into()));
        }
        if self.max_hands == 0 {
            return Err(ConfigError::Invalid("max_hands must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
