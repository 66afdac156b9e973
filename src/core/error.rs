//! Error types for battle operations.
//!
//! Every variant is a recoverable rejection: the operation that returned it
//! left the battle untouched. The `Display` text doubles as the reason shown
//! to the player.

use thiserror::Error;

use crate::pool::DieId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("No hand in progress")]
    NoActiveHand,
    #[error("A hand is already in progress; submit or reset it first")]
    HandInProgress,
    #[error("Already reached maximum rolls per hand ({max}); submit your combo or reset")]
    RollLimitReached { max: u32 },
    #[error("No dice are locked; lock some rolled dice before submitting")]
    NothingLocked,
    #[error("Invalid dice selection: {0}")]
    InvalidSelection(String),
    #[error("{0} is on cooldown")]
    UnavailableDie(DieId),
    #[error("No dice available in the pool")]
    NoDiceAvailable,
    #[error("Hand slot {slot} out of range (hand has {len} dice)")]
    SlotOutOfRange { slot: usize, len: usize },
    #[error("A submission must contain 1 to 5 dice, got {count}")]
    InvalidSubmission { count: usize },
    #[error("Unknown dice type: {0}")]
    UnknownDiceType(String),
}

/// Errors raised while loading a `BattleConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
