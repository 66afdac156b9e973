//! # dice-rogue
//!
//! A deterministic battle engine for a dice roguelike.
//!
//! ## Rules in Brief
//!
//! A battle owns a pool of eight dice. Each hand draws up to five available
//! dice, rerolls the unlocked ones up to three times, and scores the locked
//! ones as a combo. Submitted dice sit out the next hand; after five hands
//! the pool refreshes.
//!
//! ## Design Principles
//!
//! 1. **Closed variant set**: Every die is one `DiceKind`, dispatched by a
//!    single roll function. No trait objects, no inheritance.
//!
//! 2. **Deterministic**: All randomness flows through one seeded `GameRng`.
//!    Same seed and same triggers give the same battle.
//!
//! 3. **Explicit notifications**: The engine queues `BattleEvent`s; the host
//!    drains them. Nothing calls back into the host.
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, errors
//! - `dice`: Variants, die instances, catalog
//! - `pool`: The eight-die pool and its cooldowns
//! - `hand`: Roll/submit state machine
//! - `effects`: Post-roll effect pass
//! - `scoring`: Dice multipliers and combo evaluation
//! - `events`: Notification queue
//! - `battle`: The `Battle` facade and autoplay

pub mod core;
pub mod dice;
pub mod pool;
pub mod hand;
pub mod effects;
pub mod scoring;
pub mod events;
pub mod battle;

// Re-export commonly used types
pub use crate::core::{BattleConfig, BattleError, ConfigError, GameRng, GameRngState, MAX_HAND_SIZE, POOL_SIZE};

pub use crate::dice::{DiceKind, DiceTier, Die, VariantState, WeightTable};

pub use crate::pool::{CooldownScheduler, DieId, PoolStatus};

pub use crate::hand::{HandPhase, HandState};

pub use crate::effects::{AppliedEffect, EffectResolver, EffectSlot, Resolution};

pub use crate::scoring::{Combo, HandEvaluation, MultiplierBreakdown, MultiplierEntry};

pub use crate::events::{BattleEvent, EventQueue};

pub use crate::battle::{Battle, DieView, HandResult, RollOutcome};
