//! Battle pool with cooldown scheduling.

mod scheduler;

pub use scheduler::{CooldownScheduler, DieId, PoolStatus, Selection};
