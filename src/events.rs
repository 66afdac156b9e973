//! Battle notifications.
//!
//! The scheduler does not call back into the host. It pushes `BattleEvent`s
//! onto an `EventQueue`, and the host drains the queue after each operation
//! to refresh whatever it displays.

use serde::{Deserialize, Serialize};

use crate::pool::DieId;

/// Something the host may want to react to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// Every hand of the cycle was played; all cooldowns were cleared.
    PoolRefreshed,

    /// The hand counter moved.
    HandCounterChanged {
        /// Hands played this cycle.
        played: u32,
        /// Hands left before the pool refreshes.
        remaining: u32,
    },

    /// The set of selectable dice changed.
    AvailableSetChanged(Vec<DieId>),
}

impl BattleEvent {
    /// Short tag for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            BattleEvent::PoolRefreshed => "pool_refreshed",
            BattleEvent::HandCounterChanged { .. } => "hand_counter_changed",
            BattleEvent::AvailableSetChanged(_) => "available_set_changed",
        }
    }
}

/// FIFO of pending notifications.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    pending: Vec<BattleEvent>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.pending.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
