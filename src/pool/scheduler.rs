//! Pool and cooldown scheduling.
//!
//! The `CooldownScheduler` owns the eight dice of a battle. It decides which
//! dice can be drawn into a hand, puts submitted dice on cooldown, ticks
//! cooldowns at hand boundaries and refreshes the pool once every hand of
//! the cycle has been played.
//!
//! ## Cooldown Timing
//!
//! A submitted die gets `cooldown_after_use + 1`. The next hand start ticks
//! it once, so with the default cooldown of 1 the die sits out exactly one
//! full hand and is back for the one after.
//!
//! ```
//! use dice_rogue::core::BattleConfig;
//! use dice_rogue::dice::{DiceKind, Die};
//! use dice_rogue::pool::{CooldownScheduler, DieId};
//!
//! let config = BattleConfig::default();
//! let mut pool = CooldownScheduler::new(vec![Die::new(DiceKind::Heavy, 1)], &config);
//! assert_eq!(pool.len(), 8);
//!
//! pool.select_for_hand(&[DieId::new(0)]).unwrap();
//! pool.complete_hand(&[DieId::new(0)]);
//! pool.advance_cooldowns();
//! assert!(!pool.is_available(DieId::new(0)));
//! pool.complete_hand(&[]);
//! pool.advance_cooldowns();
//! assert!(pool.is_available(DieId::new(0)));
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::core::{BattleConfig, BattleError, MAX_HAND_SIZE, POOL_SIZE};
use crate::dice::{DiceTier, Die};
use crate::events::{BattleEvent, EventQueue};

/// Position of a die in the pool. Stable until the pool is rebuilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DieId(pub u8);

impl DieId {
    /// Create a new die ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Index into the pool.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for DieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Die({})", self.0)
    }
}

/// One line of the pool status panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub id: DieId,
    pub name: String,
    pub tier: DiceTier,
    pub cost: u32,
    pub cooldown_remaining: u32,
}

impl PoolStatus {
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.cooldown_remaining == 0
    }
}

/// Dice selected for one hand, in hand order.
pub type Selection = SmallVec<[DieId; MAX_HAND_SIZE]>;

/// Owns the battle pool and its cooldown bookkeeping.
#[derive(Clone, Debug)]
pub struct CooldownScheduler {
    /// Exactly `POOL_SIZE` dice.
    dice: Vec<Die>,

    /// Dice drawn into the current hand.
    selected: Selection,

    /// Hands per cycle.
    max_hands: u32,

    /// Hands completed this cycle.
    hands_played: u32,

    /// Cooldown-after-use forced onto every die entering the pool.
    cooldown_turns: u32,

    events: EventQueue,
}

impl CooldownScheduler {
    /// Build a scheduler from up to eight dice, padding with basic dice.
    #[must_use]
    pub fn new(dice: Vec<Die>, config: &BattleConfig) -> Self {
        Self {
            dice: build_pool(dice, config.cooldown_turns),
            selected: Selection::new(),
            max_hands: config.max_hands.max(1),
            hands_played: 0,
            cooldown_turns: config.cooldown_turns,
            events: EventQueue::new(),
        }
    }

    /// Number of dice in the pool. Always `POOL_SIZE`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// All dice, in pool order.
    #[must_use]
    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    #[must_use]
    pub fn die(&self, id: DieId) -> Option<&Die> {
        self.dice.get(id.index())
    }

    pub fn die_mut(&mut self, id: DieId) -> Option<&mut Die> {
        self.dice.get_mut(id.index())
    }

    /// Every die id, in pool order.
    pub fn ids(&self) -> impl Iterator<Item = DieId> + '_ {
        (0..self.dice.len()).map(|i| DieId::new(i as u8))
    }

    /// Dice whose cooldown has run out.
    #[must_use]
    pub fn available(&self) -> Vec<DieId> {
        self.ids().filter(|&id| self.is_available(id)).collect()
    }

    #[must_use]
    pub fn is_available(&self, id: DieId) -> bool {
        self.die(id).is_some_and(Die::is_available)
    }

    /// Select the dice for the next hand.
    ///
    /// Rejects an empty selection, more than five dice, unknown or duplicate
    /// ids and dice on cooldown. A rejected selection leaves the previous one
    /// in place.
    pub fn select_for_hand(&mut self, selection: &[DieId]) -> Result<(), BattleError> {
        if selection.is_empty() {
            warn!("rejected empty selection");
            return Err(BattleError::InvalidSelection("no dice selected".into()));
        }
        if selection.len() > MAX_HAND_SIZE {
            warn!(count = selection.len(), "rejected oversized selection");
            return Err(BattleError::InvalidSelection(format!(
                "at most {} dice per hand, got {}",
                MAX_HAND_SIZE,
                selection.len()
            )));
        }
        for (i, &id) in selection.iter().enumerate() {
            if self.die(id).is_none() {
                return Err(BattleError::InvalidSelection(format!("{} is not in the pool", id)));
            }
            if selection[..i].contains(&id) {
                return Err(BattleError::InvalidSelection(format!("{} selected twice", id)));
            }
            if !self.is_available(id) {
                warn!(%id, "rejected die on cooldown");
                return Err(BattleError::UnavailableDie(id));
            }
        }

        self.selected = selection.iter().copied().collect();
        debug!(selected = ?self.selected, "selected dice for hand");
        Ok(())
    }

    /// Dice selected for the current hand, in hand order.
    #[must_use]
    pub fn selected(&self) -> &[DieId] {
        &self.selected
    }

    /// Selected dice, in hand order.
    #[must_use]
    pub fn selected_dice(&self) -> Vec<&Die> {
        self.selected
            .iter()
            .filter_map(|&id| self.die(id))
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Total cost of the current selection.
    #[must_use]
    pub fn selected_cost(&self) -> u32 {
        self.selected_dice().iter().map(|d| d.cost).sum()
    }

    /// Whether the current selection fits `budget`. Informational only.
    #[must_use]
    pub fn is_within_budget(&self, budget: u32) -> bool {
        self.selected_cost() <= budget
    }

    /// Tick every cooldown down by one hand.
    pub fn advance_cooldowns(&mut self) {
        for die in &mut self.dice {
            if die.cooldown_remaining > 0 {
                die.cooldown_remaining -= 1;
                if die.cooldown_remaining == 0 {
                    debug!(die = %die.name, "cooldown finished");
                }
            }
        }
        self.publish_available();
    }

    /// Finish the current hand.
    ///
    /// Only `submitted` dice go on cooldown. The hand counter always advances,
    /// and the pool refreshes when the cycle runs out.
    pub fn complete_hand(&mut self, submitted: &[DieId]) {
        for &id in submitted {
            match self.dice.get_mut(id.index()) {
                Some(die) => {
                    die.cooldown_remaining = die.cooldown_after_use + 1;
                }
                None => warn!(%id, "ignoring unknown submitted die"),
            }
        }
        self.selected.clear();

        self.hands_played += 1;
        let remaining = self.hands_remaining();
        info!(played = self.hands_played, remaining, "hand completed");

        if remaining == 0 {
            self.refresh_pool();
        } else {
            self.events.push(BattleEvent::HandCounterChanged {
                played: self.hands_played,
                remaining,
            });
            self.publish_available();
        }
    }

    /// Clear every cooldown and restart the hand cycle.
    pub fn refresh_pool(&mut self) {
        for die in &mut self.dice {
            die.cooldown_remaining = 0;
        }
        self.hands_played = 0;
        info!("dice pool refreshed");

        self.events.push(BattleEvent::PoolRefreshed);
        self.events.push(BattleEvent::HandCounterChanged {
            played: 0,
            remaining: self.max_hands,
        });
        self.publish_available();
    }

    /// Rebuild the pool from an external selection.
    ///
    /// The hand counter is kept; the selection is cleared.
    pub fn replace_pool(&mut self, dice: Vec<Die>) {
        self.dice = build_pool(dice, self.cooldown_turns);
        self.selected.clear();
        info!(dice = ?self.dice.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(), "pool rebuilt");
        self.publish_available();
    }

    /// Return to the start of a cycle with every die fresh.
    pub fn reset(&mut self) {
        self.hands_played = 0;
        self.selected.clear();
        for die in &mut self.dice {
            die.cooldown_remaining = 0;
            die.reset_for_new_hand();
        }
        self.events.push(BattleEvent::HandCounterChanged {
            played: 0,
            remaining: self.max_hands,
        });
        self.publish_available();
    }

    /// `(hands played, hands remaining)` in the current cycle.
    #[must_use]
    pub fn hand_counter(&self) -> (u32, u32) {
        (self.hands_played, self.hands_remaining())
    }

    #[must_use]
    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    #[must_use]
    pub fn hands_remaining(&self) -> u32 {
        self.max_hands.saturating_sub(self.hands_played)
    }

    #[must_use]
    pub fn max_hands(&self) -> u32 {
        self.max_hands
    }

    /// Status panel rows, in pool order.
    #[must_use]
    pub fn status(&self) -> Vec<PoolStatus> {
        self.ids()
            .zip(self.dice.iter())
            .map(|(id, die)| PoolStatus {
                id,
                name: die.name.clone(),
                tier: die.tier,
                cost: die.cost,
                cooldown_remaining: die.cooldown_remaining,
            })
            .collect()
    }

    /// Take every pending notification.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.events.drain()
    }

    fn publish_available(&mut self) {
        let available = self.available();
        self.events.push(BattleEvent::AvailableSetChanged(available));
    }
}

/// Normalize external dice into a full pool.
fn build_pool(dice: Vec<Die>, cooldown_turns: u32) -> Vec<Die> {
    let mut pool = dice;
    if pool.len() > POOL_SIZE {
        warn!(supplied = pool.len(), kept = POOL_SIZE, "pool overflow; extra dice dropped");
        pool.truncate(POOL_SIZE);
    }
    for die in &mut pool {
        die.cooldown_after_use = cooldown_turns;
        die.cooldown_remaining = 0;
        die.reset_for_new_hand();
    }
    while pool.len() < POOL_SIZE {
        pool.push(Die::basic(pool.len(), cooldown_turns));
    }
    pool
}
