//! Battle controller - the single mutation point of a battle.
//!
//! `Battle` ties the pool, the hand state machine, the effect pass and the
//! evaluator together. Hosts call its trigger methods (`roll`,
//! `toggle_lock`, `submit`, ...) and read its queries. A rejected trigger
//! returns a `BattleError` and leaves the battle as it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{BattleConfig, BattleError, GameRng, MAX_HAND_SIZE, POOL_SIZE};
use crate::dice::{catalog, DiceTier, Die};
use crate::effects::{AppliedEffect, EffectResolver, EffectSlot};
use crate::events::BattleEvent;
use crate::hand::HandState;
use crate::pool::{CooldownScheduler, DieId, PoolStatus};
use crate::scoring::{self, HandEvaluation, MultiplierBreakdown};

/// What one roll produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// 1-indexed roll number within the hand.
    pub roll_number: u32,
    pub rolls_remaining: u32,
    /// Hand values after effects, in hand order.
    pub values: Vec<u8>,
    pub applied: Vec<AppliedEffect>,
}

/// A die in the current hand, as shown to the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieView {
    pub id: DieId,
    pub name: String,
    pub tier: DiceTier,
    pub value: u8,
    pub locked: bool,
}

/// A scored hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    /// Dice that were submitted, in hand order.
    pub submitted: Vec<DieId>,
    pub dice: Vec<String>,
    pub rolls_used: u32,
    pub multipliers: MultiplierBreakdown,
    pub evaluation: HandEvaluation,
}

impl HandResult {
    #[must_use]
    pub fn score(&self) -> u32 {
        self.evaluation.score
    }

    /// Evaluation line followed by the dice multiplier breakdown.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{}\n{}", self.evaluation.summary(), self.multipliers)
    }
}

/// One battle: an eight-die pool played out hand by hand.
///
/// ## Example
///
/// ```
/// use dice_rogue::battle::Battle;
/// use dice_rogue::core::BattleConfig;
///
/// let mut battle = Battle::new(BattleConfig::default().with_seed(7));
/// battle.advance_to_next_hand().unwrap();
///
/// battle.roll().unwrap();
/// battle.toggle_lock(0).unwrap();
/// let result = battle.submit().unwrap();
///
/// assert!(result.score() > 0);
/// assert_eq!(battle.hand_counter(), (1, 4));
/// ```
#[derive(Clone, Debug)]
pub struct Battle {
    config: BattleConfig,
    pool: CooldownScheduler,
    hand: HandState,
    rng: GameRng,
    last_result: Option<HandResult>,
    /// A hand finished since the last start; cooldowns owe one tick.
    pending_tick: bool,
}

impl Battle {
    /// Start a battle with a randomly drafted pool.
    #[must_use]
    pub fn new(config: BattleConfig) -> Self {
        let rng = GameRng::new(config.seed_or_default());
        let dice = catalog::random_pool(&mut rng.for_context("pool"), POOL_SIZE, config.cooldown_turns);
        Self::from_parts(config, dice, rng)
    }

    /// Start a battle with the given dice, padded to a full pool.
    #[must_use]
    pub fn with_pool(config: BattleConfig, dice: Vec<Die>) -> Self {
        let rng = GameRng::new(config.seed_or_default());
        Self::from_parts(config, dice, rng)
    }

    fn from_parts(config: BattleConfig, dice: Vec<Die>, rng: GameRng) -> Self {
        let pool = CooldownScheduler::new(dice, &config);
        info!(seed = rng.seed(), dice = ?pool.dice().iter().map(|d| d.name.as_str()).collect::<Vec<_>>(), "battle created");
        Self {
            hand: HandState::new(config.max_rolls),
            config,
            pool,
            rng,
            last_result: None,
            pending_tick: false,
        }
    }

    // === Triggers ===

    /// Start a hand with an explicit selection.
    pub fn start_hand_with(&mut self, selection: &[DieId]) -> Result<(), BattleError> {
        if self.hand.is_active() {
            return Err(BattleError::HandInProgress);
        }
        self.settle_cooldowns();
        if self.pool.available().is_empty() {
            return Err(BattleError::NoDiceAvailable);
        }
        self.pool.select_for_hand(selection)?;
        self.begin_hand();
        Ok(())
    }

    /// Start the next hand with a random draw of available dice.
    ///
    /// Returns the drawn dice in hand order.
    pub fn advance_to_next_hand(&mut self) -> Result<Vec<DieId>, BattleError> {
        if self.hand.is_active() {
            return Err(BattleError::HandInProgress);
        }
        self.settle_cooldowns();
        self.draw_hand()
    }

    /// Roll every unlocked die in the hand, then run the effect pass.
    pub fn roll(&mut self) -> Result<RollOutcome, BattleError> {
        if !self.hand.is_active() {
            return Err(BattleError::NoActiveHand);
        }
        let roll_number = self
            .hand
            .increment_roll()
            .ok_or(BattleError::RollLimitReached { max: self.hand.max_rolls() })?;

        let selection = self.pool.selected().to_vec();
        let mut values: Vec<u8> = Vec::with_capacity(selection.len());

        for (slot, &id) in selection.iter().enumerate() {
            let predecessor = EffectResolver::predecessor_value(&values, slot);
            let Some(die) = self.pool.die_mut(id) else {
                continue;
            };
            if !die.locked && !die.is_filler() {
                if let Some(prev) = predecessor {
                    die.inject_predecessor(prev);
                }
                let value = die.roll(&mut self.rng);
                debug!(die = %die.name, slot, value, "rolled");
            }
            values.push(die.value);
        }

        let snapshot: Vec<EffectSlot> = self.hand_dice_refs().into_iter().map(EffectSlot::from_die).collect();
        let resolution = EffectResolver::resolve(&snapshot, &mut self.rng);
        for (&id, &value) in selection.iter().zip(resolution.values.iter()) {
            if let Some(die) = self.pool.die_mut(id) {
                die.value = value;
            }
        }

        info!(roll = roll_number, values = ?resolution.values, "roll resolved");
        Ok(RollOutcome {
            roll_number,
            rolls_remaining: self.hand.rolls_remaining(),
            values: resolution.values,
            applied: resolution.applied,
        })
    }

    /// Flip the lock on the die at `slot` in the hand. Returns the new state.
    pub fn toggle_lock(&mut self, slot: usize) -> Result<bool, BattleError> {
        if !self.hand.is_active() {
            return Err(BattleError::NoActiveHand);
        }
        let len = self.pool.selected().len();
        let id = *self
            .pool
            .selected()
            .get(slot)
            .ok_or(BattleError::SlotOutOfRange { slot, len })?;
        let die = self
            .pool
            .die_mut(id)
            .ok_or(BattleError::SlotOutOfRange { slot, len })?;

        let locked = die.toggle_lock();
        debug!(die = %die.name, slot, locked, "lock toggled");
        Ok(locked)
    }

    /// Score the locked dice and finish the hand.
    pub fn submit(&mut self) -> Result<HandResult, BattleError> {
        if !self.hand.is_active() {
            return Err(BattleError::NoActiveHand);
        }
        let dice = self.hand_dice_refs();
        if !self.hand.can_submit(&dice) {
            warn!("submit refused: nothing locked");
            return Err(BattleError::NothingLocked);
        }

        let slots = self.hand.submitted_slots(&dice);
        let submitted_dice: Vec<&Die> = slots.iter().map(|&s| dice[s]).collect();
        let values: Vec<u8> = submitted_dice.iter().map(|d| d.value).collect();
        let multipliers = scoring::compose(&submitted_dice);
        let evaluation = scoring::evaluate_hand(&values, multipliers.total)?;

        let selection = self.pool.selected();
        let submitted: Vec<DieId> = slots.iter().map(|&s| selection[s]).collect();
        let result = HandResult {
            dice: submitted_dice.iter().map(|d| d.name.clone()).collect(),
            submitted,
            rolls_used: self.hand.rolls_used(),
            multipliers,
            evaluation,
        };

        info!(
            combo = %result.evaluation.combo,
            score = result.evaluation.score,
            dice_multiplier = result.multipliers.total,
            "hand submitted"
        );

        self.finish_hand(&result.submitted);
        self.last_result = Some(result.clone());
        Ok(result)
    }

    /// Give up the current hand without scoring. The hand still counts.
    pub fn pass_hand(&mut self) -> Result<(), BattleError> {
        if !self.hand.is_active() {
            return Err(BattleError::NoActiveHand);
        }
        info!("hand passed");
        self.finish_hand(&[]);
        Ok(())
    }

    /// Throw away the current hand and draw a new one.
    ///
    /// Mid-hand, the hand counter and cooldowns do not move. Between hands
    /// this starts the next hand, so the owed cooldown tick is settled first.
    pub fn reset_hand(&mut self) -> Result<Vec<DieId>, BattleError> {
        self.discard_hand();
        self.settle_cooldowns();
        self.draw_hand()
    }

    /// Count the next hand as played without drawing it.
    ///
    /// For when nothing is available to draw: the cycle still moves on and
    /// cooldowns keep ticking.
    pub fn skip_hand(&mut self) -> Result<(), BattleError> {
        if self.hand.is_active() {
            return Err(BattleError::HandInProgress);
        }
        self.settle_cooldowns();
        info!("hand skipped");
        self.finish_hand(&[]);
        Ok(())
    }

    /// Replace the pool with dice chosen outside the battle.
    ///
    /// Ends any hand in progress. The hand counter is kept; cooldowns start
    /// fresh.
    pub fn set_pool_from_external_selection(&mut self, dice: Vec<Die>) {
        self.discard_hand();
        self.pool.replace_pool(dice);
        self.pending_tick = false;
    }

    /// Replace the pool from catalog type identifiers.
    pub fn set_pool_from_type_ids<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<(), BattleError> {
        let dice = catalog::from_type_ids(ids, self.config.cooldown_turns)?;
        self.set_pool_from_external_selection(dice);
        Ok(())
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    #[must_use]
    pub fn pool(&self) -> &CooldownScheduler {
        &self.pool
    }

    /// Dice in the current hand, in hand order.
    #[must_use]
    pub fn hand_dice(&self) -> Vec<DieView> {
        self.pool
            .selected()
            .iter()
            .filter_map(|&id| {
                self.pool.die(id).map(|die| DieView {
                    id,
                    name: die.name.clone(),
                    tier: die.tier,
                    value: die.value,
                    locked: die.locked,
                })
            })
            .collect()
    }

    /// `(hands played, hands remaining)` in the current cycle.
    #[must_use]
    pub fn hand_counter(&self) -> (u32, u32) {
        self.pool.hand_counter()
    }

    #[must_use]
    pub fn pool_status(&self) -> Vec<PoolStatus> {
        self.pool.status()
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&HandResult> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub fn rolls_used(&self) -> u32 {
        self.hand.rolls_used()
    }

    #[must_use]
    pub fn can_roll(&self) -> bool {
        self.hand.can_roll()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.hand.can_submit(&self.hand_dice_refs())
    }

    #[must_use]
    pub fn is_hand_active(&self) -> bool {
        self.hand.is_active()
    }

    /// Take every notification raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.pool.drain_events()
    }

    // === Internals ===

    fn hand_dice_refs(&self) -> Vec<&Die> {
        self.pool.selected_dice()
    }

    /// Tick cooldowns once for the hand completed since the last start.
    fn settle_cooldowns(&mut self) {
        if self.pending_tick {
            self.pool.advance_cooldowns();
            self.pending_tick = false;
        }
    }

    fn draw_hand(&mut self) -> Result<Vec<DieId>, BattleError> {
        let mut available = self.pool.available();
        if available.is_empty() {
            warn!("no dice available to draw");
            return Err(BattleError::NoDiceAvailable);
        }
        self.rng.shuffle(&mut available);
        available.truncate(self.config.hand_size.clamp(1, MAX_HAND_SIZE));

        self.pool.select_for_hand(&available)?;
        self.begin_hand();
        Ok(available)
    }

    fn begin_hand(&mut self) {
        let selection = self.pool.selected().to_vec();
        for &id in &selection {
            if let Some(die) = self.pool.die_mut(id) {
                die.reset_for_new_hand();
            }
        }
        self.hand.start_hand();

        let (played, remaining) = self.pool.hand_counter();
        info!(hand = played + 1, remaining, dice = ?selection, "hand started");
    }

    fn finish_hand(&mut self, submitted: &[DieId]) {
        self.pool.complete_hand(submitted);
        self.hand.end_hand();
        self.pending_tick = true;
    }

    fn discard_hand(&mut self) {
        if self.hand.is_active() {
            debug!("hand discarded");
        }
        self.pool.clear_selection();
        self.hand.reset();
    }
}
