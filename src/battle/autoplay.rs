//! Simple automatic player.
//!
//! Chases the most common value: after each roll it locks every die showing
//! the value that appears most often (ties go to the higher value). On the
//! last roll it locks everything that rolled and submits.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::BattleError;

use super::controller::{Battle, DieView, HandResult};

/// Value to chase, or `None` if nothing has rolled.
#[must_use]
pub fn target_value(dice: &[DieView]) -> Option<u8> {
    let mut counts: FxHashMap<u8, usize> = FxHashMap::default();
    for die in dice.iter().filter(|d| d.value > 0) {
        *counts.entry(die.value).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(value, count)| (count, value))
        .map(|(value, _)| value)
}

/// Hand slots to lock after a roll.
#[must_use]
pub fn slots_to_lock(dice: &[DieView], final_roll: bool) -> Vec<usize> {
    let target = target_value(dice);
    dice.iter()
        .enumerate()
        .filter(|(_, d)| !d.locked && d.value > 0)
        .filter(|(_, d)| final_roll || Some(d.value) == target)
        .map(|(slot, _)| slot)
        .collect()
}

/// Play the active hand to completion.
pub fn play_hand(battle: &mut Battle) -> Result<HandResult, BattleError> {
    while battle.can_roll() {
        let outcome = battle.roll()?;
        let final_roll = !battle.can_roll();
        for slot in slots_to_lock(&battle.hand_dice(), final_roll) {
            battle.toggle_lock(slot)?;
        }
        debug!(roll = outcome.roll_number, values = ?outcome.values, "autoplay locked");
    }
    battle.submit()
}

/// Play every hand of one cycle. Returns the results in order.
///
/// A hand with nothing available to draw is skipped and produces no result.
pub fn play_cycle(battle: &mut Battle) -> Result<Vec<HandResult>, BattleError> {
    let (_, remaining) = battle.hand_counter();
    let mut results = Vec::with_capacity(remaining as usize);
    for _ in 0..remaining {
        match battle.advance_to_next_hand() {
            Ok(_) => results.push(play_hand(battle)?),
            Err(BattleError::NoDiceAvailable) => battle.skip_hand()?,
            Err(err) => return Err(err),
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BattleConfig;
    use crate::dice::DiceTier;
    use crate::pool::DieId;

    fn view(value: u8, locked: bool) -> DieView {
        DieView {
            id: DieId::new(0),
            name: "Basic D6".into(),
            tier: DiceTier::Common,
            value,
            locked,
        }
    }

    #[test]
    fn test_target_prefers_count_then_value() {
        let dice = [view(2, false), view(2, false), view(5, false), view(5, false), view(1, false)];
        assert_eq!(target_value(&dice), Some(5));
        assert_eq!(target_value(&[view(0, false)]), None);
    }

    #[test]
    fn test_slots_to_lock() {
        let dice = [view(3, false), view(4, false), view(3, true), view(3, false)];
        assert_eq!(slots_to_lock(&dice, false), vec![0, 3]);
        assert_eq!(slots_to_lock(&dice, true), vec![0, 1, 3]);
    }

    #[test]
    fn test_play_cycle_scores_every_hand() {
        let mut battle = Battle::new(BattleConfig::default().with_seed(3));
        let results = play_cycle(&mut battle).unwrap();
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.score() > 0 && r.rolls_used == 3));
        assert_eq!(battle.hand_counter(), (0, 5));
    }

    #[test]
    fn test_play_cycle_skips_empty_hands() {
        let mut battle = Battle::new(BattleConfig::default().with_seed(3).with_cooldown_turns(3));
        let results = play_cycle(&mut battle).unwrap();
        // Hands 3 and 4 find every die cooling
        assert_eq!(results.len(), 3);
        assert_eq!(battle.hand_counter(), (0, 5));

        let again = play_cycle(&mut battle).unwrap();
        assert_eq!(again.len(), 3);
    }
}
