//! Hand / roll state machine.
//!
//! A hand is Inactive until `start_hand`, then Active until it is submitted
//! or reset. While Active it allows up to `max_rolls` rolls. The state machine
//! only counts; rolling and scoring happen in the battle controller.

use serde::{Deserialize, Serialize};

use crate::dice::Die;

/// Hand lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandPhase {
    #[default]
    Inactive,
    Active,
}

/// Roll gate for the current hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandState {
    phase: HandPhase,
    rolls_used: u32,
    max_rolls: u32,
}

impl HandState {
    #[must_use]
    pub fn new(max_rolls: u32) -> Self {
        Self {
            phase: HandPhase::Inactive,
            rolls_used: 0,
            max_rolls,
        }
    }

    pub fn start_hand(&mut self) {
        self.phase = HandPhase::Active;
        self.rolls_used = 0;
    }

    pub fn end_hand(&mut self) {
        self.phase = HandPhase::Inactive;
    }

    /// Back to Inactive with no rolls used.
    pub fn reset(&mut self) {
        self.phase = HandPhase::Inactive;
        self.rolls_used = 0;
    }

    #[must_use]
    pub fn phase(&self) -> HandPhase {
        self.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == HandPhase::Active
    }

    #[must_use]
    pub fn rolls_used(&self) -> u32 {
        self.rolls_used
    }

    #[must_use]
    pub fn max_rolls(&self) -> u32 {
        self.max_rolls
    }

    #[must_use]
    pub fn rolls_remaining(&self) -> u32 {
        self.max_rolls.saturating_sub(self.rolls_used)
    }

    #[must_use]
    pub fn can_roll(&self) -> bool {
        self.is_active() && self.rolls_used < self.max_rolls
    }

    /// Count one roll. Returns the 1-indexed roll number, or `None` when
    /// rolling is not allowed.
    pub fn increment_roll(&mut self) -> Option<u32> {
        if !self.can_roll() {
            return None;
        }
        self.rolls_used += 1;
        Some(self.rolls_used)
    }

    /// Active with at least one locked, rolled, non-filler die.
    #[must_use]
    pub fn can_submit(&self, dice: &[&Die]) -> bool {
        self.is_active() && dice.iter().any(|d| d.is_submittable())
    }

    /// Hand positions of the dice that would be submitted, in order.
    #[must_use]
    pub fn submitted_slots(&self, dice: &[&Die]) -> Vec<usize> {
        dice.iter()
            .enumerate()
            .filter(|(_, d)| d.is_submittable())
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Dice that would be submitted, in hand order.
    #[must_use]
    pub fn submitted_dice<'a>(&self, dice: &[&'a Die]) -> Vec<&'a Die> {
        dice.iter().copied().filter(|d| d.is_submittable()).collect()
    }

    #[must_use]
    pub fn submitted_values(&self, dice: &[&Die]) -> Vec<u8> {
        self.submitted_dice(dice).iter().map(|d| d.value).collect()
    }
}

impl Default for HandState {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::DiceKind;

    fn die(value: u8, locked: bool) -> Die {
        let mut d = Die::new(DiceKind::Basic, 1);
        d.value = value;
        d.locked = locked;
        d
    }

    #[test]
    fn test_roll_gate() {
        let mut hand = HandState::new(3);
        assert!(!hand.can_roll());
        assert_eq!(hand.increment_roll(), None);

        hand.start_hand();
        assert_eq!(hand.increment_roll(), Some(1));
        assert_eq!(hand.increment_roll(), Some(2));
        assert_eq!(hand.increment_roll(), Some(3));
        assert!(!hand.can_roll());
        assert_eq!(hand.increment_roll(), None);
        assert_eq!(hand.rolls_used(), 3);
        assert_eq!(hand.rolls_remaining(), 0);
    }

    #[test]
    fn test_start_clears_rolls() {
        let mut hand = HandState::new(2);
        hand.start_hand();
        hand.increment_roll();
        hand.end_hand();
        assert!(!hand.is_active());
        assert_eq!(hand.rolls_used(), 1);

        hand.start_hand();
        assert_eq!(hand.rolls_used(), 0);
        assert!(hand.can_roll());

        hand.reset();
        assert_eq!(hand.phase(), HandPhase::Inactive);
        assert_eq!(hand.rolls_used(), 0);
    }

    #[test]
    fn test_submission_filter() {
        let mut hand = HandState::default();
        let a = die(4, true);
        let b = die(3, false);
        let c = die(0, true);
        let mut d = die(6, true);
        d.tier = crate::dice::DiceTier::Filler;
        let e = die(2, true);
        let dice = [&a, &b, &c, &d, &e];

        assert!(!hand.can_submit(&dice));
        hand.start_hand();
        assert!(hand.can_submit(&dice));

        assert_eq!(hand.submitted_slots(&dice), vec![0, 4]);
        assert_eq!(hand.submitted_values(&dice), vec![4, 2]);
        assert_eq!(hand.submitted_dice(&dice).len(), 2);
    }

    #[test]
    fn test_cannot_submit_without_locks() {
        let mut hand = HandState::default();
        hand.start_hand();
        let a = die(5, false);
        let b = die(0, true);
        assert!(!hand.can_submit(&[&a, &b]));
    }
}
