//! Effect resolution - the post-roll pass over a hand.
//!
//! After every unlocked die in the hand has rolled, the `EffectResolver`
//! runs the special effects in a fixed order. Each step sees the values the
//! previous step wrote:
//!
//! 1. Twin Bond dice copy a random other rolled die
//! 2. Zombie dice with a pending infection overwrite their neighbors
//! 3. The first Golden die gives every other rolled die +1 (max 6)
//!
//! Predecessor injection for Plus One happens earlier, inside the roll loop,
//! through `EffectResolver::predecessor_value`.
//!
//! The resolver works on a snapshot of the hand and returns the new values.
//! The caller writes them back onto the dice.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::GameRng;
use crate::dice::{DiceKind, Die};

/// Snapshot of one hand slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSlot {
    pub kind: DiceKind,
    pub filler: bool,
    pub locked: bool,
    pub value: u8,
    pub infect_pending: bool,
}

impl EffectSlot {
    #[must_use]
    pub fn from_die(die: &Die) -> Self {
        Self {
            kind: die.kind,
            filler: die.is_filler(),
            locked: die.locked,
            value: die.value,
            infect_pending: die.state.infect_pending,
        }
    }

    /// Unlocked and not a filler: effects may act on this slot.
    fn is_open(&self) -> bool {
        !self.locked && !self.filler
    }
}

/// A value change made by the pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppliedEffect {
    /// A Twin Bond die copied the value of `source`.
    TwinCopied { slot: usize, source: usize, value: u8 },
    /// A Zombie at `source` overwrote `target`.
    Infected { source: usize, target: usize, value: u8 },
    /// The Golden bonus raised `slot` from `from` to `to`.
    GoldenBonus { slot: usize, from: u8, to: u8 },
}

impl std::fmt::Display for AppliedEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppliedEffect::TwinCopied { slot, source, value } => {
                write!(f, "Twin Bond #{} copied die #{} ({})", slot + 1, source + 1, value)
            }
            AppliedEffect::Infected { source, target, value } => {
                write!(f, "Zombie #{} infected die #{} ({})", source + 1, target + 1, value)
            }
            AppliedEffect::GoldenBonus { slot, from, to } => {
                write!(f, "Golden bonus on die #{}: {} -> {}", slot + 1, from, to)
            }
        }
    }
}

/// Output of one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// New value of every slot, in hand order.
    pub values: Vec<u8>,
    /// Changes made, in the order they happened.
    pub applied: Vec<AppliedEffect>,
}

/// Runs the post-roll effect pass.
pub struct EffectResolver;

impl EffectResolver {
    /// Value a Plus One at `slot` should see: its left neighbor's current
    /// value. `None` for the first slot.
    #[must_use]
    pub fn predecessor_value(values: &[u8], slot: usize) -> Option<u8> {
        slot.checked_sub(1).and_then(|prev| values.get(prev)).copied()
    }

    /// Resolve every effect over `slots`. Call exactly once per roll.
    pub fn resolve(slots: &[EffectSlot], rng: &mut GameRng) -> Resolution {
        let mut resolution = Resolution {
            values: slots.iter().map(|s| s.value).collect(),
            applied: Vec::new(),
        };

        Self::resolve_twins(slots, rng, &mut resolution);
        Self::resolve_contagion(slots, &mut resolution);
        Self::resolve_golden(slots, &mut resolution);

        for effect in &resolution.applied {
            debug!(%effect, "effect applied");
        }
        resolution
    }

    fn resolve_twins(slots: &[EffectSlot], rng: &mut GameRng, out: &mut Resolution) {
        for (i, slot) in slots.iter().enumerate() {
            if slot.kind != DiceKind::TwinBond || !slot.is_open() {
                continue;
            }
            let candidates: Vec<usize> = slots
                .iter()
                .enumerate()
                .filter(|&(j, s)| j != i && s.is_open() && out.values[j] > 0)
                .map(|(j, _)| j)
                .collect();

            if let Some(&source) = rng.choose(&candidates) {
                let value = out.values[source];
                if out.values[i] != value {
                    out.values[i] = value;
                    out.applied.push(AppliedEffect::TwinCopied { slot: i, source, value });
                }
            }
        }
    }

    fn resolve_contagion(slots: &[EffectSlot], out: &mut Resolution) {
        for (i, slot) in slots.iter().enumerate() {
            if slot.kind != DiceKind::Zombie || !slot.is_open() || !slot.infect_pending {
                continue;
            }
            let value = out.values[i];
            let neighbors = [i.checked_sub(1), Some(i + 1)];
            for target in neighbors.into_iter().flatten() {
                let Some(neighbor) = slots.get(target) else {
                    continue;
                };
                if neighbor.is_open() && out.values[target] != value {
                    out.values[target] = value;
                    out.applied.push(AppliedEffect::Infected { source: i, target, value });
                }
            }
        }
    }

    fn resolve_golden(slots: &[EffectSlot], out: &mut Resolution) {
        let Some(golden) = slots
            .iter()
            .position(|s| s.kind == DiceKind::Golden && !s.filler)
        else {
            return;
        };

        for (i, slot) in slots.iter().enumerate() {
            let from = out.values[i];
            let to = from.saturating_add(1).min(6);
            if i == golden || !slot.is_open() || from == 0 || to == from {
                continue;
            }
            out.values[i] = to;
            out.applied.push(AppliedEffect::GoldenBonus { slot: i, from, to });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(kind: DiceKind, value: u8) -> EffectSlot {
        EffectSlot {
            kind,
            filler: false,
            locked: false,
            value,
            infect_pending: false,
        }
    }

    fn locked(kind: DiceKind, value: u8) -> EffectSlot {
        EffectSlot { locked: true, ..slot(kind, value) }
    }

    #[test]
    fn test_predecessor_value() {
        let values = [3, 5, 0];
        assert_eq!(EffectResolver::predecessor_value(&values, 0), None);
        assert_eq!(EffectResolver::predecessor_value(&values, 1), Some(3));
        assert_eq!(EffectResolver::predecessor_value(&values, 2), Some(5));
    }

    #[test]
    fn test_no_effects_is_identity() {
        let mut rng = GameRng::new(1);
        let slots = [slot(DiceKind::Basic, 2), locked(DiceKind::Heavy, 5)];
        let res = EffectResolver::resolve(&slots, &mut rng);
        assert_eq!(res.values, vec![2, 5]);
        assert!(res.applied.is_empty());
    }

    #[test]
    fn test_golden_bonus() {
        let mut rng = GameRng::new(2);
        let slots = [
            slot(DiceKind::Golden, 3),
            slot(DiceKind::Basic, 2),
            locked(DiceKind::Basic, 4),
            slot(DiceKind::Basic, 6),
            slot(DiceKind::Basic, 0),
        ];
        let res = EffectResolver::resolve(&slots, &mut rng);
        // Golden itself, locked, capped and unrolled dice are untouched
        assert_eq!(res.values, vec![3, 3, 4, 6, 0]);
        assert_eq!(res.applied, vec![AppliedEffect::GoldenBonus { slot: 1, from: 2, to: 3 }]);
    }

    #[test]
    fn test_golden_caps_d8_at_six() {
        let mut rng = GameRng::new(12);
        let slots = [
            slot(DiceKind::Golden, 2),
            slot(DiceKind::D8, 7),
            slot(DiceKind::D8, 8),
            locked(DiceKind::D8, 8),
        ];
        let res = EffectResolver::resolve(&slots, &mut rng);
        assert_eq!(res.values, vec![2, 6, 6, 8]);
        assert_eq!(
            res.applied,
            vec![
                AppliedEffect::GoldenBonus { slot: 1, from: 7, to: 6 },
                AppliedEffect::GoldenBonus { slot: 2, from: 8, to: 6 },
            ]
        );
    }

    #[test]
    fn test_locked_golden_still_applies() {
        let mut rng = GameRng::new(3);
        let slots = [slot(DiceKind::Basic, 1), locked(DiceKind::Golden, 5)];
        let res = EffectResolver::resolve(&slots, &mut rng);
        assert_eq!(res.values, vec![2, 5]);
    }

    #[test]
    fn test_golden_applies_once() {
        let mut rng = GameRng::new(4);
        let slots = [
            slot(DiceKind::Golden, 2),
            slot(DiceKind::Golden, 2),
            slot(DiceKind::Basic, 2),
        ];
        let res = EffectResolver::resolve(&slots, &mut rng);
        // Second golden is not exempt; each die gets +1 once
        assert_eq!(res.values, vec![2, 3, 3]);
    }

    #[test]
    fn test_filler_golden_ignored() {
        let mut rng = GameRng::new(5);
        let slots = [
            EffectSlot { filler: true, ..slot(DiceKind::Golden, 0) },
            slot(DiceKind::Basic, 2),
        ];
        let res = EffectResolver::resolve(&slots, &mut rng);
        assert_eq!(res.values, vec![0, 2]);
    }

    #[test]
    fn test_twin_copies_rolled_open_die() {
        let mut rng = GameRng::new(6);
        let slots = [
            slot(DiceKind::TwinBond, 1),
            locked(DiceKind::Basic, 6),
            slot(DiceKind::Basic, 4),
        ];
        for _ in 0..20 {
            let res = EffectResolver::resolve(&slots, &mut rng);
            assert_eq!(res.values, vec![4, 6, 4]);
        }
    }

    #[test]
    fn test_twin_without_candidates() {
        let mut rng = GameRng::new(7);
        let slots = [slot(DiceKind::TwinBond, 3), locked(DiceKind::Basic, 6)];
        let res = EffectResolver::resolve(&slots, &mut rng);
        assert_eq!(res.values, vec![3, 6]);
        assert!(res.applied.is_empty());
    }

    #[test]
    fn test_zombie_infects_open_neighbors() {
        let mut rng = GameRng::new(8);
        let slots = [
            slot(DiceKind::Basic, 1),
            EffectSlot { infect_pending: true, ..slot(DiceKind::Zombie, 5) },
            locked(DiceKind::Basic, 2),
        ];
        let res = EffectResolver::resolve(&slots, &mut rng);
        assert_eq!(res.values, vec![5, 5, 2]);
        assert_eq!(res.applied, vec![AppliedEffect::Infected { source: 1, target: 0, value: 5 }]);
    }

    #[test]
    fn test_zombie_without_infection() {
        let mut rng = GameRng::new(9);
        let slots = [slot(DiceKind::Basic, 1), slot(DiceKind::Zombie, 5)];
        let res = EffectResolver::resolve(&slots, &mut rng);
        assert_eq!(res.values, vec![1, 5]);
    }

    #[test]
    fn test_zombies_cascade_in_order() {
        let mut rng = GameRng::new(10);
        let infected = |v| EffectSlot { infect_pending: true, ..slot(DiceKind::Zombie, v) };
        let slots = [infected(2), infected(4), slot(DiceKind::Basic, 1)];
        let res = EffectResolver::resolve(&slots, &mut rng);
        // First zombie overwrites the second, which then spreads 2
        assert_eq!(res.values, vec![2, 2, 2]);
    }

    #[test]
    fn test_order_twin_then_contagion_then_golden() {
        let mut rng = GameRng::new(11);
        let slots = [
            locked(DiceKind::Golden, 1),
            EffectSlot { infect_pending: true, ..slot(DiceKind::Zombie, 3) },
            slot(DiceKind::TwinBond, 5),
        ];
        let res = EffectResolver::resolve(&slots, &mut rng);
        // Twin copies the zombie (3), infection is a no-op, golden adds 1
        assert_eq!(res.values, vec![1, 4, 4]);
        assert!(matches!(res.applied[0], AppliedEffect::TwinCopied { slot: 2, source: 1, value: 3 }));
    }

    #[test]
    fn test_applied_display() {
        let text = AppliedEffect::GoldenBonus { slot: 0, from: 2, to: 3 }.to_string();
        assert_eq!(text, "Golden bonus on die #1: 2 -> 3");
    }
}
