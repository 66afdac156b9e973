//! Die instances - runtime dice state.
//!
//! `Die` pairs a `DiceKind` with everything that changes during a battle:
//! the last rolled value, the lock flag, the cooldown counters and the
//! variant's private state.
//!
//! ## Value Encoding
//!
//! `value` is 0 until the die has rolled this hand. Faces are 1-6, except the
//! D8 which reaches 8.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

use super::variant::{roll_variant, DiceKind, VariantState, WeightTable};

/// Rarity tier. Drives cost and flavor, not roll odds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiceTier {
    /// Placeholder dice: never rolled, never submitted.
    Filler,
    Common,
    Rare,
    Legendary,
}

impl DiceTier {
    /// Budget cost for dice of this tier.
    #[must_use]
    pub const fn default_cost(self) -> u32 {
        match self {
            DiceTier::Filler => 0,
            DiceTier::Common => 1,
            DiceTier::Rare => 2,
            DiceTier::Legendary => 3,
        }
    }
}

impl std::fmt::Display for DiceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiceTier::Filler => "Filler",
            DiceTier::Common => "Common",
            DiceTier::Rare => "Rare",
            DiceTier::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

/// A die in a battle pool.
///
/// ## Example
///
/// ```
/// use dice_rogue::core::GameRng;
/// use dice_rogue::dice::{Die, DiceKind};
///
/// let mut rng = GameRng::new(1);
/// let mut die = Die::new(DiceKind::Heavy, 1);
///
/// let value = die.roll(&mut rng);
/// die.toggle_lock();
/// assert_eq!(die.roll(&mut rng), value);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Die {
    /// Display name.
    pub name: String,

    /// Roll behavior.
    pub kind: DiceKind,

    /// Rarity tier.
    pub tier: DiceTier,

    /// Budget cost. Carried through, never enforced.
    pub cost: u32,

    /// Hands of cooldown after being submitted.
    pub cooldown_after_use: u32,

    /// Hands left before this die can be selected again.
    pub cooldown_remaining: u32,

    /// Locked dice keep their value through rolls and effects.
    pub locked: bool,

    /// Last rolled value, 0 if not rolled this hand.
    pub value: u8,

    /// Variant-private bookkeeping.
    #[serde(default)]
    pub state: VariantState,
}

impl Die {
    /// Create a die with the catalog name, tier and cost of `kind`.
    #[must_use]
    pub fn new(kind: DiceKind, cooldown_after_use: u32) -> Self {
        Self {
            name: kind.name().to_string(),
            kind,
            tier: kind.tier(),
            cost: kind.cost(),
            cooldown_after_use,
            cooldown_remaining: 0,
            locked: false,
            value: 0,
            state: VariantState::default(),
        }
    }

    /// Zero-cost plain d6 used to pad a pool to full size.
    #[must_use]
    pub fn basic(index: usize, cooldown_after_use: u32) -> Self {
        Self::new(DiceKind::Basic, cooldown_after_use).with_name(format!("Basic D6_{}", index + 1))
    }

    /// Empty hand slot. Never rolls, never scores.
    #[must_use]
    pub fn filler(index: usize) -> Self {
        let mut die = Self::new(DiceKind::Basic, 0).with_name(format!("Empty_{}", index + 1));
        die.tier = DiceTier::Filler;
        die
    }

    /// Custom weighted die.
    #[must_use]
    pub fn weighted(name: impl Into<String>, faces: [u8; 6], weights: [f32; 6], cooldown_after_use: u32) -> Self {
        Self::new(DiceKind::Weighted(WeightTable::new(faces, weights)), cooldown_after_use).with_name(name)
    }

    /// Override the display name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Roll the die.
    ///
    /// A locked die returns its current value untouched.
    pub fn roll(&mut self, rng: &mut GameRng) -> u8 {
        if self.locked {
            return self.value;
        }
        self.value = roll_variant(&self.kind, &mut self.state, self.value, rng);
        self.value
    }

    /// Flip the lock flag, returning the new state.
    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        self.locked
    }

    /// Clear lock, value and per-hand variant state.
    pub fn reset_for_new_hand(&mut self) {
        self.locked = false;
        self.value = 0;
        self.state = VariantState::default();
    }

    /// Feed the predecessor's value to a die that reads it (Plus One).
    pub fn inject_predecessor(&mut self, value: u8) {
        if matches!(self.kind, DiceKind::PlusOne) {
            self.state.injected = value;
        }
    }

    #[must_use]
    pub fn is_filler(&self) -> bool {
        self.tier == DiceTier::Filler
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.cooldown_remaining == 0
    }

    #[must_use]
    pub fn has_rolled(&self) -> bool {
        self.value > 0
    }

    /// Locked, rolled and not a filler.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.locked && self.value > 0 && !self.is_filler()
    }

    /// Collector: the current value repeats the one before the last roll.
    #[must_use]
    pub fn matched_previous(&self) -> bool {
        matches!(self.kind, DiceKind::Collector) && self.state.previous > 0 && self.value == self.state.previous
    }
}
