//! Hand evaluator - combo classification and scoring.
//!
//! Combos are checked from strongest to weakest and the first match wins.
//! The score is `(base + sum) x combo multiplier x dice multiplier`, rounded
//! to the nearest integer with halves away from zero.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{BattleError, MAX_HAND_SIZE};

/// Sum that triggers the jackpot.
pub const JACKPOT_SUM: u32 = 21;

/// Named combo, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combo {
    FiveOfAKind,
    FourOfAKind,
    FullHouse,
    LargeStraight,
    SmallStraight,
    SumJackpot,
    ThreeOfAKind,
    TwoPair,
    OnePair,
    AllEven,
    AllOdd,
    LowRoll,
    HighRoll,
    Bust,
}

impl Combo {
    /// Every combo in priority order.
    pub const ALL: [Combo; 14] = [
        Combo::FiveOfAKind,
        Combo::FourOfAKind,
        Combo::FullHouse,
        Combo::LargeStraight,
        Combo::SmallStraight,
        Combo::SumJackpot,
        Combo::ThreeOfAKind,
        Combo::TwoPair,
        Combo::OnePair,
        Combo::AllEven,
        Combo::AllOdd,
        Combo::LowRoll,
        Combo::HighRoll,
        Combo::Bust,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Combo::FiveOfAKind => "Five of a Kind",
            Combo::FourOfAKind => "Four of a Kind",
            Combo::FullHouse => "Full House",
            Combo::LargeStraight => "Large Straight",
            Combo::SmallStraight => "Small Straight",
            Combo::SumJackpot => "Sum Jackpot",
            Combo::ThreeOfAKind => "Three of a Kind",
            Combo::TwoPair => "Two Pair",
            Combo::OnePair => "One Pair",
            Combo::AllEven => "All Even",
            Combo::AllOdd => "All Odd",
            Combo::LowRoll => "Low Roll",
            Combo::HighRoll => "High Roll",
            Combo::Bust => "No Combo/Bust",
        }
    }

    #[must_use]
    pub fn base_score(self) -> u32 {
        match self {
            Combo::FiveOfAKind => 180,
            Combo::FourOfAKind => 120,
            Combo::FullHouse => 100,
            Combo::LargeStraight => 90,
            Combo::SmallStraight => 75,
            Combo::SumJackpot => 70,
            Combo::ThreeOfAKind => 60,
            Combo::TwoPair => 45,
            Combo::OnePair => 30,
            Combo::AllEven | Combo::AllOdd => 35,
            Combo::LowRoll | Combo::HighRoll => 25,
            Combo::Bust => 10,
        }
    }

    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Combo::FiveOfAKind => 4.0,
            Combo::FourOfAKind => 2.5,
            Combo::FullHouse => 2.0,
            Combo::LargeStraight | Combo::SumJackpot => 1.8,
            Combo::SmallStraight | Combo::ThreeOfAKind => 1.5,
            Combo::TwoPair | Combo::AllEven | Combo::AllOdd => 1.2,
            Combo::OnePair | Combo::LowRoll | Combo::HighRoll => 1.0,
            Combo::Bust => 0.8,
        }
    }
}

impl std::fmt::Display for Combo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Scored submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub combo: Combo,
    pub combo_multiplier: f64,
    pub dice_multiplier: f64,
    pub sum: u32,
    /// Submitted values, ascending.
    pub values: Vec<u8>,
    pub score: u32,
}

impl HandEvaluation {
    #[must_use]
    pub fn base_score(&self) -> u32 {
        self.combo.base_score()
    }

    /// One-line breakdown, e.g. `Full House [5, 5, 5, 6, 6]: (100 + 27) x 2.0 x 1.0 = 254`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} {:?}: ({} + {}) x {:.1} x {:.1} = {}",
            self.combo,
            self.values,
            self.base_score(),
            self.sum,
            self.combo_multiplier,
            self.dice_multiplier,
            self.score
        )
    }
}

/// Classify and score a submission of 1 to 5 values.
pub fn evaluate_hand(values: &[u8], dice_multiplier: f64) -> Result<HandEvaluation, BattleError> {
    if values.is_empty() || values.len() > MAX_HAND_SIZE {
        return Err(BattleError::InvalidSubmission { count: values.len() });
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let combo = classify(&sorted);
    let sum: u32 = sorted.iter().map(|&v| u32::from(v)).sum();
    let raw = f64::from(combo.base_score() + sum) * combo.multiplier() * dice_multiplier;

    Ok(HandEvaluation {
        combo,
        combo_multiplier: combo.multiplier(),
        dice_multiplier,
        sum,
        values: sorted,
        score: raw.round().max(0.0) as u32,
    })
}

/// First matching combo for ascending `sorted` values.
#[must_use]
pub fn classify(sorted: &[u8]) -> Combo {
    let mut counts: FxHashMap<u8, usize> = FxHashMap::default();
    for &v in sorted {
        *counts.entry(v).or_default() += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);
    let pairs = counts.values().filter(|&&c| c == 2).count();

    let mut distinct: Vec<u8> = counts.keys().copied().collect();
    distinct.sort_unstable();

    let sum: u32 = sorted.iter().map(|&v| u32::from(v)).sum();

    if max_count == 5 {
        Combo::FiveOfAKind
    } else if max_count == 4 {
        Combo::FourOfAKind
    } else if max_count == 3 && pairs == 1 {
        Combo::FullHouse
    } else if distinct == [1, 2, 3, 4, 5] || distinct == [2, 3, 4, 5, 6] {
        Combo::LargeStraight
    } else if has_small_straight(&distinct) {
        Combo::SmallStraight
    } else if sum == JACKPOT_SUM {
        Combo::SumJackpot
    } else if max_count == 3 {
        Combo::ThreeOfAKind
    } else if pairs >= 2 {
        Combo::TwoPair
    } else if pairs == 1 {
        Combo::OnePair
    } else if sorted.iter().all(|v| v % 2 == 0) {
        Combo::AllEven
    } else if sorted.iter().all(|v| v % 2 == 1) {
        Combo::AllOdd
    } else if sorted.iter().all(|&v| v <= 3) {
        Combo::LowRoll
    } else if sorted.iter().all(|&v| v >= 4) {
        Combo::HighRoll
    } else {
        Combo::Bust
    }
}

fn has_small_straight(distinct: &[u8]) -> bool {
    (1..=3u8).any(|start| (start..start + 4).all(|v| distinct.contains(&v)))
}
