//! Dice multipliers.
//!
//! Some dice scale the whole hand when they land on the right value. The
//! per-die factors multiply together, so the order of the submission does
//! not matter.

use serde::{Deserialize, Serialize};

use crate::dice::{DiceKind, Die};

/// Collector repeat and Lucky Six factor.
pub const BONUS_FACTOR: f64 = 1.5;

/// 777 factor when its value shows three times.
pub const TRIPLE_FACTOR: f64 = 2.0;

/// D8 factor on a 7.
pub const D8_SEVEN_FACTOR: f64 = 5.0;

/// D8 factor on an 8.
pub const D8_EIGHT_FACTOR: f64 = 10.0;

/// One die's contribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiplierEntry {
    pub die: String,
    pub factor: f64,
    pub reason: String,
}

impl std::fmt::Display for MultiplierEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: x{} ({})", self.die, self.factor, self.reason)
    }
}

/// Every contributing die and the combined factor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiplierBreakdown {
    pub entries: Vec<MultiplierEntry>,
    pub total: f64,
}

impl Default for MultiplierBreakdown {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            total: 1.0,
        }
    }
}

impl std::fmt::Display for MultiplierBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "Dice multiplier x{:.2}", self.total);
        }
        write!(f, "Dice multiplier x{:.2}:", self.total)?;
        for entry in &self.entries {
            write!(f, "\n  {}", entry)?;
        }
        Ok(())
    }
}

/// Combine the multipliers of a submission.
#[must_use]
pub fn compose(dice: &[&Die]) -> MultiplierBreakdown {
    let mut breakdown = MultiplierBreakdown::default();

    for die in dice {
        let Some((factor, reason)) = die_factor(die, dice) else {
            continue;
        };
        breakdown.total *= factor;
        breakdown.entries.push(MultiplierEntry {
            die: die.name.clone(),
            factor,
            reason,
        });
    }

    breakdown
}

fn die_factor(die: &Die, submission: &[&Die]) -> Option<(f64, String)> {
    match die.kind {
        DiceKind::Collector if die.matched_previous() => {
            Some((BONUS_FACTOR, format!("repeated {}", die.value)))
        }
        DiceKind::LuckySix if die.value == 6 => Some((BONUS_FACTOR, "rolled 6".to_string())),
        DiceKind::TripleSeven => {
            let copies = submission.iter().filter(|d| d.value == die.value).count();
            (copies >= 3).then(|| (TRIPLE_FACTOR, format!("{} appears {} times", die.value, copies)))
        }
        DiceKind::D8 => match die.value {
            7 => Some((D8_SEVEN_FACTOR, "rolled 7".to_string())),
            8 => Some((D8_EIGHT_FACTOR, "rolled 8".to_string())),
            _ => None,
        },
        _ => None,
    }
}
