//! Dice catalog - drafting pools and reward offers.
//!
//! The catalog turns `DiceKind`s into fresh `Die` instances. The reward
//! screen and inventory live outside this crate; they talk to the engine in
//! type identifiers and get dice back from here.

use tracing::debug;

use crate::core::{BattleError, GameRng};

use super::die::Die;
use super::variant::DiceKind;

/// Instantiate a fresh die of `kind`.
#[must_use]
pub fn instantiate(kind: DiceKind, cooldown_after_use: u32) -> Die {
    Die::new(kind, cooldown_after_use)
}

/// Instantiate dice from type identifiers, in order.
///
/// Fails on the first unknown identifier without producing any dice.
pub fn from_type_ids<S: AsRef<str>>(ids: &[S], cooldown_after_use: u32) -> Result<Vec<Die>, BattleError> {
    ids.iter()
        .map(|id| {
            let id = id.as_ref();
            DiceKind::from_type_id(id)
                .map(|kind| instantiate(kind, cooldown_after_use))
                .ok_or_else(|| BattleError::UnknownDiceType(id.to_string()))
        })
        .collect()
}

/// Draft up to `size` distinct kinds from the catalog at random.
#[must_use]
pub fn random_pool(rng: &mut GameRng, size: usize, cooldown_after_use: u32) -> Vec<Die> {
    let mut kinds = DiceKind::ALL_REWARDABLE.to_vec();
    rng.shuffle(&mut kinds);
    kinds.truncate(size);

    debug!(
        drafted = ?kinds.iter().map(DiceKind::name).collect::<Vec<_>>(),
        "drafted random pool"
    );

    kinds
        .into_iter()
        .map(|kind| instantiate(kind, cooldown_after_use))
        .collect()
}

/// Offer `count` distinct non-filler kinds, drawn without replacement.
#[must_use]
pub fn reward_options(rng: &mut GameRng, count: usize) -> Vec<DiceKind> {
    let mut source = DiceKind::ALL_REWARDABLE.to_vec();
    let mut picks = Vec::with_capacity(count.min(source.len()));

    while picks.len() < count && !source.is_empty() {
        let idx = rng.gen_range_usize(0..source.len());
        picks.push(source.swap_remove(idx));
    }

    picks
}
