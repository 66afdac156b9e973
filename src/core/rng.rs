//! Deterministic random number generation for dice rolls and effects.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical rolls
//! - **Forkable**: Independent branches for back-to-back battles
//! - **Serializable**: O(1) state capture and restore
//! - **Context streams**: Independent sequences for pool drafting vs rolling
//!
//! ## Usage
//!
//! ```
//! use dice_rogue::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//!
//! // Every face of a d6 is reachable, nothing else is
//! let face = rng.roll_die(6);
//! assert!((1..=6).contains(&face));
//!
//! // Same seed, same sequence
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.roll_die(6), b.roll_die(6));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic RNG shared by every die, effect and drafting step of a battle.
///
/// Uses ChaCha8 for speed while keeping high quality randomness.
/// Nothing in the crate touches an ambient global RNG.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// Used to keep pool drafting from shifting the roll sequence.
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self {
            inner: ChaCha8Rng::seed_from_u64(context_seed),
            seed: context_seed,
            fork_counter: 0,
        }
    }

    /// Roll a fair die with faces `1..=sides`.
    pub fn roll_die(&mut self, sides: u8) -> u8 {
        self.inner.gen_range(1..=sides.max(1))
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Draw a uniform float in `[0, 1)` and test it against `probability`.
    ///
    /// Out-of-range probabilities saturate instead of panicking.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.inner.gen::<f64>() < probability
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose a random element with weighted probability.
    ///
    /// Returns the index of the chosen element.
    /// Weights do not need to sum to 1.0; negative weights count as zero.
    ///
    /// Returns `None` if weights are empty or sum to zero.
    pub fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen::<f32>() * total;

        for (i, &weight) in weights.iter().enumerate() {
            let weight = weight.max(0.0);
            if weight == 0.0 {
                continue;
            }
            threshold -= weight;
            if threshold <= 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case - return last non-zero weight
        weights.iter().rposition(|&w| w > 0.0)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG state for checkpointing a battle mid-hand.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many dice have been rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolls(rng: &mut GameRng, n: usize) -> Vec<u8> {
        (0..n).map(|_| rng.roll_die(6)).collect()
    }

    #[test]
    fn test_same_seed_same_rolls() {
        assert_eq!(rolls(&mut GameRng::new(42), 100), rolls(&mut GameRng::new(42), 100));
        assert_ne!(rolls(&mut GameRng::new(1), 30), rolls(&mut GameRng::new(2), 30));
    }

    #[test]
    fn test_roll_die_covers_all_faces() {
        let mut rng = GameRng::new(9);
        let mut seen = [false; 9];
        for _ in 0..500 {
            let face = rng.roll_die(8);
            assert!((1..=8).contains(&face));
            seen[face as usize] = true;
        }
        assert!(seen[1..=8].iter().all(|&s| s));
        assert_eq!(rng.roll_die(0), 1);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = GameRng::new(3);
        for _ in 0..50 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_battle_seeds_from_fork() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        let seeds_a: Vec<u64> = (0..3).map(|_| a.fork().seed()).collect();
        let seeds_b: Vec<u64> = (0..3).map(|_| b.fork().seed()).collect();
        assert_eq!(seeds_a, seeds_b);
        assert_ne!(seeds_a[0], seeds_a[1]);
    }

    #[test]
    fn test_pool_stream_leaves_rolls_alone() {
        let mut plain = GameRng::new(42);
        let mut drafted = GameRng::new(42);
        let mut pool = drafted.for_context("pool");
        rolls(&mut pool, 20);

        assert_eq!(rolls(&mut plain, 20), rolls(&mut drafted, 20));
        assert_eq!(GameRng::new(42).for_context("pool").seed(), pool.seed());
    }

    #[test]
    fn test_choose_weighted_ignores_negative() {
        let mut rng = GameRng::new(42);
        for _ in 0..10 {
            assert_eq!(rng.choose_weighted(&[-5.0, 0.0, 2.0]), Some(2));
        }
        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[-1.0, 0.0]), None);
    }

    #[test]
    fn test_checkpoint_mid_hand() {
        let mut rng = GameRng::new(42);
        rolls(&mut rng, 7);

        let json = serde_json::to_string(&rng.state()).unwrap();
        let expected = rolls(&mut rng, 10);

        let state: GameRngState = serde_json::from_str(&json).unwrap();
        assert_eq!(rolls(&mut GameRng::from_state(&state), 10), expected);
    }
}
