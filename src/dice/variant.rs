//! Dice variants - the closed set of roll behaviors.
//!
//! Every die in the game is one `DiceKind`. The kind decides the face
//! distribution, the catalog metadata (name, tier, cost) and which special
//! effect or multiplier the die takes part in. All sampling goes through
//! `roll_variant`, which reads and updates the die's private `VariantState`.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

use super::die::DiceTier;

/// Probability that a skewed single-face die lands on its favored face.
pub const SKEWED_FACE_CHANCE: f64 = 0.25;

/// Probability that a half-range die lands in its favored half.
pub const HALF_RANGE_CHANCE: f64 = 0.7;

/// Probability that Plus One follows its predecessor.
pub const PLUS_ONE_CHANCE: f64 = 0.7;

/// Probability that a Zombie infects its neighbors on a roll.
pub const INFECTION_CHANCE: f64 = 0.2;

/// Highest face any die can show.
pub const MAX_FACE: u8 = 8;

/// A six-entry weighted face table.
///
/// Weights need not be normalized. Negative weights count as zero, and a
/// table whose weights sum to zero or less rolls as a fair d6.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    pub faces: [u8; 6],
    pub weights: [f32; 6],
}

impl WeightTable {
    /// Table for the Loaded Dice: a six roughly 30% of the time.
    pub const LOADED: WeightTable = WeightTable {
        faces: [1, 2, 3, 4, 5, 6],
        weights: [1.0, 1.0, 1.0, 1.0, 1.0, 3.0],
    };

    /// Faces are clamped to `1..=MAX_FACE`.
    #[must_use]
    pub fn new(faces: [u8; 6], weights: [f32; 6]) -> Self {
        Self {
            faces: faces.map(|f| f.clamp(1, MAX_FACE)),
            weights,
        }
    }

    /// Sample one face.
    pub fn sample(&self, rng: &mut GameRng) -> u8 {
        match rng.choose_weighted(&self.weights) {
            Some(idx) => self.faces[idx].clamp(1, MAX_FACE),
            None => rng.roll_die(6),
        }
    }
}

/// Variant-private state carried by every die.
///
/// Only the fields a kind actually uses are ever touched; the rest stay at
/// their defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantState {
    /// Value before the most recent roll (Collector).
    pub previous: u8,
    /// Set once the die has rolled this hand (D8).
    pub rolled_this_hand: bool,
    /// Predecessor's value injected before the roll (Plus One).
    pub injected: u8,
    /// The last roll triggered an infection (Zombie).
    pub infect_pending: bool,
}

/// The closed set of dice variants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DiceKind {
    /// Plain d6 used to pad the pool.
    Basic,
    /// 25% chance of a 1.
    BigOne,
    /// 25% chance of a 6.
    BigSix,
    /// Faces 1,2,2,5,5,6.
    Counter,
    /// Faces 2,2,4,4,6,6.
    Even,
    /// Faces 1,1,3,3,5,5.
    Odd,
    /// 70% chance of 4-6.
    Heavy,
    /// 70% chance of 1-3.
    Light,
    /// Rolls 7 minus its last value.
    Mirror,
    /// Weighted toward six.
    Loaded,
    /// x1.5 when it repeats its previous value.
    Collector,
    /// x1.5 on a six.
    LuckySix,
    /// Usually rolls its left neighbor + 1.
    PlusOne,
    /// x2 when its value appears three times in the submission.
    TripleSeven,
    /// Copies a random other die after each roll.
    TwinBond,
    /// Faces 3,3,3,6,6,6.
    WeightedEdge,
    /// Rolls 1-8 once per hand; 7 is x5, 8 is x10.
    D8,
    /// Every other die gets +1.
    Golden,
    /// Sometimes overwrites both neighbors with its value.
    Zombie,
    /// Caller-supplied weighted table.
    Weighted(WeightTable),
}

const COUNTER_FACES: [u8; 6] = [1, 2, 2, 5, 5, 6];
const EVEN_FACES: [u8; 6] = [2, 2, 4, 4, 6, 6];
const ODD_FACES: [u8; 6] = [1, 1, 3, 3, 5, 5];
const EDGE_FACES: [u8; 6] = [3, 3, 3, 6, 6, 6];

impl DiceKind {
    /// Every kind the reward screen and pool drafting can hand out.
    pub const ALL_REWARDABLE: [DiceKind; 18] = [
        DiceKind::BigOne,
        DiceKind::BigSix,
        DiceKind::Counter,
        DiceKind::Even,
        DiceKind::Odd,
        DiceKind::Heavy,
        DiceKind::Light,
        DiceKind::Mirror,
        DiceKind::Loaded,
        DiceKind::Collector,
        DiceKind::LuckySix,
        DiceKind::PlusOne,
        DiceKind::TripleSeven,
        DiceKind::TwinBond,
        DiceKind::WeightedEdge,
        DiceKind::D8,
        DiceKind::Golden,
        DiceKind::Zombie,
    ];

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DiceKind::Basic => "Basic D6",
            DiceKind::BigOne => "Big One",
            DiceKind::BigSix => "Big Six",
            DiceKind::Counter => "Counter Dice",
            DiceKind::Even => "Even Dice",
            DiceKind::Odd => "Odd Dice",
            DiceKind::Heavy => "Heavy Dice",
            DiceKind::Light => "Light Dice",
            DiceKind::Mirror => "Mirror Dice",
            DiceKind::Loaded => "Loaded Dice",
            DiceKind::Collector => "Collector Dice",
            DiceKind::LuckySix => "Lucky Six",
            DiceKind::PlusOne => "Plus One",
            DiceKind::TripleSeven => "777",
            DiceKind::TwinBond => "Twin Bond",
            DiceKind::WeightedEdge => "Weighted Edge",
            DiceKind::D8 => "D8",
            DiceKind::Golden => "Golden Dice",
            DiceKind::Zombie => "Zombie",
            DiceKind::Weighted(_) => "Weighted Dice",
        }
    }

    /// Stable identifier used across the reward boundary.
    #[must_use]
    pub fn type_id(&self) -> &'static str {
        match self {
            DiceKind::Basic => "Basic",
            DiceKind::BigOne => "BigOne",
            DiceKind::BigSix => "BigSix",
            DiceKind::Counter => "CounterDice",
            DiceKind::Even => "EvenDice",
            DiceKind::Odd => "OddDice",
            DiceKind::Heavy => "HeavyDice",
            DiceKind::Light => "LightDice",
            DiceKind::Mirror => "MirrorDice",
            DiceKind::Loaded => "LoadedDice",
            DiceKind::Collector => "CollectorDice",
            DiceKind::LuckySix => "LuckySix",
            DiceKind::PlusOne => "PlusOne",
            DiceKind::TripleSeven => "SevenSevenSeven",
            DiceKind::TwinBond => "TwinBond",
            DiceKind::WeightedEdge => "WeightedEdge",
            DiceKind::D8 => "D8",
            DiceKind::Golden => "GoldenDice",
            DiceKind::Zombie => "ZombieDice",
            DiceKind::Weighted(_) => "WeightedDice",
        }
    }

    /// Parse a type identifier produced by `type_id`.
    ///
    /// Custom weighted dice carry their table and cannot round-trip through
    /// an identifier.
    #[must_use]
    pub fn from_type_id(id: &str) -> Option<DiceKind> {
        if id == DiceKind::Basic.type_id() {
            return Some(DiceKind::Basic);
        }
        DiceKind::ALL_REWARDABLE
            .iter()
            .copied()
            .find(|kind| kind.type_id() == id)
    }

    /// Rarity tier.
    #[must_use]
    pub fn tier(&self) -> DiceTier {
        match self {
            DiceKind::Basic
            | DiceKind::BigOne
            | DiceKind::BigSix
            | DiceKind::Counter
            | DiceKind::Even
            | DiceKind::Odd
            | DiceKind::Heavy
            | DiceKind::Light
            | DiceKind::Mirror
            | DiceKind::Loaded
            | DiceKind::Weighted(_) => DiceTier::Common,
            DiceKind::Collector
            | DiceKind::LuckySix
            | DiceKind::PlusOne
            | DiceKind::TripleSeven
            | DiceKind::TwinBond
            | DiceKind::WeightedEdge => DiceTier::Rare,
            DiceKind::D8 | DiceKind::Golden | DiceKind::Zombie => DiceTier::Legendary,
        }
    }

    /// Budget cost. Basic padding dice are free.
    #[must_use]
    pub fn cost(&self) -> u32 {
        match self {
            DiceKind::Basic => 0,
            other => other.tier().default_cost(),
        }
    }

    /// Short rules text for reward cards and pool listings.
    #[must_use]
    pub fn effect_text(&self) -> &'static str {
        match self {
            DiceKind::Basic => "Fair six-sided die",
            DiceKind::BigOne => "25% chance to roll 1",
            DiceKind::BigSix => "25% chance to roll 6",
            DiceKind::Counter => "Faces 1,2,2,5,5,6",
            DiceKind::Even => "Only rolls 2, 4 or 6",
            DiceKind::Odd => "Only rolls 1, 3 or 5",
            DiceKind::Heavy => "70% chance to roll 4-6",
            DiceKind::Light => "70% chance to roll 1-3",
            DiceKind::Mirror => "Rolls 7 minus its last value",
            DiceKind::Loaded => "Six comes up about 30% of the time",
            DiceKind::Collector => "x1.5 if it repeats its previous roll",
            DiceKind::LuckySix => "x1.5 on a 6",
            DiceKind::PlusOne => "70% chance to roll the previous die + 1",
            DiceKind::TripleSeven => "x2 if its value appears three times",
            DiceKind::TwinBond => "Copies a random other die",
            DiceKind::WeightedEdge => "Only rolls 3 or 6",
            DiceKind::D8 => "Rolls 1-8 once per hand; 7 is x5, 8 is x10",
            DiceKind::Golden => "All other dice +1",
            DiceKind::Zombie => "20% chance to infect both neighbors",
            DiceKind::Weighted(_) => "Custom weighted faces",
        }
    }
}

/// Roll one die of `kind` whose current value is `current`.
///
/// Locking is the caller's concern; this always samples (except the D8's
/// once-per-hand rule, which returns `current` on repeat calls).
pub fn roll_variant(kind: &DiceKind, state: &mut VariantState, current: u8, rng: &mut GameRng) -> u8 {
    match kind {
        DiceKind::Basic
        | DiceKind::LuckySix
        | DiceKind::TripleSeven
        | DiceKind::TwinBond
        | DiceKind::Golden => rng.roll_die(6),
        DiceKind::BigOne => skewed_face(rng, 1),
        DiceKind::BigSix => skewed_face(rng, 6),
        DiceKind::Counter => face_table(rng, &COUNTER_FACES),
        DiceKind::Even => face_table(rng, &EVEN_FACES),
        DiceKind::Odd => face_table(rng, &ODD_FACES),
        DiceKind::WeightedEdge => face_table(rng, &EDGE_FACES),
        DiceKind::Heavy => half_range(rng, true),
        DiceKind::Light => half_range(rng, false),
        DiceKind::Mirror => {
            if (1..=6).contains(&current) {
                7 - current
            } else {
                rng.roll_die(6)
            }
        }
        DiceKind::Loaded => WeightTable::LOADED.sample(rng),
        DiceKind::Weighted(table) => table.sample(rng),
        DiceKind::Collector => {
            state.previous = current;
            rng.roll_die(6)
        }
        DiceKind::PlusOne => {
            if state.injected > 0 && rng.chance(PLUS_ONE_CHANCE) {
                let next = state.injected.saturating_add(1);
                if next > 6 {
                    1
                } else {
                    next
                }
            } else {
                rng.roll_die(6)
            }
        }
        DiceKind::D8 => {
            if state.rolled_this_hand {
                return current;
            }
            state.rolled_this_hand = true;
            rng.roll_die(8)
        }
        DiceKind::Zombie => {
            let value = rng.roll_die(6);
            state.infect_pending = rng.chance(INFECTION_CHANCE);
            value
        }
    }
}

/// `SKEWED_FACE_CHANCE` of `face`, otherwise uniform over the other five.
fn skewed_face(rng: &mut GameRng, face: u8) -> u8 {
    if rng.chance(SKEWED_FACE_CHANCE) {
        return face;
    }
    // Map 1..=5 onto the five faces that are not `face`
    let other = rng.roll_die(5);
    if other >= face {
        other + 1
    } else {
        other
    }
}

/// `HALF_RANGE_CHANCE` of the favored half, otherwise the other half.
fn half_range(rng: &mut GameRng, favor_high: bool) -> u8 {
    let high = rng.chance(HALF_RANGE_CHANCE) == favor_high;
    let offset = if high { 3 } else { 0 };
    offset + rng.roll_die(3)
}

fn face_table(rng: &mut GameRng, faces: &[u8; 6]) -> u8 {
    faces[rng.gen_range_usize(0..faces.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: usize = 6000;

    fn histogram(kind: DiceKind, seed: u64) -> [usize; 9] {
        let mut rng = GameRng::new(seed);
        let mut counts = [0usize; 9];
        for _ in 0..SAMPLES {
            let mut state = VariantState::default();
            let v = roll_variant(&kind, &mut state, 0, &mut rng);
            counts[v as usize] += 1;
        }
        counts
    }

    fn share(counts: &[usize; 9], faces: &[u8]) -> f64 {
        let hits: usize = faces.iter().map(|&f| counts[f as usize]).sum();
        hits as f64 / SAMPLES as f64
    }

    #[test]
    fn test_basic_is_uniform_d6() {
        let counts = histogram(DiceKind::Basic, 1);
        assert_eq!(counts[0], 0);
        assert_eq!(counts[7] + counts[8], 0);
        for face in 1..=6 {
            let p = counts[face] as f64 / SAMPLES as f64;
            assert!((p - 1.0 / 6.0).abs() < 0.03, "face {face}: {p}");
        }
    }

    #[test]
    fn test_big_one_skew() {
        let counts = histogram(DiceKind::BigOne, 2);
        let p_one = share(&counts, &[1]);
        // 25% fixed plus nothing from the uniform half
        assert!((p_one - 0.25).abs() < 0.03, "p(1) = {p_one}");
        for face in 2..=6 {
            let p = counts[face] as f64 / SAMPLES as f64;
            assert!((p - 0.15).abs() < 0.03, "face {face}: {p}");
        }
    }

    #[test]
    fn test_big_six_skew() {
        let counts = histogram(DiceKind::BigSix, 3);
        assert!((share(&counts, &[6]) - 0.25).abs() < 0.03);
        assert!(counts[1] > 0);
        assert_eq!(counts[7], 0);
    }

    #[test]
    fn test_heavy_and_light_split() {
        let heavy = histogram(DiceKind::Heavy, 4);
        assert!((share(&heavy, &[4, 5, 6]) - 0.7).abs() < 0.03);

        let light = histogram(DiceKind::Light, 5);
        assert!((share(&light, &[1, 2, 3]) - 0.7).abs() < 0.03);
    }

    #[test]
    fn test_face_tables() {
        let even = histogram(DiceKind::Even, 6);
        assert_eq!(share(&even, &[1, 3, 5]), 0.0);

        let odd = histogram(DiceKind::Odd, 7);
        assert_eq!(share(&odd, &[2, 4, 6]), 0.0);

        let edge = histogram(DiceKind::WeightedEdge, 8);
        assert_eq!(share(&edge, &[3, 6]), 1.0);

        let counter = histogram(DiceKind::Counter, 9);
        assert_eq!(share(&counter, &[3, 4]), 0.0);
        // 2 and 5 appear twice on the table
        assert!((share(&counter, &[2]) - 1.0 / 3.0).abs() < 0.03);
    }

    #[test]
    fn test_loaded_favors_six() {
        let counts = histogram(DiceKind::Loaded, 10);
        assert!((share(&counts, &[6]) - 0.375).abs() < 0.03);
    }

    #[test]
    fn test_zero_weight_table_is_uniform() {
        let table = WeightTable::new([1, 2, 3, 4, 5, 6], [0.0; 6]);
        let counts = histogram(DiceKind::Weighted(table), 11);
        for face in 1..=6 {
            assert!(counts[face] > 0);
        }

        let negative = WeightTable::new([6, 6, 6, 6, 6, 6], [-1.0; 6]);
        let counts = histogram(DiceKind::Weighted(negative), 12);
        assert!(counts[1] > 0, "negative-sum table must fall back to a fair d6");
    }

    #[test]
    fn test_mirror_flips_previous() {
        let mut rng = GameRng::new(13);
        let mut state = VariantState::default();
        let first = roll_variant(&DiceKind::Mirror, &mut state, 0, &mut rng);
        assert!((1..=6).contains(&first));
        let second = roll_variant(&DiceKind::Mirror, &mut state, first, &mut rng);
        assert_eq!(second, 7 - first);
        let third = roll_variant(&DiceKind::Mirror, &mut state, second, &mut rng);
        assert_eq!(third, first);
    }

    #[test]
    fn test_plus_one_follows_predecessor() {
        let mut rng = GameRng::new(14);
        let mut follows = 0;
        for _ in 0..SAMPLES {
            let mut state = VariantState { injected: 3, ..Default::default() };
            if roll_variant(&DiceKind::PlusOne, &mut state, 0, &mut rng) == 4 {
                follows += 1;
            }
        }
        // 70% follow plus 1/6 of the remaining 30%
        let p = follows as f64 / SAMPLES as f64;
        assert!((p - 0.75).abs() < 0.03, "p = {p}");
    }

    #[test]
    fn test_plus_one_wraps_six() {
        let mut rng = GameRng::new(15);
        let mut saw_one = false;
        for _ in 0..100 {
            let mut state = VariantState { injected: 6, ..Default::default() };
            let v = roll_variant(&DiceKind::PlusOne, &mut state, 0, &mut rng);
            assert!((1..=6).contains(&v));
            saw_one |= v == 1;
        }
        assert!(saw_one);
    }

    #[test]
    fn test_plus_one_after_high_predecessor() {
        let mut rng = GameRng::new(19);
        for injected in [7, 8, u8::MAX] {
            for _ in 0..50 {
                let mut state = VariantState { injected, ..Default::default() };
                let v = roll_variant(&DiceKind::PlusOne, &mut state, 0, &mut rng);
                assert!((1..=6).contains(&v));
            }
        }
    }

    #[test]
    fn test_weight_table_clamps_faces() {
        let table = WeightTable::new([0, 255, 3, 4, 5, 6], [1.0; 6]);
        assert_eq!(table.faces, [1, 8, 3, 4, 5, 6]);

        let raw = WeightTable { faces: [0, 0, 0, 0, 0, 200], weights: [1.0; 6] };
        let counts = histogram(DiceKind::Weighted(raw), 20);
        assert_eq!(counts[0], 0);
        assert_eq!(counts[1] + counts[8], SAMPLES);
    }

    #[test]
    fn test_plus_one_without_predecessor_is_uniform() {
        let counts = histogram(DiceKind::PlusOne, 16);
        for face in 1..=6 {
            let p = counts[face] as f64 / SAMPLES as f64;
            assert!((p - 1.0 / 6.0).abs() < 0.03);
        }
    }

    #[test]
    fn test_d8_rolls_once_per_hand() {
        let mut rng = GameRng::new(17);
        let mut state = VariantState::default();
        let first = roll_variant(&DiceKind::D8, &mut state, 0, &mut rng);
        assert!((1..=8).contains(&first));
        assert!(state.rolled_this_hand);
        for _ in 0..20 {
            assert_eq!(roll_variant(&DiceKind::D8, &mut state, first, &mut rng), first);
        }

        let counts = histogram(DiceKind::D8, 18);
        assert!(counts[7] > 0 && counts[8] > 0);
    }

    #[test]
    fn test_collector_records_previous() {
        let mut rng = GameRng::new(19);
        let mut state = VariantState::default();
        let first = roll_variant(&DiceKind::Collector, &mut state, 0, &mut rng);
        assert_eq!(state.previous, 0);
        roll_variant(&DiceKind::Collector, &mut state, first, &mut rng);
        assert_eq!(state.previous, first);
    }

    #[test]
    fn test_zombie_infection_rate() {
        let mut rng = GameRng::new(20);
        let mut infections = 0;
        for _ in 0..SAMPLES {
            let mut state = VariantState::default();
            roll_variant(&DiceKind::Zombie, &mut state, 0, &mut rng);
            if state.infect_pending {
                infections += 1;
            }
        }
        let p = infections as f64 / SAMPLES as f64;
        assert!((p - 0.2).abs() < 0.03, "p = {p}");
    }

    #[test]
    fn test_type_id_round_trip() {
        for kind in DiceKind::ALL_REWARDABLE {
            assert_eq!(DiceKind::from_type_id(kind.type_id()), Some(kind));
        }
        assert_eq!(DiceKind::from_type_id("Basic"), Some(DiceKind::Basic));
        assert_eq!(DiceKind::from_type_id("Nope"), None);
    }

    #[test]
    fn test_catalog_metadata() {
        assert_eq!(DiceKind::Basic.cost(), 0);
        assert_eq!(DiceKind::Heavy.cost(), 1);
        assert_eq!(DiceKind::TwinBond.cost(), 2);
        assert_eq!(DiceKind::D8.cost(), 3);
        assert_eq!(DiceKind::Zombie.tier(), DiceTier::Legendary);
        assert_eq!(DiceKind::TripleSeven.name(), "777");
    }
}
