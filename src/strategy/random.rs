//! Seedable randomness for action selection and pacing

use alloy::primitives::U256;
use rand::{
    rngs::StdRng,
    seq::{index, IndexedRandom, SliceRandom},
    Rng, SeedableRng,
};
use std::ops::RangeInclusive;
use crate::{
    config::{ERC20_AMOUNT_RANGE, NATIVE_AMOUNT_RANGE},
    errors::{BotError, BotResult},
};

#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: StdRng,
}

impl Randomizer {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn count_in(&mut self, range: &RangeInclusive<u32>) -> u32 {
        self.rng.random_range(range.clone())
    }

    pub fn secs_in(&mut self, range: &RangeInclusive<u64>) -> u64 {
        self.rng.random_range(range.clone())
    }

    /// `true` with probability `p`. Never true for 0, always for 1.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random::<f64>() < p
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    pub fn pick_two_distinct<'a, T>(&mut self, items: &'a [T]) -> BotResult<(&'a T, &'a T)> {
        if items.len() < 2 {
            return Err(BotError::Config(format!(
                "need at least 2 tokens in the registry, have {}",
                items.len()
            )));
        }
        let picked = index::sample(&mut self.rng, items.len(), 2);
        Ok((&items[picked.index(0)], &items[picked.index(1)]))
    }

    pub fn erc20_amount(&mut self) -> U256 {
        U256::from(self.rng.random_range(ERC20_AMOUNT_RANGE))
    }

    pub fn native_amount(&mut self) -> U256 {
        U256::from(self.rng.random_range(NATIVE_AMOUNT_RANGE))
    }

    /// `base + U[0, jitter]` seconds.
    pub fn jitter(&mut self, base: u64, jitter: u64) -> u64 {
        base + self.rng.random_range(0..=jitter)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extremes_of_chance_are_exact() {
        let mut rng = Randomizer::seeded(1);
        assert!((0..1000).all(|_| !rng.chance(0.0)));
        assert!((0..1000).all(|_| rng.chance(1.0)));
    }

    #[test]
    fn pair_needs_two_items() {
        let mut rng = Randomizer::seeded(1);
        assert!(rng.pick_two_distinct(&["WETH"]).is_err());
    }

    #[test]
    fn amounts_stay_in_range() {
        let mut rng = Randomizer::seeded(9);
        for _ in 0..1000 {
            let erc20 = rng.erc20_amount();
            assert!(erc20 >= U256::from(1_000_000_000u64) && erc20 <= U256::from(1_000_000_000_000u64));
            let native = rng.native_amount();
            assert!(native >= U256::from(100_000_000u64) && native <= U256::from(10_000_000_000u64));
        }
    }

    proptest! {
        #[test]
        fn pairs_are_distinct(seed in any::<u64>(), len in 2usize..12) {
            let items: Vec<usize> = (0..len).collect();
            let mut rng = Randomizer::seeded(seed);
            let (a, b) = rng.pick_two_distinct(&items).unwrap();
            prop_assert_ne!(a, b);
        }

        #[test]
        fn counts_stay_in_bounds(seed in any::<u64>(), min in 0u32..5, span in 0u32..5) {
            let mut rng = Randomizer::seeded(seed);
            let range = min..=min + span;
            let n = rng.count_in(&range);
            prop_assert!(range.contains(&n));
        }
    }
}
