//! Injectable randomness for dice, steals and card draws.
//!
//! The rules never touch a global RNG. Callers pass a [`Randomness`] into every move:
//! [`RngRandomness`] wraps any `rand` generator, [`ScriptedRandomness`] replays fixed
//! values for tests and recorded games.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::VecDeque;

pub trait Randomness {
    /// A fair six-sided die, 1..=6
    fn roll_die(&mut self) -> u8;

    /// Uniform index in `0..len`; 0 when `len` is 0
    fn choose_index(&mut self, len: usize) -> usize;
}

/// Adapter from any `rand` generator
#[derive(Debug, Clone)]
pub struct RngRandomness<R>(R);

impl<R: RngCore> RngRandomness<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngRandomness<StdRng> {
    /// Deterministic source for replays
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: RngCore> Randomness for RngRandomness<R> {
    fn roll_die(&mut self) -> u8 {
        self.0.gen_range(1..=6)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.0.gen_range(0..len)
        }
    }
}

/// Replays queued dice and picks in order.
///
/// Once a queue runs dry dice come up 1 and picks return 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandomness {
    dice: VecDeque<u8>,
    picks: VecDeque<usize>,
}

impl ScriptedRandomness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dice(mut self, dice: impl IntoIterator<Item = u8>) -> Self {
        self.dice.extend(dice);
        self
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Queue one roll of two dice
    pub fn push_roll(&mut self, first: u8, second: u8) {
        self.dice.push_back(first);
        self.dice.push_back(second);
    }

    pub fn push_pick(&mut self, pick: usize) {
        self.picks.push_back(pick);
    }
}

impl Randomness for ScriptedRandomness {
    fn roll_die(&mut self) -> u8 {
        self.dice.pop_front().map_or(1, |d| d.clamp(1, 6))
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len.max(1)
    }
}
