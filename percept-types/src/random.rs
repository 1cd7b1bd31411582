use std::collections::VecDeque;

use rand::Rng;
use rand::rngs::{StdRng, ThreadRng};

/// Source of uniform random picks for question generation.
pub trait RandomSource {
    /// Pick an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl RandomSource for ThreadRng {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

impl RandomSource for StdRng {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// Replays a fixed sequence of picks, wrapping each into range.
///
/// Once the script runs out every pick is `0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPicks {
    picks: VecDeque<usize>,
}

impl ScriptedPicks {
    /// Create a script from the given picks.
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedPicks {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().map_or(0, |pick| pick % len)
    }
}
