use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::Strategy;
use crate::error::{Error, Result};
use crate::game_logic::Move;
use crate::game_state::GameState;

/// Picks uniformly among the legal moves.
#[derive(Debug, Clone)]
pub struct RandomStrategy<R = StdRng> {
    rng: R,
}

impl RandomStrategy<StdRng> {
    /// Seeded from operating-system entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence of choices for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomStrategy<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RandomStrategy<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng + Send + fmt::Debug> Strategy for RandomStrategy<R> {
    fn name(&self) -> &str {
        "random"
    }

    fn propose(&mut self, _state: &GameState, legal_moves: &[Move]) -> Result<Move> {
        legal_moves
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoLegalMoves)
    }
}
