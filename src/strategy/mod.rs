//! Pluggable move-selection strategies and the registry that picks one.

use std::fmt;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::game_logic::Move;
use crate::game_state::GameState;

mod fav_colour;
mod random;

pub use fav_colour::FavColourStrategy;
pub use random::RandomStrategy;

/// Chooses one move out of the legal moves of a position.
pub trait Strategy: Send + fmt::Debug {
    /// Unique name used to select the strategy.
    fn name(&self) -> &str;

    /// Pick one of `legal_moves`, which are the legal moves of `state` in
    /// generation order. Fails with [`Error::NoLegalMoves`] when the slice is
    /// empty.
    fn propose(&mut self, state: &GameState, legal_moves: &[Move]) -> Result<Move>;
}

/// Named strategies in registration order, exactly one of them active.
#[derive(Debug)]
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
    active: usize,
}

impl StrategyRegistry {
    /// Add a strategy, or replace the one registered under the same name
    /// without changing its position.
    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        match self
            .strategies
            .iter()
            .position(|s| s.name() == strategy.name())
        {
            Some(index) => self.strategies[index] = strategy,
            None => self.strategies.push(strategy),
        }
    }

    /// Names of all registered strategies, in registration order.
    pub fn list_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Make `name` the active strategy. An unknown name keeps the current one.
    pub fn select(&mut self, name: &str) -> Result<()> {
        let index = self
            .strategies
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| {
                warn!("Unknown strategy '{}'", name);
                Error::InvalidStrategy(name.to_string())
            })?;
        debug!("Strategy '{}' selected", name);
        self.active = index;
        Ok(())
    }

    pub fn active_name(&self) -> &str {
        self.strategies[self.active].name()
    }

    /// Ask the active strategy for a move.
    pub fn propose(&mut self, state: &GameState, legal_moves: &[Move]) -> Result<Move> {
        if legal_moves.is_empty() {
            return Err(Error::NoLegalMoves);
        }
        self.strategies[self.active].propose(state, legal_moves)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self {
            strategies: vec![
                Box::new(RandomStrategy::new()),
                Box::new(FavColourStrategy),
            ],
            active: 0,
        }
    }
}
