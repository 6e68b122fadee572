use log::{debug, warn};

use crate::error::{Error, Result};
use crate::fen;
use crate::game_logic::{self, Move, Status, attacks::is_attacked};
use crate::game_state::{Color, Dimensions, GameState, RuleSet, Square};
use crate::notation::UciMove;
use crate::strategy::StrategyRegistry;

/// Board size and optional rules a session plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameConfig {
    pub dimensions: Dimensions,
    pub rules: RuleSet,
}

/// One game: the current position plus the strategies that can move in it.
///
/// Every operation either succeeds completely or leaves the position as it
/// was.
pub struct Session {
    state: GameState,
    config: GameConfig,
    strategies: StrategyRegistry,
}

impl Session {
    /// Standard starting position for `config`.
    pub fn new(config: GameConfig) -> Self {
        Self::with_strategies(config, StrategyRegistry::default())
    }

    pub fn with_strategies(config: GameConfig, strategies: StrategyRegistry) -> Self {
        Self {
            state: GameState::standard(config.dimensions, config.rules),
            config,
            strategies,
        }
    }

    /// Start over with the standard arrangement on a `width` x `height` board.
    pub fn reset(&mut self, width: u32, height: u32) -> Result<()> {
        let dimensions = Dimensions::new(width, height).ok_or_else(|| {
            warn!("Rejected board size {}x{}", width, height);
            Error::UnsupportedDimensions { width, height }
        })?;
        self.config.dimensions = dimensions;
        self.state = GameState::standard(dimensions, self.config.rules);
        debug!("Reset to standard position on {}x{}", width, height);
        Ok(())
    }

    /// Replace the position with the one described by `text`.
    pub fn load(&mut self, text: &str) -> Result<()> {
        let mut state = fen::decode(text, self.config.dimensions).inspect_err(|e| {
            warn!("Rejected position '{}': {}", text, e);
        })?;
        state.rules = self.config.rules;
        validate(&state).inspect_err(|e| warn!("Rejected position '{}': {}", text, e))?;
        debug!("Loaded position {}", text);
        self.state = state;
        Ok(())
    }

    pub fn dump(&self) -> String {
        fen::encode(&self.state)
    }

    /// Play a move given in coordinate notation.
    pub fn apply_notated(&mut self, text: &str) -> Result<Move> {
        let request = text.trim().parse::<UciMove>().inspect_err(|e| {
            warn!("Rejected move text '{}': {}", text, e);
        })?;
        game_logic::apply(&mut self.state, &request)
    }

    pub fn status(&self) -> Result<Status> {
        game_logic::status(&self.state)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        game_logic::legal_moves(&self.state)
    }

    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        game_logic::legal_moves_from(&self.state, square)
    }

    /// Move proposed by the active strategy, without playing it.
    pub fn best_move(&mut self) -> Result<Move> {
        let moves = self.legal_moves();
        let mv = self.strategies.propose(&self.state, &moves)?;
        debug!("Strategy '{}' proposed {}", self.strategies.active_name(), mv);
        Ok(mv)
    }

    /// Let the active strategy play a move.
    pub fn play_best_move(&mut self) -> Result<Move> {
        let mv = self.best_move()?;
        game_logic::apply(&mut self.state, &mv.to_uci())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    pub fn strategies_mut(&mut self) -> &mut StrategyRegistry {
        &mut self.strategies
    }

    /// Give up the session, keeping its strategies and their selection.
    pub fn into_strategies(self) -> StrategyRegistry {
        self.strategies
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("position", &self.dump())
            .field("config", &self.config)
            .field("strategy", &self.strategies.active_name())
            .finish()
    }
}

/// Both sides have exactly one king and the side that just moved is not
/// left in check.
fn validate(state: &GameState) -> Result<()> {
    for color in [Color::White, Color::Black] {
        if state.board.king_square(color).is_none() {
            return Err(Error::PreconditionViolation(format!(
                "{} does not have exactly one king",
                color
            )));
        }
    }
    let waiting = state.turn.other();
    if let Some(king) = state.board.king_square(waiting)
        && is_attacked(&state.board, king, state.turn)
    {
        return Err(Error::PreconditionViolation(format!(
            "{} is in check but it is not their turn",
            waiting
        )));
    }
    Ok(())
}
