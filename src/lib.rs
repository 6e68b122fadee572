//! Chess rules engine for variable-size boards.
//!
//! [`Session`] is the main entry point: it owns one game, reads and writes
//! position text, validates and plays moves, reports the game status and asks
//! a pluggable [`Strategy`](strategy::Strategy) for moves. [`boundary`] wraps
//! a process-wide session in plain-value functions.

pub mod boundary;
pub mod error;
pub mod feedback;
pub mod fen;
pub mod game_logic;
pub mod game_state;
pub mod notation;
pub mod session;
pub mod strategy;
pub mod terminal;

pub use error::{Error, ErrorKind, Result};
pub use game_logic::{Move, MoveKind, Status};
pub use game_state::{Color, Dimensions, GameState, Piece, Role, RuleSet, Square};
pub use notation::UciMove;
pub use session::{GameConfig, Session};

/// Something that can show the board with highlighted squares.
///
/// Implemented by the terminal renderer; other front-ends plug in here.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show `state` with the given feedback highlighted.
    fn show(
        &mut self,
        state: &GameState,
        feedback: &feedback::BoardFeedback,
    ) -> Result<(), Self::Error>;
}
