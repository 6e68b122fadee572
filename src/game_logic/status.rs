use std::fmt;

use super::Move;
use super::attacks::{attackers, is_attacked};
use super::movegen::legal_moves;
use crate::error::{Error, Result};
use crate::game_state::{GameState, Square};

/// Game status from the point of view of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    Ongoing = 0,
    Check = 1,
    Checkmate = 2,
    Stalemate = 3,
}

impl Status {
    /// Numeric code used across the call boundary.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Status::Checkmate | Status::Stalemate)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::Ongoing => "Ongoing",
            Status::Check => "Check",
            Status::Checkmate => "Checkmate",
            Status::Stalemate => "Stalemate",
        };
        f.write_str(text)
    }
}

/// King of the side to move, and the pieces giving check to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInfo {
    pub king_square: Square,
    pub checkers: Vec<Square>,
}

/// Status of the current position, generating legal moves to decide it.
pub fn status(state: &GameState) -> Result<Status> {
    evaluate(state, &legal_moves(state))
}

/// Status given the already generated legal moves of `state`.
pub fn evaluate(state: &GameState, legal_moves: &[Move]) -> Result<Status> {
    let in_check = is_in_check(state)?;
    Ok(match (in_check, legal_moves.is_empty()) {
        (true, true) => Status::Checkmate,
        (false, true) => Status::Stalemate,
        (true, false) => Status::Check,
        (false, false) => Status::Ongoing,
    })
}

/// Whether the side to move is in check.
pub fn is_in_check(state: &GameState) -> Result<bool> {
    let king = king_of_side_to_move(state)?;
    Ok(is_attacked(&state.board, king, state.turn.other()))
}

/// Check details for the side to move, `None` when not in check.
pub fn check_info(state: &GameState) -> Result<Option<CheckInfo>> {
    let king_square = king_of_side_to_move(state)?;
    let checkers: Vec<Square> = attackers(&state.board, king_square, state.turn.other()).collect();
    Ok((!checkers.is_empty()).then_some(CheckInfo {
        king_square,
        checkers,
    }))
}

fn king_of_side_to_move(state: &GameState) -> Result<Square> {
    state.board.king_square(state.turn).ok_or_else(|| {
        Error::PreconditionViolation(format!("{} does not have exactly one king", state.turn))
    })
}
