use crate::fen::FenError;
use crate::notation::{NotationError, UciMove};

/// Classification of a failure, as reported across the call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed position or move text.
    Format,
    /// Well-formed move that is not legal in the current position.
    InvalidMove,
    /// Unknown strategy name.
    InvalidStrategy,
    /// Board too small or too large for the standard arrangement.
    UnsupportedDimensions,
    /// A strategy was asked for a move in a terminal position.
    NoLegalMoves,
    /// Impossible game state, such as a missing king.
    PreconditionViolation,
}

/// Errors returned by engine operations.
///
/// A failed operation never leaves the game partially modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid position: {0}")]
    Position(#[from] FenError),

    #[error("invalid move notation: {0}")]
    Notation(#[from] NotationError),

    #[error("illegal move: {0}")]
    InvalidMove(UciMove),

    #[error("unknown strategy: '{0}'")]
    InvalidStrategy(String),

    #[error("unsupported board dimensions {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("impossible position: {0}")]
    PreconditionViolation(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Position(_) | Error::Notation(_) => ErrorKind::Format,
            Error::InvalidMove(_) => ErrorKind::InvalidMove,
            Error::InvalidStrategy(_) => ErrorKind::InvalidStrategy,
            Error::UnsupportedDimensions { .. } => ErrorKind::UnsupportedDimensions,
            Error::NoLegalMoves => ErrorKind::NoLegalMoves,
            Error::PreconditionViolation(_) => ErrorKind::PreconditionViolation,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
