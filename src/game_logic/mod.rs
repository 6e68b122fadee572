//! Chess rules: attack detection, move generation and game status.

pub mod attacks;
pub mod movegen;
pub mod status;

use std::fmt;

use crate::game_state::{CastlingSide, Role, Square};
use crate::notation::UciMove;

pub use movegen::{apply, legal_moves, legal_moves_from};
pub use status::{Status, status};

/// What a move does besides relocating the moving piece.
///
/// Derived from the position the move was generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    Capture,
    /// Pawn advancing two ranks; leaves an en-passant target behind it.
    DoublePush,
    /// Pawn capture onto the en-passant target.
    EnPassant,
    Castle(CastlingSide),
}

/// A move generated for a specific position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Role>,
    kind: MoveKind,
}

impl Move {
    pub(crate) const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self {
            from,
            to,
            promotion: None,
            kind,
        }
    }

    pub(crate) const fn with_promotion(self, role: Role) -> Self {
        Self {
            promotion: Some(role),
            ..self
        }
    }

    #[inline]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[inline]
    pub const fn promotion(&self) -> Option<Role> {
        self.promotion
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// True for moves that remove an opposing piece, including en passant.
    pub const fn is_capture(&self) -> bool {
        matches!(self.kind, MoveKind::Capture | MoveKind::EnPassant)
    }

    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::Castle(_))
    }

    /// Square of the piece this move captures, if any.
    ///
    /// Differs from the destination only for en passant.
    pub fn capture_square(&self) -> Option<Square> {
        match self.kind {
            MoveKind::Capture => Some(self.to),
            MoveKind::EnPassant => Some(Square::new(self.to.file(), self.from.rank())),
            _ => None,
        }
    }

    /// Coordinate notation for this move.
    pub fn to_uci(&self) -> UciMove {
        UciMove {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    /// Whether a parsed request names this move.
    pub fn matches(&self, uci: &UciMove) -> bool {
        self.from == uci.from && self.to == uci.to && self.promotion == uci.promotion
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
