mod board;
mod piece;
mod square;

pub use board::{Board, Dimensions, MAX_HEIGHT, MIN_HEIGHT, MIN_WIDTH};
pub use piece::{Color, Piece, Role};
pub use square::{MAX_FILES, Square, SquareParseError};

/// Which rook a castling move uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    pub const ALL: [CastlingSide; 2] = [CastlingSide::KingSide, CastlingSide::QueenSide];
}

/// Castling availability for both colours.
///
/// A right is only ever revoked during play; it is granted again only by a
/// reset or by loading a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    white_king_side: bool,
    white_queen_side: bool,
    black_king_side: bool,
    black_queen_side: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_king_side: true,
        white_queen_side: true,
        black_king_side: true,
        black_queen_side: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        white_king_side: false,
        white_queen_side: false,
        black_king_side: false,
        black_queen_side: false,
    };

    fn slot(&mut self, color: Color, side: CastlingSide) -> &mut bool {
        match (color, side) {
            (Color::White, CastlingSide::KingSide) => &mut self.white_king_side,
            (Color::White, CastlingSide::QueenSide) => &mut self.white_queen_side,
            (Color::Black, CastlingSide::KingSide) => &mut self.black_king_side,
            (Color::Black, CastlingSide::QueenSide) => &mut self.black_queen_side,
        }
    }

    pub fn has(&self, color: Color, side: CastlingSide) -> bool {
        match (color, side) {
            (Color::White, CastlingSide::KingSide) => self.white_king_side,
            (Color::White, CastlingSide::QueenSide) => self.white_queen_side,
            (Color::Black, CastlingSide::KingSide) => self.black_king_side,
            (Color::Black, CastlingSide::QueenSide) => self.black_queen_side,
        }
    }

    pub fn grant(&mut self, color: Color, side: CastlingSide) {
        *self.slot(color, side) = true;
    }

    pub fn revoke(&mut self, color: Color, side: CastlingSide) {
        *self.slot(color, side) = false;
    }

    pub fn revoke_all(&mut self, color: Color) {
        for side in CastlingSide::ALL {
            self.revoke(color, side);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Optional rules a game may switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    pub castling: bool,
    pub en_passant: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            castling: true,
            en_passant: true,
        }
    }
}

/// How many fields a position is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FenFields {
    /// Placement and side to move only.
    #[default]
    Minimal,
    /// Placement, side to move, castling, en passant and both counters.
    Full,
}

/// The complete mutable state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub turn: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub rules: RuleSet,
    pub fields: FenFields,
}

impl GameState {
    /// Standard starting arrangement for the given dimensions, white to move.
    pub fn standard(dims: Dimensions, rules: RuleSet) -> Self {
        Self {
            board: Board::standard(dims),
            turn: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            rules,
            fields: FenFields::Minimal,
        }
    }

    /// An empty board, white to move, no rights. Starting point for decoding.
    pub fn empty(dims: Dimensions) -> Self {
        Self {
            board: Board::empty(dims),
            turn: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            rules: RuleSet::default(),
            fields: FenFields::Minimal,
        }
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.board.dimensions()
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    /// Home square of the rook for a castling side.
    pub fn rook_home(&self, color: Color, side: CastlingSide) -> Square {
        let dims = self.dimensions();
        let file = match side {
            CastlingSide::KingSide => dims.width() - 1,
            CastlingSide::QueenSide => 0,
        };
        Square::new(file, dims.back_rank(color))
    }

    /// Home square of a colour's king.
    pub fn king_home(&self, color: Color) -> Square {
        let dims = self.dimensions();
        Square::new(dims.king_file(), dims.back_rank(color))
    }

    /// True when a pawn of the side to move stands beside the pawn that just
    /// double-pushed past the en-passant target.
    pub fn en_passant_capturable(&self) -> bool {
        let Some(target) = self.en_passant else {
            return false;
        };
        let Some(pushed) = target.offset(0, -self.turn.forward()) else {
            return false;
        };
        let capturer = Piece::new(Role::Pawn, self.turn);
        [-1, 1].into_iter().any(|df| {
            pushed
                .offset(df, 0)
                .is_some_and(|square| self.piece_at(square) == Some(capturer))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_castling_rights_revoke() {
        let mut rights = CastlingRights::ALL;
        rights.revoke(Color::White, CastlingSide::KingSide);
        assert!(!rights.has(Color::White, CastlingSide::KingSide));
        assert!(rights.has(Color::White, CastlingSide::QueenSide));

        rights.revoke_all(Color::Black);
        assert!(!rights.has(Color::Black, CastlingSide::KingSide));
        assert!(!rights.has(Color::Black, CastlingSide::QueenSide));
        assert!(!rights.is_empty());

        rights.revoke(Color::White, CastlingSide::QueenSide);
        assert!(rights.is_empty());
    }

    #[test]
    fn test_en_passant_capturable() {
        let mut state = GameState::empty(Dimensions::STANDARD);
        state.en_passant = Some("d6".parse().unwrap());
        state.board.set("d5".parse().unwrap(), Some(Piece::new(Role::Pawn, Color::Black)));
        assert!(!state.en_passant_capturable());

        state.board.set("e5".parse().unwrap(), Some(Piece::new(Role::Pawn, Color::White)));
        assert!(state.en_passant_capturable());

        state.turn = Color::Black;
        assert!(!state.en_passant_capturable());
    }

    #[test]
    fn test_home_squares() {
        let state = GameState::standard(Dimensions::STANDARD, RuleSet::default());
        assert_eq!(state.king_home(Color::White).to_string(), "e1");
        assert_eq!(state.king_home(Color::Black).to_string(), "e8");
        assert_eq!(
            state.rook_home(Color::White, CastlingSide::KingSide).to_string(),
            "h1"
        );
        assert_eq!(
            state.rook_home(Color::Black, CastlingSide::QueenSide).to_string(),
            "a8"
        );
    }
}
