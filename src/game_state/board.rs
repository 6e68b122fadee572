use super::{Color, MAX_FILES, Piece, Role, Square};

/// Smallest width that holds the full back rank.
pub const MIN_WIDTH: u8 = 8;
/// Smallest height that holds both back ranks and both pawn ranks.
pub const MIN_HEIGHT: u8 = 4;
pub const MAX_HEIGHT: u8 = 26;

/// Board size in files and ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: u8,
    height: u8,
}

impl Dimensions {
    /// The orthodox 8×8 board.
    pub const STANDARD: Dimensions = Dimensions {
        width: 8,
        height: 8,
    };

    /// Creates dimensions if a standard arrangement fits on them.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let width = u8::try_from(width).ok()?;
        let height = u8::try_from(height).ok()?;
        if (MIN_WIDTH..=MAX_FILES).contains(&width) && (MIN_HEIGHT..=MAX_HEIGHT).contains(&height)
        {
            Some(Self { width, height })
        } else {
            None
        }
    }

    #[inline]
    pub const fn width(self) -> u8 {
        self.width
    }

    #[inline]
    pub const fn height(self) -> u8 {
        self.height
    }

    #[inline]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub const fn contains(self, square: Square) -> bool {
        square.file() < self.width && square.rank() < self.height
    }

    /// Rank holding the given colour's pieces at the start.
    #[inline]
    pub const fn back_rank(self, color: Color) -> u8 {
        match color {
            Color::White => 0,
            Color::Black => self.height - 1,
        }
    }

    /// Rank the given colour's pawns start on (and double-push from).
    #[inline]
    pub const fn pawn_rank(self, color: Color) -> u8 {
        match color {
            Color::White => 1,
            Color::Black => self.height - 2,
        }
    }

    /// File the king starts on.
    #[inline]
    pub const fn king_file(self) -> u8 {
        self.width / 2
    }

    /// File the queen starts on.
    #[inline]
    pub const fn queen_file(self) -> u8 {
        self.width / 2 - 1
    }

    fn index(self, square: Square) -> usize {
        square.rank() as usize * self.width as usize + square.file() as usize
    }

    /// All squares in index order: a1, b1, .., a2, ..
    pub fn squares(self) -> impl Iterator<Item = Square> {
        (0..self.height).flat_map(move |rank| (0..self.width).map(move |file| Square::new(file, rank)))
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Piece placement on a board of fixed dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dims: Dimensions,
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// An empty board.
    pub fn empty(dims: Dimensions) -> Self {
        Self {
            dims,
            squares: vec![None; dims.area()],
        }
    }

    /// The standard arrangement scaled to `dims`.
    ///
    /// Rooks, knights and bishops mirror in from the corners, queen and king
    /// take the two central files and any files left over stay empty.
    pub fn standard(dims: Dimensions) -> Self {
        let mut board = Self::empty(dims);
        let width = dims.width();
        let back_rank_role = |file: u8| match file {
            f if f == 0 || f == width - 1 => Some(Role::Rook),
            f if f == 1 || f == width - 2 => Some(Role::Knight),
            f if f == 2 || f == width - 3 => Some(Role::Bishop),
            f if f == dims.queen_file() => Some(Role::Queen),
            f if f == dims.king_file() => Some(Role::King),
            _ => None,
        };

        for color in [Color::White, Color::Black] {
            for file in 0..width {
                if let Some(role) = back_rank_role(file) {
                    board.set(
                        Square::new(file, dims.back_rank(color)),
                        Some(Piece::new(role, color)),
                    );
                }
                board.set(
                    Square::new(file, dims.pawn_rank(color)),
                    Some(Piece::new(Role::Pawn, color)),
                );
            }
        }
        board
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Get the piece at a given square, if any. Off-board squares are empty.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if self.dims.contains(square) {
            self.squares[self.dims.index(square)]
        } else {
            None
        }
    }

    /// Place or clear a square. Off-board squares are ignored.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if self.dims.contains(square) {
            let idx = self.dims.index(square);
            self.squares[idx] = piece;
        }
    }

    /// Remove and return the piece on a square.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.piece_at(square);
        self.set(square, None);
        piece
    }

    /// Occupied squares in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.dims
            .squares()
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Squares holding exactly this piece.
    pub fn find(&self, piece: Piece) -> impl Iterator<Item = Square> + '_ {
        self.pieces()
            .filter(move |(_, p)| *p == piece)
            .map(|(sq, _)| sq)
    }

    /// Square of the given colour's king, if it has exactly one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let mut kings = self.find(Piece::new(Role::King, color));
        let first = kings.next()?;
        kings.next().is_none().then_some(first)
    }
}
