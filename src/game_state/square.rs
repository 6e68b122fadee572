use std::fmt;
use std::str::FromStr;

/// Highest number of files a board may have (files are lettered `a`..`z`).
pub const MAX_FILES: u8 = 26;

/// A square on the board as a zero-based (file, rank) pair.
///
/// `Square` itself is not bound to a board size; use
/// [`Dimensions::contains`](super::Dimensions::contains) to check it against one.
/// - file 0 = 'a', rank 0 = '1'
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Self {
        Self { rank, file }
    }

    /// Zero-based file index.
    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Zero-based rank index.
    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Returns the file letter ('a'-'z') of this square.
    #[inline]
    pub fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    /// Offset this square by a file/rank delta, returning `None` below zero.
    ///
    /// The upper bound is the caller's concern.
    pub fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let file = self.file.checked_add_signed(df)?;
        let rank = self.rank.checked_add_signed(dr)?;
        Some(Self::new(file, rank))
    }

    /// True for light squares; a1 is dark.
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.file + self.rank) % 2 == 1
    }

    /// Chebyshev (king-move) distance between two squares.
    pub fn distance(self, other: Square) -> u8 {
        self.file
            .abs_diff(other.file)
            .max(self.rank.abs_diff(other.rank))
    }
}

/// Parse algebraic notation like "e4" or "b12" into a Square.
///
/// # Examples
/// ```
/// # use webchess::game_state::Square;
/// let square: Square = "e4".parse().unwrap();
/// assert_eq!((square.file(), square.rank()), (4, 3));
/// ```
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let file = chars
            .next()
            .ok_or(SquareParseError::Empty)?
            .to_ascii_lowercase();
        if !file.is_ascii_lowercase() {
            return Err(SquareParseError::BadFile(file));
        }

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0')
        {
            return Err(SquareParseError::BadRank(digits.to_string()));
        }
        let rank: u8 = digits
            .parse()
            .map_err(|_| SquareParseError::BadRank(digits.to_string()))?;

        Ok(Square::new(file as u8 - b'a', rank - 1))
    }
}

/// Display square in algebraic notation (e.g., "e4").
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), u16::from(self.rank) + 1)
    }
}

/// Error type for parsing square notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareParseError {
    #[error("square must not be empty")]
    Empty,
    #[error("file must be a letter a-z, found '{0}'")]
    BadFile(char),
    #[error("rank must be a number starting at 1, found '{0}'")]
    BadRank(String),
}
