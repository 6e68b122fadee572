use crate::game_logic::Move;
use crate::game_logic::status::CheckInfo;
use crate::game_state::Square;

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// Legal destination of the selected piece
    Destination,
    /// Moving here captures an opponent piece
    Capture,
    /// Selected piece, or a piece that can make the highlighted capture
    Origin,
    /// King of the side to move while it is in check
    Check,
    /// Piece giving check
    Checker,
}

/// Squares to highlight and how, for one rendering of the board.
///
/// Built by [`compute_feedback`] and consumed by the terminal renderer. A
/// square holds at most one feedback; the first one set wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Square, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    #[inline]
    pub fn squares(&self) -> &[(Square, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, square: Square) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == square)
            .map(|(_, feedback)| *feedback)
    }

    /// Highlight `square` unless it already carries feedback.
    pub fn set(&mut self, square: Square, feedback: SquareFeedback) {
        if self.get(square).is_none() {
            self.squares.push((square, feedback));
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

impl FromIterator<(Square, SquareFeedback)> for BoardFeedback {
    fn from_iter<I: IntoIterator<Item = (Square, SquareFeedback)>>(iter: I) -> Self {
        let mut feedback = BoardFeedback::new();
        for (square, kind) in iter {
            feedback.set(square, kind);
        }
        feedback
    }
}

/// What the feedback computation needs to know about the game.
pub trait FeedbackSource {
    /// All legal moves in the current position
    fn legal_moves(&self) -> &[Move];

    /// Square the player selected to move from
    fn selected(&self) -> Option<Square>;

    /// Opponent square the player wants to capture on
    fn target(&self) -> Option<Square>;

    /// Check details for the side to move
    fn check(&self) -> Option<&CheckInfo>;
}

/// Compute visual feedback for the current selection.
///
/// - Piece selected: its legal destinations
/// - Target chosen: the pieces that can capture there
/// - Both: where the selected piece lands to capture the target
///
/// A king in check and its checkers are always highlighted.
pub fn compute_feedback(source: &impl FeedbackSource) -> BoardFeedback {
    let moves = source.legal_moves();
    let mut feedback = match (source.target(), source.selected()) {
        (None, Some(from)) => show_destinations_for(moves, from),
        (Some(to), None) => show_capture_options(moves, to),
        (Some(to), Some(from)) => show_capture_completion(moves, from, to),
        (None, None) => BoardFeedback::default(),
    };

    if let Some(check) = source.check() {
        feedback.set(check.king_square, SquareFeedback::Check);
        for &checker in &check.checkers {
            feedback.set(checker, SquareFeedback::Checker);
        }
    }
    feedback
}

fn show_destinations_for(legal_moves: &[Move], from: Square) -> BoardFeedback {
    std::iter::once((from, SquareFeedback::Origin))
        .chain(
            legal_moves
                .iter()
                .filter(|mv| mv.from() == from)
                .map(classify_move),
        )
        .collect()
}

fn show_capture_options(legal_moves: &[Move], target: Square) -> BoardFeedback {
    legal_moves
        .iter()
        .filter(|mv| mv.capture_square() == Some(target))
        .flat_map(|mv| {
            [
                (mv.to(), SquareFeedback::Destination),
                (mv.from(), SquareFeedback::Origin),
            ]
        })
        .collect()
}

fn show_capture_completion(legal_moves: &[Move], from: Square, target: Square) -> BoardFeedback {
    std::iter::once((from, SquareFeedback::Origin))
        .chain(
            legal_moves
                .iter()
                .filter(|mv| mv.from() == from && mv.capture_square() == Some(target))
                .map(|mv| (mv.to(), SquareFeedback::Destination)),
        )
        .collect()
}

fn classify_move(mv: &Move) -> (Square, SquareFeedback) {
    if mv.is_capture() {
        (mv.to(), SquareFeedback::Capture)
    } else {
        (mv.to(), SquareFeedback::Destination)
    }
}
