use std::io::{self, Write};

use crate::BoardDisplay;
use crate::feedback::{BoardFeedback, SquareFeedback};
use crate::game_state::{GameState, Square};

/// Terminal board display.
///
/// Renders the position as a grid of piece letters, with ANSI background
/// colours for the squares that carry [`BoardFeedback`].
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl BoardDisplay for TerminalDisplay {
    type Error = DisplayError;

    fn show(&mut self, state: &GameState, feedback: &BoardFeedback) -> Result<(), Self::Error> {
        render_board(&mut io::stdout(), state, feedback)
    }
}

/// Render the board to any writer, top rank first.
pub(crate) fn render_board(
    w: &mut impl Write,
    state: &GameState,
    feedback: &BoardFeedback,
) -> Result<(), DisplayError> {
    let dims = state.dimensions();
    for rank in (0..dims.height()).rev() {
        write!(w, "{:>3} ", u16::from(rank) + 1)?;
        for file in 0..dims.width() {
            let square = Square::new(file, rank);
            let symbol = state.piece_at(square).map_or('·', |p| p.char());
            write!(w, "{}", format_square(symbol, feedback.get(square)))?;
        }
        writeln!(w)?;
    }
    write!(w, "    ")?;
    for file in 0..dims.width() {
        write!(w, " {} ", Square::new(file, 0).file_char())?;
    }
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

/// Map a feedback variant to an ANSI-coloured cell.
fn format_square(symbol: char, feedback: Option<SquareFeedback>) -> String {
    let background = match feedback {
        Some(SquareFeedback::Destination) => "44",
        Some(SquareFeedback::Capture) => "41",
        Some(SquareFeedback::Origin) => "42",
        Some(SquareFeedback::Check) => "45",
        Some(SquareFeedback::Checker) => "43",
        None => return format!(" {symbol} "),
    };
    format!("\x1b[{background}m {symbol} \x1b[0m")
}
