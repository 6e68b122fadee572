//! Interactive terminal front-end over a [`Session`].

mod display;

use std::io::{self, Write};

use log::debug;

pub use display::{DisplayError, TerminalDisplay};

use crate::BoardDisplay;
use crate::error::Result;
use crate::feedback::{BoardFeedback, FeedbackSource, compute_feedback};
use crate::game_logic::Move;
use crate::game_logic::status::{CheckInfo, check_info};
use crate::game_state::Square;
use crate::session::Session;

const HELP: &str = "Commands: reset [w h] | load <fen> | dump | m <move> | l <square> | \
                    x <square> | status | gens | use <name> | best | play | p | q";

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Reset(u32, u32),
    Load(String),
    Dump,
    Move(String),
    Select(Square),
    Target(Square),
    Status,
    Strategies,
    Use(String),
    Best,
    Play,
    Print,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        return Err(String::new());
    };
    let rest: Vec<&str> = parts.collect();

    let square = |usage: &str| -> std::result::Result<Square, String> {
        match rest.as_slice() {
            [text] => text.parse().map_err(|e| format!("Invalid square: {e}")),
            _ => Err(format!("Usage: {usage}")),
        }
    };

    match name {
        "reset" => match rest.as_slice() {
            [] => Ok(Command::Reset(8, 8)),
            [w, h] => match (w.parse(), h.parse()) {
                (Ok(w), Ok(h)) => Ok(Command::Reset(w, h)),
                _ => Err("Usage: reset [width height]".to_string()),
            },
            _ => Err("Usage: reset [width height]".to_string()),
        },
        "load" if !rest.is_empty() => Ok(Command::Load(rest.join(" "))),
        "load" => Err("Usage: load <fen>".to_string()),
        "dump" => Ok(Command::Dump),
        "m" => match rest.as_slice() {
            [mv] => Ok(Command::Move(mv.to_string())),
            _ => Err("Usage: m <move>".to_string()),
        },
        "l" => square("l <square>").map(Command::Select),
        "x" => square("x <square>").map(Command::Target),
        "status" => Ok(Command::Status),
        "gens" => Ok(Command::Strategies),
        "use" => match rest.as_slice() {
            [strategy] => Ok(Command::Use(strategy.to_string())),
            _ => Err("Usage: use <name>".to_string()),
        },
        "best" => Ok(Command::Best),
        "play" => Ok(Command::Play),
        "p" => Ok(Command::Print),
        "q" => Ok(Command::Quit),
        _ => Err("Unknown command".to_string()),
    }
}

/// Highlights requested by the player plus the check state.
#[derive(Debug, Default)]
struct Selection {
    moves: Vec<Move>,
    selected: Option<Square>,
    target: Option<Square>,
    check: Option<CheckInfo>,
}

impl FeedbackSource for Selection {
    fn legal_moves(&self) -> &[Move] {
        &self.moves
    }

    fn selected(&self) -> Option<Square> {
        self.selected
    }

    fn target(&self) -> Option<Square> {
        self.target
    }

    fn check(&self) -> Option<&CheckInfo> {
        self.check.as_ref()
    }
}

/// Session plus the squares the player has highlighted.
struct Terminal {
    session: Session,
    selected: Option<Square>,
    target: Option<Square>,
}

impl Terminal {
    fn feedback(&self) -> BoardFeedback {
        let selection = Selection {
            moves: self.session.legal_moves(),
            selected: self.selected,
            target: self.target,
            check: check_info(self.session.state()).ok().flatten(),
        };
        compute_feedback(&selection)
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.target = None;
    }

    /// Run one command, returning the message to print under the board.
    fn execute(&mut self, command: Command) -> Result<String> {
        Ok(match command {
            Command::Reset(w, h) => {
                self.session.reset(w, h)?;
                self.clear_selection();
                format!("Reset to a {w}x{h} board")
            }
            Command::Load(text) => {
                self.session.load(&text)?;
                self.clear_selection();
                "Position loaded".to_string()
            }
            Command::Dump => self.session.dump(),
            Command::Move(text) => {
                let mv = self.session.apply_notated(&text)?;
                self.clear_selection();
                format!("Played {mv}")
            }
            Command::Select(square) => {
                self.selected = Some(square);
                let moves: Vec<String> = self
                    .session
                    .legal_moves_from(square)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                moves.join(",")
            }
            Command::Target(square) => {
                self.target = Some(square);
                format!("Capturing on {square}")
            }
            Command::Status => self.session.status()?.to_string(),
            Command::Strategies => {
                let strategies = self.session.strategies();
                format!(
                    "{} (active: {})",
                    strategies.list_names().join(" "),
                    strategies.active_name()
                )
            }
            Command::Use(name) => {
                self.session.strategies_mut().select(&name)?;
                format!("Using {name}")
            }
            Command::Best => self.session.best_move()?.to_string(),
            Command::Play => {
                let mv = self.session.play_best_move()?;
                self.clear_selection();
                format!("Engine played {mv}")
            }
            Command::Print | Command::Quit => String::new(),
        })
    }
}

/// Clears the screen and moves cursor to top-left.
#[inline]
fn clear_screen() {
    print!("\x1B[2J\x1B[H");
}

/// Runs the interactive terminal until `q` or end of input.
pub fn run_interactive_terminal(session: Session) {
    let mut terminal = Terminal {
        session,
        selected: None,
        target: None,
    };
    let mut display = TerminalDisplay::new();

    clear_screen();
    draw_interface(&mut display, &terminal);

    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            eprintln!("Failed to flush stdout: {}", e);
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }

        let command = match parse_command(&input) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(message) => {
                if !message.is_empty() {
                    println!("{message}");
                }
                continue;
            }
        };
        debug!("Terminal command {:?}", command);

        let message = terminal.execute(command);
        clear_screen();
        draw_interface(&mut display, &terminal);
        match message {
            Ok(text) if text.is_empty() => {}
            Ok(text) => println!("\n{text}"),
            Err(e) => println!("\n❌ {e}"),
        }
    }
}

/// Draws help text, side to move, and the board with highlights.
fn draw_interface(display: &mut TerminalDisplay, terminal: &Terminal) {
    println!("♟️  webchess");
    println!();
    println!("{HELP}");
    println!();

    let state = terminal.session.state();
    if let Err(e) = display.show(state, &terminal.feedback()) {
        eprintln!("Failed to draw board: {}", e);
    }
    println!();
    println!(
        "{} to move | strategy: {}",
        state.turn,
        terminal.session.strategies().active_name()
    );
}
