//! Process-wide game behind plain-value functions, for hosts that cannot
//! hold a [`Session`] themselves.
//!
//! Calls are serialised by a lock, but the functions are not meant to be
//! interleaved by concurrent callers: each one observes whatever position the
//! previous call left behind. Failures return `false`, an empty string or `-1`
//! and record an [`ErrorKind`] readable through [`last_error`].

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use crate::error::{ErrorKind, Result};
use crate::game_state::Square;
use crate::notation::NotationError;
use crate::session::{GameConfig, Session};
use crate::strategy::StrategyRegistry;

#[derive(Debug, Default)]
struct Boundary {
    session: Option<Session>,
    /// Strategies chosen before the first reset.
    pending: Option<StrategyRegistry>,
    last_error: Option<ErrorKind>,
}

impl Boundary {
    fn strategies_mut(&mut self) -> &mut StrategyRegistry {
        match self.session {
            Some(ref mut session) => session.strategies_mut(),
            None => self.pending.get_or_insert_with(StrategyRegistry::default),
        }
    }

    fn record<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(e) => {
                self.last_error = Some(e.kind());
                None
            }
        }
    }

    fn with_session<T>(&mut self, f: impl FnOnce(&mut Session) -> Result<T>) -> Option<T> {
        match self.session.as_mut() {
            Some(session) => {
                let result = f(session);
                self.record(result)
            }
            None => {
                self.last_error = Some(ErrorKind::PreconditionViolation);
                None
            }
        }
    }
}

static BOUNDARY: LazyLock<Mutex<Boundary>> = LazyLock::new(|| Mutex::new(Boundary::default()));

fn boundary() -> MutexGuard<'static, Boundary> {
    BOUNDARY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Start a new game with the standard arrangement on a `width` x `height`
/// board. Strategy selection survives the reset.
pub fn reset(width: u32, height: u32) -> bool {
    let mut b = boundary();
    if let Some(session) = b.session.as_mut() {
        let result = session.reset(width, height);
        return b.record(result).is_some();
    }

    let strategies = b.pending.take().unwrap_or_default();
    let mut session = Session::with_strategies(GameConfig::default(), strategies);
    let result = session.reset(width, height);
    if b.record(result).is_some() {
        b.session = Some(session);
        true
    } else {
        b.pending = Some(session.into_strategies());
        false
    }
}

pub fn load_position(text: &str) -> bool {
    boundary().with_session(|s| s.load(text)).is_some()
}

/// Current position text, empty when no game has been started.
pub fn dump_position() -> String {
    boundary()
        .with_session(|s| Ok(s.dump()))
        .unwrap_or_default()
}

pub fn apply_move(notation: &str) -> bool {
    boundary()
        .with_session(|s| s.apply_notated(notation))
        .is_some()
}

/// Comma-separated legal moves from `square`; empty for an empty square,
/// a malformed square or an opposing piece.
pub fn legal_moves_for(square: &str) -> String {
    boundary()
        .with_session(|s| {
            let from = square.trim().parse::<Square>().map_err(NotationError::from)?;
            Ok(s.legal_moves_from(from)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","))
        })
        .unwrap_or_default()
}

/// Status code of the current position (`0..=3`), `-1` on failure.
pub fn status() -> i32 {
    boundary()
        .with_session(|s| s.status())
        .map_or(-1, |status| i32::from(status.code()))
}

/// Space-separated names of the registered strategies.
pub fn list_strategies() -> String {
    boundary().strategies_mut().list_names().join(" ")
}

pub fn select_strategy(name: &str) -> bool {
    let mut b = boundary();
    let result = b.strategies_mut().select(name.trim());
    b.record(result).is_some()
}

pub fn active_strategy_name() -> String {
    boundary().strategies_mut().active_name().to_string()
}

/// Move the active strategy would play, empty when there is none.
pub fn best_move() -> String {
    boundary()
        .with_session(|s| s.best_move())
        .map(|mv| mv.to_string())
        .unwrap_or_default()
}

/// Classification of the most recent failed call, cleared by a success.
pub fn last_error() -> Option<ErrorKind> {
    boundary().last_error
}

/// Copy `text` into a caller-provided byte buffer as a NUL-terminated string.
///
/// At most `buf.len() - 1` bytes are copied, cut back to a character
/// boundary. Returns the number of bytes written before the terminator.
pub fn write_truncated(text: &str, buf: &mut [u8]) -> usize {
    let Some(capacity) = buf.len().checked_sub(1) else {
        return 0;
    };
    let mut len = text.len().min(capacity);
    while !text.is_char_boundary(len) {
        len -= 1;
    }
    buf[..len].copy_from_slice(&text.as_bytes()[..len]);
    buf[len] = 0;
    len
}
