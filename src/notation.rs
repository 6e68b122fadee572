//! Coordinate move notation: source square, destination square and an
//! optional promotion letter, e.g. `e2e4` or `g7h8q`.

use std::fmt;
use std::str::FromStr;

use crate::game_state::{Role, Square, SquareParseError};

/// A parsed move request, not yet checked against any position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

/// Error when move text is not in coordinate notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("move must be two squares and an optional promotion letter, found '{0}'")]
    Malformed(String),
    #[error("invalid square in move: {0}")]
    Square(#[from] SquareParseError),
    #[error("invalid promotion letter '{0}'")]
    Promotion(char),
}

impl FromStr for UciMove {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || s.len() < 4 {
            return Err(NotationError::Malformed(s.to_string()));
        }

        // A square is a letter followed by digits, so the destination starts
        // at the second letter.
        let split = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map(|(i, _)| i)
            .ok_or_else(|| NotationError::Malformed(s.to_string()))?;
        let (from, rest) = s.split_at(split);

        let (to, promotion) = match rest.char_indices().skip(1).find(|(_, c)| c.is_ascii_alphabetic()) {
            Some((i, _)) if i == rest.len() - 1 => {
                let (to, letter) = rest.split_at(i);
                (to, letter.chars().next())
            }
            Some(_) => return Err(NotationError::Malformed(s.to_string())),
            None => (rest, None),
        };

        let promotion = promotion
            .map(|c| match Role::from_char(c) {
                Some(role) if Role::PROMOTIONS.contains(&role) => Ok(role),
                _ => Err(NotationError::Promotion(c)),
            })
            .transpose()?;

        Ok(UciMove {
            from: from.parse()?,
            to: to.parse()?,
            promotion,
        })
    }
}

/// Display as coordinate notation with a lowercase promotion letter.
impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}
