use super::Strategy;
use crate::error::{Error, Result};
use crate::game_logic::Move;
use crate::game_state::{Color, GameState, Square};

/// Prefers moves that start and end on its own side's favourite shade.
///
/// White favours light squares and Black dark ones. A move scores two points
/// for leaving a favourite square and one for landing on one. Equal scores go
/// to the longer move, then to the move generated first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FavColourStrategy;

fn is_favourite(color: Color, square: Square) -> bool {
    square.is_light() == (color == Color::White)
}

impl Strategy for FavColourStrategy {
    fn name(&self) -> &str {
        "fav_colour"
    }

    fn propose(&mut self, state: &GameState, legal_moves: &[Move]) -> Result<Move> {
        let key = |mv: &Move| {
            let score = 2 * u8::from(is_favourite(state.turn, mv.from()))
                + u8::from(is_favourite(state.turn, mv.to()));
            (score, mv.from().distance(mv.to()))
        };

        // First maximum wins.
        legal_moves
            .iter()
            .fold(None::<(&Move, (u8, u8))>, |best, mv| {
                let k = key(mv);
                match best {
                    Some((_, best_key)) if best_key >= k => best,
                    _ => Some((mv, k)),
                }
            })
            .map(|(mv, _)| *mv)
            .ok_or(Error::NoLegalMoves)
    }
}
