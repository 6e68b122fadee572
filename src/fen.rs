//! Position text codec.
//!
//! Reads and writes the compact placement notation: ranks from the highest to
//! the lowest separated by `/`, runs of empty squares as decimal counts, white
//! pieces uppercase and black lowercase, then the side to move. Castling
//! rights, en-passant target and the two move counters may follow.

use std::fmt::Write;

use crate::game_state::{
    CastlingRights, CastlingSide, Color, Dimensions, FenFields, GameState, Piece, Square,
};

/// Error when position text does not describe a position on the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("position text is empty")]
    Empty,
    #[error("expected {expected} ranks, found {found}")]
    RankCount { expected: u8, found: usize },
    #[error("rank {rank} has {found} squares, expected {expected}")]
    RankWidth {
        rank: u16,
        expected: u8,
        found: usize,
    },
    #[error("unknown piece letter '{0}'")]
    UnknownPiece(char),
    #[error("side to move is missing")]
    MissingTurn,
    #[error("side to move must be 'w' or 'b', found '{0}'")]
    BadTurn(String),
    #[error("invalid castling field '{0}'")]
    BadCastling(String),
    #[error("invalid en passant field '{0}'")]
    BadEnPassant(String),
    #[error("invalid move counter '{0}'")]
    BadCounter(String),
    #[error("unexpected trailing field '{0}'")]
    TrailingField(String),
}

/// Parse position text for a board of the given dimensions.
///
/// Fields after the side to move are optional. When absent they default to
/// no castling rights, no en-passant target, halfmove 0 and fullmove 1.
pub fn decode(text: &str, dims: Dimensions) -> Result<GameState, FenError> {
    let mut fields = text.split_whitespace();
    let placement = fields.next().ok_or(FenError::Empty)?;

    let mut state = GameState::empty(dims);
    decode_placement(placement, &mut state)?;

    let turn = fields.next().ok_or(FenError::MissingTurn)?;
    state.turn = match turn {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::BadTurn(other.to_string())),
    };

    if let Some(castling) = fields.next() {
        state.fields = FenFields::Full;
        state.castling = decode_castling(castling)?;
    }
    if let Some(en_passant) = fields.next() {
        state.en_passant = decode_en_passant(en_passant, dims)?;
    }
    if let Some(halfmove) = fields.next() {
        state.halfmove_clock = decode_counter(halfmove)?;
    }
    if let Some(fullmove) = fields.next() {
        state.fullmove_number = decode_counter(fullmove)?;
    }
    if let Some(extra) = fields.next() {
        return Err(FenError::TrailingField(extra.to_string()));
    }

    Ok(state)
}

fn decode_placement(placement: &str, state: &mut GameState) -> Result<(), FenError> {
    let dims = state.dimensions();
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != usize::from(dims.height()) {
        return Err(FenError::RankCount {
            expected: dims.height(),
            found: rows.len(),
        });
    }

    for (row, text) in rows.iter().enumerate() {
        // Rows are written from the top rank down.
        let rank = dims.height() - 1 - row as u8;
        let width = usize::from(dims.width());
        let bad_width = |found: usize| FenError::RankWidth {
            rank: u16::from(rank) + 1,
            expected: dims.width(),
            found,
        };
        let mut file: usize = 0;
        let mut run: usize = 0;
        for c in text.chars() {
            if let Some(digit) = c.to_digit(10) {
                // A run longer than the board is rejected before it can overflow.
                run = run * 10 + digit as usize;
                if file + run > width {
                    return Err(bad_width(file + run));
                }
                continue;
            }
            file += std::mem::take(&mut run);
            let piece = Piece::from_char(c).ok_or(FenError::UnknownPiece(c))?;
            if file < width {
                state.board.set(Square::new(file as u8, rank), Some(piece));
            }
            file += 1;
        }
        file += run;

        if file != width {
            return Err(bad_width(file));
        }
    }
    Ok(())
}

fn decode_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::NONE;
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let (color, side) = match c {
            'K' => (Color::White, CastlingSide::KingSide),
            'Q' => (Color::White, CastlingSide::QueenSide),
            'k' => (Color::Black, CastlingSide::KingSide),
            'q' => (Color::Black, CastlingSide::QueenSide),
            _ => return Err(FenError::BadCastling(field.to_string())),
        };
        rights.grant(color, side);
    }
    Ok(rights)
}

fn decode_en_passant(field: &str, dims: Dimensions) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    match field.parse::<Square>() {
        Ok(square) if dims.contains(square) => Ok(Some(square)),
        _ => Err(FenError::BadEnPassant(field.to_string())),
    }
}

fn decode_counter(field: &str) -> Result<u32, FenError> {
    field
        .parse()
        .map_err(|_| FenError::BadCounter(field.to_string()))
}

/// Write position text for a state.
///
/// The two-field form is used only when reading it back would give the same
/// game: no castling rights and no en-passant capture available. Otherwise,
/// or when the state was read from six fields, all six are written.
pub fn encode(state: &GameState) -> String {
    let dims = state.dimensions();
    let mut out = String::with_capacity(dims.area() + 16);

    for rank in (0..dims.height()).rev() {
        let mut empty = 0;
        for file in 0..dims.width() {
            match state.piece_at(Square::new(file, rank)) {
                Some(piece) => {
                    if empty > 0 {
                        write!(out, "{empty}").ok();
                        empty = 0;
                    }
                    out.push(piece.char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            write!(out, "{empty}").ok();
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(state.turn.char());

    if needs_full_fields(state) {
        out.push(' ');
        out.push_str(&encode_castling(state.castling));
        match state.en_passant {
            Some(square) => {
                write!(out, " {square}").ok();
            }
            None => out.push_str(" -"),
        }
        write!(out, " {} {}", state.halfmove_clock, state.fullmove_number).ok();
    }
    out
}

fn needs_full_fields(state: &GameState) -> bool {
    state.fields == FenFields::Full
        || !state.castling.is_empty()
        || state.en_passant_capturable()
}

fn encode_castling(rights: CastlingRights) -> String {
    if rights.is_empty() {
        return "-".to_string();
    }
    [
        ('K', Color::White, CastlingSide::KingSide),
        ('Q', Color::White, CastlingSide::QueenSide),
        ('k', Color::Black, CastlingSide::KingSide),
        ('q', Color::Black, CastlingSide::QueenSide),
    ]
    .into_iter()
    .filter(|(_, color, side)| rights.has(*color, *side))
    .map(|(c, _, _)| c)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::{Role, RuleSet};
    use test_case::test_case;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

    fn decode8(text: &str) -> Result<GameState, FenError> {
        decode(text, Dimensions::STANDARD)
    }

    #[test]
    fn test_decode_minimal_start() {
        let state = decode8(START).unwrap();
        assert_eq!(state.turn, Color::White);
        assert_eq!(state.castling, CastlingRights::NONE);
        assert_eq!(state.en_passant, None);
        assert_eq!(state.halfmove_clock, 0);
        assert_eq!(state.fullmove_number, 1);
        assert_eq!(state.fields, FenFields::Minimal);
        assert_eq!(
            state.piece_at("e1".parse().unwrap()),
            Some(Piece::new(Role::King, Color::White))
        );
        assert_eq!(
            state.piece_at("d8".parse().unwrap()),
            Some(Piece::new(Role::Queen, Color::Black))
        );
    }

    #[test]
    fn test_decode_full_fields() {
        let state =
            decode8("rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w Kq d6 3 12").unwrap();
        assert_eq!(state.fields, FenFields::Full);
        assert!(state.castling.has(Color::White, CastlingSide::KingSide));
        assert!(!state.castling.has(Color::White, CastlingSide::QueenSide));
        assert!(!state.castling.has(Color::Black, CastlingSide::KingSide));
        assert!(state.castling.has(Color::Black, CastlingSide::QueenSide));
        assert_eq!(state.en_passant, Some("d6".parse().unwrap()));
        assert_eq!(state.halfmove_clock, 3);
        assert_eq!(state.fullmove_number, 12);
    }

    #[test_case(START; "minimal")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"; "full start")]
    #[test_case("rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1"; "en passant")]
    #[test_case("4k3/8/8/8/8/1q6/2n5/K7 w - - 12 40"; "no rights")]
    #[test_case("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b"; "scholar")]
    fn test_round_trip(text: &str) {
        let state = decode8(text).unwrap();
        assert_eq!(encode(&state), text);
    }

    #[test]
    fn test_encode_standard_keeps_castling_rights() {
        let state = GameState::standard(Dimensions::STANDARD, RuleSet::default());
        let text = encode(&state);
        assert_eq!(text, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(decode8(&text).unwrap().castling, CastlingRights::ALL);
    }

    #[test]
    fn test_minimal_state_with_capturable_en_passant_is_written_full() {
        let mut state = decode8("rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w").unwrap();
        state.en_passant = Some("d6".parse().unwrap());
        let text = encode(&state);
        assert_eq!(text, "rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w - d6 0 1");
        assert_eq!(decode8(&text).unwrap().en_passant, state.en_passant);
    }

    #[test]
    fn test_minimal_state_with_idle_en_passant_stays_minimal() {
        let text = "rnbqkbnr/1ppppppp/8/p7/P7/8/1PPPPPPP/RNBQKBNR w";
        let mut state = decode8(text).unwrap();
        state.en_passant = Some("a6".parse().unwrap());
        assert_eq!(encode(&state), text);
    }

    #[test]
    fn test_wide_board_multi_digit_runs() {
        let dims = Dimensions::new(12, 4).unwrap();
        let text = "k11/12/12/11K b";
        let state = decode(text, dims).unwrap();
        assert_eq!(
            state.piece_at(Square::new(11, 0)),
            Some(Piece::new(Role::King, Color::White))
        );
        assert_eq!(encode(&state), text);
    }

    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w", FenError::RankCount { expected: 8, found: 7 }; "too few ranks")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/8 w", FenError::RankCount { expected: 8, found: 9 }; "too many ranks")]
    #[test_case("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w", FenError::RankWidth { rank: 7, expected: 8, found: 7 }; "short rank")]
    #[test_case("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w", FenError::RankWidth { rank: 6, expected: 8, found: 9 }; "long rank")]
    #[test_case("99999999999999999999999/8/8/8/8/8/8/8 w", FenError::RankWidth { rank: 8, expected: 8, found: 9 }; "oversized digit run")]
    #[test_case("k1111111111111111111111111/8/8/8/8/8/8/7K w", FenError::RankWidth { rank: 8, expected: 8, found: 12 }; "digit run after piece")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w", FenError::UnknownPiece('X'); "unknown piece")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR", FenError::MissingTurn; "missing turn")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x", FenError::BadTurn("x".into()); "bad turn")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KX", FenError::BadCastling("KX".into()); "bad castling")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - z9", FenError::BadEnPassant("z9".into()); "bad en passant")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - x", FenError::BadCounter("x".into()); "bad counter")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1 z", FenError::TrailingField("z".into()); "trailing")]
    #[test_case("", FenError::Empty; "empty")]
    fn test_decode_errors(text: &str, expected: FenError) {
        assert_eq!(decode8(text), Err(expected));
    }
}
