use log::{debug, warn};

use super::attacks::is_attacked;
use super::{Move, MoveKind};
use crate::error::{Error, Result};
use crate::game_state::{CastlingSide, Color, Dimensions, GameState, Piece, Role, Square};
use crate::notation::UciMove;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Step from a square, staying on the board.
#[inline]
fn step(dims: Dimensions, from: Square, df: i8, dr: i8) -> Option<Square> {
    from.offset(df, dr).filter(|sq| dims.contains(*sq))
}

/// All legal moves for the side to move.
///
/// Moves are ordered by source square (a1, b1, .., h8), then by the fixed
/// direction order of each piece type.
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (from, piece) in state.board.pieces() {
        if piece.color == state.turn {
            pseudo_legal_from(state, from, piece, &mut moves);
        }
    }
    moves.retain(|mv| leaves_king_safe(state, mv));
    moves
}

/// Legal moves of the piece standing on `from`.
///
/// Empty when the square is empty or holds a piece of the side not to move.
pub fn legal_moves_from(state: &GameState, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = state.piece_at(from)
        && piece.color == state.turn
    {
        pseudo_legal_from(state, from, piece, &mut moves);
    }
    moves.retain(|mv| leaves_king_safe(state, mv));
    moves
}

/// Play a requested move if it is legal, returning the move played.
///
/// The state is left untouched when the request is not a legal move.
pub fn apply(state: &mut GameState, request: &UciMove) -> Result<Move> {
    let mv = legal_moves_from(state, request.from)
        .into_iter()
        .find(|mv| mv.matches(request))
        .ok_or_else(|| {
            warn!("Illegal move {} for {}", request, state.turn);
            Error::InvalidMove(*request)
        })?;
    debug!("{} plays {}", state.turn, mv);
    play_unchecked(state, &mv);
    Ok(mv)
}

/// Play a generated move without checking legality.
pub(crate) fn play_unchecked(state: &mut GameState, mv: &Move) {
    let color = state.turn;
    let Some(piece) = state.board.take(mv.from()) else {
        return;
    };

    let captured = mv
        .capture_square()
        .and_then(|sq| state.board.take(sq).map(|p| (sq, p)));
    if let Some((sq, captured)) = captured
        && captured.role == Role::Rook
    {
        revoke_rook_right(state, captured.color, sq);
    }

    let role = mv.promotion().unwrap_or(piece.role);
    state.board.set(mv.to(), Some(Piece::new(role, color)));

    if let MoveKind::Castle(side) = mv.kind() {
        let rook_from = state.rook_home(color, side);
        let rook_to = Square::new((mv.from().file() + mv.to().file()) / 2, mv.from().rank());
        let rook = state.board.take(rook_from);
        state.board.set(rook_to, rook);
    }

    match piece.role {
        Role::King => state.castling.revoke_all(color),
        Role::Rook => revoke_rook_right(state, color, mv.from()),
        _ => {}
    }

    state.en_passant = match mv.kind() {
        MoveKind::DoublePush if state.rules.en_passant => Some(Square::new(
            mv.from().file(),
            (mv.from().rank() + mv.to().rank()) / 2,
        )),
        _ => None,
    };

    if piece.role == Role::Pawn || captured.is_some() {
        state.halfmove_clock = 0;
    } else {
        state.halfmove_clock = state.halfmove_clock.saturating_add(1);
    }
    if color == Color::Black {
        state.fullmove_number = state.fullmove_number.saturating_add(1);
    }
    state.turn = color.other();
}

/// A rook leaving or captured on its home square loses that side's right.
fn revoke_rook_right(state: &mut GameState, color: Color, square: Square) {
    for side in CastlingSide::ALL {
        if state.rook_home(color, side) == square {
            state.castling.revoke(color, side);
        }
    }
}

/// Whether the mover's king is safe after the move, checked on a scratch copy.
fn leaves_king_safe(state: &GameState, mv: &Move) -> bool {
    let mover = state.turn;
    let mut scratch = state.clone();
    play_unchecked(&mut scratch, mv);
    scratch
        .board
        .king_square(mover)
        .is_some_and(|king| !is_attacked(&scratch.board, king, mover.other()))
}

fn pseudo_legal_from(state: &GameState, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    match piece.role {
        Role::Pawn => pawn_moves(state, from, piece.color, moves),
        Role::Knight => leaper_moves(state, from, piece.color, &KNIGHT_OFFSETS, moves),
        Role::Bishop => slider_moves(state, from, piece.color, &BISHOP_DIRECTIONS, moves),
        Role::Rook => slider_moves(state, from, piece.color, &ROOK_DIRECTIONS, moves),
        Role::Queen => {
            slider_moves(state, from, piece.color, &ROOK_DIRECTIONS, moves);
            slider_moves(state, from, piece.color, &BISHOP_DIRECTIONS, moves);
        }
        Role::King => {
            leaper_moves(state, from, piece.color, &KING_OFFSETS, moves);
            castling_moves(state, from, piece.color, moves);
        }
    }
}

fn leaper_moves(
    state: &GameState,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    let dims = state.dimensions();
    for &(df, dr) in offsets {
        let Some(to) = step(dims, from, df, dr) else {
            continue;
        };
        match state.piece_at(to) {
            None => moves.push(Move::new(from, to, MoveKind::Quiet)),
            Some(target) if target.color != color => {
                moves.push(Move::new(from, to, MoveKind::Capture))
            }
            Some(_) => {}
        }
    }
}

/// Cast along each direction until the edge or the first piece, including
/// that piece when it can be captured.
fn slider_moves(
    state: &GameState,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    let dims = state.dimensions();
    for &(df, dr) in directions {
        let mut cur = from;
        while let Some(to) = step(dims, cur, df, dr) {
            match state.piece_at(to) {
                None => moves.push(Move::new(from, to, MoveKind::Quiet)),
                Some(target) => {
                    if target.color != color {
                        moves.push(Move::new(from, to, MoveKind::Capture));
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}

fn pawn_moves(state: &GameState, from: Square, color: Color, moves: &mut Vec<Move>) {
    let dims = state.dimensions();
    let dir = color.forward();
    let last_rank = dims.back_rank(color.other());

    if let Some(one) = step(dims, from, 0, dir)
        && state.piece_at(one).is_none()
    {
        push_pawn_move(moves, Move::new(from, one, MoveKind::Quiet), last_rank);

        if from.rank() == dims.pawn_rank(color)
            && let Some(two) = step(dims, one, 0, dir)
            && two.rank() != last_rank
            && state.piece_at(two).is_none()
        {
            moves.push(Move::new(from, two, MoveKind::DoublePush));
        }
    }

    for df in [-1, 1] {
        let Some(to) = step(dims, from, df, dir) else {
            continue;
        };
        match state.piece_at(to) {
            Some(target) if target.color != color => {
                push_pawn_move(moves, Move::new(from, to, MoveKind::Capture), last_rank);
            }
            None if is_en_passant_target(state, from, to, color) => {
                moves.push(Move::new(from, to, MoveKind::EnPassant));
            }
            _ => {}
        }
    }
}

/// `to` is the en-passant target and an opposing pawn stands beside `from`.
fn is_en_passant_target(state: &GameState, from: Square, to: Square, color: Color) -> bool {
    state.rules.en_passant
        && state.en_passant == Some(to)
        && state.piece_at(Square::new(to.file(), from.rank()))
            == Some(Piece::new(Role::Pawn, color.other()))
}

/// Push a pawn move, expanding it into every promotion on the last rank.
fn push_pawn_move(moves: &mut Vec<Move>, mv: Move, last_rank: u8) {
    if mv.to().rank() == last_rank {
        moves.extend(Role::PROMOTIONS.map(|role| mv.with_promotion(role)));
    } else {
        moves.push(mv);
    }
}

/// Castling: the right is held, king and rook stand on their home squares,
/// everything between them is empty, and the king neither starts on, crosses
/// nor lands on an attacked square.
fn castling_moves(state: &GameState, from: Square, color: Color, moves: &mut Vec<Move>) {
    if !state.rules.castling || from != state.king_home(color) {
        return;
    }
    let dims = state.dimensions();
    let board = &state.board;
    let enemy = color.other();

    if is_attacked(board, from, enemy) {
        return;
    }

    for side in CastlingSide::ALL {
        if !state.castling.has(color, side) {
            continue;
        }
        let rook = state.rook_home(color, side);
        if board.piece_at(rook) != Some(Piece::new(Role::Rook, color)) {
            continue;
        }

        let (lo, hi) = (from.file().min(rook.file()), from.file().max(rook.file()));
        if (lo + 1..hi).any(|file| board.piece_at(Square::new(file, from.rank())).is_some()) {
            continue;
        }

        let dir = match side {
            CastlingSide::KingSide => 1,
            CastlingSide::QueenSide => -1,
        };
        let Some(cross) = step(dims, from, dir, 0) else {
            continue;
        };
        let Some(dest) = step(dims, cross, dir, 0) else {
            continue;
        };
        if is_attacked(board, cross, enemy) || is_attacked(board, dest, enemy) {
            continue;
        }
        moves.push(Move::new(from, dest, MoveKind::Castle(side)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;
    use crate::game_state::RuleSet;
    use test_case::test_case;

    fn state(text: &str) -> GameState {
        fen::decode(text, Dimensions::STANDARD).expect("valid position")
    }

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    fn uci(s: &str) -> UciMove {
        s.parse().expect("valid move notation")
    }

    fn notated(moves: &[Move]) -> Vec<String> {
        let mut out: Vec<String> = moves.iter().map(Move::to_string).collect();
        out.sort();
        out
    }

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_start_position_has_twenty_moves() {
        assert_eq!(legal_moves(&state(START)).len(), 20);
    }

    #[test_case("a2", &["a2a3", "a2a4"])]
    #[test_case("b1", &["b1a3", "b1c3"])]
    #[test_case("e1", &[]; "blocked king")]
    #[test_case("e4", &[]; "empty square")]
    #[test_case("b7", &[]; "opponent piece")]
    fn test_moves_from_start(square: &str, expected: &[&str]) {
        assert_eq!(notated(&legal_moves_from(&state(START), sq(square))), expected);
    }

    #[test]
    fn test_black_pawn_from_start() {
        let mut s = state(START);
        s.turn = Color::Black;
        assert_eq!(notated(&legal_moves_from(&s, sq("b7"))), ["b7b5", "b7b6"]);
    }

    #[test]
    fn test_generation_order_is_stable() {
        let s = state("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 1");
        assert_eq!(legal_moves(&s), legal_moves(&s));
    }

    #[test]
    fn test_pinned_piece_cannot_leave_line() {
        // Knight on e2 is pinned to the king by the rook on e8.
        let s = state("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(legal_moves_from(&s, sq("e2")).is_empty());
    }

    #[test]
    fn test_double_check_only_king_moves() {
        // Rook e8 and bishop b4 both check the king on e1.
        let s = state("4r1k1/8/8/8/1b6/8/8/4K1NR w K - 0 1");
        let moves = legal_moves(&s);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.from() == sq("e1")));
    }

    #[test]
    fn test_pawn_blocked_cannot_double_push() {
        let s = state("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(legal_moves_from(&s, sq("e2")).is_empty());
        let s = state("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(notated(&legal_moves_from(&s, sq("e2"))), ["e2e3"]);
    }

    #[test]
    fn test_en_passant_capture_removes_pawn() {
        let mut s = state("rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1");
        let mv = apply(&mut s, &uci("e5d6")).unwrap();
        assert!(mv.is_en_passant());
        assert_eq!(s.piece_at(sq("d5")), None);
        assert_eq!(s.piece_at(sq("d6")), Some(Piece::new(Role::Pawn, Color::White)));
        assert_eq!(s.halfmove_clock, 0);
    }

    #[test]
    fn test_en_passant_needs_target_square() {
        let s = state("rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(notated(&legal_moves_from(&s, sq("e5"))), ["e5e6"]);
    }

    #[test]
    fn test_en_passant_disabled_by_rules() {
        let mut s = state("rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1");
        s.rules = RuleSet {
            en_passant: false,
            ..RuleSet::default()
        };
        assert_eq!(notated(&legal_moves_from(&s, sq("e5"))), ["e5e6"]);
    }

    #[test]
    fn test_en_passant_exposing_king_is_illegal() {
        // Capturing en passant would open the fifth rank to the rook on h5.
        let s = state("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        assert_eq!(notated(&legal_moves_from(&s, sq("e5"))), ["e5e6"]);
    }

    #[test]
    fn test_double_push_sets_en_passant_target() {
        let mut s = state(START);
        apply(&mut s, &uci("e2e4")).unwrap();
        assert_eq!(s.en_passant, Some(sq("e3")));
        apply(&mut s, &uci("g8f6")).unwrap();
        assert_eq!(s.en_passant, None);
    }

    #[test]
    fn test_promotion_enumerates_four_roles() {
        let s = state("rnbqkbnr/ppp3Pp/8/3p4/8/8/PPP1PPPP/RNBQKBNR w");
        assert_eq!(
            notated(&legal_moves_from(&s, sq("g7"))),
            ["g7f8b", "g7f8n", "g7f8q", "g7f8r", "g7h8b", "g7h8n", "g7h8q", "g7h8r"]
        );
    }

    #[test]
    fn test_promotion_requires_piece_letter() {
        let mut s = state("rnbqkbnr/ppp3Pp/8/3p4/8/8/PPP1PPPP/RNBQKBNR w");
        let before = s.clone();
        assert_eq!(
            apply(&mut s, &uci("g7h8")),
            Err(Error::InvalidMove(uci("g7h8")))
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_castling_both_sides() {
        let s = state("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert_eq!(
            notated(&legal_moves_from(&s, sq("e1"))),
            ["e1c1", "e1d1", "e1f1", "e1g1"]
        );
    }

    #[test]
    fn test_castling_moves_rook_and_revokes_rights() {
        let mut s = state("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        let mv = apply(&mut s, &uci("e1g1")).unwrap();
        assert!(mv.is_castle());
        assert_eq!(s.piece_at(sq("g1")), Some(Piece::new(Role::King, Color::White)));
        assert_eq!(s.piece_at(sq("f1")), Some(Piece::new(Role::Rook, Color::White)));
        assert_eq!(s.piece_at(sq("h1")), None);
        assert!(!s.castling.has(Color::White, CastlingSide::KingSide));
        assert!(!s.castling.has(Color::White, CastlingSide::QueenSide));
        assert!(s.castling.has(Color::Black, CastlingSide::QueenSide));

        apply(&mut s, &uci("e8c8")).unwrap();
        assert_eq!(s.piece_at(sq("c8")), Some(Piece::new(Role::King, Color::Black)));
        assert_eq!(s.piece_at(sq("d8")), Some(Piece::new(Role::Rook, Color::Black)));
        assert!(s.castling.is_empty());
    }

    #[test_case("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w - - 0 1", 0; "no rights")]
    #[test_case("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R2QK1NR w KQkq - 0 1", 0; "path blocked")]
    #[test_case("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/1R2K2R w KQkq - 0 1", 1; "rook left home")]
    #[test_case("r3k2r/pppp1ppp/8/8/8/8/PPPP1PPP/R3K2R w KQkq - 0 1", 2; "open e file")]
    fn test_castling_count(text: &str, expected: usize) {
        let s = state(text);
        let castles = legal_moves_from(&s, sq("e1"))
            .into_iter()
            .filter(Move::is_castle)
            .count();
        assert_eq!(castles, expected);
    }

    #[test]
    fn test_castling_out_of_check_is_illegal() {
        let s = state("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!legal_moves(&s).iter().any(Move::is_castle));
    }

    #[test]
    fn test_castling_through_attack_is_illegal() {
        // Rook on f8 covers f1; queen-side path is clear of attacks.
        let s = state("5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_eq!(
            notated(
                &legal_moves_from(&s, sq("e1"))
                    .into_iter()
                    .filter(Move::is_castle)
                    .collect::<Vec<_>>()
            ),
            ["e1c1"]
        );
    }

    #[test]
    fn test_queen_side_castle_allows_attacked_b_file() {
        // b1 is attacked but the king never crosses it.
        let s = state("1r4k1/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(legal_moves_from(&s, sq("e1")).iter().any(|mv| mv.to() == sq("c1")));
    }

    #[test]
    fn test_rook_capture_revokes_right() {
        let mut s = state("r3k2r/8/8/8/8/8/6b1/R3K2R b KQkq - 0 1");
        apply(&mut s, &uci("g2h1")).unwrap();
        assert!(!s.castling.has(Color::White, CastlingSide::KingSide));
        assert!(s.castling.has(Color::White, CastlingSide::QueenSide));
    }

    #[test]
    fn test_rook_move_revokes_one_side() {
        let mut s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        apply(&mut s, &uci("a1a5")).unwrap();
        assert!(!s.castling.has(Color::White, CastlingSide::QueenSide));
        assert!(s.castling.has(Color::White, CastlingSide::KingSide));
    }

    #[test]
    fn test_castling_disabled_by_rules() {
        let mut s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        s.rules.castling = false;
        assert!(!legal_moves(&s).iter().any(Move::is_castle));
    }

    #[test]
    fn test_apply_flips_turn_and_counters() {
        let mut s = state(START);
        apply(&mut s, &uci("g1f3")).unwrap();
        assert_eq!(s.turn, Color::Black);
        assert_eq!(s.halfmove_clock, 1);
        assert_eq!(s.fullmove_number, 1);
        apply(&mut s, &uci("b8c6")).unwrap();
        assert_eq!(s.turn, Color::White);
        assert_eq!(s.halfmove_clock, 2);
        assert_eq!(s.fullmove_number, 2);
    }

    #[test_case("e2e5"; "too far")]
    #[test_case("e7e5"; "wrong colour")]
    #[test_case("e3e4"; "empty source")]
    #[test_case("e1e2"; "own piece")]
    fn test_apply_rejects_illegal(request: &str) {
        let mut s = state(START);
        let before = s.clone();
        assert_eq!(
            apply(&mut s, &uci(request)),
            Err(Error::InvalidMove(uci(request)))
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_wide_board_castling() {
        let dims = Dimensions::new(10, 8).unwrap();
        let mut s = fen::decode("r4k3r/10/10/10/10/10/10/R4K3R w KQkq - 0 1", dims).unwrap();
        let castles: Vec<String> = legal_moves_from(&s, sq("f1"))
            .iter()
            .filter(|mv| mv.is_castle())
            .map(Move::to_string)
            .collect();
        assert_eq!(castles, ["f1h1", "f1d1"]);
        apply(&mut s, &uci("f1h1")).unwrap();
        assert_eq!(s.piece_at(sq("g1")), Some(Piece::new(Role::Rook, Color::White)));
        assert_eq!(s.piece_at(sq("j1")), None);
    }
}
