use crate::game_state::{Board, Color, Piece, Role, Square};

/// True iff `target` is attacked by any piece of colour `by`.
///
/// Pawns attack diagonally forward only, whether or not they could push.
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    attackers(board, target, by).next().is_some()
}

/// Squares of the `by` pieces attacking `target`, in board order.
pub fn attackers(board: &Board, target: Square, by: Color) -> impl Iterator<Item = Square> + '_ {
    board
        .pieces()
        .filter(move |(from, piece)| piece.color == by && piece_attacks(board, *piece, *from, target))
        .map(|(from, _)| from)
}

fn piece_attacks(board: &Board, piece: Piece, from: Square, target: Square) -> bool {
    if from == target {
        return false;
    }
    let dx = i16::from(target.file()) - i16::from(from.file());
    let dy = i16::from(target.rank()) - i16::from(from.rank());

    match piece.role {
        Role::Pawn => dy == i16::from(piece.color.forward()) && dx.abs() == 1,
        Role::Knight => {
            let (ax, ay) = (dx.abs(), dy.abs());
            (ax == 1 && ay == 2) || (ax == 2 && ay == 1)
        }
        Role::King => dx.abs() <= 1 && dy.abs() <= 1,
        Role::Rook => (dx == 0 || dy == 0) && ray_clear(board, from, target, dx, dy),
        Role::Bishop => dx.abs() == dy.abs() && ray_clear(board, from, target, dx, dy),
        Role::Queen => {
            (dx == 0 || dy == 0 || dx.abs() == dy.abs()) && ray_clear(board, from, target, dx, dy)
        }
    }
}

/// No piece stands strictly between `from` and `target` along a line.
fn ray_clear(board: &Board, from: Square, target: Square, dx: i16, dy: i16) -> bool {
    let (sx, sy) = (dx.signum() as i8, dy.signum() as i8);
    let mut cur = from;
    loop {
        let Some(next) = cur.offset(sx, sy) else {
            return false;
        };
        if next == target {
            return true;
        }
        if board.piece_at(next).is_some() {
            return false;
        }
        cur = next;
    }
}
