//! Legal move generation.
//!
//! Every empty cell can be combined with each of the eight rotations. When a
//! quadrant is unchanged by a half turn (after the stone is placed), turning
//! it clockwise or anticlockwise gives the same board, so only the clockwise
//! move is generated.

use crate::board::{Board, Cell, Color, Direction, Position, Quadrant, Rotation};
use crate::constants::{QUADRANTS, ROTATIONS};
use crate::moves::Move;

/// Which quadrants are half-turn symmetric once `color` is placed at `pos`.
///
/// Only the quadrant holding `pos` can change, so the others are taken from
/// `base`.
fn symmetry_after_placement(
    board: &Board,
    base: &[bool; QUADRANTS],
    pos: Position,
    color: Color,
) -> [bool; QUADRANTS] {
    let mut symmetric = *base;
    let quadrant = pos.quadrant();
    if pos != quadrant.center() {
        let mut placed = *board;
        placed.set(pos, Cell::from(color));
        symmetric[quadrant.index()] = placed.is_symmetrical(quadrant);
    }
    symmetric
}

fn base_symmetry(board: &Board) -> [bool; QUADRANTS] {
    Quadrant::ALL.map(|q| board.is_symmetrical(q))
}

fn is_redundant(rotation: Rotation, symmetric: &[bool; QUADRANTS]) -> bool {
    rotation.direction() == Direction::Anticlockwise && symmetric[rotation.quadrant().index()]
}

/// Append every distinct legal move for `color` to `moves`.
///
/// Moves are generated position by position in scan order, rotations in
/// [`Rotation::ALL`] order.
pub fn generate_moves(board: &Board, color: Color, moves: &mut Vec<Move>) {
    let base = base_symmetry(board);
    moves.reserve(move_count_bound(board));
    for pos in board.empty_positions() {
        let symmetric = symmetry_after_placement(board, &base, pos, color);
        for rotation in Rotation::ALL {
            if !is_redundant(rotation, &symmetric) {
                moves.push(Move::new(pos, rotation));
            }
        }
    }
}

/// Exact number of moves [`generate_moves`] would produce.
pub fn count_moves(board: &Board, color: Color) -> usize {
    let base = base_symmetry(board);
    board
        .empty_positions()
        .map(|pos| {
            let symmetric = symmetry_after_placement(board, &base, pos, color);
            Rotation::ALL
                .iter()
                .filter(|&&r| !is_redundant(r, &symmetric))
                .count()
        })
        .sum()
}

/// Cheap upper bound on the number of legal moves: every empty cell times
/// every rotation.
pub fn move_count_bound(board: &Board) -> usize {
    board.empty_positions().count() * ROTATIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(board: &Board, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        generate_moves(board, color, &mut moves);
        moves
    }

    #[test]
    fn test_empty_board_moves() {
        let board = Board::new();
        let moves = generated(&board, Color::Black);
        // Center placements keep the quadrant symmetric: 4 cells x 4 rotations.
        // Any other placement breaks its own quadrant: 32 cells x 5 rotations.
        assert_eq!(moves.len(), 4 * 4 + 32 * 5);
        assert_eq!(count_moves(&board, Color::Black), moves.len());
        assert_eq!(move_count_bound(&board), 36 * 8);
    }

    #[test]
    fn test_moves_are_unique_and_on_empty_cells() {
        let board: Board = "X.O...\n.X..O.\n..O...\n...X..\n....O.\n.X...X\n"
            .parse()
            .unwrap();
        let moves = generated(&board, Color::White);
        for m in &moves {
            assert_eq!(board.get(m.position), Cell::Empty);
        }
        let mut dedup = moves.clone();
        dedup.sort_by_key(|m| (m.position, m.rotation.index()));
        dedup.dedup();
        assert_eq!(dedup.len(), moves.len());
        assert!(moves.len() <= move_count_bound(&board));
        assert_eq!(count_moves(&board, Color::White), moves.len());
    }

    #[test]
    fn test_pruned_moves_are_duplicates() {
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..30 {
            let mut board = Board::new();
            let mut turn = 0;
            for _ in 0..rng.usize(0..20) {
                let empty: Vec<Position> = board.empty_positions().collect();
                let pos = empty[rng.usize(..empty.len())];
                board.set(pos, Cell::from(Color::for_turn(turn)));
                turn += 1;
            }
            let color = Color::for_turn(turn);
            let moves = generated(&board, color);
            for pos in board.empty_positions() {
                for rotation in Rotation::ALL {
                    let m = Move::new(pos, rotation);
                    if moves.contains(&m) {
                        continue;
                    }
                    // A pruned move must reach the same board as its mirror.
                    assert_eq!(rotation.direction(), Direction::Anticlockwise);
                    let mut a = board;
                    m.apply_color(&mut a, color);
                    let mut b = board;
                    Move::new(pos, rotation.invert()).apply_color(&mut b, color);
                    assert_eq!(a, b, "pruned {m}");
                }
            }
        }
    }

    #[test]
    fn test_full_board_has_no_moves() {
        let board: Board = "XOXOXO\nOXOXOX\nXOXOXO\nOXOXOX\nXOXOXO\nOXOXOX\n"
            .parse()
            .unwrap();
        assert!(generated(&board, Color::Black).is_empty());
        assert_eq!(count_moves(&board, Color::Black), 0);
        assert_eq!(move_count_bound(&board), 0);
    }
}
