//! Moves and move notation.
//!
//! A move places a stone and then rotates one quadrant. In text a move is
//! written `[A-F][1-6][A-D][+|-]`, e.g. `C2A+`: place at column `C`, row `2`,
//! then turn quadrant `A` clockwise. The direction may be omitted when
//! parsing, in which case it is clockwise.

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Cell, Color, Direction, ParseError, Position, Quadrant, Rotation};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub position: Position,
    pub rotation: Rotation,
}

impl Move {
    pub fn new(position: Position, rotation: Rotation) -> Self {
        Move { position, rotation }
    }

    /// Play this move for the player whose turn it is.
    ///
    /// The stone is placed first. If that placement alone completes a line,
    /// the game is over and the rotation is skipped.
    pub fn apply(&self, board: &mut Board, turn: u32) {
        self.apply_color(board, Color::for_turn(turn));
    }

    pub fn apply_color(&self, board: &mut Board, color: Color) {
        board.set(self.position, Cell::from(color));
        if !board.winning().is_decided() {
            board.rotate(self.rotation);
        }
    }

    /// Take back a move whose rotation was performed.
    pub fn undo(&self, board: &mut Board) {
        board.rotate(self.rotation.invert());
        board.clear(self.position);
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if !(3..=4).contains(&chars.len()) {
            return Err(ParseError::MoveLength(chars.len()));
        }
        let position = Position::from_chars(chars[0], chars[1])?;
        let quadrant = Quadrant::from_char(chars[2])?;
        let direction = match chars.get(3) {
            None | Some('+') => Direction::Clockwise,
            Some('-') => Direction::Anticlockwise,
            Some(&other) => return Err(ParseError::InvalidDirection(other)),
        };
        Ok(Move::new(position, Rotation::new(quadrant, direction)))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.position,
            self.rotation.quadrant().to_char(),
            self.rotation.direction().to_char()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Winner;

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_basic() {
        let m = mv("A1A+");
        assert_eq!(m.position, Position::new(0, 0).unwrap());
        assert_eq!(m.rotation.quadrant(), Quadrant::A);
        assert_eq!(m.rotation.direction(), Direction::Clockwise);

        let m = mv("C2A+");
        assert_eq!((m.position.x(), m.position.y()), (2, 1));

        let m = mv("F6D-");
        assert_eq!((m.position.x(), m.position.y()), (5, 5));
        assert_eq!(m.rotation.quadrant(), Quadrant::D);
        assert_eq!(m.rotation.direction(), Direction::Anticlockwise);
    }

    #[test]
    fn test_parse_defaults_and_case() {
        assert_eq!(mv("B3C"), mv("B3C+"));
        assert_eq!(mv("b3c-"), mv("B3C-"));
        assert_eq!(mv("B3C").to_string(), "B3C+");
    }

    #[test]
    fn test_format_roundtrip_all_tokens() {
        for pos in Position::all() {
            for r in Rotation::ALL {
                let m = Move::new(pos, r);
                let s = m.to_string();
                assert_eq!(s.len(), 4);
                assert_eq!(mv(&s), m);
                assert_eq!(mv(&s).to_string(), s);
            }
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("A1".parse::<Move>(), Err(ParseError::MoveLength(2)));
        assert_eq!("A1A+x".parse::<Move>(), Err(ParseError::MoveLength(5)));
        assert_eq!("G1A+".parse::<Move>(), Err(ParseError::InvalidColumn('G')));
        assert_eq!("A7A+".parse::<Move>(), Err(ParseError::InvalidRow('7')));
        assert_eq!("A1E+".parse::<Move>(), Err(ParseError::InvalidQuadrant('E')));
        assert_eq!("A1A*".parse::<Move>(), Err(ParseError::InvalidDirection('*')));
    }

    #[test]
    fn test_apply_places_then_rotates() {
        let mut board = Board::new();
        mv("A1A+").apply(&mut board, 0);
        // The stone at the top-left corner is carried to the top-right corner.
        assert_eq!(board.get(Position::new(0, 0).unwrap()), Cell::Empty);
        assert_eq!(board.get(Position::new(0, 2).unwrap()), Cell::Black);

        mv("F6B-").apply(&mut board, 1);
        assert_eq!(board.get(Position::new(5, 5).unwrap()), Cell::White);
    }

    #[test]
    fn test_apply_skips_rotation_on_immediate_win() {
        let mut board: Board = "XXXX..\n......\n......\n......\n......\n......\n"
            .parse()
            .unwrap();
        let m = mv("A5A+");
        let mut placed = board;
        placed.set(m.position, Cell::Black);
        m.apply(&mut board, 0);
        assert_eq!(board, placed);
        assert_eq!(board.winning(), Winner::Black);
    }

    #[test]
    fn test_apply_rotates_when_placement_does_not_win() {
        let mut board: Board = "XXX...\n......\n......\n......\n......\n......\n"
            .parse()
            .unwrap();
        mv("A4B+").apply(&mut board, 0);
        let expected: Board = "XXX..X\n......\n......\n......\n......\n......\n"
            .parse()
            .unwrap();
        assert_eq!(board, expected);
    }

    #[test]
    fn test_undo_restores_board() {
        let start: Board = "X.O...\n.X....\n..O...\n...X..\n....O.\n.....X\n"
            .parse()
            .unwrap();
        for pos in start.empty_positions() {
            for r in Rotation::ALL {
                let mut b = start;
                let m = Move::new(pos, r);
                m.apply(&mut b, 6);
                if b.winning().is_decided() {
                    continue;
                }
                m.undo(&mut b);
                assert_eq!(b, start, "undo of {m}");
            }
        }
    }
}
