//! Bit-packed Pentago board.
//!
//! The board holds 36 cells at 4 bits per cell, two cells per byte. Cells are
//! addressed by [`Position`], which can only be built from in-range
//! coordinates, so every index into the packed array is valid.
//!
//! Coordinates follow the text layout: `x` is the line (letters `A`-`F` in
//! move notation) and `y` is the character within the line (digits `1`-`6`).
//! The four quadrants are laid out as
//!
//! ```text
//! AAABBB
//! AAABBB
//! AAABBB
//! CCCDDD
//! CCCDDD
//! CCCDDD
//! ```

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use crate::constants::{
    BITS_PER_CELL, BOARD_BYTES, CELL_MASK, CELLS, QUADRANT_WIDTH, WIDTH, WIN_LENGTH,
};

/// A player's stone color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The color placing a stone on the given turn. Black (`X`) moves first.
    pub fn for_turn(turn: u32) -> Color {
        if turn % 2 == 0 { Color::Black } else { Color::White }
    }

    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// The content of a single cell. The discriminants are the packed codes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    White = 1,
    Black = 2,
}

impl Cell {
    #[inline]
    fn code(self) -> u8 {
        self as u8
    }

    /// Decode a packed nibble. Only valid codes are ever stored.
    #[inline]
    fn from_code(code: u8) -> Cell {
        match code {
            1 => Cell::White,
            2 => Cell::Black,
            _ => {
                debug_assert_eq!(code, 0, "corrupt cell code {code}");
                Cell::Empty
            }
        }
    }

    /// Parse a cell character: `.` is empty, `X`/`x` black, `O`/`o`/`0` white.
    pub fn from_char(c: char) -> Result<Cell, ParseError> {
        match c {
            '.' => Ok(Cell::Empty),
            'X' | 'x' => Ok(Cell::Black),
            'O' | 'o' | '0' => Ok(Cell::White),
            other => Err(ParseError::InvalidCell(other)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::White => 'O',
            Cell::Black => 'X',
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::White => Some(Color::White),
            Cell::Black => Some(Color::Black),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Cell::White,
            Color::Black => Cell::Black,
        }
    }
}

/// Owner of a winning line, or of the whole board.
///
/// Results from several lines are combined with `|`. When both colors
/// complete a line at the same time the combination is [`Winner::Tie`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Winner {
    #[default]
    Nobody = 0,
    White = 1,
    Black = 2,
    Tie = 3,
}

impl Winner {
    fn from_bits(bits: u8) -> Winner {
        match bits & 3 {
            0 => Winner::Nobody,
            1 => Winner::White,
            2 => Winner::Black,
            _ => Winner::Tie,
        }
    }

    /// The single winning color, if exactly one player has a line.
    pub fn color(self) -> Option<Color> {
        match self {
            Winner::White => Some(Color::White),
            Winner::Black => Some(Color::Black),
            Winner::Nobody | Winner::Tie => None,
        }
    }

    /// True if at least one line has been completed.
    pub fn is_decided(self) -> bool {
        self != Winner::Nobody
    }
}

impl BitOr for Winner {
    type Output = Winner;

    fn bitor(self, rhs: Winner) -> Winner {
        Winner::from_bits(self as u8 | rhs as u8)
    }
}

impl From<Cell> for Winner {
    fn from(cell: Cell) -> Self {
        Winner::from_bits(cell.code())
    }
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        Winner::from(Cell::from(color))
    }
}

/// Errors produced when parsing boards or move tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Board text did not have six lines
    LineCount(usize),
    /// A board line did not have six cells
    LineLength { line: usize, len: usize },
    /// Unknown cell character
    InvalidCell(char),
    /// Move token was not 3 or 4 characters
    MoveLength(usize),
    /// Column letter outside `A`-`F`
    InvalidColumn(char),
    /// Row digit outside `1`-`6`
    InvalidRow(char),
    /// Quadrant letter outside `A`-`D`
    InvalidQuadrant(char),
    /// Direction marker other than `+` or `-`
    InvalidDirection(char),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::LineCount(n) => write!(f, "expected {WIDTH} board lines, got {n}"),
            ParseError::LineLength { line, len } => {
                write!(f, "board line {} has {len} cells, expected {WIDTH}", line + 1)
            }
            ParseError::InvalidCell(c) => write!(f, "invalid cell character {c:?}"),
            ParseError::MoveLength(n) => write!(f, "move must be 3 or 4 characters, got {n}"),
            ParseError::InvalidColumn(c) => write!(f, "invalid column {c:?}, expected A-F"),
            ParseError::InvalidRow(c) => write!(f, "invalid row {c:?}, expected 1-6"),
            ParseError::InvalidQuadrant(c) => write!(f, "invalid quadrant {c:?}, expected A-D"),
            ParseError::InvalidDirection(c) => {
                write!(f, "invalid direction {c:?}, expected '+' or '-'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A cell on the board, stored as the packed index `x * 6 + y`.
///
/// Positions can only be constructed from in-range coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(u8);

impl Position {
    /// Create a position from a line `x` and column `y`, both in `0..6`.
    pub fn new(x: usize, y: usize) -> Option<Position> {
        if x < WIDTH && y < WIDTH {
            Some(Position::at(x, y))
        } else {
            None
        }
    }

    /// Callers guarantee `x < 6 && y < 6`.
    #[inline]
    pub(crate) const fn at(x: usize, y: usize) -> Position {
        Position((x * WIDTH + y) as u8)
    }

    pub fn from_index(index: usize) -> Option<Position> {
        if index < CELLS {
            Some(Position(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub fn x(self) -> usize {
        self.0 as usize / WIDTH
    }

    #[inline]
    pub fn y(self) -> usize {
        self.0 as usize % WIDTH
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Shift by a signed offset, or `None` if that leaves the board.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Position> {
        let x = self.x().checked_add_signed(dx)?;
        let y = self.y().checked_add_signed(dy)?;
        Position::new(x, y)
    }

    /// The quadrant containing this position.
    pub fn quadrant(self) -> Quadrant {
        let top = self.x() < QUADRANT_WIDTH;
        let left = self.y() < QUADRANT_WIDTH;
        match (top, left) {
            (true, true) => Quadrant::A,
            (true, false) => Quadrant::B,
            (false, true) => Quadrant::C,
            (false, false) => Quadrant::D,
        }
    }

    /// All 36 positions in scan order (line by line).
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELLS as u8).map(Position)
    }

    /// Parse the column letter and row digit of move notation.
    pub fn from_chars(column: char, row: char) -> Result<Position, ParseError> {
        let x = match column.to_ascii_uppercase() {
            c @ 'A'..='F' => c as usize - 'A' as usize,
            _ => return Err(ParseError::InvalidColumn(column)),
        };
        let y = match row {
            c @ '1'..='6' => c as usize - '1' as usize,
            _ => return Err(ParseError::InvalidRow(row)),
        };
        Ok(Position::at(x, y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = (b'A' + self.x() as u8) as char;
        let row = (b'1' + self.y() as u8) as char;
        write!(f, "{column}{row}")
    }
}

/// One of the four rotatable 3x3 blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Quadrant {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

/// Perimeter of a quadrant in quadrant-local `(x, y)`, walking clockwise from
/// the top-left corner. Corners sit at even indices, edge midpoints at odd.
const RING: [(usize, usize); 8] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 2),
    (2, 2),
    (2, 1),
    (2, 0),
    (1, 0),
];

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::A, Quadrant::B, Quadrant::C, Quadrant::D];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Quadrant> {
        Quadrant::ALL.get(index).copied()
    }

    pub fn from_char(c: char) -> Result<Quadrant, ParseError> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Quadrant::A),
            'B' => Ok(Quadrant::B),
            'C' => Ok(Quadrant::C),
            'D' => Ok(Quadrant::D),
            _ => Err(ParseError::InvalidQuadrant(c)),
        }
    }

    pub fn to_char(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Top-left corner of the quadrant as `(x, y)`.
    fn origin(self) -> (usize, usize) {
        match self {
            Quadrant::A => (0, 0),
            Quadrant::B => (0, QUADRANT_WIDTH),
            Quadrant::C => (QUADRANT_WIDTH, 0),
            Quadrant::D => (QUADRANT_WIDTH, QUADRANT_WIDTH),
        }
    }

    /// The fixed point of the quadrant's rotations.
    pub fn center(self) -> Position {
        let (x0, y0) = self.origin();
        Position::at(x0 + 1, y0 + 1)
    }

    /// The eight perimeter cells in clockwise order.
    fn ring(self) -> [Position; 8] {
        let (x0, y0) = self.origin();
        RING.map(|(x, y)| Position::at(x0 + x, y0 + y))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Clockwise,
    Anticlockwise,
}

impl Direction {
    pub fn inverse(self) -> Direction {
        match self {
            Direction::Clockwise => Direction::Anticlockwise,
            Direction::Anticlockwise => Direction::Clockwise,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Direction::Clockwise => '+',
            Direction::Anticlockwise => '-',
        }
    }
}

/// A quadrant and a spin direction, packed into one byte.
///
/// Bits 0-1 hold the quadrant and bit 2 the direction, so the eight
/// rotations have indices `0..8` in the order A+ B+ C+ D+ A- B- C- D-.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rotation(u8);

const ANTICLOCKWISE_BIT: u8 = 4;

impl Rotation {
    pub const ALL: [Rotation; 8] = [
        Rotation(0),
        Rotation(1),
        Rotation(2),
        Rotation(3),
        Rotation(4),
        Rotation(5),
        Rotation(6),
        Rotation(7),
    ];

    pub fn new(quadrant: Quadrant, direction: Direction) -> Rotation {
        let spin = match direction {
            Direction::Clockwise => 0,
            Direction::Anticlockwise => ANTICLOCKWISE_BIT,
        };
        Rotation(quadrant as u8 | spin)
    }

    pub fn from_index(index: usize) -> Option<Rotation> {
        Rotation::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn quadrant(self) -> Quadrant {
        match self.0 & 3 {
            0 => Quadrant::A,
            1 => Quadrant::B,
            2 => Quadrant::C,
            _ => Quadrant::D,
        }
    }

    pub fn direction(self) -> Direction {
        if self.0 & ANTICLOCKWISE_BIT == 0 {
            Direction::Clockwise
        } else {
            Direction::Anticlockwise
        }
    }

    /// Same quadrant, opposite direction.
    pub fn invert(self) -> Rotation {
        Rotation(self.0 ^ ANTICLOCKWISE_BIT)
    }
}

impl fmt::Debug for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quadrant().to_char(), self.direction().to_char())
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::new(Quadrant::A, Direction::Clockwise)
    }
}

/// The 6x6 board, 4 bits per cell.
///
/// Boards are `Copy`: search branches take their own copy rather than sharing.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [u8; BOARD_BYTES],
}

#[inline]
fn slot(pos: Position) -> (usize, u32) {
    let bit = pos.index() * BITS_PER_CELL;
    (bit / 8, (bit % 8) as u32)
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Cell {
        let (byte, shift) = slot(pos);
        Cell::from_code((self.cells[byte] >> shift) & CELL_MASK)
    }

    /// OR a cell into place. The target must be empty.
    #[inline]
    pub fn set(&mut self, pos: Position, cell: Cell) {
        debug_assert!(self.get(pos).is_empty(), "set on occupied cell {pos}");
        let (byte, shift) = slot(pos);
        self.cells[byte] |= cell.code() << shift;
    }

    /// Clear a cell, then write into it. Safe whatever the previous content.
    #[inline]
    pub fn replace(&mut self, pos: Position, cell: Cell) {
        let (byte, shift) = slot(pos);
        self.cells[byte] &= !(CELL_MASK << shift);
        self.cells[byte] |= cell.code() << shift;
    }

    #[inline]
    pub fn clear(&mut self, pos: Position) {
        let (byte, shift) = slot(pos);
        self.cells[byte] &= !(CELL_MASK << shift);
    }

    pub fn rotate(&mut self, rotation: Rotation) {
        self.rotate_quadrant(rotation.quadrant(), rotation.direction());
    }

    /// Rotate a quadrant by 90 degrees. The center cell never moves; corners
    /// and edge midpoints each cycle among themselves, two ring steps apart.
    pub fn rotate_quadrant(&mut self, quadrant: Quadrant, direction: Direction) {
        let ring = quadrant.ring();
        let mut values = ring.map(|pos| self.get(pos));
        match direction {
            Direction::Clockwise => values.rotate_right(2),
            Direction::Anticlockwise => values.rotate_left(2),
        }
        for (pos, cell) in ring.into_iter().zip(values) {
            self.replace(pos, cell);
        }
    }

    /// True if rotating `quadrant` either way gives the same board, i.e. the
    /// quadrant is unchanged by a half turn.
    pub fn is_symmetrical(&self, quadrant: Quadrant) -> bool {
        let values = quadrant.ring().map(|pos| self.get(pos));
        (0..4).all(|i| values[i] == values[i + 4])
    }

    /// A six-cell line wins if the middle four cells hold the same stone and
    /// at least one end matches them.
    fn long_line_winner(&self, line: [Position; WIDTH]) -> Winner {
        let cell = self.get(line[1]);
        if cell.is_empty() || line[2..5].iter().any(|&pos| self.get(pos) != cell) {
            return Winner::Nobody;
        }
        if self.get(line[0]) == cell || self.get(line[5]) == cell {
            Winner::from(cell)
        } else {
            Winner::Nobody
        }
    }

    /// A five-cell line wins only if all of it holds the same stone.
    fn short_line_winner(&self, line: [Position; WIN_LENGTH]) -> Winner {
        let cell = self.get(line[0]);
        if !cell.is_empty() && line[1..].iter().all(|&pos| self.get(pos) == cell) {
            Winner::from(cell)
        } else {
            Winner::Nobody
        }
    }

    /// Winner along line `x`.
    ///
    /// # Panics
    /// If `x >= 6`.
    pub fn winning_row(&self, x: usize) -> Winner {
        assert!(x < WIDTH, "row {x} out of range");
        self.long_line_winner(std::array::from_fn(|y| Position::at(x, y)))
    }

    /// Winner along column `y`.
    ///
    /// # Panics
    /// If `y >= 6`.
    pub fn winning_col(&self, y: usize) -> Winner {
        assert!(y < WIDTH, "column {y} out of range");
        self.long_line_winner(std::array::from_fn(|x| Position::at(x, y)))
    }

    /// Combined winner over the two long diagonals and the four five-cell
    /// diagonals beside them.
    pub fn winning_diag(&self) -> Winner {
        let last = WIDTH - 1;
        self.long_line_winner(std::array::from_fn(|i| Position::at(i, i)))
            | self.long_line_winner(std::array::from_fn(|i| Position::at(i, last - i)))
            | self.short_line_winner(std::array::from_fn(|i| Position::at(i, i + 1)))
            | self.short_line_winner(std::array::from_fn(|i| Position::at(i + 1, i)))
            | self.short_line_winner(std::array::from_fn(|i| Position::at(i, last - 1 - i)))
            | self.short_line_winner(std::array::from_fn(|i| Position::at(i + 1, last - i)))
    }

    /// Combined winner over every line on the board.
    pub fn winning(&self) -> Winner {
        (0..WIDTH).fold(self.winning_diag(), |acc, n| {
            acc | self.winning_row(n) | self.winning_col(n)
        })
    }

    /// Empty positions in scan order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(|&pos| self.get(pos).is_empty())
    }

    pub fn stone_count(&self) -> usize {
        Position::all().filter(|&pos| !self.get(pos).is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.empty_positions().next().is_none()
    }
}

impl FromStr for Board {
    type Err = ParseError;

    /// Parse six lines of six cells, e.g. `"O.....\n.O....\n..."`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().collect();
        if lines.len() != WIDTH {
            return Err(ParseError::LineCount(lines.len()));
        }
        let mut board = Board::new();
        for (x, line) in lines.iter().enumerate() {
            let len = line.chars().count();
            if len != WIDTH {
                return Err(ParseError::LineLength { line: x, len });
            }
            for (y, c) in line.chars().enumerate() {
                board.replace(Position::at(x, y), Cell::from_char(c)?);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..WIDTH {
            for y in 0..WIDTH {
                write!(f, "{}", self.get(Position::at(x, y)).to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        fmt::Display::fmt(self, f)
    }
}
