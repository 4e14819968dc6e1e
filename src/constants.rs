//! Constants for board geometry and search parameters.
//!
//! The board is a 6x6 grid split into four independently rotatable 3x3
//! quadrants. Cells are stored packed, two per byte.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board width and height.
pub const WIDTH: usize = 6;

/// Number of cells on the board.
pub const CELLS: usize = WIDTH * WIDTH;

/// Width of one quadrant.
pub const QUADRANT_WIDTH: usize = 3;

/// Bits used to store one cell.
pub const BITS_PER_CELL: usize = 4;

/// Mask selecting one cell's bits once shifted down.
pub const CELL_MASK: u8 = 0x0f;

/// Size of the packed board in bytes.
pub const BOARD_BYTES: usize = CELLS * BITS_PER_CELL / 8;

/// Number of consecutive stones needed to win.
pub const WIN_LENGTH: usize = 5;

/// Maximum number of plies in a game. Every ply fills exactly one cell.
pub const MAX_PLIES: u32 = CELLS as u32;

// =============================================================================
// Moves
// =============================================================================

/// Number of quadrants.
pub const QUADRANTS: usize = 4;

/// Number of distinct rotations (4 quadrants x 2 directions).
pub const ROTATIONS: usize = QUADRANTS * 2;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// UCT exploration constant.
pub const UCT_C: f64 = std::f64::consts::SQRT_2;

/// Default thinking time per move, in milliseconds.
pub const DEFAULT_MOVE_TIME_MS: u64 = 1000;

/// Number of rollouts between progress log lines.
pub const REPORT_PERIOD: u64 = 10_000;
