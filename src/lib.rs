//! Pentago: a bit-packed board and a Monte Carlo Tree Search player.
//!
//! Each turn a player places a stone and then rotates one of the four 3x3
//! quadrants by 90 degrees. Five in a row along a row, column or diagonal
//! wins; if both players complete a line on the same turn the game is a tie.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry and search parameters
//! - [`board`] - Packed board, rotations, symmetry tests and win detection
//! - [`moves`] - Moves and the `C2A+` move notation
//! - [`move_gen`] - Legal move generation with symmetry pruning
//! - [`game`] - Board plus turn counter, implementing [`mcts::GameState`]
//! - [`mcts`] - Generic UCT search under a time budget
//!
//! ## Example
//!
//! ```
//! use pentago::game::Game;
//! use pentago::mcts::get_move;
//!
//! let mut game = Game::new();
//! game.apply(&"C3A+".parse().unwrap());
//!
//! // Search for 200 rollouts
//! let mut rollouts = 0;
//! let reply = get_move(&game, || {
//!     rollouts += 1;
//!     rollouts >= 200
//! });
//! println!("Reply: {reply}");
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod mcts;
pub mod move_gen;
pub mod moves;
