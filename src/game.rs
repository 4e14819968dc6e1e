//! Game state: a board plus the number of plies played.
//!
//! [`Game`] is the Pentago implementation of [`GameState`]. It is `Copy`, and
//! playing a move returns a new game.

use crate::board::{Board, Color, Winner};
use crate::constants::MAX_PLIES;
use crate::mcts::GameState;
use crate::move_gen::{generate_moves, move_count_bound};
use crate::moves::Move;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Game {
    board: Board,
    turn: u32,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from an existing board. `turn` decides who moves next; it
    /// should equal the number of stones on the board. The game ends when the
    /// board fills up even if `turn` disagrees.
    pub fn from_board(board: Board, turn: u32) -> Self {
        Game { board, turn }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn side_to_move(&self) -> Color {
        Color::for_turn(self.turn)
    }

    /// Apply a move in place and advance the turn.
    pub fn apply(&mut self, mv: &Move) {
        mv.apply(&mut self.board, self.turn);
        self.turn += 1;
    }

    /// Current result of the board's lines.
    pub fn result(&self) -> Winner {
        self.board.winning()
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        generate_moves(&self.board, self.side_to_move(), &mut moves);
        moves
    }

    /// Play up to `plies` uniformly random legal moves, stopping early if the
    /// game ends.
    pub fn random_position(rng: &mut fastrand::Rng, plies: u32) -> Game {
        let mut game = Game::new();
        for _ in 0..plies {
            if game.is_finished() {
                break;
            }
            let moves = game.legal_moves();
            let mv = moves[rng.usize(..moves.len())];
            game.apply(&mv);
        }
        game
    }
}

impl GameState for Game {
    type Move = Move;
    type Player = Color;

    fn current_player(&self) -> Color {
        self.side_to_move()
    }

    fn move_count_hint(&self) -> usize {
        move_count_bound(&self.board)
    }

    fn generate_moves(&self, moves: &mut Vec<Move>) {
        generate_moves(&self.board, self.side_to_move(), moves);
    }

    fn play_move(&self, mv: &Move) -> Self {
        let mut next = *self;
        next.apply(mv);
        next
    }

    fn is_finished(&self) -> bool {
        self.turn >= MAX_PLIES || self.board.is_full() || self.board.winning().is_decided()
    }

    fn winner(&self) -> Option<Color> {
        self.board.winning().color()
    }

    fn remaining_plies(&self) -> usize {
        self.board.empty_positions().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Position};

    #[test]
    fn test_turn_parity() {
        let mut game = Game::new();
        assert_eq!(game.current_player(), Color::Black);
        let mv: Move = "C3A+".parse().unwrap();
        game.apply(&mv);
        assert_eq!(game.turn(), 1);
        assert_eq!(game.current_player(), Color::White);
        assert_eq!(game.board().get(Position::new(2, 2).unwrap()), Cell::Empty);
        assert_eq!(game.board().get(Position::new(2, 0).unwrap()), Cell::Black);
    }

    #[test]
    fn test_play_move_does_not_mutate() {
        let game = Game::new();
        let mv: Move = "A1A+".parse().unwrap();
        let next = game.play_move(&mv);
        assert_eq!(game, Game::new());
        assert_ne!(next, game);
        assert_eq!(next.remaining_plies(), 35);
    }

    #[test]
    fn test_finished_on_win() {
        let board: Board = "XXXXX.\n......\n......\n......\n......\n......\n"
            .parse()
            .unwrap();
        let game = Game::from_board(board, 5);
        assert!(game.is_finished());
        assert_eq!(game.winner(), Some(Color::Black));
    }

    #[test]
    fn test_tie_has_no_winner() {
        let board: Board = "....O.\n...O.X\n..O.X.\n.O.X..\nO.X...\n.X....\n"
            .parse()
            .unwrap();
        let game = Game::from_board(board, 10);
        assert!(game.is_finished());
        assert_eq!(game.result(), Winner::Tie);
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_full_board_is_finished() {
        let board: Board = "XOXOXO\nXOXOXO\nOXOXOX\nOXOXOX\nXOXOXO\nXOXOXO\n"
            .parse()
            .unwrap();
        let game = Game::from_board(board, 36);
        assert_eq!(game.result(), Winner::Nobody);
        assert!(game.is_finished());
        assert_eq!(game.winner(), None);
        assert_eq!(game.remaining_plies(), 0);
    }

    #[test]
    fn test_turn_behind_stone_count_ends_on_full_board() {
        let board: Board = "XXOOXX\nOOXXOO\nXXOOXX\nOOXXOO\nXXOOXX\nOOXXO.\n"
            .parse()
            .unwrap();
        let game = Game::from_board(board, 30);
        assert!(!game.is_finished());
        assert_eq!(game.remaining_plies(), 1);
        for mv in game.legal_moves() {
            let next = game.play_move(&mv);
            assert_eq!(next.turn(), 31);
            assert!(next.is_finished());
        }

        let mut stop = 0;
        let mv = crate::mcts::get_move(&game, || {
            stop += 1;
            stop >= 50
        });
        assert!(game.legal_moves().contains(&mv));
    }

    #[test]
    fn test_random_positions_are_consistent() {
        let mut rng = fastrand::Rng::with_seed(99);
        for _ in 0..20 {
            let game = Game::random_position(&mut rng, 36);
            assert_eq!(game.board().stone_count(), game.turn() as usize);
            assert!(game.is_finished());
            assert!(game.move_count_hint() >= game.legal_moves().len());
        }
    }
}
