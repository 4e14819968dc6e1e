//! Monte Carlo Tree Search (MCTS) with UCT selection.
//!
//! The engine is generic over any game implementing [`GameState`]. Each call
//! to [`search`] builds a fresh tree, runs rollouts until the stop predicate
//! fires, and drops the whole tree before returning. Nothing is kept between
//! moves.
//!
//! A rollout descends from a root candidate, expanding every node it reaches
//! and following the UCT-best child, until the game ends. There is no random
//! playout phase: the tree itself is grown all the way to a terminal state.
//!
//! The stop predicate is polled only between whole rollouts, so the time
//! budget is a soft deadline. A search may overrun it by up to one rollout.

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::constants::{REPORT_PERIOD, UCT_C};

/// The interface the search needs from a game.
///
/// States have value semantics: [`GameState::play_move`] returns a new state
/// and leaves `self` untouched, so divergent branches never share a board.
pub trait GameState: Sized {
    type Move: Clone;
    type Player: Copy + Eq;

    /// The player who makes the next move.
    fn current_player(&self) -> Self::Player;

    /// An upper bound on the number of legal moves, used to size buffers.
    fn move_count_hint(&self) -> usize;

    /// Append all legal moves to `moves`.
    fn generate_moves(&self, moves: &mut Vec<Self::Move>);

    fn play_move(&self, mv: &Self::Move) -> Self;

    fn is_finished(&self) -> bool;

    /// The winner of a finished game, or `None` for a draw or tie.
    fn winner(&self) -> Option<Self::Player>;

    /// An upper bound on the plies left in the game.
    fn remaining_plies(&self) -> usize;
}

/// How the final move is picked from the root candidates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FinalSelection {
    /// Highest observed win ratio. Can favour rarely visited moves.
    #[default]
    WinRatio,
    /// Most simulations.
    MostVisited,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// UCT exploration constant.
    pub exploration: f64,
    pub selection: FinalSelection,
    /// Rollouts between progress log lines.
    pub report_period: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            exploration: UCT_C,
            selection: FinalSelection::default(),
            report_period: REPORT_PERIOD,
        }
    }
}

/// A node in the search tree.
///
/// A node owns its children. An empty child list means the node has not
/// been expanded yet; a non-terminal state always has at least one move.
#[derive(Clone, Debug)]
pub struct Node<M> {
    pub mv: M,
    /// Rollouts through this node won by the player who made `mv`
    pub wins: u32,
    /// Rollouts through this node
    pub sims: u32,
    pub children: Vec<Node<M>>,
}

impl<M> Node<M> {
    pub fn new(mv: M) -> Self {
        Node {
            mv,
            wins: 0,
            sims: 0,
            children: Vec::new(),
        }
    }

    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Win ratio, or 0 for an unvisited node.
    #[inline]
    pub fn ratio(&self) -> f64 {
        if self.sims == 0 {
            0.0
        } else {
            self.wins as f64 / self.sims as f64
        }
    }

    /// UCT score given the log of the siblings' total simulations.
    ///
    /// Unvisited nodes score infinity so every sibling is tried once before
    /// any is revisited.
    #[inline]
    pub fn uct(&self, ln_total: f64, exploration: f64) -> f64 {
        if self.sims == 0 {
            return f64::INFINITY;
        }
        let sims = self.sims as f64;
        self.wins as f64 / sims + exploration * (ln_total / sims).sqrt()
    }
}

/// Total simulations over a set of siblings.
pub fn count_trials<M>(nodes: &[Node<M>]) -> u64 {
    nodes.iter().map(|n| n.sims as u64).sum()
}

/// Index of the sibling with the highest UCT score. Ties go to the first.
///
/// # Panics
/// If `nodes` is empty.
pub fn select_node<M>(nodes: &[Node<M>], exploration: f64) -> usize {
    assert!(!nodes.is_empty(), "select_node on an empty sibling list");
    let ln_total = (count_trials(nodes) as f64).ln();
    let mut best = 0;
    let mut best_uct = f64::NEG_INFINITY;
    for (i, node) in nodes.iter().enumerate() {
        let uct = node.uct(ln_total, exploration);
        if uct > best_uct {
            best = i;
            best_uct = uct;
        }
    }
    best
}

/// One unvisited node per legal move in `state`.
fn new_children<S: GameState>(state: &S) -> Vec<Node<S::Move>> {
    let mut moves = Vec::with_capacity(state.move_count_hint());
    state.generate_moves(&mut moves);
    moves.into_iter().map(Node::new).collect()
}

/// Create the children of `node` from `state`, the position reached at that
/// node. Does nothing if the node is already expanded.
///
/// # Panics
/// If `state` has no legal moves.
pub fn expand<S: GameState>(node: &mut Node<S::Move>, state: &S) {
    if node.is_expanded() {
        return;
    }
    node.children = new_children(state);
    assert!(
        !node.children.is_empty(),
        "expanding a state with no legal moves"
    );
}

/// Run one rollout below `node`, starting from `state`, and return the
/// winner of the game it reaches.
///
/// Every node on the path gets one more simulation, and one more win if the
/// player who made its move won. `node` itself is not updated.
pub fn explore<S: GameState>(
    node: &mut Node<S::Move>,
    state: S,
    exploration: f64,
) -> Option<S::Player> {
    let mut path: Vec<(usize, S::Player)> = Vec::with_capacity(state.remaining_plies());
    let mut state = state;
    {
        let mut cursor = &mut *node;
        while !state.is_finished() {
            expand(&mut *cursor, &state);
            let idx = select_node(&cursor.children, exploration);
            let mover = state.current_player();
            state = state.play_move(&cursor.children[idx].mv);
            path.push((idx, mover));
            cursor = &mut cursor.children[idx];
        }
    }

    let winner = state.winner();

    let mut cursor = node;
    for (idx, mover) in path {
        cursor = &mut cursor.children[idx];
        cursor.sims += 1;
        if winner == Some(mover) {
            cursor.wins += 1;
        }
    }

    winner
}

/// Statistics for one root candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateStats<M> {
    pub mv: M,
    pub wins: u32,
    pub sims: u32,
}

/// Outcome of a search.
#[derive(Clone, Debug)]
pub struct SearchResult<M> {
    pub best_move: M,
    /// Rollouts performed. Zero when there was only one legal move.
    pub rollouts: u64,
    pub candidates: Vec<CandidateStats<M>>,
}

fn pick_final<M>(candidates: &[Node<M>], selection: FinalSelection) -> usize {
    let mut best = 0;
    for (i, node) in candidates.iter().enumerate().skip(1) {
        let better = match selection {
            FinalSelection::WinRatio => node.ratio() > candidates[best].ratio(),
            FinalSelection::MostVisited => node.sims > candidates[best].sims,
        };
        if better {
            best = i;
        }
    }
    best
}

/// Search from `state` until `should_stop` returns true.
///
/// `should_stop` is called after each complete rollout. With a single legal
/// move the search returns immediately without calling it.
///
/// # Panics
/// If `state` has no legal moves. Callers must not search finished games.
pub fn search<S, F>(state: &S, config: &SearchConfig, mut should_stop: F) -> SearchResult<S::Move>
where
    S: GameState,
    F: FnMut() -> bool,
{
    let mut candidates = new_children(state);
    assert!(
        !candidates.is_empty(),
        "search called on a state with no legal moves"
    );

    let mut rollouts = 0u64;
    if candidates.len() > 1 {
        let root_player = state.current_player();
        loop {
            let idx = select_node(&candidates, config.exploration);
            let trial = &mut candidates[idx];
            let next = state.play_move(&trial.mv);
            trial.sims += 1;
            if explore(&mut *trial, next, config.exploration) == Some(root_player) {
                trial.wins += 1;
            }
            rollouts += 1;

            if config.report_period > 0 && rollouts % config.report_period == 0 {
                let best = &candidates[pick_final(&candidates, config.selection)];
                trace!(
                    "{rollouts} rollouts, best candidate {}/{} ({:.3})",
                    best.wins,
                    best.sims,
                    best.ratio()
                );
            }

            if should_stop() {
                break;
            }
        }
    }

    let best = pick_final(&candidates, config.selection);
    debug!(
        "search finished: {rollouts} rollouts over {} candidates, best {}/{}",
        candidates.len(),
        candidates[best].wins,
        candidates[best].sims
    );

    let stats = candidates
        .iter()
        .map(|n| CandidateStats {
            mv: n.mv.clone(),
            wins: n.wins,
            sims: n.sims,
        })
        .collect();

    SearchResult {
        best_move: candidates.swap_remove(best).mv,
        rollouts,
        candidates: stats,
    }
}

/// Pick a move for `state`, searching until `should_stop` returns true.
pub fn get_move<S, F>(state: &S, should_stop: F) -> S::Move
where
    S: GameState,
    F: FnMut() -> bool,
{
    search(state, &SearchConfig::default(), should_stop).best_move
}

/// Pick a move for `state`, searching for roughly `budget` of wall-clock time.
pub fn get_move_timed<S: GameState>(state: &S, config: &SearchConfig, budget: Duration) -> S::Move {
    let start = Instant::now();
    search(state, config, || start.elapsed() >= budget).best_move
}
