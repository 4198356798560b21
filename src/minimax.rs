//! Fixed-depth minimax search with alpha-beta pruning ("Leo" and "Magnus").
//!
//! Every candidate point is tried on a copy of the game. Legal candidates are
//! scored by searching `depth - 1` further plies from the opponent's point of
//! view; leaves are evaluated as the area-score margin of the searching
//! color. Ties between the best candidates are broken at random.
//!
//! The search checks a [`CancelToken`] and an optional [`SearchLimits`] at
//! every node. Once stopped, nodes are evaluated statically and the root
//! keeps the best candidate among those searched so far.

use std::time::Instant;

use tracing::{debug, warn};

use crate::board::{Color, Point};
use crate::constants::{DEADLINE_CHECK_INTERVAL, LEO_DEPTH, MAGNUS_DEPTH};
use crate::game::GameState;
use crate::strategy::{CancelToken, Move, SearchLimits, Strategy};

/// Leaf evaluation: score of `color` minus score of its opponent.
pub fn evaluate(state: &GameState, color: Color) -> i64 {
    state.score().margin(color)
}

/// Copies of `state` after each legal move of the active color.
fn children(state: &GameState) -> impl Iterator<Item = (Point, GameState)> + '_ {
    state.board().empty_points().into_iter().filter_map(move |pt| {
        let mut child = state.copy();
        child.take_move_at(pt).0.then_some((pt, child))
    })
}

/// Plain minimax without pruning, from the perspective of `color`.
///
/// A node where the side to move has no legal point is a loss for that
/// side: `i64::MIN` when maximizing, `i64::MAX` when minimizing.
pub fn minimax(state: &GameState, color: Color, depth: u32, maximizing: bool) -> i64 {
    if depth == 0 {
        return evaluate(state, color);
    }
    let values = children(state).map(|(_, child)| minimax(&child, color, depth - 1, !maximizing));
    let best = if maximizing { values.max() } else { values.min() };
    best.unwrap_or_else(|| dead_end(maximizing))
}

fn dead_end(maximizing: bool) -> i64 {
    if maximizing { i64::MIN } else { i64::MAX }
}

/// Alpha-beta search without limits; returns the same value as [`minimax`].
pub fn alphabeta(state: &GameState, color: Color, depth: u32, maximizing: bool) -> i64 {
    let cancel = CancelToken::new();
    let mut search = Search::new(color, &cancel, SearchLimits::unlimited());
    search.alphabeta(state, depth, maximizing, i64::MIN, i64::MAX)
}

struct Search<'a> {
    color: Color,
    cancel: &'a CancelToken,
    limits: SearchLimits,
    started: Instant,
    nodes: u64,
    stopped: bool,
}

impl<'a> Search<'a> {
    fn new(color: Color, cancel: &'a CancelToken, limits: SearchLimits) -> Self {
        Self {
            color,
            cancel,
            limits,
            started: Instant::now(),
            nodes: 0,
            stopped: false,
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        let out_of_nodes = self.limits.max_nodes.is_some_and(|max| self.nodes >= max);
        let out_of_time = self.nodes % DEADLINE_CHECK_INTERVAL == 0
            && self
                .limits
                .time_limit
                .is_some_and(|limit| self.started.elapsed() >= limit);
        self.stopped = self.cancel.is_cancelled() || out_of_nodes || out_of_time;
        self.stopped
    }

    fn alphabeta(
        &mut self,
        state: &GameState,
        depth: u32,
        maximizing: bool,
        mut alpha: i64,
        mut beta: i64,
    ) -> i64 {
        self.nodes += 1;
        if depth == 0 || self.should_stop() {
            return evaluate(state, self.color);
        }

        let mut best: Option<i64> = None;
        for (_, child) in children(state) {
            let value = self.alphabeta(&child, depth - 1, !maximizing, alpha, beta);
            if maximizing {
                best = Some(best.map_or(value, |b| b.max(value)));
                alpha = alpha.max(value);
            } else {
                best = Some(best.map_or(value, |b| b.min(value)));
                beta = beta.min(value);
            }
            if alpha >= beta || self.stopped {
                break;
            }
        }
        best.unwrap_or_else(|| dead_end(maximizing))
    }
}

/// Minimax opponent searching a fixed number of plies.
pub struct MinimaxPlayer {
    depth: u32,
    rng: fastrand::Rng,
    limits: SearchLimits,
}

impl MinimaxPlayer {
    /// A searcher looking `depth` plies ahead (a depth of 0 behaves as 1).
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            rng: fastrand::Rng::new(),
            limits: SearchLimits::unlimited(),
        }
    }

    pub fn with_seed(depth: u32, seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            ..Self::new(depth)
        }
    }

    /// The intermediate opponent.
    pub fn leo() -> Self {
        Self::new(LEO_DEPTH)
    }

    /// The strong opponent.
    pub fn magnus() -> Self {
        Self::new(MAGNUS_DEPTH)
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

impl Strategy for MinimaxPlayer {
    fn name(&self) -> &str {
        match self.depth {
            LEO_DEPTH => "Leo",
            MAGNUS_DEPTH => "Magnus",
            _ => "Minimax",
        }
    }

    fn choose_move_with(&mut self, state: &GameState, cancel: &CancelToken) -> Move {
        let color = state.active_color();
        let current = evaluate(state, color);
        let mut search = Search::new(color, cancel, self.limits);
        let mut best_value = i64::MIN;
        let mut best_moves: Vec<Point> = Vec::new();

        for (pt, child) in children(state) {
            if search.should_stop() && !best_moves.is_empty() {
                break;
            }
            let value = search.alphabeta(
                &child,
                self.depth.saturating_sub(1),
                false,
                i64::MIN,
                i64::MAX,
            );
            if value > best_value {
                best_value = value;
                best_moves.clear();
                best_moves.push(pt);
            } else if value == best_value {
                best_moves.push(pt);
            }
        }

        if search.stopped {
            warn!(nodes = search.nodes, "search stopped before completion");
        }
        debug!(
            %color,
            depth = self.depth,
            nodes = search.nodes,
            best_value,
            current,
            candidates = best_moves.len(),
            "search finished"
        );

        if best_moves.is_empty() {
            return Move::Pass;
        }
        // Already ahead and nothing improves on it.
        if best_value <= current && current > 0 {
            return Move::Pass;
        }
        Move::Place(best_moves[self.rng.usize(..best_moves.len())])
    }
}
