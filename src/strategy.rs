//! Move selection strategies.
//!
//! Every strategy picks a [`Move`] for the active color of a [`GameState`]
//! and explores only copies of it; the caller applies the chosen move.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::ValueEnum;

use crate::board::Point;
use crate::constants::{LEO_DEPTH, MAGNUS_DEPTH};
use crate::game::GameState;
use crate::minimax::MinimaxPlayer;
use crate::random_player::RandomPlayer;

/// The decision of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Place(Point),
    Pass,
    Resign,
}

impl Move {
    pub fn point(self) -> Option<Point> {
        match self {
            Move::Place(pt) => Some(pt),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place((x, y)) => write!(f, "({x}, {y})"),
            Move::Pass => f.write_str("pass"),
            Move::Resign => f.write_str("resign"),
        }
    }
}

/// Shared flag asking a running search to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Budget for a single search. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_nodes: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = Some(nodes);
        self
    }
}

/// A move selection algorithm.
pub trait Strategy: Send {
    fn name(&self) -> &str;

    /// Choose a move for `state.active_color()`, giving up early once
    /// `cancel` is set.
    fn choose_move_with(&mut self, state: &GameState, cancel: &CancelToken) -> Move;

    fn choose_move(&mut self, state: &GameState) -> Move {
        self.choose_move_with(state, &CancelToken::new())
    }
}

/// The built-in opponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    /// Random legal moves ("Martin")
    Random,
    /// Two-ply minimax ("Leo")
    Leo,
    /// Four-ply minimax ("Magnus")
    Magnus,
}

impl StrategyKind {
    /// Build the strategy, seeding its generator when `seed` is given.
    pub fn build(self, seed: Option<u64>, limits: SearchLimits) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Random => {
                let player = match seed {
                    Some(seed) => RandomPlayer::with_seed(seed),
                    None => RandomPlayer::new(),
                };
                Box::new(player)
            }
            StrategyKind::Leo | StrategyKind::Magnus => {
                let depth = if self == StrategyKind::Leo { LEO_DEPTH } else { MAGNUS_DEPTH };
                let player = match seed {
                    Some(seed) => MinimaxPlayer::with_seed(depth, seed),
                    None => MinimaxPlayer::new(depth),
                };
                Box::new(player.with_limits(limits))
            }
        }
    }
}
