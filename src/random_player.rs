//! The random opponent ("Martin").
//!
//! Plays a uniformly random legal point. It occasionally resigns out of the
//! blue and often answers a pass with a pass. Resigning when far behind is
//! opt-in, since area scoring hands a lone first stone the whole board.

use tracing::debug;

use crate::board::Point;
use crate::constants::{PASS_PROBABILITY, RESIGN_PROBABILITY, RESIGN_THRESHOLD};
use crate::game::GameState;
use crate::strategy::{CancelToken, Move, Strategy};

pub struct RandomPlayer {
    rng: fastrand::Rng,
    resign_probability: f64,
    pass_probability: f64,
    /// Resign when the opponent leads by more than this many points.
    /// Off unless set.
    resign_threshold: Option<i64>,
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self::from_rng(fastrand::Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed))
    }

    fn from_rng(rng: fastrand::Rng) -> Self {
        Self {
            rng,
            resign_probability: RESIGN_PROBABILITY,
            pass_probability: PASS_PROBABILITY,
            resign_threshold: None,
        }
    }

    pub fn with_resign_probability(mut self, p: f64) -> Self {
        self.resign_probability = p;
        self
    }

    pub fn with_pass_probability(mut self, p: f64) -> Self {
        self.pass_probability = p;
        self
    }

    pub fn with_resign_threshold(mut self, threshold: Option<i64>) -> Self {
        self.resign_threshold = threshold;
        self
    }

    /// Resign once the opponent leads by more than [`RESIGN_THRESHOLD`].
    pub fn resigning_when_behind(self) -> Self {
        self.with_resign_threshold(Some(RESIGN_THRESHOLD))
    }

    /// Draw empty points without replacement until one is accepted by a
    /// trial move on a copy of the game.
    fn random_legal_point(&mut self, state: &GameState, cancel: &CancelToken) -> Option<Point> {
        let mut candidates = state.board().empty_points();
        while !candidates.is_empty() && !cancel.is_cancelled() {
            let pt = candidates.swap_remove(self.rng.usize(..candidates.len()));
            let mut trial = state.copy();
            if trial.take_move_at(pt).0 {
                return Some(pt);
            }
        }
        None
    }
}

impl Strategy for RandomPlayer {
    fn name(&self) -> &str {
        "Martin"
    }

    fn choose_move_with(&mut self, state: &GameState, cancel: &CancelToken) -> Move {
        let color = state.active_color();
        if self.rng.f64() < self.resign_probability {
            debug!(%color, "random resignation");
            return Move::Resign;
        }
        if let Some(threshold) = self.resign_threshold {
            let deficit = state.score().margin(color.opponent());
            if deficit > threshold {
                debug!(%color, deficit, "resigning a lost game");
                return Move::Resign;
            }
        }
        if state.passed(color.opponent()) && self.rng.f64() < self.pass_probability {
            return Move::Pass;
        }
        match self.random_legal_point(state, cancel) {
            Some(pt) => Move::Place(pt),
            None => Move::Pass,
        }
    }
}
