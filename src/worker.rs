//! Background search thread.
//!
//! An [`AiWorker`] owns a strategy on its own thread. The caller hands it a
//! copy of the live game with [`AiWorker::request_move`] and later collects
//! the answer without blocking ([`AiWorker::try_result`]) or with a timeout
//! ([`AiWorker::wait_result`]). The live game is never shared with the
//! worker, so it stays free for the caller between requests.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use crate::game::GameState;
use crate::strategy::{CancelToken, Move, Strategy};

/// Answer to one [`AiWorker::request_move`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub request_id: u64,
    pub mv: Move,
    pub elapsed: Duration,
    /// The search was asked to stop before it finished.
    pub cancelled: bool,
}

struct SearchRequest {
    id: u64,
    state: GameState,
    cancel: CancelToken,
}

pub struct AiWorker {
    name: String,
    requests: Option<Sender<SearchRequest>>,
    results: Receiver<SearchOutcome>,
    /// Token of the most recent request.
    cancel: CancelToken,
    next_id: u64,
    handle: Option<thread::JoinHandle<()>>,
}

impl AiWorker {
    /// Move `strategy` onto a new thread.
    pub fn spawn(strategy: Box<dyn Strategy>) -> anyhow::Result<Self> {
        let name = strategy.name().to_string();
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let handle = thread::Builder::new()
            .name(format!("ai-{}", name.to_lowercase()))
            .spawn(move || run_worker(strategy, request_rx, result_tx))
            .context("failed to spawn AI worker thread")?;
        Ok(Self {
            name,
            requests: Some(request_tx),
            results: result_rx,
            cancel: CancelToken::new(),
            next_id: 0,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue a search on a copy of `state`; returns the request id.
    pub fn request_move(&mut self, state: &GameState) -> anyhow::Result<u64> {
        let id = self.next_id;
        self.next_id += 1;
        self.cancel = CancelToken::new();
        let request = SearchRequest {
            id,
            state: state.copy(),
            cancel: self.cancel.clone(),
        };
        self.requests
            .as_ref()
            .ok_or_else(|| anyhow!("AI worker is shut down"))?
            .send(request)
            .map_err(|_| anyhow!("AI worker {} has stopped", self.name))?;
        Ok(id)
    }

    /// Ask the most recent search to stop early.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn try_result(&self) -> Option<SearchOutcome> {
        self.results.try_recv().ok()
    }

    /// Block until the next outcome arrives; `None` if the worker is gone.
    pub fn recv_result(&self) -> Option<SearchOutcome> {
        self.results.recv().ok()
    }

    pub fn wait_result(&self, timeout: Duration) -> Option<SearchOutcome> {
        match self.results.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                warn!(worker = %self.name, "AI worker disconnected");
                None
            }
        }
    }
}

impl Drop for AiWorker {
    fn drop(&mut self) {
        self.cancel.cancel();
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(worker = %self.name, "AI worker panicked");
            }
        }
    }
}

fn run_worker(
    mut strategy: Box<dyn Strategy>,
    requests: Receiver<SearchRequest>,
    results: Sender<SearchOutcome>,
) {
    for request in requests.iter() {
        let started = Instant::now();
        let mv = strategy.choose_move_with(&request.state, &request.cancel);
        let outcome = SearchOutcome {
            request_id: request.id,
            mv,
            elapsed: started.elapsed(),
            cancelled: request.cancel.is_cancelled(),
        };
        let elapsed_ms = outcome.elapsed.as_millis();
        debug!(
            strategy = strategy.name(),
            id = outcome.request_id,
            mv = %outcome.mv,
            elapsed_ms,
            "search complete"
        );
        if results.send(outcome).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimax::MinimaxPlayer;
    use crate::random_player::RandomPlayer;

    #[test]
    fn test_worker_answers_request() {
        let player = RandomPlayer::with_seed(4)
            .with_resign_probability(0.0)
            .with_resign_threshold(None);
        let mut worker = AiWorker::spawn(Box::new(player)).unwrap();
        let state = GameState::new(5);
        let id = worker.request_move(&state).unwrap();
        let outcome = worker.wait_result(Duration::from_secs(10)).unwrap();
        assert_eq!(outcome.request_id, id);
        assert!(matches!(outcome.mv, Move::Place(_)));
        assert!(!outcome.cancelled);
    }

    #[test]
    fn test_requests_are_answered_in_order() {
        let mut worker = AiWorker::spawn(Box::new(MinimaxPlayer::with_seed(1, 8))).unwrap();
        let state = GameState::new(3);
        let first = worker.request_move(&state).unwrap();
        let second = worker.request_move(&state).unwrap();
        let a = worker.wait_result(Duration::from_secs(10)).unwrap();
        let b = worker.wait_result(Duration::from_secs(10)).unwrap();
        assert_eq!((a.request_id, b.request_id), (first, second));
    }

    #[test]
    fn test_cancel_stops_long_search() {
        let mut worker = AiWorker::spawn(Box::new(MinimaxPlayer::with_seed(6, 1))).unwrap();
        let state = GameState::new(9);
        worker.request_move(&state).unwrap();
        thread::sleep(Duration::from_millis(50));
        worker.cancel();
        let outcome = worker.wait_result(Duration::from_secs(30)).unwrap();
        assert!(outcome.cancelled);
        assert!(matches!(outcome.mv, Move::Place(_)));
    }

    #[test]
    fn test_try_result_does_not_block() {
        let worker = AiWorker::spawn(Box::new(MinimaxPlayer::with_seed(1, 2))).unwrap();
        assert!(worker.try_result().is_none());
    }
}
