//! Goban-AI: a Go rules engine with computer opponents.
//!
//! The rules engine tracks the board and its history, enforces captures,
//! suicide and simple ko, and computes Chinese area scores. On top of it sit
//! move selection strategies, from random play to alpha-beta minimax.
//!
//! ## Modules
//!
//! - [`constants`] - Default sizes and strategy parameters
//! - [`board`] - Board, chains, legality, territory and score
//! - [`game`] - Turns, passes and the end of the game
//! - [`snapshot`] - Saving and restoring games as JSON
//! - [`strategy`] - The `Strategy` trait, moves and search limits
//! - [`random_player`] - Random legal moves
//! - [`minimax`] - Minimax search with alpha-beta pruning
//! - [`worker`] - Running a strategy on a background thread
//! - [`gtp`] - Go Text Protocol front-end and vertex notation
//!
//! ## Example
//!
//! ```
//! use goban_ai::game::GameState;
//! use goban_ai::minimax::MinimaxPlayer;
//! use goban_ai::strategy::{Move, Strategy};
//!
//! let mut game = GameState::new(5);
//! game.take_move(2, 2);
//!
//! let mut leo = MinimaxPlayer::with_seed(2, 7);
//! match leo.choose_move(&game) {
//!     Move::Place((x, y)) => assert!(game.take_move(x, y).0),
//!     Move::Pass => game.pass_move(),
//!     Move::Resign => {}
//! }
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod gtp;
pub mod minimax;
pub mod random_player;
pub mod snapshot;
pub mod strategy;
pub mod worker;
