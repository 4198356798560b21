//! Default parameters for the rules engine and the move strategies.
//!
//! Board size is a runtime value (any `size >= 1`); the values here are the
//! defaults picked up by the CLI and by the strategy constructors.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size used when none is given on the command line.
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Largest board the GTP front-end accepts (letters A-Z minus I).
pub const MAX_BOARD_SIZE: usize = 25;

/// Upper bound on moves in a self-play game before it is stopped.
pub const MAX_GAME_LEN: usize = DEFAULT_BOARD_SIZE * DEFAULT_BOARD_SIZE * 3;

// =============================================================================
// Random Player
// =============================================================================

/// Probability of resigning on any turn regardless of the position.
pub const RESIGN_PROBABILITY: f64 = 0.0001;

/// Probability of passing right after the opponent has passed.
pub const PASS_PROBABILITY: f64 = 0.5;

/// Score deficit above which the random player resigns, when enabled.
pub const RESIGN_THRESHOLD: i64 = 50;

// =============================================================================
// Minimax Search
// =============================================================================

/// Ply depth of the intermediate searcher ("Leo").
pub const LEO_DEPTH: u32 = 2;

/// Ply depth of the strong searcher ("Magnus").
pub const MAGNUS_DEPTH: u32 = 4;

/// Number of search nodes between two wall-clock checks.
pub const DEADLINE_CHECK_INTERVAL: u64 = 256;
