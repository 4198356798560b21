//! Saving and restoring games.
//!
//! A [`GameSnapshot`] carries exactly the fields needed to resume a game.
//! Grids are nested lists of color codes (`0` empty, `1` black, `2` white).

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::board::{Color, Goban};
use crate::game::GameState;

/// Serializable form of a [`GameState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub size: usize,
    pub board: Vec<Vec<Color>>,
    pub active_color: Color,
    pub black_passed: bool,
    pub white_passed: bool,
    pub move_count: u32,
    pub history: Vec<Vec<Vec<Color>>>,
    pub is_singleplayer: bool,
}

/// Reasons a snapshot cannot be turned back into a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("board size must be positive")]
    ZeroSize,
    #[error("board grid is not {size}x{size}")]
    BoardShape { size: usize },
    #[error("history entry {index} is not {size}x{size}")]
    HistoryShape { index: usize, size: usize },
    #[error("history must contain at least the initial position")]
    EmptyHistory,
    #[error("active color must be black or white")]
    NoActiveColor,
}

fn to_rows(cells: &[Color], size: usize) -> Vec<Vec<Color>> {
    cells.chunks(size).map(<[Color]>::to_vec).collect()
}

/// Flatten a square grid, or `None` if it is not `size x size`.
fn flatten(rows: &[Vec<Color>], size: usize) -> Option<Vec<Color>> {
    if rows.len() != size || rows.iter().any(|row| row.len() != size) {
        return None;
    }
    Some(rows.concat())
}

impl From<&GameState> for GameSnapshot {
    fn from(game: &GameState) -> Self {
        let board = game.board();
        let size = board.size();
        Self {
            size,
            board: to_rows(board.cells(), size),
            active_color: game.active_color(),
            black_passed: game.black_passed(),
            white_passed: game.white_passed(),
            move_count: game.move_count(),
            history: board.history().map(|grid| to_rows(grid, size)).collect(),
            is_singleplayer: game.is_singleplayer(),
        }
    }
}

impl TryFrom<GameSnapshot> for GameState {
    type Error = SnapshotError;

    fn try_from(snapshot: GameSnapshot) -> Result<Self, SnapshotError> {
        let size = snapshot.size;
        if size == 0 {
            return Err(SnapshotError::ZeroSize);
        }
        if !snapshot.active_color.is_stone() {
            return Err(SnapshotError::NoActiveColor);
        }
        if snapshot.history.is_empty() {
            return Err(SnapshotError::EmptyHistory);
        }
        let cells = flatten(&snapshot.board, size).ok_or(SnapshotError::BoardShape { size })?;
        let history = snapshot
            .history
            .iter()
            .enumerate()
            .map(|(index, grid)| flatten(grid, size).ok_or(SnapshotError::HistoryShape { index, size }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GameState::from_parts(
            Goban::from_parts(size, cells, history),
            snapshot.active_color,
            snapshot.black_passed,
            snapshot.white_passed,
            snapshot.move_count,
            snapshot.is_singleplayer,
        ))
    }
}

impl GameState {
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot::from(self)
    }

    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<GameState, SnapshotError> {
        GameState::try_from(snapshot)
    }
}

/// Serialize a game as pretty-printed JSON.
pub fn to_json(game: &GameState) -> anyhow::Result<String> {
    serde_json::to_string_pretty(&game.to_snapshot()).context("failed to serialize game")
}

/// Parse and validate a game from JSON.
pub fn from_json(json: &str) -> anyhow::Result<GameState> {
    let snapshot: GameSnapshot = serde_json::from_str(json).context("malformed game snapshot")?;
    Ok(GameState::from_snapshot(snapshot)?)
}

/// Write a game to `path`.
pub fn save_game(game: &GameState, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    fs::write(path, to_json(game)?).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), moves = game.move_count(), "game saved");
    Ok(())
}

/// Read a game previously written by [`save_game`].
pub fn load_game(path: impl AsRef<Path>) -> anyhow::Result<GameState> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let game = from_json(&json).with_context(|| format!("failed to load {}", path.display()))?;
    info!(path = %path.display(), moves = game.move_count(), "game loaded");
    Ok(game)
}
