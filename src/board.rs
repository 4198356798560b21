//! Board representation and the rules of Go.
//!
//! The [`Goban`] owns a `size x size` grid of [`Color`] and the append-only
//! list of grid snapshots used by the simple-ko check. Coordinates are
//! `(x, y)` with `x` the row (0 at the top) and `y` the column.
//!
//! Legality is tested by really placing the stone and resolving captures,
//! then reverting through a [`Trial`] guard whose `Drop` restores the grid on
//! every exit path.

use std::fmt;
use std::ops::{Deref, Index};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use thiserror::Error;
use tracing::debug;

/// Content of a single intersection.
///
/// Serialized as the integers `0`, `1` and `2`.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum Color {
    #[default]
    Empty = 0,
    Black = 1,
    White = 2,
}

impl Color {
    /// The other player's color.
    ///
    /// # Panics
    /// `Empty` has no opponent.
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            Color::Empty => panic!("Color::Empty has no opponent"),
        }
    }

    pub fn is_stone(self) -> bool {
        self != Color::Empty
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Empty => "empty",
            Color::Black => "black",
            Color::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `(row, column)` coordinate on the board.
pub type Point = (usize, usize);

/// Why a stone cannot be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: point is off the board")]
    OutOfBounds,
    #[error("illegal move: point not empty")]
    Occupied,
    #[error("illegal move: suicide")]
    Suicide,
    #[error("illegal move: retakes ko")]
    Ko,
}

/// A maximal group of connected same-colored stones and its liberties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub color: Color,
    pub stones: Vec<Point>,
    pub liberties: Vec<Point>,
}

impl Chain {
    pub fn is_captured(&self) -> bool {
        self.liberties.is_empty()
    }
}

/// Empty regions of the board, grouped by owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Territories {
    pub black: Vec<Vec<Point>>,
    pub white: Vec<Vec<Point>>,
    /// Regions bordered by both colors or by no stone at all.
    pub neutral: Vec<Vec<Point>>,
}

impl Territories {
    /// Regions owned by `color`; `Color::Empty` yields the neutral regions.
    pub fn of(&self, color: Color) -> &[Vec<Point>] {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
            Color::Empty => &self.neutral,
        }
    }

    /// Number of intersections owned by `color`.
    pub fn area(&self, color: Color) -> usize {
        self.of(color).iter().map(Vec::len).sum()
    }
}

/// Area score (stones plus owned territory) of both players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub black: u32,
    pub white: u32,
}

impl Score {
    /// Points of `color` minus points of its opponent.
    pub fn margin(&self, color: Color) -> i64 {
        i64::from(self[color]) - i64::from(self[color.opponent()])
    }

    /// The color with strictly more points, if any.
    pub fn leader(&self) -> Option<Color> {
        match self.black.cmp(&self.white) {
            std::cmp::Ordering::Greater => Some(Color::Black),
            std::cmp::Ordering::Less => Some(Color::White),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl Index<Color> for Score {
    type Output = u32;

    fn index(&self, color: Color) -> &u32 {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
            Color::Empty => panic!("no score is kept for empty points"),
        }
    }
}

/// A Go board with its position history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goban {
    size: usize,
    cells: Vec<Color>,
    /// Snapshots after every accepted move, starting with the empty board.
    history: Vec<Arc<[Color]>>,
}

impl Goban {
    /// Create an empty board.
    ///
    /// # Panics
    /// If `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "board size must be positive");
        let cells = vec![Color::Empty; size * size];
        let history = vec![Arc::from(cells.as_slice())];
        Self {
            size,
            cells,
            history,
        }
    }

    /// Rebuild a board from a grid and its history, both already validated.
    pub(crate) fn from_parts(size: usize, cells: Vec<Color>, history: Vec<Vec<Color>>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self {
            size,
            cells,
            history: history.into_iter().map(Arc::from).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn on_board(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    /// Color at `(x, y)`, or `None` off the board.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if !self.on_board(x, y) {
            return None;
        }
        Some(self.cells[self.index((x, y))])
    }

    /// Row-major view of the live grid.
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    /// All recorded snapshots, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &[Color]> + '_ {
        self.history.iter().map(|grid| &grid[..])
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of stones of `color` on the board.
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == color).count()
    }

    /// Every empty intersection in row-major order.
    pub fn empty_points(&self) -> Vec<Point> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i] == Color::Empty)
            .map(|i| (i / self.size, i % self.size))
            .collect()
    }

    #[inline]
    fn index(&self, (x, y): Point) -> usize {
        x * self.size + y
    }

    /// Put `color` at `(x, y)` without any rule checking.
    ///
    /// Neither captures nor history are touched; this is the raw primitive
    /// used to set up positions.
    ///
    /// # Panics
    /// If the point is off the board.
    pub fn place(&mut self, x: usize, y: usize, color: Color) {
        assert!(self.on_board(x, y), "({x}, {y}) is off the board");
        let i = self.index((x, y));
        self.cells[i] = color;
    }

    /// Flood-fill the chain containing `(x, y)` and collect its liberties.
    ///
    /// # Panics
    /// If the point is off the board or empty.
    pub fn chain_and_liberties(&self, x: usize, y: usize) -> Chain {
        assert!(self.on_board(x, y), "({x}, {y}) is off the board");
        let start = self.index((x, y));
        let color = self.cells[start];
        assert!(color.is_stone(), "no chain at empty point ({x}, {y})");

        let mut visited = vec![false; self.cells.len()];
        let mut liberty_seen = vec![false; self.cells.len()];
        let mut stones = Vec::new();
        let mut liberties = Vec::new();
        let mut stack = vec![(x, y)];
        visited[start] = true;

        while let Some(pt) = stack.pop() {
            stones.push(pt);
            for n in neighbors(self.size, pt) {
                let ni = self.index(n);
                match self.cells[ni] {
                    Color::Empty => {
                        if !liberty_seen[ni] {
                            liberty_seen[ni] = true;
                            liberties.push(n);
                        }
                    }
                    c if c == color && !visited[ni] => {
                        visited[ni] = true;
                        stack.push(n);
                    }
                    _ => {}
                }
            }
        }

        Chain {
            color,
            stones,
            liberties,
        }
    }

    /// Place a stone and remove every adjacent opponent chain left without
    /// liberties. Returns the removed stones.
    fn place_and_capture(&mut self, pt: Point, color: Color) -> Vec<Point> {
        self.place(pt.0, pt.1, color);
        let opponent = color.opponent();
        let mut captured = Vec::new();
        for (nx, ny) in neighbors(self.size, pt) {
            // A chain already removed through another neighbor reads as empty.
            if self.cells[self.index((nx, ny))] != opponent {
                continue;
            }
            let chain = self.chain_and_liberties(nx, ny);
            if chain.is_captured() {
                for &(sx, sy) in &chain.stones {
                    self.place(sx, sy, Color::Empty);
                }
                captured.extend(chain.stones);
            }
        }
        captured
    }

    /// True if the live grid equals the snapshot from two plies ago.
    fn repeats_previous_position(&self) -> bool {
        let n = self.history.len();
        n >= 2 && self.history[n - 2][..] == self.cells[..]
    }

    /// Check whether `color` may play at `(x, y)`, with the reason if not.
    ///
    /// The stone is placed and captures are resolved for real, then undone
    /// when the trial goes out of scope; the board is unchanged afterwards.
    pub fn check_move(&mut self, x: usize, y: usize, color: Color) -> Result<(), MoveError> {
        assert!(color.is_stone(), "cannot play an empty stone");
        if !self.on_board(x, y) {
            return Err(MoveError::OutOfBounds);
        }
        if self.cells[self.index((x, y))] != Color::Empty {
            return Err(MoveError::Occupied);
        }

        let trial = Trial::play(self, (x, y), color);
        if trial.captured.is_empty() && trial.chain_and_liberties(x, y).liberties.is_empty() {
            return Err(MoveError::Suicide);
        }
        if trial.repeats_previous_position() {
            return Err(MoveError::Ko);
        }
        Ok(())
    }

    /// Whether `color` may play at `(x, y)`. Never modifies the board.
    pub fn is_legal_move(&mut self, x: usize, y: usize, color: Color) -> bool {
        self.check_move(x, y, color).is_ok()
    }

    /// Play a stone if legal.
    ///
    /// Returns `(accepted, captured)`. A rejected move leaves the board as it
    /// was and returns `(false, false)`.
    pub fn play_move(&mut self, x: usize, y: usize, color: Color) -> (bool, bool) {
        if let Err(err) = self.check_move(x, y, color) {
            debug!(x, y, %color, %err, "move rejected");
            return (false, false);
        }
        let captured = self.place_and_capture((x, y), color);
        self.history.push(Arc::from(self.cells.as_slice()));
        if !captured.is_empty() {
            debug!(x, y, %color, stones = captured.len(), "captured");
        }
        (true, !captured.is_empty())
    }

    /// The stone most recently placed by `color`, found by comparing the
    /// live grid with the previous snapshot.
    pub fn last_placement(&self, color: Color) -> Option<Point> {
        let n = self.history.len();
        if n < 2 {
            return None;
        }
        let previous = &self.history[n - 2];
        (0..self.cells.len())
            .find(|&i| self.cells[i] == color && previous[i] != color)
            .map(|i| (i / self.size, i % self.size))
    }

    /// Group empty points into regions and assign each to the single color
    /// bordering it, if there is exactly one.
    pub fn territories(&self) -> Territories {
        let mut territories = Territories::default();
        let mut visited = vec![false; self.cells.len()];

        for start in 0..self.cells.len() {
            if self.cells[start] != Color::Empty || visited[start] {
                continue;
            }
            let mut region = Vec::new();
            let mut touches_black = false;
            let mut touches_white = false;
            let mut stack = vec![(start / self.size, start % self.size)];
            visited[start] = true;

            while let Some(pt) = stack.pop() {
                region.push(pt);
                for n in neighbors(self.size, pt) {
                    let ni = self.index(n);
                    match self.cells[ni] {
                        Color::Empty => {
                            if !visited[ni] {
                                visited[ni] = true;
                                stack.push(n);
                            }
                        }
                        Color::Black => touches_black = true,
                        Color::White => touches_white = true,
                    }
                }
            }

            match (touches_black, touches_white) {
                (true, false) => territories.black.push(region),
                (false, true) => territories.white.push(region),
                _ => territories.neutral.push(region),
            }
        }
        territories
    }

    /// Chinese area score: stones on the board plus owned territory.
    pub fn score(&self) -> Score {
        let territories = self.territories();
        let total = |color| (self.count(color) + territories.area(color)) as u32;
        Score {
            black: total(Color::Black),
            white: total(Color::White),
        }
    }
}

impl fmt::Display for Goban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: Vec<&str> = row
                .iter()
                .map(|c| match c {
                    Color::Black => "X",
                    Color::White => "O",
                    Color::Empty => ".",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// A stone placed for evaluation only; dropping the guard puts back the
/// captured stones and clears the placed point.
struct Trial<'a> {
    goban: &'a mut Goban,
    placed: Point,
    color: Color,
    captured: Vec<Point>,
}

impl<'a> Trial<'a> {
    /// The placed point must be empty.
    fn play(goban: &'a mut Goban, placed: Point, color: Color) -> Self {
        let captured = goban.place_and_capture(placed, color);
        Self {
            goban,
            placed,
            color,
            captured,
        }
    }
}

impl Deref for Trial<'_> {
    type Target = Goban;

    fn deref(&self) -> &Goban {
        self.goban
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        let opponent = self.color.opponent();
        for &(x, y) in &self.captured {
            self.goban.place(x, y, opponent);
        }
        self.goban.place(self.placed.0, self.placed.1, Color::Empty);
    }
}

/// The orthogonal neighbors of `(x, y)` that lie on a board of `size`.
fn neighbors(size: usize, (x, y): Point) -> impl Iterator<Item = Point> {
    let down = (x + 1 < size).then_some((x + 1, y));
    let up = x.checked_sub(1).map(|nx| (nx, y));
    let right = (y + 1 < size).then_some((x, y + 1));
    let left = y.checked_sub(1).map(|ny| (x, ny));
    [down, up, right, left].into_iter().flatten()
}
