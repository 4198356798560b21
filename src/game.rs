//! Game state: turn order, passes and the end of the game.

use tracing::{debug, info, warn};

use crate::board::{Color, Goban, Point, Score};

/// Whether the game still accepts moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// Both players have passed; terminal.
    Over,
}

/// A game of Go between Black and White on a single [`Goban`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Goban,
    active_color: Color,
    black_passed: bool,
    white_passed: bool,
    move_count: u32,
    is_singleplayer: bool,
}

impl GameState {
    /// A fresh game with Black to play.
    pub fn new(size: usize) -> Self {
        Self {
            board: Goban::new(size),
            active_color: Color::Black,
            black_passed: false,
            white_passed: false,
            move_count: 0,
            is_singleplayer: false,
        }
    }

    pub(crate) fn from_parts(
        board: Goban,
        active_color: Color,
        black_passed: bool,
        white_passed: bool,
        move_count: u32,
        is_singleplayer: bool,
    ) -> Self {
        Self {
            board,
            active_color,
            black_passed,
            white_passed,
            move_count,
            is_singleplayer,
        }
    }

    pub fn board(&self) -> &Goban {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// The color to move.
    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn black_passed(&self) -> bool {
        self.black_passed
    }

    pub fn white_passed(&self) -> bool {
        self.white_passed
    }

    /// Whether `color` has passed since the last stone was played.
    pub fn passed(&self, color: Color) -> bool {
        match color {
            Color::Black => self.black_passed,
            Color::White => self.white_passed,
            Color::Empty => false,
        }
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn is_singleplayer(&self) -> bool {
        self.is_singleplayer
    }

    /// Mark the game as played against a computer opponent.
    pub fn set_singleplayer(&mut self) {
        self.is_singleplayer = true;
    }

    fn switch_player(&mut self) {
        self.active_color = self.active_color.opponent();
    }

    /// Play a stone for the active color.
    ///
    /// Returns `(accepted, captured)`; on rejection nothing changes. Moves
    /// are rejected once the game is over.
    pub fn take_move(&mut self, x: usize, y: usize) -> (bool, bool) {
        if self.is_over() {
            warn!(x, y, "move after the end of the game");
            return (false, false);
        }
        let (accepted, captured) = self.board.play_move(x, y, self.active_color);
        if !accepted {
            return (false, false);
        }
        self.move_count += 1;
        self.black_passed = false;
        self.white_passed = false;
        self.switch_player();
        (true, captured)
    }

    /// [`take_move`](Self::take_move) with a [`Point`].
    pub fn take_move_at(&mut self, (x, y): Point) -> (bool, bool) {
        self.take_move(x, y)
    }

    /// Pass for the active color. The opponent's pass flag is kept, so two
    /// passes in a row end the game.
    pub fn pass_move(&mut self) {
        if self.is_over() {
            warn!("pass after the end of the game");
            return;
        }
        match self.active_color {
            Color::Black => self.black_passed = true,
            Color::White => self.white_passed = true,
            Color::Empty => unreachable!("the active color is always a stone color"),
        }
        debug!(color = %self.active_color, move_count = self.move_count, "pass");
        self.move_count += 1;
        self.switch_player();
        if self.is_over() {
            let score = self.score();
            info!(black = score.black, white = score.white, "game over");
        }
    }

    pub fn is_over(&self) -> bool {
        self.black_passed && self.white_passed
    }

    pub fn status(&self) -> GameStatus {
        if self.is_over() {
            GameStatus::Over
        } else {
            GameStatus::InProgress
        }
    }

    pub fn score(&self) -> Score {
        self.board.score()
    }

    /// The player with the higher area score; `None` on a tie (no komi).
    pub fn winner(&self) -> Option<Color> {
        self.score().leader()
    }

    /// An independent deep copy for exploring hypothetical continuations.
    pub fn copy(&self) -> GameState {
        self.clone()
    }

    /// Legal points for the active color, in row-major order.
    pub fn legal_moves(&self) -> Vec<Point> {
        let mut board = self.board.clone();
        let color = self.active_color;
        self.board
            .empty_points()
            .into_iter()
            .filter(|&(x, y)| board.is_legal_move(x, y, color))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = GameState::new(9);
        assert_eq!(game.active_color(), Color::Black);
        assert_eq!(game.move_count(), 0);
        assert!(!game.is_over());
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(!game.is_singleplayer());
    }

    #[test]
    fn test_take_move_alternates() {
        let mut game = GameState::new(5);
        assert_eq!(game.take_move(2, 2), (true, false));
        assert_eq!(game.active_color(), Color::White);
        assert_eq!(game.board().get(2, 2), Some(Color::Black));
        assert_eq!(game.take_move(2, 3), (true, false));
        assert_eq!(game.active_color(), Color::Black);
        assert_eq!(game.move_count(), 2);
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut game = GameState::new(5);
        game.take_move(2, 2);
        let before = game.copy();
        assert_eq!(game.take_move(2, 2), (false, false));
        assert_eq!(game, before);
    }

    #[test]
    fn test_two_passes_end_game() {
        let mut game = GameState::new(5);
        game.pass_move();
        assert!(game.black_passed());
        assert!(!game.is_over());
        game.pass_move();
        assert!(game.is_over());
        assert_eq!(game.status(), GameStatus::Over);
        assert_eq!(game.move_count(), 2);
    }

    #[test]
    fn test_move_clears_pass_flags() {
        let mut game = GameState::new(5);
        game.pass_move();
        assert!(game.passed(Color::Black));
        game.take_move(0, 0);
        assert!(!game.passed(Color::Black));
        assert!(!game.passed(Color::White));
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut game = GameState::new(5);
        game.pass_move();
        game.pass_move();
        let before = game.copy();
        assert_eq!(game.take_move(1, 1), (false, false));
        game.pass_move();
        assert_eq!(game, before);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut game = GameState::new(5);
        game.take_move(1, 1);
        let mut copy = game.copy();
        copy.take_move(3, 3);
        assert_eq!(game.board().get(3, 3), Some(Color::Empty));
        assert_eq!(game.move_count(), 1);
        assert_eq!(copy.board().history_len(), 3);
        assert_eq!(game.board().history_len(), 2);
    }

    #[test]
    fn test_winner() {
        let mut game = GameState::new(3);
        assert_eq!(game.winner(), None);
        game.take_move(1, 1);
        assert_eq!(game.winner(), Some(Color::Black));
    }

    #[test]
    fn test_legal_moves_excludes_suicide() {
        let mut game = GameState::new(2);
        game.take_move(0, 1);
        game.pass_move();
        game.take_move(1, 0);
        // White to move; (0, 0) and (1, 1) are both suicide.
        assert!(game.legal_moves().is_empty());
    }
}
