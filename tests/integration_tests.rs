//! Integration tests for the rules engine and game state.
//!
//! Positions are set up either stone by stone with `Goban::place` or by
//! alternating moves through `GameState`.

use goban_ai::board::{Color, Goban, MoveError};
use goban_ai::game::GameState;
use goban_ai::gtp::{point_to_vertex, vertex_to_point};
use goban_ai::snapshot::{from_json, load_game, save_game, to_json};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Play a sequence of alternating moves; `None` is a pass.
fn setup_game(size: usize, moves: &[Option<(usize, usize)>]) -> GameState {
    let mut game = GameState::new(size);
    for mv in moves {
        match *mv {
            Some((x, y)) => {
                let (accepted, _) = game.take_move(x, y);
                assert!(accepted, "setup move ({x}, {y}) was rejected");
            }
            None => game.pass_move(),
        }
    }
    game
}

/// The standard ko shape on a 5x5 board, right after Black took the White
/// stone at (1, 1) by playing (1, 2). White to move.
///
/// ```text
/// . X O . .
/// X . X O .
/// . X O . .
/// . . . . .
/// . . . . X
/// ```
fn ko_position() -> GameState {
    let mut game = setup_game(
        5,
        &[
            Some((0, 1)),
            Some((0, 2)),
            Some((1, 0)),
            Some((1, 3)),
            Some((2, 1)),
            Some((2, 2)),
            Some((4, 4)),
            Some((1, 1)),
        ],
    );
    assert_eq!(game.take_move(1, 2), (true, true));
    game
}

// =============================================================================
// Capture and suicide
// =============================================================================

#[test]
fn test_capture_single_stone() {
    let mut board = Goban::new(5);
    board.place(2, 2, Color::White);
    board.place(1, 2, Color::Black);
    board.place(3, 2, Color::Black);
    board.place(2, 1, Color::Black);

    let (accepted, captured) = board.play_move(2, 3, Color::Black);
    assert!(accepted);
    assert!(captured);
    assert_eq!(board.get(2, 2), Some(Color::Empty));
    assert_eq!(board.get(2, 3), Some(Color::Black));
}

#[test]
fn test_capture_group_in_corner() {
    let mut board = Goban::new(5);
    board.place(0, 0, Color::White);
    board.place(0, 1, Color::White);
    board.place(1, 0, Color::Black);
    board.place(1, 1, Color::Black);

    assert_eq!(board.play_move(0, 2, Color::Black), (true, true));
    assert_eq!(board.count(Color::White), 0);
}

#[test]
fn test_capture_two_chains_at_once() {
    let mut board = Goban::new(3);
    board.place(0, 1, Color::White);
    board.place(1, 0, Color::White);
    board.place(0, 2, Color::Black);
    board.place(1, 1, Color::Black);
    board.place(2, 0, Color::Black);

    assert_eq!(board.play_move(0, 0, Color::Black), (true, true));
    assert_eq!(board.count(Color::White), 0);
    assert_eq!(board.chain_and_liberties(0, 0).liberties.len(), 2);
}

#[test]
fn test_suicide_single_stone() {
    let mut board = Goban::new(3);
    board.place(0, 1, Color::White);
    board.place(1, 0, Color::White);
    board.place(1, 2, Color::White);

    assert!(!board.is_legal_move(0, 0, Color::Black));
    assert_eq!(board.play_move(0, 0, Color::Black), (false, false));
    assert_eq!(board.get(0, 0), Some(Color::Empty));
    // White may fill its own point.
    assert!(board.is_legal_move(0, 0, Color::White));
}

#[test]
fn test_suicide_of_group() {
    let mut board = Goban::new(3);
    board.place(0, 0, Color::Black);
    board.place(0, 2, Color::White);
    board.place(1, 0, Color::White);
    board.place(1, 1, Color::White);

    assert_eq!(board.check_move(0, 1, Color::Black), Err(MoveError::Suicide));
}

#[test]
fn test_rejected_moves_leave_history_alone() {
    let mut board = Goban::new(3);
    board.play_move(1, 1, Color::Black);
    let before = board.clone();
    assert_eq!(board.play_move(1, 1, Color::White), (false, false));
    assert_eq!(board.play_move(3, 3, Color::White), (false, false));
    assert_eq!(board, before);
    assert_eq!(board.history_len(), 2);
}

// =============================================================================
// Legality checks never mutate
// =============================================================================

#[test]
fn test_is_legal_move_is_non_mutating() {
    let mut rng = fastrand::Rng::with_seed(99);
    for _ in 0..20 {
        let mut board = Goban::new(4);
        for x in 0..4 {
            for y in 0..4 {
                let color = match rng.u8(..3) {
                    0 => Color::Empty,
                    1 => Color::Black,
                    _ => Color::White,
                };
                board.place(x, y, color);
            }
        }
        let before = board.clone();
        for x in 0..5 {
            for y in 0..5 {
                for color in [Color::Black, Color::White] {
                    let _ = board.is_legal_move(x, y, color);
                    assert_eq!(board, before);
                }
            }
        }
    }
}

// =============================================================================
// Ko
// =============================================================================

#[test]
fn test_simple_ko_rejects_immediate_recapture() {
    let mut game = ko_position();
    assert_eq!(game.active_color(), Color::White);
    let before = game.copy();

    let mut board = game.board().clone();
    assert_eq!(board.check_move(1, 1, Color::White), Err(MoveError::Ko));
    assert_eq!(game.take_move(1, 1), (false, false));
    assert_eq!(game, before);
}

#[test]
fn test_ko_recapture_after_exchange_elsewhere() {
    let mut game = ko_position();
    assert!(game.take_move(4, 0).0);
    assert!(game.take_move(4, 2).0);
    assert_eq!(game.take_move(1, 1), (true, true));
    assert_eq!(game.board().get(1, 2), Some(Color::Empty));
}

#[test]
fn test_ko_recapture_after_one_intervening_move() {
    let game = ko_position();
    let mut board = game.board().clone();
    assert!(board.play_move(4, 2, Color::Black).0);
    assert_eq!(board.play_move(1, 1, Color::White), (true, true));
}

// =============================================================================
// Passing and the end of the game
// =============================================================================

#[test]
fn test_single_pass_does_not_end_game() {
    let game = setup_game(5, &[None]);
    assert!(!game.is_over());
    let game = setup_game(5, &[None, Some((1, 1)), None]);
    assert!(!game.is_over());
}

#[test]
fn test_two_passes_end_game_either_order() {
    assert!(setup_game(5, &[None, None]).is_over());
    assert!(setup_game(5, &[Some((2, 2)), None, None]).is_over());
}

#[test]
fn test_move_after_pass_clears_flag() {
    let game = setup_game(5, &[None, Some((1, 1))]);
    assert!(!game.black_passed());
    assert!(!game.white_passed());
    assert_eq!(game.active_color(), Color::Black);
    assert_eq!(game.move_count(), 2);
}

// =============================================================================
// Scoring
// =============================================================================

#[test]
fn test_score_empty_board() {
    let game = GameState::new(9);
    let score = game.score();
    assert_eq!((score.black, score.white), (0, 0));
    assert_eq!(game.winner(), None);
}

#[test]
fn test_divided_board_scores_every_point() {
    for size in [3, 5, 7] {
        let mut board = Goban::new(size);
        let wall = size / 2;
        for x in 0..size {
            board.place(x, wall, Color::Black);
            board.place(x, wall + 1, Color::White);
        }
        let score = board.score();
        assert!(board.territories().neutral.is_empty());
        assert_eq!((score.black + score.white) as usize, size * size);
    }
}

#[test]
fn test_dame_counts_for_nobody() {
    let mut board = Goban::new(3);
    for x in 0..3 {
        board.place(x, 0, Color::Black);
        board.place(x, 2, Color::White);
    }
    let score = board.score();
    assert_eq!((score.black, score.white), (3, 3));
    assert_eq!(board.territories().area(Color::Empty), 3);
}

#[test]
fn test_winner_after_game() {
    let game = setup_game(3, &[Some((0, 1)), Some((2, 1)), Some((1, 1)), None, None]);
    assert!(game.is_over());
    assert_eq!(game.winner(), Some(Color::Black));
}

// =============================================================================
// Persistence and vertex notation
// =============================================================================

#[test]
fn test_snapshot_roundtrip_through_file() {
    let game = ko_position();
    let path = std::env::temp_dir().join(format!("goban-ai-{}.json", std::process::id()));
    save_game(&game, &path).unwrap();
    let loaded = load_game(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.board().cells(), game.board().cells());
    assert_eq!(loaded.active_color(), game.active_color());
    assert_eq!(loaded.move_count(), game.move_count());
    assert!(loaded.board().history().eq(game.board().history()));
}

#[test]
fn test_restored_game_keeps_ko_memory() {
    let game = ko_position();
    let mut restored = from_json(&to_json(&game).unwrap()).unwrap();
    assert_eq!(restored.take_move(1, 1), (false, false));
}

#[test]
fn test_load_missing_file_fails() {
    assert!(load_game("/nonexistent/goban-ai/game.json").is_err());
}

#[test]
fn test_vertex_bijection() {
    for x in 0..19 {
        for y in 0..19 {
            let v = point_to_vertex((x, y), 19);
            assert_eq!(vertex_to_point(&v, 19), Some((x, y)));
        }
    }
    assert_eq!(point_to_vertex((15, 3), 19), "D4");
}
