//! Go Text Protocol (GTP) front-end and vertex notation.
//!
//! Vertices use a column letter (A-Z skipping I) followed by a row number
//! counted from the bottom edge, so on a 9x9 board the internal point
//! `(0, 0)` (top-left) is `A9` and `(8, 8)` is `J1`.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Any size from 1 to 25; clears the board
//! - `clear_board`
//! - `komi <value>` - Recorded but not used in scoring
//! - `play <color> <vertex>` - Play a move for the color to move
//! - `genmove <color>` - Ask the strategy for a move and play it
//! - `showboard`
//! - `final_score` - Area score, e.g. `B+3`

use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::board::{Color, Point};
use crate::constants::MAX_BOARD_SIZE;
use crate::game::GameState;
use crate::strategy::{Move, Strategy};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// Convert an internal point to a GTP vertex such as `D4`.
///
/// # Panics
/// If the point is off a board of `size`, or `size` exceeds 25.
pub fn point_to_vertex((x, y): Point, size: usize) -> String {
    assert!(size <= MAX_BOARD_SIZE, "no vertex letters beyond {MAX_BOARD_SIZE} columns");
    assert!(x < size && y < size, "({x}, {y}) is off a {size}x{size} board");
    let mut letter = b'A' + y as u8;
    if letter >= b'I' {
        letter += 1;
    }
    format!("{}{}", letter as char, size - x)
}

/// Parse a GTP vertex into an internal point; the inverse of
/// [`point_to_vertex`]. Case-insensitive. Returns `None` for `pass` or for
/// anything that is not on a board of `size`.
pub fn vertex_to_point(vertex: &str, size: usize) -> Option<Point> {
    let vertex = vertex.trim();
    let mut chars = vertex.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if !letter.is_ascii_uppercase() || letter == 'I' {
        return None;
    }
    let mut col = (letter as u8 - b'A') as usize;
    if letter > 'I' {
        col -= 1;
    }
    let row: usize = chars.as_str().parse().ok()?;
    if col >= size || row == 0 || row > size {
        return None;
    }
    Some((size - row, col))
}

fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "b" | "black" => Some(Color::Black),
        "w" | "white" => Some(Color::White),
        _ => None,
    }
}

/// Format a score the way `final_score` expects (`B+n`, `W+n` or `0`).
fn format_result(game: &GameState) -> String {
    let score = game.score();
    match score.leader() {
        Some(color) => {
            let prefix = if color == Color::Black { 'B' } else { 'W' };
            format!("{prefix}+{}", score.margin(color))
        }
        None => "0".to_string(),
    }
}

/// GTP engine state.
pub struct GtpEngine {
    /// Current game
    game: GameState,
    /// Strategy answering `genmove`
    strategy: Box<dyn Strategy>,
    /// Reported with the final score, never added to it
    komi: f32,
}

impl GtpEngine {
    pub fn new(size: usize, strategy: Box<dyn Strategy>) -> Self {
        Self {
            game: GameState::new(size),
            strategy,
            komi: 0.0,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    /// Run the GTP command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        info!(strategy = self.strategy.name(), size = self.game.size(), "GTP session started");
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            if !success {
                warn!(%command, %message, "GTP command failed");
            }
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(name) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<usize>() {
                    Ok(size) if (1..=MAX_BOARD_SIZE).contains(&size) => {
                        self.game = GameState::new(size);
                        (true, String::new())
                    }
                    Ok(_) => (false, "unacceptable size".to_string()),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.game = GameState::new(self.game.size());
                (true, String::new())
            }

            "komi" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<f32>() {
                    Ok(komi) => {
                        self.komi = komi;
                        (true, String::new())
                    }
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                let [color, vertex, ..] = args else {
                    return (false, "missing arguments".to_string());
                };
                let Some(color) = parse_color(color) else {
                    return (false, "invalid color".to_string());
                };
                if color != self.game.active_color() {
                    return (false, format!("it is {}'s turn", self.game.active_color()));
                }
                if vertex.eq_ignore_ascii_case("pass") {
                    self.game.pass_move();
                    return (true, String::new());
                }
                let Some(pt) = vertex_to_point(vertex, self.game.size()) else {
                    return (false, "invalid vertex".to_string());
                };
                if self.game.take_move_at(pt).0 {
                    (true, String::new())
                } else {
                    (false, "illegal move".to_string())
                }
            }

            "genmove" => {
                let Some(color) = args.first().and_then(|c| parse_color(c)) else {
                    return (false, "invalid color".to_string());
                };
                if color != self.game.active_color() {
                    return (false, format!("it is {}'s turn", self.game.active_color()));
                }
                match self.strategy.choose_move(&self.game) {
                    Move::Place(pt) => {
                        if self.game.take_move_at(pt).0 {
                            (true, point_to_vertex(pt, self.game.size()))
                        } else {
                            warn!(?pt, "strategy chose an illegal point, passing instead");
                            self.game.pass_move();
                            (true, "pass".to_string())
                        }
                    }
                    Move::Pass => {
                        self.game.pass_move();
                        (true, "pass".to_string())
                    }
                    Move::Resign => (true, "resign".to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.game.board())),

            "final_score" => {
                let result = format_result(&self.game);
                info!(%result, komi = self.komi, "final score, komi not applied");
                (true, result)
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
