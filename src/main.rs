//! Goban-AI command line.
//!
//! ## Usage
//!
//! - `goban-ai gtp` - Start a GTP server for use with Go GUIs
//! - `goban-ai selfplay` - Let two strategies play each other
//! - `goban-ai score <file>` - Show the board and score of a saved game
//! - `goban-ai demo` - Short demonstration (default)
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use goban_ai::board::Color;
use goban_ai::constants::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MAX_GAME_LEN};
use goban_ai::game::GameState;
use goban_ai::gtp::{GtpEngine, point_to_vertex};
use goban_ai::minimax::MinimaxPlayer;
use goban_ai::snapshot::{load_game, save_game};
use goban_ai::strategy::{Move, SearchLimits, Strategy, StrategyKind};
use goban_ai::worker::AiWorker;

/// Goban-AI: Go rules engine and computer opponents
#[derive(Parser)]
#[command(name = "goban-ai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server
    Gtp {
        /// Strategy answering genmove
        #[arg(long, value_enum, default_value_t = StrategyKind::Leo)]
        strategy: StrategyKind,
        /// Initial board size
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,
        /// Seed for the strategy's random generator
        #[arg(long)]
        seed: Option<u64>,
        /// Search time budget per move, in milliseconds
        #[arg(long)]
        time_limit_ms: Option<u64>,
    },
    /// Play two strategies against each other
    Selfplay {
        #[arg(long, value_enum, default_value_t = StrategyKind::Leo)]
        black: StrategyKind,
        #[arg(long, value_enum, default_value_t = StrategyKind::Random)]
        white: StrategyKind,
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many moves
        #[arg(long, default_value_t = MAX_GAME_LEN)]
        max_moves: usize,
        /// Search time budget per move, in milliseconds
        #[arg(long)]
        time_limit_ms: Option<u64>,
        /// Continue a saved game instead of starting a new one
        #[arg(long)]
        load: Option<PathBuf>,
        /// Save the final position
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print the board and score of a saved game
    Score {
        path: PathBuf,
    },
    /// Run a short demo of the engine
    Demo,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp {
            strategy,
            size,
            seed,
            time_limit_ms,
        }) => {
            anyhow::ensure!(
                (1..=MAX_BOARD_SIZE).contains(&size),
                "board size must be between 1 and {MAX_BOARD_SIZE}"
            );
            let strategy = strategy.build(seed, limits(time_limit_ms));
            let mut engine = GtpEngine::new(size, strategy);
            engine.run(io::stdin().lock(), io::stdout())
        }
        Some(Commands::Selfplay {
            black,
            white,
            size,
            seed,
            max_moves,
            time_limit_ms,
            load,
            save,
        }) => {
            anyhow::ensure!(size > 0, "board size must be positive");
            let game = match load {
                Some(path) => load_game(path)?,
                None => GameState::new(size),
            };
            let limits = limits(time_limit_ms);
            let players = [
                black.build(seed, limits),
                white.build(seed.map(|s| s.wrapping_add(1)), limits),
            ];
            let game = run_selfplay(game, players, max_moves, time_limit_ms.map(Duration::from_millis))?;
            if let Some(path) = save {
                save_game(&game, path)?;
            }
            Ok(())
        }
        Some(Commands::Score { path }) => {
            let game = load_game(&path)?;
            print_result(&game);
            Ok(())
        }
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn limits(time_limit_ms: Option<u64>) -> SearchLimits {
    match time_limit_ms {
        Some(ms) => SearchLimits::unlimited().with_time_limit(Duration::from_millis(ms)),
        None => SearchLimits::unlimited(),
    }
}

fn print_result(game: &GameState) {
    println!("{}", game.board());
    let score = game.score();
    println!("Black: {}  White: {}", score.black, score.white);
    match game.winner() {
        Some(color) => println!("Winner: {color}"),
        None => println!("Draw"),
    }
}

/// Play until both pass, someone resigns or `max_moves` is reached. Each
/// side searches on its own worker thread.
fn run_selfplay(
    mut game: GameState,
    players: [Box<dyn Strategy>; 2],
    max_moves: usize,
    time_limit: Option<Duration>,
) -> anyhow::Result<GameState> {
    anyhow::ensure!(
        game.size() <= MAX_BOARD_SIZE,
        "board size {} exceeds the maximum of {MAX_BOARD_SIZE}",
        game.size()
    );
    let [black, white] = players;
    let mut workers = [AiWorker::spawn(black)?, AiWorker::spawn(white)?];
    info!(black = workers[0].name(), white = workers[1].name(), size = game.size(), "self-play started");

    let mut resigned = None;
    for _ in 0..max_moves {
        if game.is_over() {
            break;
        }
        let color = game.active_color();
        let worker = &mut workers[if color == Color::Black { 0 } else { 1 }];
        worker.request_move(&game)?;

        // Give the search its budget plus some slack, then ask it to stop.
        let outcome = match time_limit.and_then(|limit| worker.wait_result(limit * 2)) {
            Some(outcome) => outcome,
            None => {
                if time_limit.is_some() {
                    worker.cancel();
                }
                worker
                    .recv_result()
                    .context("AI worker stopped without answering")?
            }
        };

        match outcome.mv {
            Move::Place((x, y)) => {
                if !game.take_move(x, y).0 {
                    warn!(x, y, "rejected move from {}, passing", worker.name());
                    game.pass_move();
                } else {
                    info!(%color, vertex = %point_to_vertex((x, y), game.size()), "move");
                }
            }
            Move::Pass => {
                info!(%color, "pass");
                game.pass_move();
            }
            Move::Resign => {
                info!(%color, "resign");
                resigned = Some(color);
                break;
            }
        }
    }

    print_result(&game);
    if let Some(color) = resigned {
        println!("{color} resigned, {} wins", color.opponent());
    }
    Ok(game)
}

fn run_demo() -> anyhow::Result<()> {
    println!("Goban-AI: Go rules engine demo\n");

    println!("=== Capture ===");
    let mut game = GameState::new(5);
    for (x, y) in [(1, 2), (2, 2), (3, 2), (0, 0), (2, 1), (4, 4)] {
        game.take_move(x, y);
    }
    let (accepted, captured) = game.take_move(2, 3);
    println!("Black at (2, 3): accepted={accepted} captured={captured}");
    println!("{}", game.board());

    println!("=== Leo ===");
    let mut leo = MinimaxPlayer::leo();
    let mv = leo.choose_move(&game);
    println!("Leo ({}) plays {mv}", game.active_color());

    let json = goban_ai::snapshot::to_json(&game).context("failed to encode demo game")?;
    println!("\n=== Snapshot ===\n{json}");
    Ok(())
}
