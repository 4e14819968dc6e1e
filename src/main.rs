//! Pentago MCTS engine.
//!
//! ## Usage
//!
//! - `pentago` - Watch the engine play itself
//! - `pentago selfplay --millis 500` - Same, with a custom move time
//! - `pentago bestmove board.txt --turn 7` - Search one position

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use pentago::board::Board;
use pentago::constants::{DEFAULT_MOVE_TIME_MS, UCT_C};
use pentago::game::Game;
use pentago::mcts::{FinalSelection, GameState, SearchConfig, search};

/// Pentago: place a stone, rotate a quadrant, get five in a row
#[derive(Parser)]
#[command(name = "pentago")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write debug-level logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the engine play a full game against itself
    Selfplay {
        #[command(flatten)]
        search: SearchArgs,

        /// Number of random plies to play before the engine takes over
        #[arg(long, default_value_t = 0)]
        random_opening: u32,

        /// Seed for the random opening
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Search a single position and print the chosen move
    Bestmove {
        /// Board file: six lines of `.`, `X` and `O`. Reads stdin if omitted
        board: Option<PathBuf>,

        /// Plies already played; must match the number of stones on the board
        #[arg(long)]
        turn: Option<u32>,

        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args, Clone)]
struct SearchArgs {
    /// Thinking time per move in milliseconds (soft limit)
    #[arg(long, default_value_t = DEFAULT_MOVE_TIME_MS)]
    millis: u64,

    /// UCT exploration constant
    #[arg(long, default_value_t = UCT_C)]
    exploration: f64,

    /// How the final move is picked among the root candidates
    #[arg(long, value_enum, default_value_t = Selection::WinRatio)]
    selection: Selection,
}

#[derive(Copy, Clone, ValueEnum)]
enum Selection {
    WinRatio,
    MostVisited,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            exploration: self.exploration,
            selection: match self.selection {
                Selection::WinRatio => FinalSelection::WinRatio,
                Selection::MostVisited => FinalSelection::MostVisited,
            },
            ..SearchConfig::default()
        }
    }

    fn budget(&self) -> Duration {
        Duration::from_millis(self.millis)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logger(cli.verbose, cli.log_file.as_ref())?;

    match cli.command {
        Some(Commands::Selfplay {
            search,
            random_opening,
            seed,
        }) => run_selfplay(&search, random_opening, seed),
        Some(Commands::Bestmove {
            board,
            turn,
            search,
        }) => run_bestmove(board, turn, &search),
        None => run_selfplay(
            &SearchArgs {
                millis: DEFAULT_MOVE_TIME_MS,
                exploration: UCT_C,
                selection: Selection::WinRatio,
            },
            0,
            None,
        ),
    }
}

fn setup_logger(verbose: u8, log_file: Option<&PathBuf>) -> Result<()> {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(fern::Dispatch::new().level(level).chain(io::stderr()));

    let dispatch = match log_file {
        Some(path) => dispatch.chain(
            fern::Dispatch::new()
                .level(log::LevelFilter::Debug)
                .chain(fern::log_file(path).context("failed to open log file")?),
        ),
        None => dispatch,
    };
    dispatch.apply().context("failed to install logger")?;
    Ok(())
}

fn run_selfplay(args: &SearchArgs, random_opening: u32, seed: Option<u64>) -> Result<()> {
    let config = args.config();
    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut game = Game::random_position(&mut rng, random_opening);
    println!("{}", game.board());

    while !game.is_finished() {
        let side = game.side_to_move();
        let budget = args.budget();
        let start = std::time::Instant::now();
        let result = search(&game, &config, || start.elapsed() >= budget);
        info!(
            "turn {}: {} rollouts in {:.2}s",
            game.turn(),
            result.rollouts,
            start.elapsed().as_secs_f64()
        );
        println!("{:?} plays {}", side, result.best_move);
        game.apply(&result.best_move);
        println!("{}", game.board());
    }

    match game.winner() {
        Some(color) => println!("{color:?} wins after {} plies", game.turn()),
        None if game.result().is_decided() => println!("Both players made five: tie"),
        None => println!("Board full: draw"),
    }
    Ok(())
}

/// Build the position to search from board text and an optional ply count.
fn parse_game(text: &str, turn: Option<u32>) -> Result<Game> {
    let board: Board = text.parse().context("invalid board")?;
    let stones = board.stone_count() as u32;
    let turn = turn.unwrap_or(stones);
    if turn != stones {
        anyhow::bail!("turn {turn} does not match the {stones} stones on the board");
    }
    let game = Game::from_board(board, turn);
    if game.is_finished() {
        anyhow::bail!("game is already over");
    }
    Ok(game)
}

fn run_bestmove(path: Option<PathBuf>, turn: Option<u32>, args: &SearchArgs) -> Result<()> {
    let text = match &path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read board from stdin")?;
            text
        }
    };
    let game = parse_game(&text, turn)?;

    let budget = args.budget();
    let start = std::time::Instant::now();
    let result = search(&game, &args.config(), || start.elapsed() >= budget);
    for c in &result.candidates {
        log::debug!("{} {}/{}", c.mv, c.wins, c.sims);
    }
    println!("{}", result.best_move);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_EMPTY: &str = "XXOOXX\nOOXXOO\nXXOOXX\nOOXXOO\nXXOOXX\nOOXXO.\n";

    #[test]
    fn test_parse_game_defaults_turn_to_stone_count() {
        let game = parse_game(ONE_EMPTY, None).unwrap();
        assert_eq!(game.turn(), 35);
        assert!(parse_game(ONE_EMPTY, Some(35)).is_ok());
    }

    #[test]
    fn test_parse_game_rejects_mismatched_turn() {
        let err = parse_game(ONE_EMPTY, Some(30)).unwrap_err();
        assert!(err.to_string().contains("does not match"), "{err}");
    }

    #[test]
    fn test_parse_game_rejects_finished_and_invalid_boards() {
        let won = "XXXXX.\nOOOO..\n......\n......\n......\n......\n";
        assert!(parse_game(won, None).is_err());
        assert!(parse_game("XX\n", None).is_err());
    }
}
