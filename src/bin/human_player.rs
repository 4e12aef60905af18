use anyhow::{bail, Context};
use clap::Parser;
use match3_engine::config::EngineConfig;
use match3_engine::grid::{Layout, Position};
use match3_engine::hints::find_swaps;
use match3_engine::motion::TimedMoves;
use match3_engine::scoreboard::{Scoreboard, TurnObserver};
use match3_engine::source::RandomPieces;
use match3_engine::turn::{SelectionOutcome, TurnController};
use match3_engine::utils::layout_from_str_array;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use tracing_subscriber::EnvFilter;

type Game = TurnController<RandomPieces, Scoreboard, TimedMoves>;

/// Play match-3 in the terminal. Unset options fall back to MATCH3_* environment variables.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Board width (ignored with --layout)
    #[clap(long)]
    width: Option<usize>,

    /// Board height (ignored with --layout)
    #[clap(long)]
    height: Option<usize>,

    /// Number of piece kinds in play (3-6)
    #[clap(short, long)]
    kinds: Option<usize>,

    /// Seed for piece generation
    #[clap(short, long)]
    seed: Option<u64>,

    /// Moves allowed before the game ends
    #[clap(short, long)]
    moves: Option<u32>,

    /// Points that win the game
    #[clap(short, long)]
    goal: Option<u32>,

    /// Milliseconds each batch of piece movement takes
    #[clap(long)]
    settle_ms: Option<u64>,

    /// Board mask file: one row per line, top row first, `#` for a blocked cell
    #[clap(short, long)]
    layout: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut EngineConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(kinds) = self.kinds {
            config.kinds = kinds;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.moves.is_some() {
            config.move_limit = self.moves;
        }
        if self.goal.is_some() {
            config.point_goal = self.goal;
        }
        if let Some(settle_ms) = self.settle_ms {
            config.settle_delay_ms = settle_ms;
        }
    }
}

fn read_layout_file(path: &Path) -> anyhow::Result<Layout> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file {}", path.display()))?;
    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    layout_from_str_array(&lines)
        .with_context(|| format!("invalid layout in {}", path.display()))
}

/// Parses `x y` into a position on the board.
fn parse_position(input: &str, game: &Game) -> anyhow::Result<Position> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let [x, y] = parts.as_slice() else {
        bail!("use 'x y', 'h' or 'q'");
    };
    let x: usize = x.parse().context("x must be a number")?;
    let y: usize = y.parse().context("y must be a number")?;
    let grid = game.grid();
    if x >= grid.width() || y >= grid.height() {
        bail!(
            "x must be below {} and y below {}",
            grid.width(),
            grid.height()
        );
    }
    Ok(Position::new(x, y))
}

/// Lets the movement of each wave play out, then resumes the turn.
fn settle(game: &mut Game) {
    while game.is_processing() {
        let wait = game.sink().remaining();
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        game.advance();
    }
}

fn print_status(game: &Game) {
    let selected = game
        .selected()
        .map(|id| game.grid().piece(id).position);
    let score = game.observer();
    println!("---------------------");
    match score.moves_left() {
        Some(left) => println!(
            "Moves: {} ({} left), Points: {}",
            score.moves(),
            left,
            score.points()
        ),
        None => println!("Moves: {}, Points: {}", score.moves(), score.points()),
    }
    println!("{}", game.grid().to_string_with_highlight(selected));
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = EngineConfig::from_env().context("failed to read MATCH3_* environment")?;
    args.apply(&mut config);

    let layout = match &args.layout {
        Some(path) => {
            let layout = read_layout_file(path)?;
            config.width = layout.width();
            config.height = layout.height();
            layout
        }
        None => Layout::new(config.width, config.height)?,
    };

    let sink = TimedMoves::new(config.settle_delay());
    let mut game = TurnController::from_config(&config, layout, sink)
        .context("failed to generate a starting board")?;
    println!("Welcome to Match-3!");

    loop {
        print_status(&game);

        if game.observer().game_ended() {
            println!();
            println!("---------------------");
            println!("GAME OVER!");
            println!("Final Points: {}", game.observer().points());
            println!("Total Moves: {}", game.observer().moves());
            println!("---------------------");
            break;
        }

        print!("Enter a piece (x y), 'h' for a hint, or 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let trimmed_input = input.trim();

        match trimmed_input {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "h" => {
                match find_swaps(game.grid()).first() {
                    Some(swap) => println!("Try swapping {} with {}.", swap.from, swap.to),
                    None => println!("No swap makes a match on this board."),
                }
                continue;
            }
            _ => {}
        }

        let pos = match parse_position(trimmed_input, &game) {
            Ok(pos) => pos,
            Err(err) => {
                println!("Invalid input: {:#}", err);
                continue;
            }
        };

        match game.select_at(pos) {
            SelectionOutcome::Ignored => println!("Nothing to select at {}.", pos),
            SelectionOutcome::Selected => println!("Selected {}.", pos),
            SelectionOutcome::Deselected => println!("Selection cleared."),
            SelectionOutcome::NotAdjacent => {
                println!("{} is not next to the selected piece.", pos)
            }
            SelectionOutcome::Swapped => {
                settle(&mut game);
                let summary = game.summary();
                if summary.kept {
                    println!(
                        "Removed {} pieces in {} wave(s).",
                        summary.removed, summary.waves
                    );
                } else {
                    println!("No match, swap reverted.");
                }
            }
        }
    }

    Ok(())
}
