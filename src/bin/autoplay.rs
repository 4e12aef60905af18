use anyhow::Context;
use clap::Parser;
use match3_engine::config::EngineConfig;
use match3_engine::grid::Layout;
use match3_engine::hints::find_swaps;
use match3_engine::motion::InstantMoves;
use match3_engine::scoreboard::TurnObserver;
use match3_engine::turn::{SelectionOutcome, TurnController};
use std::io;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Plays seeded boards by always taking the first available swap.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of boards to play
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Seed of the first board; board `i` uses `seed + i`
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Swaps attempted per board before stopping
    #[clap(short = 't', long, default_value_t = 50)]
    max_turns: u32,

    /// Number of piece kinds in play (3-6)
    #[clap(short, long)]
    kinds: Option<usize>,

    /// Board width
    #[clap(long)]
    width: Option<usize>,

    /// Board height
    #[clap(long)]
    height: Option<usize>,
}

#[derive(Debug, Default)]
struct BoardResult {
    points: u32,
    moves: u32,
    waves: u32,
    stuck: bool,
}

fn play_board(config: &EngineConfig, max_turns: u32) -> anyhow::Result<BoardResult> {
    let layout = Layout::new(config.width, config.height)?;
    let mut game = TurnController::from_config(config, layout, InstantMoves)?;
    let mut result = BoardResult::default();

    for _ in 0..max_turns {
        if game.observer().game_ended() {
            break;
        }
        let Some(swap) = find_swaps(game.grid()).first().copied() else {
            result.stuck = true;
            break;
        };

        game.select_at(swap.from);
        if game.select_at(swap.to) != SelectionOutcome::Swapped {
            warn!(from = %swap.from, to = %swap.to, "hinted swap was not accepted");
            break;
        }
        let summary = game.resolve_pending();
        if !summary.kept {
            warn!(from = %swap.from, to = %swap.to, "hinted swap produced no match");
            break;
        }
        result.waves += summary.waves;
    }

    result.points = game.observer().points();
    result.moves = game.observer().moves();
    Ok(result)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut base = EngineConfig::from_env().context("failed to read MATCH3_* environment")?;
    if let Some(kinds) = args.kinds {
        base.kinds = kinds;
    }
    if let Some(width) = args.width {
        base.width = width;
    }
    if let Some(height) = args.height {
        base.height = height;
    }

    println!(
        "Playing {} boards ({}x{}, {} kinds, up to {} turns each)...",
        args.boards, base.width, base.height, base.kinds, args.max_turns
    );

    let mut results = Vec::new();
    for board_idx in 0..args.boards {
        let seed = args.seed + board_idx;
        let config = EngineConfig {
            seed: Some(seed),
            ..base.clone()
        };
        let result = play_board(&config, args.max_turns)
            .with_context(|| format!("board {} (seed {}) failed", board_idx, seed))?;
        println!(
            "  Board {:<3} (Seed: {:<4}) Points: {:<5} Moves: {:<4} Waves: {:<4}{}",
            board_idx,
            seed,
            result.points,
            result.moves,
            result.waves,
            if result.stuck { " (no swaps left)" } else { "" }
        );
        results.push(result);
    }

    println!("\n--- Autoplay Complete ---");
    if results.is_empty() {
        println!("No boards played.");
        return Ok(());
    }

    let count = results.len() as f64;
    let average = |f: fn(&BoardResult) -> u32| -> f64 {
        results.iter().map(|r| f64::from(f(r))).sum::<f64>() / count
    };
    println!("Average points: {:.2}", average(|r| r.points));
    println!("Average moves:  {:.2}", average(|r| r.moves));
    println!("Average waves:  {:.2}", average(|r| r.waves));
    println!(
        "Boards that ran out of swaps: {}",
        results.iter().filter(|r| r.stuck).count()
    );

    Ok(())
}
