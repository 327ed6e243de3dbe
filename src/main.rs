use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chess_core::Board;
use chess_selector::{
    Anarchy, Evaluator, MaterialEvaluator, MoveSelector, SelectorConfig, TimeBudget,
};
use clap::Parser;
use log::info;

/// Self-play driver for the anarchy move selector.
#[derive(Debug, Parser)]
#[command(name = "anarchy", version)]
struct Args {
    /// Number of half-moves to play before stopping.
    #[arg(long, default_value_t = 40)]
    plies: u32,

    /// Seed for the random fallback; entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Starting position in FEN.
    #[arg(long)]
    fen: Option<String>,

    /// Play without an evaluator, leaving only forced, book, ritual and random moves.
    #[arg(long)]
    no_eval: bool,

    /// Seconds on each side's clock; the budget is unlimited when omitted.
    #[arg(long)]
    clock: Option<u64>,

    /// Seconds added to the mover's clock after each move.
    #[arg(long, default_value_t = 0)]
    increment: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut board = match &args.fen {
        Some(fen) => Board::from_fen(fen).with_context(|| format!("cannot start from `{fen}`"))?,
        None => Board::new(),
    };
    let mut selector = match args.seed {
        Some(seed) => Anarchy::seeded(SelectorConfig::default(), seed),
        None => Anarchy::new(SelectorConfig::default()),
    };
    let mut material = MaterialEvaluator;
    let increment = Duration::from_secs(args.increment);
    // Indexed by ply parity: the side that moved first, then the other.
    let mut clocks = args.clock.map(|secs| [Duration::from_secs(secs); 2]);

    let mut record = Vec::new();
    for ply in 0..args.plies {
        let legal = board.legal_moves();
        if legal.is_empty() {
            break;
        }
        let side = ply as usize % 2;
        let budget = match &clocks {
            Some(clocks) => TimeBudget::from_clock(clocks[side], increment),
            None => TimeBudget::unlimited(),
        };
        let evaluator: Option<&mut dyn Evaluator> = if args.no_eval {
            None
        } else {
            Some(&mut material)
        };

        let started = Instant::now();
        let result = selector.select_move(&mut board, &legal, &budget, evaluator)?;
        if let Some(clocks) = clocks.as_mut() {
            clocks[side] = clocks[side]
                .saturating_sub(started.elapsed())
                .saturating_add(increment);
        }

        record.push(board.san(result.chosen));
        board
            .push(result.chosen)
            .with_context(|| format!("selector returned unplayable move {}", result.chosen))?;

        if board.has_insufficient_material() {
            break;
        }
    }

    let outcome = if board.is_checkmate() {
        "checkmate"
    } else if board.is_stalemate() {
        "stalemate"
    } else if board.has_insufficient_material() {
        "insufficient material"
    } else {
        "unfinished"
    };
    info!("game over after {} plies: {}", record.len(), outcome);

    let moves: Vec<String> = record
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
        .collect();
    println!("{}", moves.join(" "));
    println!("{}", board.placement_fen());

    Ok(())
}
