//! Self-play benchmark for the UCT engine.
//!
//! Plays Connect 4 against itself with the configured search budget and
//! prints the board and per-move statistics after every decision.

use clap::Parser;
use colored::Colorize;
use std::time::{Duration, Instant};

use uct::games::connect4::Connect4State;
use uct::{rank_moves, GameState, SearchOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board width (default: 7)
    #[arg(long, default_value_t = 7)]
    width: usize,

    /// Board height (default: 6)
    #[arg(long, default_value_t = 6)]
    height: usize,

    /// Pieces in a row needed to win (default: 4)
    #[arg(long, default_value_t = 4)]
    line_size: usize,

    /// Iterations per worker per decision
    #[arg(long, default_value_t = 20_000)]
    iterations: u64,

    /// Optional wall-clock budget per worker per decision (milliseconds)
    #[arg(long)]
    max_time_ms: Option<u64>,

    /// Number of search workers (default: all logical CPUs)
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// Fixed base seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Log per-worker progress and decision statistics
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let mut options = SearchOptions::default()
        .with_max_iterations(args.iterations)
        .with_parallelism(args.threads)
        .with_verbose(args.verbose);
    if let Some(ms) = args.max_time_ms {
        options = options.with_max_time(Duration::from_millis(ms));
    }
    if let Some(seed) = args.seed {
        options = options.with_seed(seed);
    }

    println!("{}", "Parallel UCT - Connect 4 Self-Play".bold());
    println!("Board: {}x{} (line {})", args.width, args.height, args.line_size);
    println!("Workers: {}", options.parallelism);
    println!("Iterations per worker: {}", args.iterations);
    println!();

    let mut state = Connect4State::new(args.width, args.height, args.line_size);
    let mut ply = 0u32;
    let game_start = Instant::now();

    while state.has_moves() {
        ply += 1;
        let player = state.player_to_move();

        let decide_start = Instant::now();
        let scores = rank_moves(&state, &options).expect("search failed");
        let elapsed = decide_start.elapsed();

        // Same policy as compute_move: best smoothed rate, first seen wins.
        let mv = scores
            .iter()
            .reduce(|best, s| {
                if s.expected_success_rate() > best.expected_success_rate() {
                    s
                } else {
                    best
                }
            })
            .map(|s| s.mv)
            .expect("no legal moves reported");

        let label = if player == 1 {
            "player 1 (X)".red()
        } else {
            "player 2 (O)".yellow()
        };
        println!(
            "ply {:2}: {} plays column {} ({} candidate moves, {:.2}s)",
            ply,
            label,
            mv.0,
            scores.len(),
            elapsed.as_secs_f64()
        );
        for score in &scores {
            println!(
                "        column {}: {:>8.0} visits, {:>8.1} wins, rate {:.3}",
                score.mv.0,
                score.visits,
                score.wins,
                score.expected_success_rate()
            );
        }

        state.do_move(&mv).expect("engine chose an illegal move");
        println!("{}", state);
    }

    match state.winner() {
        Some(1) => println!("{}", "player 1 (X) wins".red().bold()),
        Some(_) => println!("{}", "player 2 (O) wins".yellow().bold()),
        None => println!("{}", "draw".bold()),
    }
    println!(
        "game finished in {:.2}s over {} plies",
        game_start.elapsed().as_secs_f64(),
        ply
    );
}
