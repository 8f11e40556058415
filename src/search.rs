//! The parallel-search coordinator.
//!
//! Runs root parallelization: `parallelism` independent workers each grow a
//! private tree from a clone of the same root state, and the direct root
//! children of every tree are merged by move identity into aggregate
//! statistics. Independent trees are unbiased samples of the same decision
//! problem, so their counters combine additively.

use std::collections::HashMap;
use std::time::Instant;

use log::debug;
use rand::Rng;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::config::SearchOptions;
use crate::error::SearchError;
use crate::node::Tree;
use crate::worker::SearchWorker;
use crate::GameState;

/// Aggregated statistics for one root move, summed across all workers.
#[derive(Clone, Debug, PartialEq)]
pub struct Score<M> {
    /// The move these statistics belong to.
    pub mv: M,
    /// Total wins backpropagated to this move across all trees.
    pub wins: f64,
    /// Total visits of this move across all trees.
    pub visits: f64,
}

impl<M> Score<M> {
    fn new(mv: M) -> Self {
        Self {
            mv,
            wins: 0.0,
            visits: 0.0,
        }
    }

    /// Laplace-smoothed success rate `(wins + 1) / (visits + 2)`.
    ///
    /// The smoothing keeps barely-visited moves from looking perfect (or
    /// hopeless) on one sample, which matters when workers disagree on how
    /// often a move was worth exploring.
    pub fn expected_success_rate(&self) -> f64 {
        (self.wins + 1.0) / (self.visits + 2.0)
    }
}

/// Everything the coordinator learned from one search call.
struct SearchOutcome<M> {
    scores: Vec<Score<M>>,
    games_played: u64,
}

/// Runs the full search: validation, fast path, worker fan-out, merge.
fn run_search<S: GameState>(
    root_state: &S,
    options: &SearchOptions,
) -> Result<SearchOutcome<S::Move>, SearchError<S::Error>> {
    options.validate()?;

    let player = root_state.player_to_move();
    if player != 1 && player != 2 {
        return Err(SearchError::UnsupportedPlayer(player));
    }

    let moves = root_state.get_moves()?;
    if moves.is_empty() {
        return Err(SearchError::NoRootMoves);
    }

    // Forced move: answer without running a single rollout.
    if moves.len() == 1 {
        let mv = moves.into_iter().next().expect("one move");
        return Ok(SearchOutcome {
            scores: vec![Score::new(mv)],
            games_played: 0,
        });
    }

    // Distinct seed per worker: base entropy (or the caller's fixed seed)
    // plus the worker index, so simultaneously launched workers never share
    // a stream.
    let base_seed = options.seed.unwrap_or_else(|| rand::rng().random());

    let pool = ThreadPoolBuilder::new()
        .num_threads(options.parallelism)
        .build()
        .expect("failed to build search thread pool");

    // collect() into Result joins every worker and throws all partial trees
    // away on the first failure; skewed partial statistics must never leak
    // out as a result.
    let trees: Vec<Tree<S::Move>> = pool.install(|| {
        (0..options.parallelism)
            .into_par_iter()
            .map(|worker_index| {
                let seed = base_seed.wrapping_add(worker_index as u64);
                SearchWorker::new(options, seed).run(root_state)
            })
            .collect::<Result<_, _>>()
    })?;

    let games_played = trees
        .iter()
        .map(|tree| tree.node(tree.root()).visits())
        .sum();

    Ok(SearchOutcome {
        scores: merge_root_statistics(&trees),
        games_played,
    })
}

/// Merges the direct root children of every tree into one `Score` per
/// distinct move, in first-seen order (worker order, then creation order).
fn merge_root_statistics<M: Clone + Eq + std::hash::Hash>(trees: &[Tree<M>]) -> Vec<Score<M>> {
    let mut scores: Vec<Score<M>> = Vec::new();
    let mut index: HashMap<M, usize> = HashMap::new();

    for tree in trees {
        for &child in tree.node(tree.root()).children() {
            let mv = tree.move_of(child);
            let slot = *index.entry(mv.clone()).or_insert_with(|| {
                scores.push(Score::new(mv.clone()));
                scores.len() - 1
            });
            scores[slot].wins += tree.node(child).wins();
            scores[slot].visits += tree.node(child).visits() as f64;
        }
    }

    scores
}

/// Searches `root_state` and returns the aggregated statistics of every move
/// observed at any worker's root, one [`Score`] per distinct move.
pub fn rank_moves<S: GameState>(
    root_state: &S,
    options: &SearchOptions,
) -> Result<Vec<Score<S::Move>>, SearchError<S::Error>> {
    Ok(run_search(root_state, options)?.scores)
}

/// Searches `root_state` and returns the single best move: the one with the
/// highest smoothed success rate, ties broken by first-seen order.
pub fn compute_move<S: GameState>(
    root_state: &S,
    options: &SearchOptions,
) -> Result<S::Move, SearchError<S::Error>> {
    let start = Instant::now();
    let outcome = run_search(root_state, options)?;
    let elapsed = start.elapsed();

    // A zero-budget search yields no statistics at all; any legal move is as
    // good as another then.
    let Some(mut best) = outcome.scores.first() else {
        let moves = root_state.get_moves()?;
        return moves.into_iter().next().ok_or(SearchError::NoRootMoves);
    };
    for score in &outcome.scores[1..] {
        if score.expected_success_rate() > best.expected_success_rate() {
            best = score;
        }
    }

    if options.verbose {
        let total_visits: f64 = outcome.scores.iter().map(|s| s.visits).sum();
        for score in &outcome.scores {
            debug!(
                "move {:?}: {:.2}% visits, {:.2}% wins",
                score.mv,
                100.0 * score.visits / total_visits.max(1.0),
                100.0 * score.wins / score.visits.max(1.0),
            );
        }
        debug!(
            "best move {:?} ({:.1} wins / {:.0} visits)",
            best.mv, best.wins, best.visits
        );
        debug!(
            "{} games played in {:.2}s ({:.0} games / second)",
            outcome.games_played,
            elapsed.as_secs_f64(),
            outcome.games_played as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );
    }

    Ok(best.mv.clone())
}
