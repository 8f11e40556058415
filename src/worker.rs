//! The single-threaded search worker.
//!
//! Each worker owns a private tree, a private random generator and a private
//! clone of the root state per iteration, so the loop below runs without any
//! synchronization. The coordinator in `search` runs several of these
//! concurrently and merges their root statistics afterwards.

use std::time::{Duration, Instant};

use log::debug;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::SearchOptions;
use crate::error::SearchError;
use crate::node::Tree;
use crate::{opponent, GameState};

/// Cadence of verbose progress lines.
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Grows one independent search tree by repeated
/// selection/expansion/simulation/backpropagation cycles.
pub(crate) struct SearchWorker<'a> {
    options: &'a SearchOptions,
    rng: Xoshiro256PlusPlus,
}

impl<'a> SearchWorker<'a> {
    /// Creates a worker with its own generator. Seeds must differ between
    /// concurrently running workers; the coordinator derives them from a base
    /// seed plus the worker index.
    pub(crate) fn new(options: &'a SearchOptions, seed: u64) -> Self {
        Self {
            options,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Runs the bounded search loop and returns the completed tree.
    ///
    /// The iteration bound caps how many cycles start; the time bound is
    /// checked after each completed cycle, so `max_time` of zero still runs
    /// exactly one iteration while `max_iterations` of zero runs none.
    pub(crate) fn run<S: GameState>(
        &mut self,
        root_state: &S,
    ) -> Result<Tree<S::Move>, SearchError<S::Error>> {
        let start = Instant::now();
        let mut last_report = start;

        let root_moves = root_state.get_moves()?;
        let mut tree = Tree::new(opponent(root_state.player_to_move()), root_moves);

        let mut iterations: u64 = 0;
        loop {
            if let Some(max) = self.options.max_iterations {
                if iterations >= max {
                    break;
                }
            }
            iterations += 1;

            let mut node = tree.root();
            let mut state = root_state.clone();

            // Selection: descend while the node is fully expanded.
            while !tree.node(node).has_untried_moves() && tree.node(node).has_children() {
                node = tree.select_child_uct(node, self.options.exploration_constant);
                state.do_move(tree.move_of(node))?;
            }

            // Expansion: try one untried move and grow the tree by one node.
            if tree.node(node).has_untried_moves() {
                let mv = tree.pop_untried_move(node, &mut self.rng);
                state.do_move(&mv)?;
                let mover = opponent(state.player_to_move());
                let untried = state.get_moves()?;
                node = tree.add_child(node, mv, mover, untried);
            }

            // Simulation: random playout to a terminal state.
            while state.has_moves() {
                state.do_random_move(&mut self.rng)?;
            }

            // Backpropagation: every ancestor is scored from the perspective
            // of the player who moved into it.
            let mut cursor = Some(node);
            while let Some(id) = cursor {
                let result = state.get_result(tree.node(id).mover())?;
                tree.update(id, result);
                cursor = tree.node(id).parent();
            }

            let now = Instant::now();
            if self.options.verbose
                && (now.duration_since(last_report) >= REPORT_INTERVAL
                    || Some(iterations) == self.options.max_iterations)
            {
                let elapsed = now.duration_since(start).as_secs_f64();
                debug!(
                    "{} games played ({:.2} / second)",
                    iterations,
                    iterations as f64 / elapsed.max(f64::EPSILON)
                );
                last_report = now;
            }

            if let Some(max_time) = self.options.max_time {
                if now.duration_since(start) >= max_time {
                    break;
                }
            }
        }

        Ok(tree)
    }
}
