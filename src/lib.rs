//! # Parallel UCT Search Engine
//!
//! A generic Monte Carlo Tree Search engine using the Upper Confidence bound
//! for Trees (UCT) algorithm for two-player, perfect-information,
//! sequential-move games.
//!
//! Callers supply a game model through the [`GameState`] trait and receive
//! either a single recommended move ([`compute_move`]) or the raw per-move
//! statistics ([`rank_moves`]). The engine runs root parallelization: each
//! worker grows its own independent tree from a clone of the root state, and
//! the per-move statistics of all trees are summed before the final decision.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use uct::{compute_move, SearchOptions};
//! use uct::games::connect4::Connect4State;
//!
//! let state = Connect4State::new(7, 6, 4);
//! let options = SearchOptions::default()
//!     .with_max_iterations(10_000)
//!     .with_parallelism(4);
//! let best = compute_move(&state, &options).unwrap();
//! println!("best column: {}", best.0);
//! ```

use rand::Rng;
use std::fmt;
use std::hash::Hash;

mod config;
mod error;
mod node;
mod search;
mod worker;

pub mod games;

pub use config::SearchOptions;
pub use error::SearchError;
pub use search::{compute_move, rank_moves, Score};

/// Player identifier. The engine supports exactly two players, `1` and `2`.
pub type Player = i32;

/// Returns the opponent of `player` (maps 1 to 2 and 2 to 1).
pub(crate) fn opponent(player: Player) -> Player {
    3 - player
}

/// The state of the game. Must be cloneable to be used in the search.
/// `Send` and `Sync` are required for parallel processing.
pub trait GameState: Clone + Send + Sync {
    /// The type of a move in the game. Used as the aggregation key when
    /// merging statistics across workers.
    type Move: Clone + Eq + Hash + fmt::Debug + Send + Sync;

    /// The error type signalled by fallible game operations. A worker that
    /// encounters such an error fails the entire search call.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the player whose turn it is to move (`1` or `2`).
    fn player_to_move(&self) -> Player;

    /// Returns all legal moves from the current state. Empty at terminal
    /// states.
    fn get_moves(&self) -> Result<Vec<Self::Move>, Self::Error>;

    /// Applies a legal move to the state, modifying it.
    fn do_move(&mut self, mv: &Self::Move) -> Result<(), Self::Error>;

    /// Returns true if at least one legal move exists (i.e. the state is not
    /// terminal).
    fn has_moves(&self) -> bool;

    /// Applies one legal move chosen by the model's own random policy.
    ///
    /// The default implementation picks uniformly among `get_moves`. Game
    /// models may override this with a cheaper sampler. Must only be called
    /// when `has_moves()` is true.
    fn do_random_move<R: Rng>(&mut self, rng: &mut R) -> Result<(), Self::Error> {
        let moves = self.get_moves()?;
        let mv = moves[rng.random_range(0..moves.len())].clone();
        self.do_move(&mv)
    }

    /// Returns the result of the game from `player`'s perspective:
    /// `1.0` for a win, `0.0` for a loss, `0.5` for a draw.
    /// Defined only at terminal states.
    fn get_result(&self, player: Player) -> Result<f64, Self::Error>;
}
