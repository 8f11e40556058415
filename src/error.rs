//! Error taxonomy for search calls.
//!
//! Configuration and input errors are detected before any worker starts.
//! A `State` error means a worker's game model failed mid-search; the whole
//! call fails and partial statistics are discarded, never returned.

use thiserror::Error;

use crate::Player;

/// Errors produced by [`compute_move`](crate::compute_move) and
/// [`rank_moves`](crate::rank_moves). `E` is the game model's own error type.
#[derive(Debug, Error)]
pub enum SearchError<E: std::error::Error + 'static> {
    /// Neither `max_iterations` nor `max_time` is set; the search loop would
    /// never terminate.
    #[error("search requires at least one of max_iterations or max_time")]
    Unbounded,

    /// `parallelism` was configured as zero.
    #[error("parallelism must be at least 1")]
    ZeroParallelism,

    /// The exploration constant must be strictly positive.
    #[error("exploration constant must be positive, got {0}")]
    InvalidExploration(f64),

    /// The root state reported a player outside `{1, 2}`.
    #[error("unsupported player to move: {0} (only players 1 and 2)")]
    UnsupportedPlayer(Player),

    /// The root state has no legal moves, so there is nothing to search.
    #[error("root state has no legal moves")]
    NoRootMoves,

    /// A game state operation failed inside a worker.
    #[error("game state operation failed: {0}")]
    State(#[from] E),
}
