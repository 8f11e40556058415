//! # Bundled Game Models
//!
//! The search engine is generic over the [`GameState`](crate::GameState)
//! trait; this module ships one complete implementation so the crate can be
//! exercised without writing a game first.
//!
//! ## Implementing a new game
//! 1. Define a move type (`Clone + Eq + Hash + Debug + Send + Sync`).
//! 2. Define a state type and implement `GameState` for it, reporting players
//!    as `1` and `2` and terminal results in `[0, 1]`.
//! 3. Optionally override `do_random_move` with a cheaper rollout sampler.

pub mod connect4;
