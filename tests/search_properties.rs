//! Behavioral properties of the search engine, checked through the public
//! API against small purpose-built game models and the bundled Connect 4.

use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use uct::games::connect4::{Connect4Move, Connect4State};
use uct::{compute_move, rank_moves, GameState, Player, SearchError, SearchOptions};

/// Depth-1 game: one decision, then the game ends. Move 0 always wins for
/// the player to move, move 1 always draws, move 2 always loses. A shared
/// counter records every rollout move the engine asks for.
#[derive(Clone)]
struct DepthOne {
    played: Option<u8>,
    player: Player,
    rollout_moves: Arc<AtomicU64>,
}

impl DepthOne {
    fn new() -> Self {
        Self {
            played: None,
            player: 1,
            rollout_moves: Arc::new(AtomicU64::new(0)),
        }
    }

    fn rollout_moves(&self) -> u64 {
        self.rollout_moves.load(Ordering::SeqCst)
    }
}

impl GameState for DepthOne {
    type Move = u8;
    type Error = Infallible;

    fn player_to_move(&self) -> Player {
        self.player
    }

    fn get_moves(&self) -> Result<Vec<u8>, Infallible> {
        Ok(match self.played {
            None => vec![0, 1, 2],
            Some(_) => Vec::new(),
        })
    }

    fn do_move(&mut self, mv: &u8) -> Result<(), Infallible> {
        self.played = Some(*mv);
        self.player = 3 - self.player;
        Ok(())
    }

    fn has_moves(&self) -> bool {
        self.played.is_none()
    }

    fn do_random_move<R: rand::Rng>(&mut self, rng: &mut R) -> Result<(), Infallible> {
        self.rollout_moves.fetch_add(1, Ordering::SeqCst);
        let moves = self.get_moves()?;
        let mv = moves[rng.random_range(0..moves.len())];
        self.do_move(&mv)
    }

    fn get_result(&self, player: Player) -> Result<f64, Infallible> {
        // Player 1 made the only move of the game.
        let for_player_1 = match self.played {
            Some(0) => 1.0,
            Some(1) => 0.5,
            _ => 0.0,
        };
        Ok(if player == 1 {
            for_player_1
        } else {
            1.0 - for_player_1
        })
    }
}

/// Wrapper forcing a single legal move at the root.
#[derive(Clone)]
struct ForcedMove(DepthOne);

impl GameState for ForcedMove {
    type Move = u8;
    type Error = Infallible;

    fn player_to_move(&self) -> Player {
        self.0.player_to_move()
    }

    fn get_moves(&self) -> Result<Vec<u8>, Infallible> {
        Ok(self.0.get_moves()?.into_iter().take(1).collect())
    }

    fn do_move(&mut self, mv: &u8) -> Result<(), Infallible> {
        self.0.do_move(mv)
    }

    fn has_moves(&self) -> bool {
        self.0.has_moves()
    }

    fn get_result(&self, player: Player) -> Result<f64, Infallible> {
        self.0.get_result(player)
    }
}

/// Game whose terminal scoring always fails, to exercise worker failure.
#[derive(Clone)]
struct BrokenScoring;

#[derive(Debug, thiserror::Error)]
#[error("scoring backend unavailable")]
struct ScoringError;

impl GameState for BrokenScoring {
    type Move = u8;
    type Error = ScoringError;

    fn player_to_move(&self) -> Player {
        1
    }

    fn get_moves(&self) -> Result<Vec<u8>, ScoringError> {
        Ok(vec![0, 1])
    }

    fn do_move(&mut self, _mv: &u8) -> Result<(), ScoringError> {
        Ok(())
    }

    fn has_moves(&self) -> bool {
        false
    }

    fn get_result(&self, _player: Player) -> Result<f64, ScoringError> {
        Err(ScoringError)
    }
}

/// Game reporting a player id the engine does not support.
#[derive(Clone)]
struct ThreePlayerGame;

impl GameState for ThreePlayerGame {
    type Move = u8;
    type Error = Infallible;

    fn player_to_move(&self) -> Player {
        3
    }

    fn get_moves(&self) -> Result<Vec<u8>, Infallible> {
        Ok(vec![0, 1])
    }

    fn do_move(&mut self, _mv: &u8) -> Result<(), Infallible> {
        Ok(())
    }

    fn has_moves(&self) -> bool {
        true
    }

    fn get_result(&self, _player: Player) -> Result<f64, Infallible> {
        Ok(0.5)
    }
}

fn bounded(iterations: u64) -> SearchOptions {
    SearchOptions::default()
        .with_max_iterations(iterations)
        .with_parallelism(1)
        .with_seed(99)
}

#[test]
fn forced_move_returns_without_any_rollout() {
    let state = ForcedMove(DepthOne::new());
    let scores = rank_moves(&state, &bounded(10_000)).unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].mv, 0);
    assert_eq!(scores[0].wins, 0.0);
    assert_eq!(scores[0].visits, 0.0);
    assert_eq!(state.0.rollout_moves(), 0);

    let mv = compute_move(&state, &bounded(10_000)).unwrap();
    assert_eq!(mv, 0);
    assert_eq!(state.0.rollout_moves(), 0);
}

#[test]
fn depth_one_scenario_picks_the_winning_move() {
    let state = DepthOne::new();
    let options = SearchOptions::default()
        .with_max_iterations(2000)
        .with_parallelism(4);
    assert_eq!(compute_move(&state, &options).unwrap(), 0);
}

#[test]
fn rank_moves_is_complete_over_root_moves() {
    let state = DepthOne::new();
    let mut moves: Vec<u8> = rank_moves(&state, &bounded(2000))
        .unwrap()
        .iter()
        .map(|s| s.mv)
        .collect();
    moves.sort_unstable();
    assert_eq!(moves, vec![0, 1, 2]);
}

#[test]
fn total_root_child_visits_equal_iterations() {
    let state = Connect4State::new(7, 6, 4);
    let scores = rank_moves(&state, &bounded(250)).unwrap();
    let total: f64 = scores.iter().map(|s| s.visits).sum();
    assert_eq!(total, 250.0);
    for score in &scores {
        assert!(score.wins <= score.visits);
    }
}

#[test]
fn zero_iteration_budget_runs_nothing() {
    let state = DepthOne::new();
    let scores = rank_moves(&state, &bounded(0)).unwrap();
    assert!(scores.is_empty());
    assert_eq!(state.rollout_moves(), 0);

    // With no statistics any legal move is acceptable.
    let mv = compute_move(&state, &bounded(0)).unwrap();
    assert!([0u8, 1, 2].contains(&mv));
}

#[test]
fn zero_time_budget_runs_exactly_one_iteration() {
    let state = Connect4State::new(7, 6, 4);
    let options = SearchOptions::default()
        .without_max_iterations()
        .with_max_time(Duration::ZERO)
        .with_parallelism(1)
        .with_seed(5);
    let scores = rank_moves(&state, &options).unwrap();
    let total: f64 = scores.iter().map(|s| s.visits).sum();
    assert_eq!(total, 1.0);
}

#[test]
fn fixed_seed_single_worker_is_reproducible() {
    let state = Connect4State::new(7, 6, 4);
    let options = bounded(300);
    let first = rank_moves(&state, &options).unwrap();
    let second = rank_moves(&state, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        compute_move(&state, &options).unwrap(),
        compute_move(&state, &options).unwrap()
    );
}

#[test]
fn immediate_win_is_found_in_connect4() {
    // Player 1 owns columns 0..=2 on the bottom row; column 3 wins at once.
    let mut state = Connect4State::new(7, 6, 4);
    for c in [0usize, 6, 1, 6, 2, 5] {
        state.do_move(&Connect4Move(c)).unwrap();
    }
    let options = SearchOptions::default()
        .with_max_iterations(5000)
        .with_parallelism(2)
        .with_seed(7);
    assert_eq!(compute_move(&state, &options).unwrap(), Connect4Move(3));
}

#[test]
fn worker_failure_fails_the_whole_call() {
    let result = rank_moves(&BrokenScoring, &bounded(100));
    assert!(matches!(result, Err(SearchError::State(ScoringError))));
}

#[test]
fn unsupported_player_is_rejected() {
    let result = rank_moves(&ThreePlayerGame, &bounded(100));
    assert!(matches!(result, Err(SearchError::UnsupportedPlayer(3))));
}

#[test]
fn terminal_root_is_rejected() {
    let mut state = DepthOne::new();
    state.do_move(&1).unwrap();
    assert!(matches!(
        rank_moves(&state, &bounded(100)),
        Err(SearchError::NoRootMoves)
    ));
}

#[test]
fn unbounded_options_are_rejected_before_searching() {
    let state = DepthOne::new();
    let options = SearchOptions::default().without_max_iterations();
    assert!(matches!(
        rank_moves(&state, &options),
        Err(SearchError::Unbounded)
    ));
    assert_eq!(state.rollout_moves(), 0);
}
