//! # Connect 4
//!
//! Players alternate dropping pieces into columns; pieces fall to the lowest
//! free row. The first player with `line_size` pieces in a row
//! (horizontally, vertically or diagonally) wins; a full board with no
//! winner is a draw.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{opponent, GameState, Player};

/// A Connect 4 move: the 0-based column to drop a piece into.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Connect4Move(pub usize);

/// Errors signalled by the Connect 4 model.
#[derive(Debug, Error)]
pub enum Connect4Error {
    /// The column is out of bounds or already full.
    #[error("illegal move: column {0}")]
    IllegalMove(usize),
    /// `get_result` was queried before the game ended.
    #[error("game is not over yet")]
    NotTerminal,
}

/// Complete state of a Connect 4 game.
///
/// The board is a flat row-major vector with `0` for empty cells and the
/// player id (`1` or `2`) for occupied ones. Row 0 is the top row.
#[derive(Debug, Clone)]
pub struct Connect4State {
    board: Vec<Player>,
    player_to_move: Player,
    width: usize,
    height: usize,
    line_size: usize,
    last_move: Option<(usize, usize)>,
}

impl Connect4State {
    /// Creates an empty board. Standard Connect 4 is `new(7, 6, 4)`.
    pub fn new(width: usize, height: usize, line_size: usize) -> Self {
        Self {
            board: vec![0; width * height],
            player_to_move: 1,
            width,
            height,
            line_size,
            last_move: None,
        }
    }

    /// True if `mv` names a column with at least one free cell.
    pub fn is_legal(&self, mv: &Connect4Move) -> bool {
        mv.0 < self.width && self.board[mv.0] == 0
    }

    /// The winning player, if the last move completed a line.
    pub fn winner(&self) -> Option<Player> {
        let (row, col) = self.last_move?;
        let player = self.board[row * self.width + col];

        let cell = |r: isize, c: isize| -> Player {
            if r < 0 || c < 0 || r >= self.height as isize || c >= self.width as isize {
                0
            } else {
                self.board[r as usize * self.width + c as usize]
            }
        };

        // Only lines through the last move can be new wins.
        for (dr, dc) in [(0isize, 1isize), (1, 0), (1, 1), (1, -1)] {
            let mut run = 1;
            for dir in [1isize, -1] {
                let mut r = row as isize + dir * dr;
                let mut c = col as isize + dir * dc;
                while cell(r, c) == player {
                    run += 1;
                    r += dir * dr;
                    c += dir * dc;
                }
            }
            if run >= self.line_size {
                return Some(player);
            }
        }
        None
    }

    fn is_full(&self) -> bool {
        (0..self.width).all(|c| self.board[c] != 0)
    }
}

impl fmt::Display for Connect4State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.height {
            for c in 0..self.width {
                let symbol = match self.board[r * self.width + c] {
                    1 => "X",
                    2 => "O",
                    _ => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Connect4Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = s.trim().parse::<usize>().map_err(|e| e.to_string())?;
        Ok(Connect4Move(c))
    }
}

impl GameState for Connect4State {
    type Move = Connect4Move;
    type Error = Connect4Error;

    fn player_to_move(&self) -> Player {
        self.player_to_move
    }

    fn get_moves(&self) -> Result<Vec<Connect4Move>, Connect4Error> {
        if self.winner().is_some() {
            return Ok(Vec::new());
        }
        Ok((0..self.width)
            .filter(|&c| self.board[c] == 0)
            .map(Connect4Move)
            .collect())
    }

    fn do_move(&mut self, mv: &Connect4Move) -> Result<(), Connect4Error> {
        if !self.is_legal(mv) || self.winner().is_some() {
            return Err(Connect4Error::IllegalMove(mv.0));
        }
        for r in (0..self.height).rev() {
            let idx = r * self.width + mv.0;
            if self.board[idx] == 0 {
                self.board[idx] = self.player_to_move;
                self.last_move = Some((r, mv.0));
                self.player_to_move = opponent(self.player_to_move);
                return Ok(());
            }
        }
        Err(Connect4Error::IllegalMove(mv.0))
    }

    fn has_moves(&self) -> bool {
        self.winner().is_none() && !self.is_full()
    }

    fn get_result(&self, player: Player) -> Result<f64, Connect4Error> {
        match self.winner() {
            Some(w) if w == player => Ok(1.0),
            Some(_) => Ok(0.0),
            None if self.is_full() => Ok(0.5),
            None => Err(Connect4Error::NotTerminal),
        }
    }
}
