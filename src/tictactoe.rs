//! Tic-Tac-Toe game implementation

pub mod board;
pub mod game;
pub mod lines;

pub use board::{Cell, Player};
pub use game::{GameOutcome, GameState};
pub use lines::{LineAnalyzer, WINNING_LINES};
