//! Game state machine: board ownership, move application and outcome detection

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    board::{Cell, Player},
    lines::LineAnalyzer,
};
use crate::types::{Action, BOARD_SIZE, StateKey};

/// Outcome of a game, derived from the board on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// No winning line and at least one empty cell
    Ongoing,
    Win(Player),
    /// Board full with no winning line
    Draw,
}

impl GameOutcome {
    /// Whether the episode is over. Only [`GameOutcome::Ongoing`] continues.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::Ongoing)
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Win(player) => Some(player),
            GameOutcome::Ongoing | GameOutcome::Draw => None,
        }
    }

    /// Reward for the move that produced this outcome.
    ///
    /// `+1` when X (player one) wins, `-1` when O wins, `0` for a draw or a
    /// game that continues. Draw and ongoing share a reward but not
    /// terminality; use [`GameOutcome::is_terminal`] to tell them apart.
    pub fn reward(self) -> f64 {
        match self {
            GameOutcome::Win(Player::X) => 1.0,
            GameOutcome::Win(Player::O) => -1.0,
            GameOutcome::Draw | GameOutcome::Ongoing => 0.0,
        }
    }
}

/// Mutable board plus turn marker for one episode.
///
/// Moves are applied in place. Requesting moves after a terminal outcome is a
/// caller error that the state does not guard against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    cells: [Cell; BOARD_SIZE],
    to_move: Player,
}

impl GameState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        GameState {
            cells: [Cell::Empty; BOARD_SIZE],
            to_move: Player::X,
        }
    }

    /// Create a board from a string representation.
    ///
    /// The string should contain 9 cell characters (whitespace is filtered
    /// out). The player to move is inferred from the piece counts: X when
    /// counts are equal, O when X is one ahead.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The string has fewer than 9 non-whitespace characters
    /// - Any character is not a valid cell representation
    /// - The piece counts are invalid (O ahead, or X ahead by more than one)
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() < BOARD_SIZE {
            return Err(crate::Error::InvalidBoardLength {
                expected: BOARD_SIZE,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; BOARD_SIZE];
        for (i, &c) in chars.iter().take(BOARD_SIZE).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        let x_count = cells.iter().filter(|&&c| c == Cell::X).count();
        let o_count = cells.iter().filter(|&&c| c == Cell::O).count();
        let to_move = if x_count == o_count {
            Player::X
        } else if x_count == o_count + 1 {
            Player::O
        } else {
            return Err(crate::Error::InvalidPieceCounts { x_count, o_count });
        };

        Ok(GameState { cells, to_move })
    }

    /// Clear the board and hand the turn back to X
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; BOARD_SIZE];
        self.to_move = Player::X;
    }

    /// Place the current player's marker at (`row`, `col`).
    ///
    /// On success the turn passes to the opponent and the resulting outcome
    /// is returned.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidPosition`] if either coordinate is >= 3
    /// - [`crate::Error::IllegalMove`] if the cell is occupied; the board and
    ///   turn are left untouched
    pub fn apply_move(&mut self, row: usize, col: usize) -> Result<GameOutcome, crate::Error> {
        let action = Action::new(row, col)?;
        self.apply_action(action)
    }

    /// Same as [`GameState::apply_move`] for an already validated coordinate
    pub fn apply_action(&mut self, action: Action) -> Result<GameOutcome, crate::Error> {
        let idx = action.index();
        if self.cells[idx] != Cell::Empty {
            return Err(crate::Error::IllegalMove {
                row: action.row(),
                col: action.col(),
            });
        }

        self.cells[idx] = self.to_move.to_cell();
        self.to_move = self.to_move.opponent();
        Ok(self.evaluate_outcome())
    }

    /// Recompute the outcome from the current board
    pub fn evaluate_outcome(&self) -> GameOutcome {
        debug_assert!(
            !(LineAnalyzer::has_won(&self.cells, Player::X)
                && LineAnalyzer::has_won(&self.cells, Player::O)),
            "both players hold a winning line on {self:?}"
        );

        if let Some(winner) = LineAnalyzer::first_complete_line(&self.cells) {
            GameOutcome::Win(winner)
        } else if self.cells.contains(&Cell::Empty) {
            GameOutcome::Ongoing
        } else {
            GameOutcome::Draw
        }
    }

    /// Coordinates of every empty cell, in row-major order
    pub fn legal_actions(&self) -> Vec<Action> {
        Action::all()
            .filter(|action| self.cells[action.index()] == Cell::Empty)
            .collect()
    }

    /// Canonical value-table key of the current board
    pub fn state_key(&self) -> StateKey {
        StateKey::from_cells(&self.cells)
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Override whose turn it is.
    ///
    /// Intended for harnesses that need to bypass strict alternation; normal
    /// play never needs it.
    pub fn set_to_move(&mut self, player: Player) {
        self.to_move = player;
    }

    pub fn cell(&self, action: Action) -> Cell {
        self.cells[action.index()]
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let game = GameState::new();
        assert_eq!(game.to_move(), Player::X);
        assert!(game.cells().iter().all(|&c| c == Cell::Empty));
        assert_eq!(game.evaluate_outcome(), GameOutcome::Ongoing);
    }

    #[test]
    fn test_apply_move() {
        let mut game = GameState::new();

        let outcome = game.apply_move(1, 1).unwrap();
        assert_eq!(outcome, GameOutcome::Ongoing);
        assert_eq!(game.cell(Action::new(1, 1).unwrap()), Cell::X);
        assert_eq!(game.to_move(), Player::O);

        // Move on occupied cell
        let before = game.clone();
        let err = game.apply_move(1, 1).unwrap_err();
        assert!(matches!(err, crate::Error::IllegalMove { row: 1, col: 1 }));
        assert_eq!(game, before);
    }

    #[test]
    fn test_out_of_bounds_is_invalid_argument() {
        let mut game = GameState::new();
        let err = game.apply_move(0, 3).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(game, GameState::new());
    }

    #[test]
    fn test_reset() {
        let mut game = GameState::from_string("XO.X.O...").unwrap();
        assert_eq!(game.to_move(), Player::X);
        game.apply_move(2, 2).unwrap();

        game.reset();
        assert_eq!(game, GameState::new());
        assert_eq!(game.legal_actions().len(), 9);
    }

    #[test]
    fn test_win_detection_on_move() {
        let mut game = GameState::new();
        game.apply_move(0, 0).unwrap(); // X
        game.apply_move(1, 0).unwrap(); // O
        game.apply_move(0, 1).unwrap(); // X
        game.apply_move(1, 1).unwrap(); // O
        let outcome = game.apply_move(0, 2).unwrap(); // X

        assert_eq!(outcome, GameOutcome::Win(Player::X));
        assert_eq!(outcome.reward(), 1.0);
    }

    #[test]
    fn test_o_win_reward() {
        let game = GameState::from_string("XX.OOOX.X").unwrap();
        assert_eq!(game.evaluate_outcome(), GameOutcome::Win(Player::O));
        assert_eq!(game.evaluate_outcome().reward(), -1.0);
    }

    #[test]
    fn test_draw_is_terminal_with_zero_reward() {
        let game = GameState::from_string("XOXXOOOXX").unwrap();
        let outcome = game.evaluate_outcome();
        assert_eq!(outcome, GameOutcome::Draw);
        assert!(outcome.is_terminal());
        assert_eq!(outcome.reward(), 0.0);
        assert!(!GameOutcome::Ongoing.is_terminal());
    }

    #[test]
    fn test_legal_actions_shrink_by_one() {
        let mut game = GameState::new();
        let mut expected = 9;
        for index in [4, 0, 8, 2, 6] {
            assert_eq!(game.legal_actions().len(), expected);
            game.apply_action(Action::from_index(index).unwrap()).unwrap();
            expected -= 1;
            assert!(!game.legal_actions().contains(&Action::from_index(index).unwrap()));
        }
    }

    #[test]
    fn test_state_key_ignores_move_order() {
        let mut a = GameState::new();
        a.apply_move(0, 0).unwrap();
        a.apply_move(1, 1).unwrap();
        a.apply_move(2, 2).unwrap();

        let mut b = GameState::new();
        b.apply_move(2, 2).unwrap();
        b.apply_move(1, 1).unwrap();
        b.apply_move(0, 0).unwrap();

        assert_eq!(a.state_key(), b.state_key());
        assert_ne!(a.state_key(), GameState::new().state_key());
    }

    #[test]
    fn test_from_string() {
        let game = GameState::from_string("XOX......").unwrap();
        assert_eq!(game.cell(Action::new(0, 1).unwrap()), Cell::O);
        assert_eq!(game.to_move(), Player::O);
        assert_eq!(game.occupied_count(), 3);

        assert!(GameState::from_string("XO").is_err());
        assert!(GameState::from_string("XOZ......").is_err());
        assert!(GameState::from_string("XXX......").is_err());
        assert!(GameState::from_string("O........").is_err());
    }

    #[test]
    fn test_display() {
        let game = GameState::from_string("XOX.O.X..").unwrap();
        assert_eq!(format!("{game}"), "XOX\n.O.\nX..");
    }
}
