//! Newtype wrappers for board coordinates and value-table keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tictactoe::Cell;

/// Number of cells on the board.
pub const BOARD_SIZE: usize = 9;

/// Side length of the board.
pub const BOARD_WIDTH: usize = 3;

/// A (row, column) coordinate on the board.
///
/// Ordering follows row-major cell order, so sorting actions gives the same
/// sequence as [`Action::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action {
    row: usize,
    col: usize,
}

impl Action {
    /// Create a new action, validating it's within board bounds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPosition`] if either coordinate is >= 3.
    pub fn new(row: usize, col: usize) -> Result<Self, crate::Error> {
        if row < BOARD_WIDTH && col < BOARD_WIDTH {
            Ok(Action { row, col })
        } else {
            Err(crate::Error::InvalidPosition { row, col })
        }
    }

    /// Build an action from a row-major cell index (0-8).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPosition`] if the index is >= 9.
    pub fn from_index(index: usize) -> Result<Self, crate::Error> {
        Self::new(index / BOARD_WIDTH, index % BOARD_WIDTH)
    }

    /// All nine coordinates in row-major order.
    pub fn all() -> impl Iterator<Item = Action> {
        (0..BOARD_SIZE).map(|index| Action {
            row: index / BOARD_WIDTH,
            col: index % BOARD_WIDTH,
        })
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Row-major cell index (0-8).
    pub fn index(&self) -> usize {
        self.row * BOARD_WIDTH + self.col
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Canonical value-table key for a board snapshot.
///
/// The nine cells are read as a base-3 number with cell 0 as the most
/// significant digit (`EMPTY = 0`, `X = 1`, `O = 2`). The encoding is total
/// over every 3x3 grid, fits in 15 bits, and compares exactly like the
/// flattened cell sequence does lexicographically. Only cell contents
/// contribute, so boards reached through different move orders share a key.
///
/// # Examples
///
/// ```
/// use ttt_qlearn::tictactoe::GameState;
/// use ttt_qlearn::types::StateKey;
///
/// let empty = GameState::new().state_key();
/// assert_eq!(empty, StateKey::EMPTY_BOARD);
/// assert_eq!(empty.to_string(), ".........");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(u16);

impl StateKey {
    /// Key of the all-empty board.
    pub const EMPTY_BOARD: StateKey = StateKey(0);

    /// Encode a flattened board.
    pub fn from_cells(cells: &[Cell; BOARD_SIZE]) -> Self {
        let value = cells
            .iter()
            .fold(0u16, |acc, &cell| acc * 3 + Self::digit(cell));
        StateKey(value)
    }

    /// Decode the key back into its flattened board.
    pub fn cells(&self) -> [Cell; BOARD_SIZE] {
        let mut cells = [Cell::Empty; BOARD_SIZE];
        let mut rest = self.0;
        for cell in cells.iter_mut().rev() {
            *cell = match rest % 3 {
                0 => Cell::Empty,
                1 => Cell::X,
                _ => Cell::O,
            };
            rest /= 3;
        }
        cells
    }

    /// Raw encoded value.
    pub fn value(&self) -> u16 {
        self.0
    }

    fn digit(cell: Cell) -> u16 {
        match cell {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in self.cells() {
            write!(f, "{}", cell.to_char())?;
        }
        Ok(())
    }
}
