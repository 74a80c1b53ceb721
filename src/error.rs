//! Error types for the ttt-qlearn crate

use thiserror::Error;

/// Main error type for the ttt-qlearn crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("illegal move: cell ({row}, {col}) is already occupied")]
    IllegalMove { row: usize, col: usize },

    #[error("cell ({row}, {col}) is out of bounds (row and column must be 0-2)")]
    InvalidPosition { row: usize, col: usize },

    #[error("no legal actions available")]
    NoValidMoves,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("board string too short: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid piece counts: X={x_count}, O={o_count} (must be equal or X ahead by 1)")]
    InvalidPieceCounts { x_count: usize, o_count: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

impl Error {
    /// Whether the error reports a caller-side argument problem
    /// (bad configuration, out-of-range coordinate, or nothing to choose from).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidConfiguration { .. } | Error::InvalidPosition { .. } | Error::NoValidMoves
        )
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_invalid_arguments() {
        assert!(Error::NoValidMoves.is_invalid_argument());
        assert!(Error::InvalidPosition { row: 3, col: 0 }.is_invalid_argument());
        assert!(Error::invalid_config("epsilon").is_invalid_argument());
        assert!(!Error::IllegalMove { row: 0, col: 0 }.is_invalid_argument());
    }

    #[test]
    fn illegal_move_message_names_the_cell() {
        let err = Error::IllegalMove { row: 1, col: 2 };
        assert!(err.to_string().contains("(1, 2)"));
        assert!(err.to_string().contains("occupied"));
    }
}
