//! Error type shared by the board builders, the text parsers and the config layer.
//!
//! Only recoverable conditions live here. Coordinate access outside the grid
//! is a contract violation and panics instead.

use thiserror::Error;

/// Errors returned by fallible engine operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("piece kind count must be between {min} and {max}, got {found}")]
    KindCount { min: usize, max: usize, found: usize },

    #[error("unrecognized character '{ch}' at column {x}, row {y}")]
    UnknownCharacter { ch: char, x: usize, y: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("board text is empty")]
    EmptyBoard,

    #[error("no match-free board found after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    #[error("invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },
}
