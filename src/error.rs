//! Error types for the engine and its boundary layers.

use std::path::PathBuf;

use thiserror::Error;

use crate::board::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};

/// A board handed in from outside the engine is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no rows")]
    Empty,

    #[error("row {row} has {len} cells, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("board size {0} is outside {min}..={max}", min = MIN_BOARD_SIZE, max = MAX_BOARD_SIZE)]
    UnsupportedSize(usize),

    #[error("unknown cell code {code} at ({row}, {col})")]
    UnknownCell { row: usize, col: usize, code: u8 },

    #[error("unknown cell symbol {symbol:?} at ({row}, {col})")]
    UnknownSymbol { row: usize, col: usize, symbol: char },
}

/// Errors surfaced by the engine API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown difficulty mode {0:?} (expected easy, medium or hard)")]
    UnknownMode(String),

    #[error("board is {actual}x{actual} but the engine is configured for {expected}x{expected}")]
    BoardSizeMismatch { expected: usize, actual: usize },
}

/// Reasons a search stopped before producing a complete result.
///
/// Neither variant reaches the caller of `Engine::select_move`; both are
/// turned into a degraded move.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("search deadline expired")]
    Timeout,

    #[error("root search finished without choosing a move")]
    NoRootMove,
}

/// Configuration could not be loaded or is invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A JSON move request could not be served.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
