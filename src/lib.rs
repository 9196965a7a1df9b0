//! Caro (free-style gomoku) move-selection engine
//!
//! Picks the engine's next move on an N×N board (12×12 by default):
//! - Five or more in a row wins (overlines count)
//! - No captures, no forbidden moves, no opening restrictions
//! - The engine always plays cell code 2, its opponent code 1
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Five-in-a-row and double-open-four detection
//! - [`eval`]: Window-pattern evaluation
//! - [`search`]: Candidate generation, tactical checks, alpha-beta with a
//!   shared transposition cache
//! - [`engine`]: Difficulty policy tying the pieces together
//! - [`config`]: `caro.toml` loading and `CARO_*` overrides
//! - [`protocol`]: JSON request / response boundary
//! - [`ui`]: egui front end
//!
//! # Quick Start
//!
//! ```
//! use caro::{Board, Cell, Difficulty, Engine, EngineConfig, Pos};
//!
//! let mut board = Board::new(12);
//! let mut engine = Engine::with_seed(EngineConfig::default(), 42);
//!
//! board.place(Pos::new(6, 6), Cell::Opponent);
//!
//! if let Some(pos) = engine.select_move(&board, Difficulty::Medium) {
//!     board.place(pos, Cell::Engine);
//!     println!("Engine plays at ({}, {})", pos.row, pos.col);
//! }
//! ```
//!
//! # Move Priority
//!
//! 1. Immediate winning move
//! 2. Block an opponent five, or pre-empt a double-open four (probabilistic
//!    below the hardest mode)
//! 3. Alpha-beta search under the mode's depth and time budget

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod protocol;
pub mod rules;
pub mod search;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, Pos, DEFAULT_BOARD_SIZE};
pub use config::{Difficulty, EngineConfig};
pub use engine::{Engine, MoveResult, SearchType};
