//! Position evaluation
//!
//! Window classification lives in [`patterns`]; the board-wide score built
//! from it lives in [`heuristic`].

pub mod heuristic;
pub mod patterns;

pub use heuristic::{static_score, tally, MAX_POSITIONAL_SCORE, WIN_SCORE};
pub use patterns::{classify_window, Tier, TierCounts};
