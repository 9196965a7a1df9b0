//! Search module for the caro engine
//!
//! Contains:
//! - Candidate move generation and the one-ply fallback move
//! - Transposition cache shared across requests
//! - Forced-move detection (win / block / pre-empt)
//! - Minimax with alpha-beta pruning and iterative deepening

pub mod alphabeta;
pub mod candidates;
pub mod tactical;
pub mod tt;

pub use alphabeta::{SearchOutcome, SearchResult, Searcher, Side};
pub use candidates::{candidates, fallback_move, CANDIDATE_RADIUS};
pub use tactical::{find_double_open_four_move, find_forced_move, find_winning_move, Forced};
pub use tt::{
    CacheEntry, CacheKey, CacheStats, EntryType, SharedCache, TranspositionCache,
    DEFAULT_CACHE_CAPACITY,
};
