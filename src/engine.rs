//! Move-selection engine applying a difficulty policy
//!
//! The engine follows a fixed priority order for every request:
//!
//! 1. **No move**: a full board has nothing to play
//! 2. **Immediate win**: an engine move completing five is always played
//! 3. **Forced defence**: blocking an opponent five, or pre-empting a
//!    double-open four, played with the mode's block probability
//! 4. **Search**: fixed-depth alpha-beta, or iterative deepening for the
//!    hardest mode, under the mode's time budget
//!
//! A search cut short by its deadline degrades to the deepest completed
//! depth or the one-ply fallback move; it never fails the request.
//!
//! # Example
//!
//! ```
//! use caro::{Board, Difficulty, Engine, EngineConfig, Pos};
//!
//! let mut engine = Engine::with_seed(EngineConfig::default(), 7);
//! let board = Board::new(12);
//!
//! let result = engine.select_move_with_stats(&board, Difficulty::Hard);
//! assert_eq!(result.best_move, Some(Pos::new(6, 6)));
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::board::{Board, Pos};
use crate::config::{Difficulty, EngineConfig};
use crate::error::EngineError;
use crate::eval::WIN_SCORE;
use crate::search::{find_forced_move, CacheStats, Forced, SearchOutcome, Searcher, SharedCache};

/// Stage of the priority order that produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Board was full
    NoMove,
    /// Completes five in a row
    ImmediateWin,
    /// Blocks an opponent five
    Block,
    /// Pre-empts an opponent double-open four
    Preempt,
    /// Fixed-depth alpha-beta search
    AlphaBeta,
    /// Iterative deepening to the mode's depth ceiling
    IterativeDeepening,
    /// Search stopped early (deadline or fault); see `MoveResult::depth`
    Degraded,
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Chosen move; `None` only for a full board
    pub best_move: Option<Pos>,
    /// Engine-side score (0 where no search ran)
    pub score: i32,
    pub search_type: SearchType,
    /// Deepest completed search depth (0 for forced and fallback moves)
    pub depth: u8,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched
    pub nodes: u64,
}

impl MoveResult {
    #[inline]
    fn no_move(time_ms: u64) -> Self {
        Self {
            best_move: None,
            score: 0,
            search_type: SearchType::NoMove,
            depth: 0,
            time_ms,
            nodes: 0,
        }
    }

    /// Create a result for a forced move
    #[inline]
    fn forced(forced: Forced, time_ms: u64) -> Self {
        let (search_type, score) = match forced {
            Forced::Win(_) => (SearchType::ImmediateWin, WIN_SCORE),
            Forced::Block(_) => (SearchType::Block, 0),
            Forced::Preempt(_) => (SearchType::Preempt, 0),
        };
        Self {
            best_move: Some(forced.pos()),
            score,
            search_type,
            depth: 0,
            time_ms,
            nodes: 1,
        }
    }

    /// Create a result from a tree search outcome
    fn from_outcome(outcome: SearchOutcome, iterative: bool, time_ms: u64) -> Self {
        match outcome {
            SearchOutcome::Complete(result) => Self {
                best_move: result.best_move,
                score: result.score,
                search_type: if iterative {
                    SearchType::IterativeDeepening
                } else {
                    SearchType::AlphaBeta
                },
                depth: result.depth,
                time_ms,
                nodes: result.nodes,
            },
            SearchOutcome::Degraded {
                best_move,
                completed_depth,
                nodes,
                ..
            } => Self {
                best_move,
                score: 0,
                search_type: SearchType::Degraded,
                depth: completed_depth,
                time_ms,
                nodes,
            },
        }
    }
}

/// Caro move-selection engine.
///
/// Holds the configuration, a handle to the transposition cache shared by
/// every request, and the random source for the forced-block coin. The
/// caller's board is never modified: each request searches a private copy.
pub struct Engine {
    config: EngineConfig,
    cache: SharedCache,
    rng: SmallRng,
}

impl Engine {
    /// Create an engine with its own cache.
    ///
    /// The forced-block coin is seeded from `config.seed`, or from entropy
    /// when no seed is configured.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let cache = SharedCache::new(config.cache_capacity);
        Self::with_cache(config, cache)
    }

    /// Create an engine with a deterministic forced-block coin.
    #[must_use]
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        let mut engine = Self::new(config);
        engine.rng = SmallRng::seed_from_u64(seed);
        engine
    }

    /// Create an engine that shares an existing cache.
    #[must_use]
    pub fn with_cache(config: EngineConfig, cache: SharedCache) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { config, cache, rng }
    }

    #[must_use]
    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Get the best move for the given position.
    ///
    /// Returns `None` only when the board has no empty cell.
    #[must_use]
    pub fn select_move(&mut self, board: &Board, mode: Difficulty) -> Option<Pos> {
        self.select_move_with_stats(board, mode).best_move
    }

    /// Parse `label` as a difficulty, check the board size, then select.
    pub fn select_move_for_label(
        &mut self,
        board: &Board,
        label: &str,
    ) -> Result<Option<Pos>, EngineError> {
        let mode: Difficulty = label.parse()?;
        self.check_board(board)?;
        Ok(self.select_move(board, mode))
    }

    /// Reject boards whose size differs from the configured one.
    pub fn check_board(&self, board: &Board) -> Result<(), EngineError> {
        if board.size() != self.config.board_size {
            return Err(EngineError::BoardSizeMismatch {
                expected: self.config.board_size,
                actual: board.size(),
            });
        }
        Ok(())
    }

    /// Get the best move with detailed search statistics.
    #[must_use]
    pub fn select_move_with_stats(&mut self, board: &Board, mode: Difficulty) -> MoveResult {
        let start = Instant::now();
        let settings = self.config.difficulty(mode).clone();
        let mut work = board.clone();

        let result = if work.is_full() {
            MoveResult::no_move(elapsed_ms(start))
        } else {
            let forced = find_forced_move(&mut work)
                .filter(|forced| self.honour(*forced, settings.forced_block_probability));

            match forced {
                Some(forced) => {
                    debug!(?forced, %mode, "forced move");
                    MoveResult::forced(forced, elapsed_ms(start))
                }
                None => {
                    let deadline = start.checked_add(settings.time_budget());
                    let mut searcher = Searcher::new(self.cache.clone(), settings.candidate_limit)
                        .with_deadline(deadline);
                    let outcome = if settings.iterative_deepening {
                        searcher.search_iterative(&mut work, settings.search_depth)
                    } else {
                        searcher.search_fixed(&mut work, settings.search_depth)
                    };

                    if let SearchOutcome::Degraded {
                        completed_depth,
                        cause,
                        ..
                    } = &outcome
                    {
                        let nodes = outcome.nodes();
                        if *completed_depth == 0 {
                            warn!(%mode, %cause, nodes, "search degraded to fallback move");
                        } else {
                            debug!(%mode, %cause, completed_depth, nodes, "search stopped early");
                        }
                    }
                    MoveResult::from_outcome(outcome, settings.iterative_deepening, elapsed_ms(start))
                }
            }
        };

        info!(
            %mode,
            source = ?result.search_type,
            best_move = ?result.best_move,
            score = result.score,
            depth = result.depth,
            time_ms = result.time_ms,
            nodes = result.nodes,
            "move selected"
        );
        result
    }

    /// Wins are always played; defensive moves pass a weighted coin.
    fn honour(&mut self, forced: Forced, probability: f64) -> bool {
        if !forced.is_defensive() || probability >= 1.0 {
            return true;
        }
        if probability.is_nan() || probability <= 0.0 {
            debug!(?forced, "forced defence skipped");
            return false;
        }
        let honoured = self.rng.gen_bool(probability);
        if !honoured {
            debug!(?forced, probability, "forced defence skipped");
        }
        honoured
    }

    /// Clear the transposition cache.
    ///
    /// Call this when starting a new game to release memory.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[inline]
fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
