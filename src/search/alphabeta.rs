//! Minimax search with alpha-beta pruning and iterative deepening
//!
//! The engine is always the maximizing side. Scores come from
//! [`static_score`] for the engine and saturate at `±WIN_SCORE`.
//!
//! # Features
//!
//! - Explicit Maximizing / Minimizing nodes with fail-soft alpha-beta
//! - Immediate-win short-circuit before any child is searched
//! - Move ordering by the static evaluation of each child
//! - Shared transposition cache with bound types
//! - Wall-clock deadline checked at every node entry; a timeout unwinds to
//!   the root as [`SearchError::Timeout`]
//!
//! # Example
//!
//! ```
//! use caro::board::{Board, Pos};
//! use caro::search::{SearchOutcome, Searcher, SharedCache};
//!
//! let mut searcher = Searcher::new(SharedCache::new(10_000), 22);
//! let mut board = Board::new(12);
//!
//! match searcher.search_iterative(&mut board, 2) {
//!     SearchOutcome::Complete(result) => assert_eq!(result.best_move, Some(Pos::new(6, 6))),
//!     SearchOutcome::Degraded { .. } => unreachable!("no deadline was set"),
//! }
//! ```

use std::time::Instant;

use tracing::{debug, trace};

use crate::board::{Board, Cell, Pos};
use crate::error::SearchError;
use crate::eval::{static_score, WIN_SCORE};
use crate::rules::{has_five_at_pos, has_five_in_row};

use super::candidates::{candidates, fallback_move};
use super::tt::{CacheEntry, CacheKey, EntryType, SharedCache};

/// Infinity score for alpha-beta bounds
const INF: i32 = WIN_SCORE + 1;

/// Which side a node belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Engine to move
    Maximizing,
    /// Opponent to move
    Minimizing,
}

impl Side {
    /// Stone placed by the side to move
    #[inline]
    pub fn stone(self) -> Cell {
        match self {
            Side::Maximizing => Cell::Engine,
            Side::Minimizing => Cell::Opponent,
        }
    }

    #[inline]
    pub fn flip(self) -> Side {
        match self {
            Side::Maximizing => Side::Minimizing,
            Side::Minimizing => Side::Maximizing,
        }
    }

    /// Saturating score of a win for the side to move
    #[inline]
    fn win_score(self) -> i32 {
        match self {
            Side::Maximizing => WIN_SCORE,
            Side::Minimizing => -WIN_SCORE,
        }
    }
}

/// Search result containing the best move found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found; `None` only when there was nothing to play
    pub best_move: Option<Pos>,
    /// Score of the best move from the engine's point of view
    pub score: i32,
    /// Depth of the search that produced this result
    pub depth: u8,
    /// Nodes visited by this searcher so far
    pub nodes: u64,
}

impl SearchResult {
    /// Whether the score is a forced win or loss
    #[must_use]
    pub fn is_decisive(&self) -> bool {
        self.score.abs() >= WIN_SCORE
    }
}

/// How a search ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every requested depth finished (or a decisive score ended deepening)
    Complete(SearchResult),
    /// The search stopped early. `best_move` comes from the deepest
    /// completed depth, or from [`fallback_move`] when `completed_depth`
    /// is 0.
    Degraded {
        best_move: Option<Pos>,
        completed_depth: u8,
        cause: SearchError,
        nodes: u64,
    },
}

impl SearchOutcome {
    #[must_use]
    pub fn best_move(&self) -> Option<Pos> {
        match self {
            SearchOutcome::Complete(result) => result.best_move,
            SearchOutcome::Degraded { best_move, .. } => *best_move,
        }
    }

    #[must_use]
    pub fn nodes(&self) -> u64 {
        match self {
            SearchOutcome::Complete(result) => result.nodes,
            SearchOutcome::Degraded { nodes, .. } => *nodes,
        }
    }
}

/// Children of a node after the immediate-win scan
pub(crate) enum Children {
    /// Playing this move completes five for the side to move
    Win(Pos),
    /// Moves to search, best first for the side to move
    Ordered(Vec<Pos>),
}

/// Generate, scan and order the children of a node.
///
/// The board is restored before returning.
pub(crate) fn order_children(board: &mut Board, side: Side, limit: usize) -> Children {
    let stone = side.stone();
    let moves = candidates(board, limit);
    let mut scored: Vec<(Pos, i32)> = Vec::with_capacity(moves.len());

    for pos in moves {
        board.place(pos, stone);
        if has_five_at_pos(board, pos, stone) {
            board.remove(pos);
            return Children::Win(pos);
        }
        let score = static_score(board, Cell::Engine);
        board.remove(pos);
        scored.push((pos, score));
    }

    match side {
        Side::Maximizing => scored.sort_by(|a, b| b.1.cmp(&a.1)),
        Side::Minimizing => scored.sort_by(|a, b| a.1.cmp(&b.1)),
    }
    Children::Ordered(scored.into_iter().map(|(pos, _)| pos).collect())
}

/// Saturating score if either side already has five in a row.
pub(crate) fn terminal_score(board: &Board) -> Option<i32> {
    if has_five_in_row(board, Cell::Engine) {
        Some(WIN_SCORE)
    } else if has_five_in_row(board, Cell::Opponent) {
        Some(-WIN_SCORE)
    } else {
        None
    }
}

/// Single-threaded alpha-beta searcher.
///
/// One searcher serves one request: it owns the deadline and node count,
/// and borrows the process-wide cache through its [`SharedCache`] handle.
pub struct Searcher {
    cache: SharedCache,
    candidate_limit: usize,
    deadline: Option<Instant>,
    nodes: u64,
}

impl Searcher {
    /// Create a searcher with no deadline.
    ///
    /// # Arguments
    ///
    /// * `cache` - Shared transposition cache
    /// * `candidate_limit` - Maximum children searched per node
    #[must_use]
    pub fn new(cache: SharedCache, candidate_limit: usize) -> Self {
        Self {
            cache,
            candidate_limit: candidate_limit.max(1),
            deadline: None,
            nodes: 0,
        }
    }

    /// Refuse to enter new nodes after `deadline`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Search the position to exactly `depth` plies with the engine to move.
    ///
    /// The board is used as scratch space and restored before returning,
    /// also on error. Fails with [`SearchError::NoRootMove`] if the root
    /// yields no move although empty cells remain.
    pub fn search(&mut self, board: &mut Board, depth: u8) -> Result<SearchResult, SearchError> {
        let (score, best_move) = self.minimax(board, depth, -INF, INF, Side::Maximizing)?;

        // A finished game still has to produce a move while cells are free
        if best_move.is_none() && !board.is_full() {
            return Err(SearchError::NoRootMove);
        }
        Ok(SearchResult {
            best_move,
            score,
            depth,
            nodes: self.nodes,
        })
    }

    /// Fixed-depth search that degrades instead of failing.
    pub fn search_fixed(&mut self, board: &mut Board, depth: u8) -> SearchOutcome {
        match self.search(board, depth) {
            Ok(result) => SearchOutcome::Complete(result),
            Err(cause) => self.degrade(board, None, cause),
        }
    }

    /// Iterative deepening from depth 1 to `max_depth`.
    ///
    /// Stops early on a decisive score. If the deadline interrupts a
    /// depth, the move of the deepest completed depth is kept.
    pub fn search_iterative(&mut self, board: &mut Board, max_depth: u8) -> SearchOutcome {
        let mut best: Option<SearchResult> = None;

        for depth in 1..=max_depth.max(1) {
            match self.search(board, depth) {
                Ok(result) => {
                    debug!(
                        depth,
                        score = result.score,
                        best_move = ?result.best_move,
                        nodes = self.nodes,
                        "depth completed"
                    );
                    let decisive = result.is_decisive();
                    best = Some(result);
                    if decisive {
                        break;
                    }
                }
                Err(cause) => return self.degrade(board, best, cause),
            }
        }

        match best {
            Some(result) => SearchOutcome::Complete(result),
            None => self.degrade(board, None, SearchError::NoRootMove),
        }
    }

    fn degrade(
        &self,
        board: &Board,
        best: Option<SearchResult>,
        cause: SearchError,
    ) -> SearchOutcome {
        let (best_move, completed_depth) = match best {
            Some(SearchResult {
                best_move: Some(pos),
                depth,
                ..
            }) => (Some(pos), depth),
            _ => (fallback_move(board), 0),
        };
        SearchOutcome::Degraded {
            best_move,
            completed_depth,
            cause,
            nodes: self.nodes,
        }
    }

    #[inline]
    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Fail-soft minimax with alpha-beta pruning.
    ///
    /// Returns the node score from the engine's point of view and the move
    /// that produced it.
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        side: Side,
    ) -> Result<(i32, Option<Pos>), SearchError> {
        if self.deadline_passed() {
            return Err(SearchError::Timeout);
        }
        self.nodes += 1;

        let key = CacheKey::new(board, side.stone(), self.candidate_limit);
        if let Some(entry) = self.cache.get(&key, depth) {
            if let Some(score) = entry.cutoff(alpha, beta) {
                return Ok((score, entry.best_move));
            }
        }

        if let Some(score) = terminal_score(board) {
            return Ok((score, None));
        }
        if depth == 0 {
            return Ok((static_score(board, Cell::Engine), None));
        }

        let moves = match order_children(board, side, self.candidate_limit) {
            Children::Win(pos) => {
                let score = side.win_score();
                self.cache
                    .put(key, CacheEntry::new(Some(pos), score, depth, EntryType::Exact));
                return Ok((score, Some(pos)));
            }
            Children::Ordered(moves) => moves,
        };
        if moves.is_empty() {
            return Ok((static_score(board, Cell::Engine), None));
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let stone = side.stone();
        let mut best_score = match side {
            Side::Maximizing => -INF,
            Side::Minimizing => INF,
        };
        let mut best_move = None;

        for pos in moves {
            board.place(pos, stone);
            let child = self.minimax(board, depth - 1, alpha, beta, side.flip());
            board.remove(pos);
            let (score, _) = child?;

            match side {
                Side::Maximizing => {
                    if score > best_score {
                        best_score = score;
                        best_move = Some(pos);
                    }
                    alpha = alpha.max(score);
                }
                Side::Minimizing => {
                    if score < best_score {
                        best_score = score;
                        best_move = Some(pos);
                    }
                    beta = beta.min(score);
                }
            }

            if beta <= alpha {
                trace!(depth, ?pos, "cutoff");
                break;
            }
        }

        let bound = if best_score <= alpha_orig {
            EntryType::UpperBound
        } else if best_score >= beta_orig {
            EntryType::LowerBound
        } else {
            EntryType::Exact
        };
        self.cache
            .put(key, CacheEntry::new(best_move, best_score, depth, bound));

        Ok((best_score, best_move))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn searcher(limit: usize) -> Searcher {
        Searcher::new(SharedCache::new(100_000), limit)
    }

    /// Exhaustive minimax over the same ordered children, no pruning, no cache
    fn reference(board: &mut Board, depth: u8, side: Side, limit: usize) -> (i32, Option<Pos>) {
        if let Some(score) = terminal_score(board) {
            return (score, None);
        }
        if depth == 0 {
            return (static_score(board, Cell::Engine), None);
        }
        let moves = match order_children(board, side, limit) {
            Children::Win(pos) => return (side.win_score(), Some(pos)),
            Children::Ordered(moves) => moves,
        };
        if moves.is_empty() {
            return (static_score(board, Cell::Engine), None);
        }

        let mut best: Option<(i32, Pos)> = None;
        for pos in moves {
            board.place(pos, side.stone());
            let (score, _) = reference(board, depth - 1, side.flip(), limit);
            board.remove(pos);
            let better = match (side, best) {
                (_, None) => true,
                (Side::Maximizing, Some((b, _))) => score > b,
                (Side::Minimizing, Some((b, _))) => score < b,
            };
            if better {
                best = Some((score, pos));
            }
        }
        best.map_or((0, None), |(score, pos)| (score, Some(pos)))
    }

    fn midgame() -> Board {
        let mut board = Board::new(12);
        board.place(Pos::new(5, 5), Cell::Opponent);
        board.place(Pos::new(6, 6), Cell::Engine);
        board.place(Pos::new(5, 6), Cell::Opponent);
        board.place(Pos::new(5, 4), Cell::Engine);
        board.place(Pos::new(6, 5), Cell::Opponent);
        board
    }

    #[test]
    fn test_search_empty_board() {
        let mut board = Board::new(12);
        let result = searcher(22).search(&mut board, 3).unwrap();
        assert_eq!(result.best_move, Some(Pos::new(6, 6)));
    }

    #[test]
    fn test_search_finds_winning_move() {
        let mut board = Board::new(12);
        for c in 3..7 {
            board.place(Pos::new(7, c), Cell::Engine);
        }
        board.place(Pos::new(7, 2), Cell::Opponent);

        let result = searcher(22).search(&mut board, 2).unwrap();
        assert_eq!(result.best_move, Some(Pos::new(7, 7)));
        assert_eq!(result.score, WIN_SCORE);
    }

    #[test]
    fn test_search_blocks_opponent_four() {
        let mut board = Board::new(12);
        for c in 4..8 {
            board.place(Pos::new(5, c), Cell::Opponent);
        }
        board.place(Pos::new(5, 3), Cell::Engine);

        let result = searcher(22).search(&mut board, 2).unwrap();
        assert_eq!(result.best_move, Some(Pos::new(5, 8)));
        assert!(!result.is_decisive());
    }

    #[test]
    fn test_search_losing_score() {
        // Two separate fours: one block is not enough
        let mut board = Board::new(12);
        for c in 1..5 {
            board.place(Pos::new(2, c), Cell::Opponent);
            board.place(Pos::new(9, c), Cell::Opponent);
        }
        board.place(Pos::new(2, 0), Cell::Engine);
        board.place(Pos::new(9, 0), Cell::Engine);

        let result = searcher(22).search(&mut board, 2).unwrap();
        assert_eq!(result.score, -WIN_SCORE);
    }

    #[test]
    fn test_search_detects_existing_five() {
        let mut board = Board::new(12);
        for c in 0..5 {
            board.place(Pos::new(0, c), Cell::Opponent);
        }
        let mut s = searcher(22);
        let (score, _) = s.minimax(&mut board, 3, -INF, INF, Side::Maximizing).unwrap();
        assert_eq!(score, -WIN_SCORE);
    }

    #[test]
    fn test_alpha_beta_matches_exhaustive_minimax() {
        let limit = 8;
        for depth in 1..=3 {
            let mut board = midgame();
            let expected = reference(&mut board, depth, Side::Maximizing, limit);

            let result = searcher(limit).search(&mut board, depth).unwrap();
            assert_eq!((result.score, result.best_move), expected, "depth {depth}");
        }
    }

    #[test]
    fn test_alpha_beta_matches_with_threats() {
        let limit = 6;
        let mut board = midgame();
        board.place(Pos::new(5, 7), Cell::Engine);
        board.place(Pos::new(7, 5), Cell::Opponent);
        board.place(Pos::new(4, 5), Cell::Engine);

        let expected = reference(&mut board, 3, Side::Maximizing, limit);
        let result = searcher(limit).search(&mut board, 3).unwrap();
        assert_eq!((result.score, result.best_move), expected);
    }

    #[test]
    fn test_search_restores_board() {
        let mut board = midgame();
        let before = board.clone();
        let _ = searcher(10).search(&mut board, 3);
        assert_eq!(board, before);
    }

    #[test]
    fn test_expired_deadline_degrades_to_fallback() {
        let mut board = midgame();
        let before = board.clone();
        let past = Instant::now() - Duration::from_millis(5);

        let outcome = searcher(22)
            .with_deadline(Some(past))
            .search_iterative(&mut board, 5);

        match outcome {
            SearchOutcome::Degraded {
                best_move,
                completed_depth,
                cause,
                ..
            } => {
                assert_eq!(cause, SearchError::Timeout);
                assert_eq!(completed_depth, 0);
                assert_eq!(best_move, fallback_move(&board));
                assert!(best_move.is_some_and(|pos| board.is_empty(pos)));
            }
            other => panic!("expected degraded outcome, got {other:?}"),
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_timeout_keeps_deepest_completed_move() {
        let board = midgame();
        let completed = SearchResult {
            best_move: Some(Pos::new(0, 11)),
            score: 120,
            depth: 2,
            nodes: 40,
        };
        assert_ne!(completed.best_move, fallback_move(&board));

        match searcher(22).degrade(&board, Some(completed), SearchError::Timeout) {
            SearchOutcome::Degraded {
                best_move,
                completed_depth,
                cause,
                ..
            } => {
                assert_eq!(best_move, Some(Pos::new(0, 11)));
                assert_eq!(completed_depth, 2);
                assert_eq!(cause, SearchError::Timeout);
            }
            other => panic!("expected degraded outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_completed_depth_without_move_falls_back() {
        let board = midgame();
        let empty = SearchResult {
            best_move: None,
            score: 0,
            depth: 3,
            nodes: 1,
        };
        let outcome = searcher(22).degrade(&board, Some(empty), SearchError::Timeout);
        assert_eq!(outcome.best_move(), fallback_move(&board));
        assert!(matches!(outcome, SearchOutcome::Degraded { completed_depth: 0, .. }));
    }

    #[test]
    fn test_iterative_stops_on_decisive_score() {
        let mut board = Board::new(12);
        for r in 2..6 {
            board.place(Pos::new(r, 9), Cell::Engine);
        }
        board.place(Pos::new(1, 9), Cell::Opponent);

        match searcher(22).search_iterative(&mut board, 5) {
            SearchOutcome::Complete(result) => {
                assert_eq!(result.depth, 1);
                assert_eq!(result.best_move, Some(Pos::new(6, 9)));
            }
            other => panic!("expected complete outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_iterative_reaches_max_depth() {
        let mut board = midgame();
        match searcher(6).search_iterative(&mut board, 3) {
            SearchOutcome::Complete(result) => {
                assert_eq!(result.depth, 3);
                assert!(result.best_move.is_some());
            }
            other => panic!("expected complete outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_cache_is_shared_and_reused() {
        let cache = SharedCache::new(100_000);
        let mut board = midgame();

        let first = Searcher::new(cache.clone(), 8).search(&mut board, 2).unwrap();
        assert!(!cache.is_empty());

        let mut again = Searcher::new(cache.clone(), 8);
        let second = again.search(&mut board, 2).unwrap();
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        // Root entry is exact, so the repeat is a single cache hit
        assert_eq!(again.nodes(), 1);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut board = Board::new(5);
        for r in 0..5u8 {
            for c in 0..5u8 {
                // Stripes of two never line up five
                let cell = if (r + c / 2) % 2 == 0 { Cell::Engine } else { Cell::Opponent };
                board.place(Pos::new(r, c), cell);
            }
        }
        assert!(board.is_full());
        let result = searcher(22).search(&mut board, 2).unwrap();
        assert_eq!(result.best_move, None);
    }
}
