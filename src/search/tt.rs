//! Transposition cache for search results
//!
//! Entries are keyed by the full board contents (not a hash), the side to
//! move and the candidate limit the result was computed under, so a hit can
//! never come from a different position. The cache is advisory: a miss only
//! costs time.
//!
//! # Example
//!
//! ```
//! use caro::board::{Board, Cell, Pos};
//! use caro::search::{CacheEntry, CacheKey, EntryType, TranspositionCache};
//!
//! let mut tt = TranspositionCache::new(1024);
//! let key = CacheKey::new(&Board::new(12), Cell::Engine, 22);
//!
//! tt.put(key.clone(), CacheEntry::new(Some(Pos::new(6, 6)), 40, 3, EntryType::Exact));
//!
//! assert!(tt.get(&key, 3).is_some());
//! assert!(tt.get(&key, 4).is_none()); // stored result is too shallow
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::board::{Board, BoardKey, Cell, Pos};

/// Default number of entries before eviction kicks in
pub const DEFAULT_CACHE_CAPACITY: usize = 200_000;

/// How a stored score relates to the true value of the position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Exact score - the search completed inside the window
    Exact,
    /// Lower bound - score >= stored value (beta cutoff)
    LowerBound,
    /// Upper bound - score <= stored value (no move raised alpha)
    UpperBound,
}

/// Identity of a searched node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    board: BoardKey,
    to_move: Cell,
    limit: usize,
}

impl CacheKey {
    pub fn new(board: &Board, to_move: Cell, limit: usize) -> Self {
        Self {
            board: board.key(),
            to_move,
            limit,
        }
    }
}

/// One cached search result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub best_move: Option<Pos>,
    pub score: i32,
    /// Remaining depth the result was computed with
    pub depth: u8,
    pub bound: EntryType,
}

impl CacheEntry {
    #[must_use]
    pub fn new(best_move: Option<Pos>, score: i32, depth: u8, bound: EntryType) -> Self {
        Self {
            best_move,
            score,
            depth,
            bound,
        }
    }

    /// Score to return for a node searched with window (alpha, beta), if
    /// this entry decides it.
    #[must_use]
    pub fn cutoff(&self, alpha: i32, beta: i32) -> Option<i32> {
        match self.bound {
            EntryType::Exact => Some(self.score),
            EntryType::LowerBound if self.score >= beta => Some(self.score),
            EntryType::UpperBound if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    entry: CacheEntry,
    /// Insertion sequence number, for oldest-first eviction
    seq: u64,
}

/// Bounded map from [`CacheKey`] to [`CacheEntry`].
///
/// When a `put` pushes the size past `capacity`, the older half of the
/// entries is dropped.
#[derive(Debug)]
pub struct TranspositionCache {
    entries: HashMap<CacheKey, Slot>,
    capacity: usize,
    next_seq: u64,
    hits: u64,
    misses: u64,
}

impl TranspositionCache {
    /// Create an empty cache holding at most `capacity` entries (minimum 2).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(2),
            next_seq: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Look up `key`, accepting only entries computed at least `depth` deep.
    pub fn get(&mut self, key: &CacheKey, depth: u8) -> Option<CacheEntry> {
        match self.entries.get(key) {
            Some(slot) if slot.entry.depth >= depth => {
                self.hits += 1;
                Some(slot.entry)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert or overwrite `key`, evicting if over capacity.
    pub fn put(&mut self, key: CacheKey, entry: CacheEntry) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(key, Slot { entry, seq });

        if self.entries.len() > self.capacity {
            self.evict_oldest_half();
        }
    }

    fn evict_oldest_half(&mut self) {
        let before = self.entries.len();
        let keep = self.capacity / 2;
        let drop = before - keep;

        let mut seqs: Vec<u64> = self.entries.values().map(|slot| slot.seq).collect();
        // seqs are unique, so exactly `drop` entries fall below the cutoff
        let (_, &mut cutoff, _) = seqs.select_nth_unstable(drop);
        self.entries.retain(|_, slot| slot.seq >= cutoff);

        trace!(before, after = self.entries.len(), "transposition cache evicted");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl Default for TranspositionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently stored
    pub size: usize,
    /// Entries allowed before eviction
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate in percent (0 when nothing was probed)
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let probes = self.hits + self.misses;
        if probes == 0 {
            0.0
        } else {
            self.hits as f64 / probes as f64 * 100.0
        }
    }
}

/// Process-wide handle to one [`TranspositionCache`].
///
/// Cloning the handle shares the cache. Every operation takes the single
/// lock for its own duration. A poisoned lock is recovered: entries are
/// only hints, so a half-finished write cannot make search incorrect.
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    inner: Arc<Mutex<TranspositionCache>>,
}

impl SharedCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TranspositionCache::new(capacity))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TranspositionCache> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &CacheKey, depth: u8) -> Option<CacheEntry> {
        self.lock().get(key, depth)
    }

    pub fn put(&self, key: CacheKey, entry: CacheEntry) {
        self.lock().put(key, entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }
}
