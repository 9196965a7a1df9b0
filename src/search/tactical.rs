//! Forced-move detection
//!
//! Runs before any tree search and looks exactly one ply ahead:
//! 1. an engine move that wins on the spot
//! 2. an opponent move that would win on the spot (must be blocked)
//! 3. an opponent move that would make a double-open four (must be
//!    pre-empted, since once formed it cannot be stopped)
//!
//! Each pass is one sweep over the empty cells with make/unmake on the
//! caller's working board, which is restored before returning.

use crate::board::{Board, Cell, Pos};
use crate::rules::{has_double_open_four_at, has_five_at_pos};

/// A move that has to be played this ply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forced {
    /// Completes five for the engine
    Win(Pos),
    /// Takes the cell where the opponent would complete five
    Block(Pos),
    /// Takes the cell where the opponent would make a double-open four
    Preempt(Pos),
}

impl Forced {
    #[inline]
    #[must_use]
    pub fn pos(self) -> Pos {
        match self {
            Forced::Win(pos) | Forced::Block(pos) | Forced::Preempt(pos) => pos,
        }
    }

    /// Defensive moves may be skipped by the weaker difficulty levels
    #[inline]
    #[must_use]
    pub fn is_defensive(self) -> bool {
        !matches!(self, Forced::Win(_))
    }
}

/// Find a forced move for the engine, if the position has one.
///
/// # Example
/// ```
/// use caro::board::{Board, Cell, Pos};
/// use caro::search::{find_forced_move, Forced};
///
/// let mut board = Board::new(12);
/// for c in 2..6 {
///     board.place(Pos::new(4, c), Cell::Engine);
/// }
/// board.place(Pos::new(4, 1), Cell::Opponent);
/// assert_eq!(find_forced_move(&mut board), Some(Forced::Win(Pos::new(4, 6))));
/// ```
pub fn find_forced_move(board: &mut Board) -> Option<Forced> {
    if let Some(pos) = find_winning_move(board, Cell::Engine) {
        return Some(Forced::Win(pos));
    }
    if let Some(pos) = find_winning_move(board, Cell::Opponent) {
        return Some(Forced::Block(pos));
    }
    find_double_open_four_move(board, Cell::Opponent).map(Forced::Preempt)
}

/// First empty cell (row-major) where `side` would complete five.
pub fn find_winning_move(board: &mut Board, side: Cell) -> Option<Pos> {
    first_empty_where(board, side, |b, pos| has_five_at_pos(b, pos, side))
}

/// First empty cell (row-major) where `side` would make a double-open four.
pub fn find_double_open_four_move(board: &mut Board, side: Cell) -> Option<Pos> {
    first_empty_where(board, side, |b, pos| has_double_open_four_at(b, pos, side))
}

fn first_empty_where<F>(board: &mut Board, side: Cell, test: F) -> Option<Pos>
where
    F: Fn(&Board, Pos) -> bool,
{
    let empties: Vec<Pos> = board.empty_cells().collect();
    for pos in empties {
        board.place(pos, side);
        let hit = test(board, pos);
        board.remove(pos);
        if hit {
            return Some(pos);
        }
    }
    None
}
