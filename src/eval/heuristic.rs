//! Static evaluation of caro positions
//!
//! The evaluator walks every maximal line of the board in the four
//! principal directions, slides windows of length 5 and 6 along it, and
//! tallies each window's [`Tier`] for both sides in one pass. The score is
//! the weighted tally of `side` minus a slightly inflated weighted tally of
//! the opponent, which makes the engine prefer defending over mirroring an
//! attack of the same size.

use crate::board::{Board, Cell, DIRECTIONS};

use super::patterns::{classify_window, Tier, TierCounts};

/// Saturating score for a decided position
pub const WIN_SCORE: i32 = 1_000_000;

/// Positional scores are clamped to this magnitude so they never reach
/// [`WIN_SCORE`].
pub const MAX_POSITIONAL_SCORE: i32 = 900_000;

/// Opponent threats are weighted by `NUM / DEN` (1.1)
const OPPONENT_WEIGHT_NUM: i64 = 11;
const OPPONENT_WEIGHT_DEN: i64 = 10;

/// Window lengths slid along every line
const WINDOW_LENGTHS: [usize; 2] = [6, 5];

/// Evaluate the board from the perspective of `side`.
///
/// Returns:
/// - `WIN_SCORE` if `side` already has five in a row
/// - `-WIN_SCORE` if the opponent does
/// - otherwise a positional score strictly inside `±MAX_POSITIONAL_SCORE`
///
/// # Example
/// ```
/// use caro::board::{Board, Cell, Pos};
/// use caro::eval::static_score;
///
/// let mut board = Board::new(12);
/// board.place(Pos::new(6, 6), Cell::Engine);
/// assert!(static_score(&board, Cell::Engine) > 0);
/// assert!(static_score(&board, Cell::Opponent) < 0);
/// ```
#[must_use]
pub fn static_score(board: &Board, side: Cell) -> i32 {
    if side == Cell::Empty {
        return 0;
    }
    let (own, opp) = tally(board, side);

    if own.get(Tier::Five) > 0 {
        return WIN_SCORE;
    }
    if opp.get(Tier::Five) > 0 {
        return -WIN_SCORE;
    }

    let raw = own.weighted() - opp.weighted() * OPPONENT_WEIGHT_NUM / OPPONENT_WEIGHT_DEN;
    let bound = i64::from(MAX_POSITIONAL_SCORE);
    raw.clamp(-bound, bound) as i32
}

/// Tier counts for `side` and for its opponent, over every window on the
/// board.
pub fn tally(board: &Board, side: Cell) -> (TierCounts, TierCounts) {
    let opponent = side.other();
    let mut own = TierCounts::default();
    let mut opp = TierCounts::default();
    let mut line: Vec<Cell> = Vec::with_capacity(board.size());

    for_each_line(board, &mut line, |cells| {
        for len in WINDOW_LENGTHS {
            if cells.len() < len {
                continue;
            }
            for window in cells.windows(len) {
                own.add(classify_window(window, side));
                opp.add(classify_window(window, opponent));
            }
        }
    });

    (own, opp)
}

/// Call `f` with the cells of every maximal line of length >= 5.
///
/// A line starts at a cell whose predecessor in the walking direction is
/// off the board. `buf` is reused between lines.
fn for_each_line<F>(board: &Board, buf: &mut Vec<Cell>, mut f: F)
where
    F: FnMut(&[Cell]),
{
    let size = board.size() as i32;

    for &(dr, dc) in &DIRECTIONS {
        for r in 0..size {
            for c in 0..size {
                if board.contains(r - dr, c - dc) {
                    continue;
                }
                buf.clear();
                let (mut rr, mut cc) = (r, c);
                while let Some(cell) = board.get_at(rr, cc) {
                    buf.push(cell);
                    rr += dr;
                    cc += dc;
                }
                if buf.len() >= 5 {
                    f(buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    fn place_row(board: &mut Board, row: u8, cols: &[u8], side: Cell) {
        for &c in cols {
            board.place(Pos::new(row, c), side);
        }
    }

    #[test]
    fn test_empty_board_scores_zero() {
        let board = Board::new(12);
        assert_eq!(static_score(&board, Cell::Engine), 0);
        assert_eq!(static_score(&board, Cell::Opponent), 0);
    }

    #[test]
    fn test_five_saturates() {
        let mut board = Board::new(12);
        place_row(&mut board, 3, &[2, 3, 4, 5, 6], Cell::Engine);
        assert_eq!(static_score(&board, Cell::Engine), WIN_SCORE);
        assert_eq!(static_score(&board, Cell::Opponent), -WIN_SCORE);
    }

    #[test]
    fn test_gapped_five_does_not_saturate() {
        let mut board = Board::new(12);
        place_row(&mut board, 3, &[2, 3, 5, 6, 7], Cell::Engine);
        let score = static_score(&board, Cell::Engine);
        assert!(score < WIN_SCORE);
        assert!(score > 0);
    }

    #[test]
    fn test_positional_score_is_clamped() {
        // Many open fours for one side pile up far beyond the clamp
        let mut board = Board::new(16);
        for row in [1u8, 4, 7, 10, 13] {
            place_row(&mut board, row, &[2, 3, 4, 5], Cell::Engine);
            place_row(&mut board, row, &[9, 10, 11, 12], Cell::Engine);
        }
        assert_eq!(static_score(&board, Cell::Engine), MAX_POSITIONAL_SCORE);
        assert_eq!(static_score(&board, Cell::Opponent), -MAX_POSITIONAL_SCORE);
    }

    #[test]
    fn test_opponent_threat_weighs_more() {
        // Mirror positions: same shape for each side on separate rows
        let mut board = Board::new(12);
        place_row(&mut board, 2, &[4, 5, 6], Cell::Engine);
        place_row(&mut board, 9, &[4, 5, 6], Cell::Opponent);
        assert!(static_score(&board, Cell::Engine) < 0);
        assert!(static_score(&board, Cell::Opponent) < 0);
    }

    #[test]
    fn test_open_three_beats_scattered_stones() {
        let mut three = Board::new(12);
        place_row(&mut three, 6, &[4, 5, 6], Cell::Engine);

        let mut scattered = Board::new(12);
        for pos in [Pos::new(1, 1), Pos::new(6, 10), Pos::new(10, 3)] {
            scattered.place(pos, Cell::Engine);
        }

        assert!(static_score(&three, Cell::Engine) > static_score(&scattered, Cell::Engine));
    }

    #[test]
    fn test_blocking_reduces_threat() {
        let mut open = Board::new(12);
        place_row(&mut open, 5, &[4, 5, 6, 7], Cell::Opponent);
        let before = static_score(&open, Cell::Engine);

        let mut blocked = open.clone();
        blocked.place(Pos::new(5, 8), Cell::Engine);
        let after = static_score(&blocked, Cell::Engine);

        assert!(after > before);
    }

    #[test]
    fn test_tally_counts_double_open_four() {
        let mut board = Board::new(12);
        place_row(&mut board, 6, &[3, 4, 5, 6], Cell::Opponent);
        let (own, opp) = tally(&board, Cell::Engine);
        assert_eq!(opp.get(Tier::DoubleOpenFour), 1);
        assert_eq!(own.get(Tier::DoubleOpenFour), 0);
        assert_eq!(own.get(Tier::One), 0);
    }

    #[test]
    fn test_short_diagonals_are_skipped() {
        // Corner stone only lies on lines of length >= 5 horizontally,
        // vertically and along the main diagonal
        let mut board = Board::new(5);
        board.place(Pos::new(0, 0), Cell::Engine);
        let (own, _) = tally(&board, Cell::Engine);
        assert_eq!(own.get(Tier::One), 3);
    }
}
