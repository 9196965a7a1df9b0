//! Candidate move generation and the one-ply fallback move
//!
//! Only cells close to existing stones are worth searching; this keeps the
//! branching factor bounded no matter how full the board is.

use crate::board::{Board, Cell, Pos, DIRECTIONS};

/// Chebyshev distance from an occupied cell for a cell to be a candidate
pub const CANDIDATE_RADIUS: i32 = 2;

/// Cells inspected on each side of a candidate when ranking it
const SCAN_REACH: i32 = 4;

/// Ranking weight of a nearby engine stone
const ENGINE_STONE_WEIGHT: i32 = 4;
/// Ranking weight of a nearby opponent stone
const OPPONENT_STONE_WEIGHT: i32 = 3;

/// Generate up to `limit` candidate moves, most promising first.
///
/// On an empty board the only candidate is the center. Ties keep
/// row-major order, so the result is deterministic.
///
/// # Example
/// ```
/// use caro::board::{Board, Pos};
/// use caro::search::candidates;
///
/// let board = Board::new(12);
/// assert_eq!(candidates(&board, 22), vec![Pos::new(6, 6)]);
/// ```
#[must_use]
pub fn candidates(board: &Board, limit: usize) -> Vec<Pos> {
    if board.is_board_empty() {
        return vec![board.center()];
    }

    let mut near = vec![false; board.cell_count()];
    for pos in board.positions(Cell::Engine).chain(board.positions(Cell::Opponent)) {
        for dr in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
            for dc in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
                let r = i32::from(pos.row) + dr;
                let c = i32::from(pos.col) + dc;
                if let Some(p) = board.pos_at(r, c) {
                    near[board.index(p)] = true;
                }
            }
        }
    }

    let mut scored: Vec<(Pos, i32)> = near
        .iter()
        .enumerate()
        .filter(|&(_, &is_near)| is_near)
        .map(|(idx, _)| board.pos_of(idx))
        .filter(|&pos| board.is_empty(pos))
        .map(|pos| (pos, proximity_score(board, pos)))
        .collect();

    // Stable sort keeps row-major order between equal scores
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(limit);
    scored.into_iter().map(|(pos, _)| pos).collect()
}

/// Weighted count of stones within reach of `pos` along the 4 lines.
fn proximity_score(board: &Board, pos: Pos) -> i32 {
    let (row, col) = (i32::from(pos.row), i32::from(pos.col));
    let mut score = 0;

    for &(dr, dc) in &DIRECTIONS {
        for k in -SCAN_REACH..=SCAN_REACH {
            match board.get_at(row + k * dr, col + k * dc) {
                Some(Cell::Engine) => score += ENGINE_STONE_WEIGHT,
                Some(Cell::Opponent) => score += OPPONENT_STONE_WEIGHT,
                _ => {}
            }
        }
    }
    score
}

/// Pick a move without searching.
///
/// Every empty cell is scored by the 9-cell lines through it: `k² + 2k` for
/// a line holding `k` stones of one side and no stones of the other, `k²`
/// if it is mixed. The engine's lines count in full and the opponent's at
/// 9/10. Returns `None` only when the board is full.
#[must_use]
pub fn fallback_move(board: &Board) -> Option<Pos> {
    if board.is_board_empty() {
        return Some(board.center());
    }

    let mut best: Option<(Pos, i32)> = None;
    for pos in board.empty_cells() {
        let score = fallback_score(board, pos);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((pos, score));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Fallback score of one cell, scaled by 10 to keep the 9/10 factor integral.
fn fallback_score(board: &Board, pos: Pos) -> i32 {
    let (row, col) = (i32::from(pos.row), i32::from(pos.col));
    let mut total = 0;

    for &(dr, dc) in &DIRECTIONS {
        let mut engine = 0;
        let mut opponent = 0;
        for k in -SCAN_REACH..=SCAN_REACH {
            match board.get_at(row + k * dr, col + k * dc) {
                Some(Cell::Engine) => engine += 1,
                Some(Cell::Opponent) => opponent += 1,
                _ => {}
            }
        }
        total += 10 * line_value(engine, opponent) + 9 * line_value(opponent, engine);
    }
    total
}

#[inline]
fn line_value(own: i32, other: i32) -> i32 {
    if own == 0 {
        0
    } else if other == 0 {
        own * own + 2 * own
    } else {
        own * own
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_center() {
        assert_eq!(candidates(&Board::new(12), 22), vec![Pos::new(6, 6)]);
        assert_eq!(candidates(&Board::new(15), 5), vec![Pos::new(7, 7)]);
    }

    #[test]
    fn test_candidates_within_radius() {
        let mut board = Board::new(12);
        board.place(Pos::new(6, 6), Cell::Opponent);
        let moves = candidates(&board, 100);

        // 5x5 block around the stone, minus the stone itself
        assert_eq!(moves.len(), 24);
        for pos in &moves {
            let dr = (i32::from(pos.row) - 6).abs();
            let dc = (i32::from(pos.col) - 6).abs();
            assert!(dr <= CANDIDATE_RADIUS && dc <= CANDIDATE_RADIUS);
            assert!(board.is_empty(*pos));
        }
    }

    #[test]
    fn test_candidates_clipped_at_corner() {
        let mut board = Board::new(12);
        board.place(Pos::new(0, 0), Cell::Engine);
        assert_eq!(candidates(&board, 100).len(), 8);
    }

    #[test]
    fn test_candidates_truncated_to_limit() {
        let mut board = Board::new(12);
        board.place(Pos::new(3, 3), Cell::Engine);
        board.place(Pos::new(8, 8), Cell::Opponent);
        assert_eq!(candidates(&board, 10).len(), 10);
        assert!(candidates(&board, 100).len() > 10);
    }

    #[test]
    fn test_candidates_rank_lines_through_stones() {
        let mut board = Board::new(12);
        for c in [4, 5, 7, 8] {
            board.place(Pos::new(6, c), Cell::Engine);
        }
        let moves = candidates(&board, 3);

        // The gap sees all four stones along the row
        assert_eq!(moves[0], Pos::new(6, 6));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_candidates_full_board_is_empty() {
        let mut board = Board::new(5);
        for r in 0..5u8 {
            for c in 0..5u8 {
                let cell = if (r + c) % 2 == 0 { Cell::Engine } else { Cell::Opponent };
                board.place(Pos::new(r, c), cell);
            }
        }
        assert!(candidates(&board, 22).is_empty());
        assert_eq!(fallback_move(&board), None);
    }

    #[test]
    fn test_fallback_extends_own_line() {
        let mut board = Board::new(12);
        for c in 3..6 {
            board.place(Pos::new(6, c), Cell::Engine);
        }
        let pos = fallback_move(&board).unwrap();
        assert_eq!(pos.row, 6);
        assert!(board.is_empty(pos));
    }

    #[test]
    fn test_fallback_picks_empty_cell() {
        let mut board = Board::new(5);
        for r in 0..5u8 {
            for c in 0..5u8 {
                if (r, c) != (4, 4) {
                    let cell = if (r + c) % 2 == 0 { Cell::Engine } else { Cell::Opponent };
                    board.place(Pos::new(r, c), cell);
                }
            }
        }
        assert_eq!(fallback_move(&board), Some(Pos::new(4, 4)));
    }

    #[test]
    fn test_fallback_empty_board_center() {
        assert_eq!(fallback_move(&Board::new(12)), Some(Pos::new(6, 6)));
    }
}
