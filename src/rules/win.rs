//! Win and unstoppable-threat detection
//!
//! Win condition: five or more stones of one side in a row, horizontally,
//! vertically or diagonally (overlines count).
//!
//! A double-open four (`_SSSS_`) is not a win yet, but the defender can only
//! close one end, so it is treated as decided one ply early.

use crate::board::{Board, Cell, Pos, DIRECTIONS};

/// Length of a winning run
pub const WIN_LENGTH: usize = 5;

/// Count consecutive `side` stones starting at `pos` and walking (dr, dc).
/// The starting cell itself is included.
#[inline]
fn run_from(board: &Board, pos: Pos, dr: i32, dc: i32, side: Cell) -> usize {
    let mut count = 0;
    let mut r = i32::from(pos.row);
    let mut c = i32::from(pos.col);
    while board.get_at(r, c) == Some(side) {
        count += 1;
        r += dr;
        c += dc;
    }
    count
}

/// Check if there's 5+ in a row for the given side
pub fn has_five_in_row(board: &Board, side: Cell) -> bool {
    let Some(stones) = board.stones(side) else {
        return false;
    };

    stones.iter_ones().any(|idx| {
        let pos = board.pos_of(idx);
        DIRECTIONS
            .iter()
            .any(|&(dr, dc)| run_from(board, pos, dr, dc, side) >= WIN_LENGTH)
    })
}

/// Fast five-in-a-row check through a specific position.
///
/// Only looks along the 4 lines through `pos`; used right after placing a
/// stone there.
#[inline]
pub fn has_five_at_pos(board: &Board, pos: Pos, side: Cell) -> bool {
    if board.get(pos) != side {
        return false;
    }
    DIRECTIONS.iter().any(|&(dr, dc)| {
        // The stone at pos is counted by both walks
        run_from(board, pos, dr, dc, side) + run_from(board, pos, -dr, -dc, side) - 1
            >= WIN_LENGTH
    })
}

/// Find the positions of a 5-in-a-row if one exists
///
/// Returns the full run (5 or more positions) starting from its first stone.
pub fn find_five_line(board: &Board, side: Cell) -> Option<Vec<Pos>> {
    let stones = board.stones(side)?;

    for idx in stones.iter_ones() {
        let pos = board.pos_of(idx);
        for &(dr, dc) in &DIRECTIONS {
            // Only start at the first stone of a run
            let prev = board.get_at(i32::from(pos.row) - dr, i32::from(pos.col) - dc);
            if prev == Some(side) {
                continue;
            }
            let len = run_from(board, pos, dr, dc, side);
            if len >= WIN_LENGTH {
                let line = (0..len as i32)
                    .filter_map(|k| {
                        board.pos_at(i32::from(pos.row) + dr * k, i32::from(pos.col) + dc * k)
                    })
                    .collect();
                return Some(line);
            }
        }
    }
    None
}

/// Check for an `[Empty, S, S, S, S, Empty]` window anywhere on the board.
///
/// Both flanking cells must be on the board; a four touching the edge is
/// not double-open.
pub fn has_double_open_four(board: &Board, side: Cell) -> bool {
    if side == Cell::Empty {
        return false;
    }
    let size = board.size() as i32;

    for r in 0..size {
        for c in 0..size {
            for &(dr, dc) in &DIRECTIONS {
                if !board.contains(r + 5 * dr, c + 5 * dc) {
                    continue;
                }
                let matches = (0..6).all(|k| {
                    let want = if k == 0 || k == 5 { Cell::Empty } else { side };
                    board.get_at(r + k * dr, c + k * dc) == Some(want)
                });
                if matches {
                    return true;
                }
            }
        }
    }
    false
}

/// Check for an `[Empty, S, S, S, S, Empty]` window that includes `pos`
/// as one of its four stones.
///
/// Used right after placing a stone at `pos` to see whether that stone
/// created an unstoppable four.
pub fn has_double_open_four_at(board: &Board, pos: Pos, side: Cell) -> bool {
    if side == Cell::Empty || board.get(pos) != side {
        return false;
    }
    let (row, col) = (i32::from(pos.row), i32::from(pos.col));

    DIRECTIONS.iter().any(|&(dr, dc)| {
        // pos sits at offset 1..=4 inside the window
        (1..=4).any(|offset| {
            let (r0, c0) = (row - offset * dr, col - offset * dc);
            (0..6).all(|k| {
                let want = if k == 0 || k == 5 { Cell::Empty } else { side };
                board.get_at(r0 + k * dr, c0 + k * dc) == Some(want)
            })
        })
    })
}

/// Check for a winner
///
/// Returns `Some(side)` if either side has five in a row. If both do (only
/// possible on hand-built boards), the engine is reported first.
pub fn winner(board: &Board) -> Option<Cell> {
    [Cell::Engine, Cell::Opponent]
        .into_iter()
        .find(|&side| has_five_in_row(board, side))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_of(board: &mut Board, row: u8, cols: std::ops::Range<u8>, side: Cell) {
        for c in cols {
            board.place(Pos::new(row, c), side);
        }
    }

    #[test]
    fn test_five_in_row_horizontal() {
        let mut board = Board::new(12);
        row_of(&mut board, 6, 2..7, Cell::Engine);
        assert!(has_five_in_row(&board, Cell::Engine));
        assert!(!has_five_in_row(&board, Cell::Opponent));
    }

    #[test]
    fn test_five_in_row_vertical() {
        let mut board = Board::new(12);
        for i in 0..5 {
            board.place(Pos::new(i, 9), Cell::Opponent);
        }
        assert!(has_five_in_row(&board, Cell::Opponent));
    }

    #[test]
    fn test_five_in_row_diagonals() {
        let mut se = Board::new(12);
        let mut sw = Board::new(12);
        for i in 0..5 {
            se.place(Pos::new(i, i), Cell::Engine);
            sw.place(Pos::new(i, 11 - i), Cell::Engine);
        }
        assert!(has_five_in_row(&se, Cell::Engine));
        assert!(has_five_in_row(&sw, Cell::Engine));
    }

    #[test]
    fn test_six_in_row_also_wins() {
        let mut board = Board::new(12);
        row_of(&mut board, 3, 0..6, Cell::Engine);
        assert!(has_five_in_row(&board, Cell::Engine));
    }

    #[test]
    fn test_four_in_row_not_win() {
        let mut board = Board::new(12);
        row_of(&mut board, 9, 0..4, Cell::Engine);
        assert!(!has_five_in_row(&board, Cell::Engine));
        assert_eq!(winner(&board), None);
    }

    #[test]
    fn test_broken_five_not_win() {
        let mut board = Board::new(12);
        row_of(&mut board, 2, 0..2, Cell::Engine);
        row_of(&mut board, 2, 3..6, Cell::Engine);
        assert!(!has_five_in_row(&board, Cell::Engine));
    }

    #[test]
    fn test_five_touching_far_edge() {
        let mut board = Board::new(12);
        row_of(&mut board, 11, 7..12, Cell::Opponent);
        assert!(has_five_in_row(&board, Cell::Opponent));
        assert_eq!(winner(&board), Some(Cell::Opponent));

        let line = find_five_line(&board, Cell::Opponent).unwrap();
        assert_eq!(line.first(), Some(&Pos::new(11, 7)));
        assert_eq!(line.len(), 5);
    }

    #[test]
    fn test_five_at_pos_middle_stone() {
        let mut board = Board::new(12);
        row_of(&mut board, 5, 3..8, Cell::Engine);
        assert!(has_five_at_pos(&board, Pos::new(5, 5), Cell::Engine));
        assert!(has_five_at_pos(&board, Pos::new(5, 3), Cell::Engine));
        assert!(!has_five_at_pos(&board, Pos::new(5, 8), Cell::Engine));
    }

    #[test]
    fn test_double_open_four() {
        let mut board = Board::new(12);
        row_of(&mut board, 4, 3..7, Cell::Opponent);
        assert!(has_double_open_four(&board, Cell::Opponent));
        assert!(!has_double_open_four(&board, Cell::Engine));
    }

    #[test]
    fn test_double_open_four_diagonal() {
        let mut board = Board::new(12);
        for i in 2..6 {
            board.place(Pos::new(i, 9 - i), Cell::Engine);
        }
        assert!(has_double_open_four(&board, Cell::Engine));
    }

    #[test]
    fn test_four_at_edge_not_double_open() {
        let mut board = Board::new(12);
        row_of(&mut board, 4, 0..4, Cell::Opponent);
        assert!(!has_double_open_four(&board, Cell::Opponent));

        let mut far = Board::new(12);
        row_of(&mut far, 4, 8..12, Cell::Opponent);
        assert!(!has_double_open_four(&far, Cell::Opponent));
    }

    #[test]
    fn test_four_with_occupied_end_not_double_open() {
        let mut board = Board::new(12);
        row_of(&mut board, 4, 3..7, Cell::Opponent);
        board.place(Pos::new(4, 7), Cell::Engine);
        assert!(!has_double_open_four(&board, Cell::Opponent));
    }

    #[test]
    fn test_double_open_four_at_pos() {
        let mut board = Board::new(12);
        row_of(&mut board, 7, 2..6, Cell::Engine);
        for c in 2..6 {
            assert!(has_double_open_four_at(&board, Pos::new(7, c), Cell::Engine));
        }
        // Unrelated stone elsewhere is not part of the four
        board.place(Pos::new(0, 0), Cell::Engine);
        assert!(!has_double_open_four_at(&board, Pos::new(0, 0), Cell::Engine));
        assert!(!has_double_open_four_at(&board, Pos::new(7, 6), Cell::Engine));
    }

    #[test]
    fn test_three_not_double_open_four() {
        let mut board = Board::new(12);
        row_of(&mut board, 4, 3..6, Cell::Opponent);
        assert!(!has_double_open_four(&board, Cell::Opponent));
    }
}
