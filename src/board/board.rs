//! Board structure with make/unmake of single stones

use std::fmt;
use std::str::FromStr;

use super::bitboard::Bitboard;
use super::{Cell, Pos, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::BoardError;

/// Game board: one occupancy bitset per side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Engine stones bitboard
    pub engine: Bitboard,
    /// Opponent stones bitboard
    pub opponent: Bitboard,
}

/// Canonical snapshot of the full board contents.
///
/// Two boards produce equal keys iff they have the same size and the same
/// stone on every cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardKey {
    size: u8,
    engine: Box<[u64]>,
    opponent: Box<[u64]>,
}

impl Board {
    /// Create an empty `size`×`size` board.
    ///
    /// Sizes outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE` are clamped; use
    /// [`Board::try_new`] to reject them instead.
    pub fn new(size: usize) -> Self {
        let size = size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE);
        Self {
            size,
            engine: Bitboard::with_cells(size * size),
            opponent: Bitboard::with_cells(size * size),
        }
    }

    pub fn try_new(size: usize) -> Result<Self, BoardError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(BoardError::UnsupportedSize(size));
        }
        Ok(Self::new(size))
    }

    /// Build a board from numeric cell codes (0 empty, 1 opponent, 2 engine).
    ///
    /// This is the validation point for boards coming from outside the
    /// engine: the grid must be square, of a supported size, and contain
    /// only known codes.
    pub fn from_codes(rows: &[Vec<u8>]) -> Result<Self, BoardError> {
        if rows.is_empty() {
            return Err(BoardError::Empty);
        }
        let size = rows.len();
        let mut board = Self::try_new(size)?;

        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(BoardError::NotSquare {
                    row: r,
                    len: row.len(),
                    expected: size,
                });
            }
            for (c, &code) in row.iter().enumerate() {
                let cell =
                    Cell::from_code(code).ok_or(BoardError::UnknownCell { row: r, col: c, code })?;
                board.place(Pos::new(r as u8, c as u8), cell);
            }
        }
        Ok(board)
    }

    /// Numeric cell codes, row by row
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        (0..self.size)
            .map(|r| {
                (0..self.size)
                    .map(|c| self.get(Pos::new(r as u8, c as u8)).code())
                    .collect()
            })
            .collect()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Row-major index of a position on this board
    #[inline]
    pub fn index(&self, pos: Pos) -> usize {
        pos.to_index(self.size)
    }

    #[inline]
    pub fn pos_of(&self, idx: usize) -> Pos {
        Pos::from_index(idx, self.size)
    }

    /// Check signed coordinates against the board bounds
    #[inline]
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    /// Position for signed coordinates, if on the board
    #[inline]
    pub fn pos_at(&self, row: i32, col: i32) -> Option<Pos> {
        if self.contains(row, col) {
            Some(Pos::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Center cell (N/2, N/2)
    #[inline]
    pub fn center(&self) -> Pos {
        let mid = (self.size / 2) as u8;
        Pos::new(mid, mid)
    }

    /// Get the cell at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        let idx = self.index(pos);
        if self.engine.get(idx) {
            Cell::Engine
        } else if self.opponent.get(idx) {
            Cell::Opponent
        } else {
            Cell::Empty
        }
    }

    /// Cell at signed coordinates; `None` when off the board
    #[inline]
    pub fn get_at(&self, row: i32, col: i32) -> Option<Cell> {
        self.pos_at(row, col).map(|pos| self.get(pos))
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        let idx = self.index(pos);
        !self.engine.get(idx) && !self.opponent.get(idx)
    }

    /// Place a stone (make). Placing `Cell::Empty` is a no-op.
    #[inline]
    pub fn place(&mut self, pos: Pos, cell: Cell) {
        let idx = self.index(pos);
        match cell {
            Cell::Engine => self.engine.set(idx),
            Cell::Opponent => self.opponent.set(idx),
            Cell::Empty => {}
        }
    }

    /// Remove whatever stone is at `pos` (unmake)
    #[inline]
    pub fn remove(&mut self, pos: Pos) {
        let idx = self.index(pos);
        self.engine.clear(idx);
        self.opponent.clear(idx);
    }

    /// Get bitboard for a side (returns None for Empty)
    #[inline]
    pub fn stones(&self, cell: Cell) -> Option<&Bitboard> {
        match cell {
            Cell::Engine => Some(&self.engine),
            Cell::Opponent => Some(&self.opponent),
            Cell::Empty => None,
        }
    }

    /// Positions of all stones of one side
    pub fn positions(&self, cell: Cell) -> impl Iterator<Item = Pos> + '_ {
        self.stones(cell)
            .into_iter()
            .flat_map(|bb| bb.iter_ones())
            .map(move |idx| self.pos_of(idx))
    }

    /// All empty positions in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.cell_count())
            .map(move |idx| self.pos_of(idx))
            .filter(move |&pos| self.is_empty(pos))
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.engine.count() + self.opponent.count()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.engine.is_empty() && self.opponent.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == self.cell_count()
    }

    /// Canonical snapshot of the full contents
    pub fn key(&self) -> BoardKey {
        BoardKey {
            size: self.size as u8,
            engine: self.engine.words().into(),
            opponent: self.opponent.words().into(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            let line: String = (0..self.size)
                .map(|c| self.get(Pos::new(r as u8, c as u8)).symbol())
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Parse a diagram of `.`, `X` (opponent) and `O` (engine) rows.
/// Blank lines and surrounding whitespace are ignored.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if rows.is_empty() {
            return Err(BoardError::Empty);
        }
        let size = rows.len();
        let mut board = Self::try_new(size)?;

        for (r, row) in rows.iter().enumerate() {
            let symbols: Vec<char> = row.chars().filter(|ch| !ch.is_whitespace()).collect();
            if symbols.len() != size {
                return Err(BoardError::NotSquare {
                    row: r,
                    len: symbols.len(),
                    expected: size,
                });
            }
            for (c, &symbol) in symbols.iter().enumerate() {
                let cell = Cell::from_symbol(symbol)
                    .ok_or(BoardError::UnknownSymbol { row: r, col: c, symbol })?;
                board.place(Pos::new(r as u8, c as u8), cell);
            }
        }
        Ok(board)
    }
}
