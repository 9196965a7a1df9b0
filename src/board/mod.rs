//! Board representation for caro

pub mod bitboard;
pub mod board;


// Re-exports
pub use bitboard::Bitboard;
pub use board::{Board, BoardKey};

/// Default board size (12x12)
pub const DEFAULT_BOARD_SIZE: usize = 12;
/// Smallest board on which a five can still be formed
pub const MIN_BOARD_SIZE: usize = 5;
/// Largest supported board (coordinates must fit the `Pos` fields)
pub const MAX_BOARD_SIZE: usize = 32;

/// Direction vectors for line scans (4 directions)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Contents of a single intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    /// The human (or other external) player
    Opponent,
    /// The side the engine plays
    Engine,
}

impl Cell {
    /// Get the other side (Empty stays Empty)
    #[inline]
    pub fn other(self) -> Cell {
        match self {
            Cell::Opponent => Cell::Engine,
            Cell::Engine => Cell::Opponent,
            Cell::Empty => Cell::Empty,
        }
    }

    /// Numeric code used on the wire: 0 empty, 1 opponent, 2 engine
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Opponent => 1,
            Cell::Engine => 2,
        }
    }

    #[inline]
    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Opponent),
            2 => Some(Cell::Engine),
            _ => None,
        }
    }

    /// Diagram symbol: `.` empty, `X` opponent, `O` engine
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Opponent => 'X',
            Cell::Engine => 'O',
        }
    }

    #[inline]
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '.' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::Opponent),
            'O' | 'o' => Some(Cell::Engine),
            _ => None,
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!((row as usize) < MAX_BOARD_SIZE && (col as usize) < MAX_BOARD_SIZE);
        Self { row, col }
    }

    /// Row-major index on a board of the given size
    #[inline]
    pub fn to_index(self, size: usize) -> usize {
        self.row as usize * size + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize, size: usize) -> Self {
        Self {
            row: (idx / size) as u8,
            col: (idx % size) as u8,
        }
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
