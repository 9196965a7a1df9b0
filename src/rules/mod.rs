//! Game rules for caro
//!
//! Plain five-in-a-row: no captures, no forbidden moves, overlines win.

pub mod win;

// Re-exports for convenient access
pub use win::{
    find_five_line, has_double_open_four, has_double_open_four_at, has_five_at_pos,
    has_five_in_row, winner, WIN_LENGTH,
};
