//! GUI module for the caro game
//!
//! A native front end built on egui/eframe. Engine moves are computed on a
//! worker thread so the window never blocks on search.

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::CaroApp;
pub use game_state::{EndReason, GameClock, GameMode, GameResult, GameState, PLAYER_ONE_TIME, PLAYER_TWO_TIME};
pub use theme::Theme;
