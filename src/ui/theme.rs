//! Colour themes and layout constants for the caro GUI

use egui::Color32;

/// Selectable board theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Wood,
    Paper,
    Dark,
}

/// Colours used to draw the board for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub board: Color32,
    pub line: Color32,
    pub player_one: Color32,
    pub player_two: Color32,
    /// Outline drawn around player two's stones
    pub player_two_stroke: Color32,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Wood, Theme::Paper, Theme::Dark];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Wood => "Wood",
            Theme::Paper => "Paper",
            Theme::Dark => "Dark",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Wood => Palette {
                board: Color32::from_rgb(0xee, 0xcf, 0xa1),
                line: Color32::from_rgb(0x5e, 0x40, 0x26),
                player_one: Color32::from_rgb(25, 25, 30),
                player_two: Color32::from_rgb(250, 250, 252),
                player_two_stroke: Color32::from_rgb(0xdd, 0xdd, 0xdd),
            },
            Theme::Paper => Palette {
                board: Color32::from_rgb(0xf8, 0xf9, 0xfa),
                line: Color32::from_rgb(0x2c, 0x3e, 0x50),
                player_one: Color32::from_rgb(0x2c, 0x3e, 0x50),
                player_two: Color32::WHITE,
                player_two_stroke: Color32::from_rgb(0x2c, 0x3e, 0x50),
            },
            Theme::Dark => Palette {
                board: Color32::from_rgb(0x2d, 0x34, 0x36),
                line: Color32::from_rgb(0x63, 0x6e, 0x72),
                player_one: Color32::from_rgb(0x00, 0xce, 0xc9),
                player_two: Color32::from_rgb(0xff, 0x76, 0x75),
                player_two_stroke: Color32::from_rgb(0xff, 0x76, 0x75),
            },
        }
    }
}

// Markers
pub const LAST_MOVE_MARKER: Color32 = Color32::from_rgb(230, 60, 60);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 220, 50);

// Panel text
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);

// Timer colors
pub const TIMER_NORMAL: Color32 = Color32::from_rgb(80, 200, 120);
pub const TIMER_WARNING: Color32 = Color32::from_rgb(255, 180, 50);
pub const TIMER_CRITICAL: Color32 = Color32::from_rgb(255, 70, 70);

// Sizes
pub const BOARD_MARGIN: f32 = 32.0;
pub const STONE_RADIUS_RATIO: f32 = 0.42;
pub const GRID_LINE_WIDTH: f32 = 1.0;
pub const LAST_MOVE_MARKER_RADIUS: f32 = 5.0;
