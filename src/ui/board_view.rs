//! Board rendering for the caro GUI
//!
//! Stones sit inside the cells of an N×N grid (not on intersections).

use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use super::game_state::PLAYER_ONE;
use super::theme::{self, Palette};
use crate::{Board, Cell, Pos};

/// What the board needs to know about the game to draw itself
pub struct BoardScene<'a> {
    pub board: &'a Board,
    pub current_turn: Cell,
    pub last_move: Option<Pos>,
    pub winning_line: &'a [Pos],
    pub accepts_input: bool,
    pub palette: Palette,
}

/// Board view handles rendering and input for the game board
pub struct BoardView {
    cell_size: f32,
    cells: usize,
    board_rect: Rect,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_size: 38.0,
            cells: crate::DEFAULT_BOARD_SIZE,
            board_rect: Rect::NOTHING,
        }
    }
}

impl BoardView {
    /// Render the board and return the clicked cell, if any
    pub fn show(&mut self, ui: &mut egui::Ui, scene: &BoardScene<'_>) -> Option<Pos> {
        let available = ui.available_size();
        let side = available.x.min(available.y) - 20.0;
        self.layout(
            Rect::from_min_size(ui.cursor().min, Vec2::splat(side)),
            scene.board.size(),
        );

        let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::click());
        self.board_rect = response.rect;

        painter.rect_filled(self.board_rect, CornerRadius::same(4), scene.palette.board);
        self.draw_grid(&painter, scene.palette.line);

        for pos in scene.board.positions(Cell::Opponent).chain(scene.board.positions(Cell::Engine)) {
            self.draw_stone(&painter, pos, scene.board.get(pos), &scene.palette);
        }

        if let Some(pos) = scene.last_move {
            painter.circle_filled(self.cell_center(pos), theme::LAST_MOVE_MARKER_RADIUS, theme::LAST_MOVE_MARKER);
        }
        self.draw_winning_line(&painter, scene.winning_line);

        if !scene.accepts_input {
            return None;
        }
        let pos = response.hover_pos().and_then(|p| self.screen_to_board(p))?;
        if !scene.board.is_empty(pos) {
            return None;
        }
        let preview = if scene.current_turn == PLAYER_ONE {
            scene.palette.player_one
        } else {
            scene.palette.player_two
        };
        painter.circle_filled(
            self.cell_center(pos),
            self.cell_size * theme::STONE_RADIUS_RATIO,
            preview.gamma_multiply(0.45),
        );
        response.clicked().then_some(pos)
    }

    fn layout(&mut self, rect: Rect, cells: usize) {
        self.board_rect = rect;
        self.cells = cells.max(1);
        self.cell_size = (rect.width() - 2.0 * theme::BOARD_MARGIN) / self.cells as f32;
    }

    fn grid_origin(&self) -> Pos2 {
        self.board_rect.min + Vec2::splat(theme::BOARD_MARGIN)
    }

    fn draw_grid(&self, painter: &Painter, colour: Color32) {
        let stroke = Stroke::new(theme::GRID_LINE_WIDTH, colour);
        let origin = self.grid_origin();
        let extent = self.cells as f32 * self.cell_size;

        for i in 0..=self.cells {
            let offset = i as f32 * self.cell_size;
            painter.line_segment(
                [origin + Vec2::new(offset, 0.0), origin + Vec2::new(offset, extent)],
                stroke,
            );
            painter.line_segment(
                [origin + Vec2::new(0.0, offset), origin + Vec2::new(extent, offset)],
                stroke,
            );
        }
    }

    fn draw_stone(&self, painter: &Painter, pos: Pos, cell: Cell, palette: &Palette) {
        let center = self.cell_center(pos);
        let radius = self.cell_size * theme::STONE_RADIUS_RATIO;

        painter.circle_filled(
            center + Vec2::new(1.5, 1.5),
            radius,
            Color32::from_rgba_unmultiplied(0, 0, 0, 50),
        );
        if cell == PLAYER_ONE {
            painter.circle_filled(center, radius, palette.player_one);
        } else {
            painter.circle_filled(center, radius, palette.player_two);
            painter.circle_stroke(center, radius, Stroke::new(1.5, palette.player_two_stroke));
        }
    }

    fn draw_winning_line(&self, painter: &Painter, line: &[Pos]) {
        let stroke = Stroke::new(4.0, theme::WIN_HIGHLIGHT);
        for pair in line.windows(2) {
            painter.line_segment([self.cell_center(pair[0]), self.cell_center(pair[1])], stroke);
        }
        for &pos in line {
            painter.circle_stroke(
                self.cell_center(pos),
                self.cell_size * theme::STONE_RADIUS_RATIO + 3.0,
                stroke,
            );
        }
    }

    /// Convert screen coordinates to the cell under them
    pub fn screen_to_board(&self, screen_pos: Pos2) -> Option<Pos> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let relative = screen_pos - self.grid_origin();
        let col = (relative.x / self.cell_size).floor();
        let row = (relative.y / self.cell_size).floor();
        let n = self.cells as f32;

        if (0.0..n).contains(&row) && (0.0..n).contains(&col) {
            Some(Pos::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Screen coordinates of the center of a cell
    pub fn cell_center(&self, pos: Pos) -> Pos2 {
        self.grid_origin()
            + Vec2::new(
                (f32::from(pos.col) + 0.5) * self.cell_size,
                (f32::from(pos.row) + 0.5) * self.cell_size,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(cells: usize) -> BoardView {
        let mut view = BoardView::default();
        let side = 2.0 * theme::BOARD_MARGIN + cells as f32 * 40.0;
        view.layout(Rect::from_min_size(Pos2::ZERO, Vec2::splat(side)), cells);
        view
    }

    #[test]
    fn test_cell_center_round_trip() {
        let view = view(12);
        for pos in [Pos::new(0, 0), Pos::new(6, 6), Pos::new(11, 3)] {
            assert_eq!(view.screen_to_board(view.cell_center(pos)), Some(pos));
        }
    }

    #[test]
    fn test_margin_is_outside_board() {
        let view = view(12);
        assert_eq!(view.screen_to_board(Pos2::new(5.0, 5.0)), None);
        let far = theme::BOARD_MARGIN + 12.0 * 40.0 + 1.0;
        assert_eq!(view.screen_to_board(Pos2::new(far, 50.0)), None);
    }
}
