//! Main application for the caro GUI

use std::time::{Duration, Instant};

use eframe::egui;
use egui::{CentralPanel, Color32, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel};

use super::board_view::{BoardScene, BoardView};
use super::game_state::{EndReason, GameMode, GameResult, GameState, PLAYER_ONE, PLAYER_TWO};
use super::theme::{self, Theme};
use crate::{Cell, Difficulty, EngineConfig};

/// Main caro application
pub struct CaroApp {
    state: GameState,
    board_view: BoardView,
    theme: Theme,
    show_debug: bool,
}

impl CaroApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: EngineConfig) -> Self {
        Self::with_config(config)
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            state: GameState::new(GameMode::default(), config),
            board_view: BoardView::default(),
            theme: Theme::default(),
            show_debug: true,
        }
    }

    fn player_name(&self, side: Cell) -> &'static str {
        match (self.state.mode, side == PLAYER_ONE) {
            (GameMode::VsEngine { .. }, true) => "You (X)",
            (GameMode::VsEngine { .. }, false) => "Engine (O)",
            (GameMode::Hotseat, true) => "Player 1 (X)",
            (GameMode::Hotseat, false) => "Player 2 (O)",
        }
    }

    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    for difficulty in Difficulty::ALL {
                        if ui.button(format!("New Game ({difficulty})")).clicked() {
                            self.state.set_mode(GameMode::VsEngine { difficulty });
                            ui.close_menu();
                        }
                    }
                    if ui.button("New Game (two players)").clicked() {
                        self.state.set_mode(GameMode::Hotseat);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Undo").clicked() {
                        self.state.undo();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    for theme in Theme::ALL {
                        ui.radio_value(&mut self.theme, theme, theme.label());
                    }
                    ui.separator();
                    ui.checkbox(&mut self.show_debug, "Engine Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.state.mode.label());
                });
            });
        });
    }

    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(Color32::from_rgb(25, 27, 31)))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                ui.label(RichText::new("CARO").size(22.0).strong().color(theme::TEXT_PRIMARY));
                ui.add_space(12.0);

                self.render_turn_card(ui);
                ui.add_space(10.0);
                self.render_clock_card(ui);
                ui.add_space(10.0);
                self.render_actions_card(ui);

                if self.show_debug {
                    ui.add_space(10.0);
                    self.render_engine_card(ui);
                }

                if let Some(result) = self.state.game_over.clone() {
                    ui.add_space(10.0);
                    self.render_game_over_card(ui, &result);
                }

                if let Some(msg) = &self.state.message {
                    ui.add_space(10.0);
                    Self::card_frame().fill(Color32::from_rgb(80, 60, 30)).show(ui, |ui| {
                        ui.label(RichText::new(msg).size(11.0).color(theme::TEXT_PRIMARY));
                    });
                }
            });
    }

    fn card_frame() -> Frame {
        Frame::new()
            .fill(Color32::from_rgb(35, 38, 43))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(
                RichText::new(self.player_name(self.state.current_turn))
                    .size(18.0)
                    .strong()
                    .color(theme::TEXT_PRIMARY),
            );
            let (status, colour) = if self.state.is_ai_thinking() {
                ("Engine thinking...", theme::TIMER_WARNING)
            } else if self.state.game_over.is_some() {
                ("Game over", theme::WIN_HIGHLIGHT)
            } else {
                ("To move", theme::TIMER_NORMAL)
            };
            ui.label(RichText::new(status).size(12.0).color(colour));
        });
    }

    fn render_clock_card(&self, ui: &mut egui::Ui) {
        let now = Instant::now();
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("CLOCKS").size(10.0).color(theme::TEXT_MUTED));
            ui.add_space(6.0);
            for side in [PLAYER_ONE, PLAYER_TWO] {
                let left = self.state.clock.remaining(side, now);
                ui.horizontal(|ui| {
                    ui.label(RichText::new(self.player_name(side)).size(12.0).color(theme::TEXT_SECONDARY));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(format_clock(left)).size(20.0).strong().color(clock_colour(left)));
                    });
                });
            }
            if let Some(elapsed) = self.state.ai_thinking_elapsed() {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Searching {:.2}s", elapsed.as_secs_f32()))
                        .size(10.0)
                        .color(theme::TEXT_SECONDARY),
                );
            }
        });
    }

    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Undo (U)").clicked() {
                    self.state.undo();
                }
                if ui.button("New Game (N)").clicked() {
                    self.state.reset();
                }
            });
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Theme").size(11.0).color(theme::TEXT_SECONDARY));
                egui::ComboBox::from_id_salt("theme")
                    .selected_text(self.theme.label())
                    .show_ui(ui, |ui| {
                        for theme in Theme::ALL {
                            ui.selectable_value(&mut self.theme, theme, theme.label());
                        }
                    });
            });
            ui.add_space(6.0);
            ui.label(
                RichText::new(format!("Moves: {}", self.state.move_count()))
                    .size(11.0)
                    .color(theme::TEXT_SECONDARY),
            );
        });
    }

    fn render_engine_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ENGINE").size(10.0).color(theme::TEXT_MUTED));
            ui.add_space(6.0);

            let Some(result) = &self.state.last_ai_result else {
                ui.label(RichText::new("No engine move yet").size(10.0).color(theme::TEXT_MUTED));
                return;
            };
            ui.label(
                RichText::new(format!("{:?}", result.search_type))
                    .size(11.0)
                    .strong()
                    .color(theme::TIMER_NORMAL),
            );
            ui.label(
                RichText::new(format!(
                    "Score {}  depth {}  {}ms  {} nodes",
                    result.score, result.depth, result.time_ms, result.nodes
                ))
                .size(10.0)
                .color(theme::TEXT_SECONDARY),
            );
            if let Some(pos) = result.best_move {
                ui.label(RichText::new(format!("→ {pos}")).size(12.0).strong().color(theme::WIN_HIGHLIGHT));
            }
            if let Some(stats) = self.state.cache_stats() {
                ui.label(
                    RichText::new(format!("Cache {} / {}  hits {:.1}%", stats.size, stats.capacity, stats.hit_rate()))
                        .size(10.0)
                        .color(theme::TEXT_MUTED),
                );
            }
        });
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui, result: &GameResult) {
        let headline = match result.winner {
            Some(side) => format!("{} wins", self.player_name(side)),
            None => "Draw".to_string(),
        };
        let reason = match result.reason {
            EndReason::FiveInRow => "five in a row",
            EndReason::Timeout => "on time",
            EndReason::BoardFull => "board full",
        };

        Self::card_frame().fill(Color32::from_rgb(45, 80, 55)).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(headline).size(18.0).strong().color(theme::TEXT_PRIMARY));
                ui.label(RichText::new(reason).size(11.0).color(theme::TEXT_SECONDARY));
                ui.add_space(8.0);
                if ui.button("New Game").clicked() {
                    self.state.reset();
                }
            });
        });
    }

    fn render_board(&mut self, ctx: &Context) {
        let palette = self.theme.palette();
        CentralPanel::default().show(ctx, |ui| {
            let state = &self.state;
            let winning_line = state
                .game_over
                .as_ref()
                .map_or(&[][..], |r| r.winning_line.as_slice());
            let scene = BoardScene {
                board: &state.board,
                current_turn: state.current_turn,
                last_move: state.last_move,
                winning_line,
                accepts_input: state.game_over.is_none() && state.is_human_turn() && !state.is_ai_thinking(),
                palette,
            };

            if let Some(pos) = self.board_view.show(ui, &scene) {
                if let Err(msg) = self.state.try_place_stone(pos) {
                    self.state.message = Some(msg);
                }
            }
        });
    }

    fn handle_input(&mut self, ctx: &Context) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::D) {
                self.show_debug = !self.show_debug;
            }
            if i.key_pressed(egui::Key::U) {
                self.state.undo();
            }
            if i.key_pressed(egui::Key::N) {
                self.state.reset();
            }
        });
    }
}

fn format_clock(left: Duration) -> String {
    let secs = left.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn clock_colour(left: Duration) -> Color32 {
    match left.as_secs() {
        0..=19 => theme::TIMER_CRITICAL,
        20..=59 => theme::TIMER_WARNING,
        _ => theme::TIMER_NORMAL,
    }
}

impl eframe::App for CaroApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        self.state.check_ai_result();
        self.state.check_clock(Instant::now());

        if self.state.is_ai_turn() && !self.state.is_ai_thinking() && self.state.game_over.is_none() {
            self.state.start_ai_thinking();
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        if self.state.is_ai_thinking() {
            ctx.request_repaint();
        } else if self.state.game_over.is_none() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
