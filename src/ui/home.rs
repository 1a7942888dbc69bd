use eframe::egui;

use crate::model::game::{PlayMode, GAMES};

use super::app::Theme;

pub struct HomeState {
    pub selected_game: &'static str,
    pub selected_mode: PlayMode,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            selected_game: GAMES[0].id,
            selected_mode: PlayMode::Manual,
        }
    }
}

pub enum HomeAction {
    Start,
    ShowInstructions,
}

pub fn draw_home(ctx: &egui::Context, state: &mut HomeState, theme: &Theme) -> Option<HomeAction> {
    let mut action = None;

    egui::TopBottomPanel::top("home_header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.heading(egui::RichText::new("🎮 TextWorld × LLM Adventure").color(theme.primary));
        ui.add_space(6.0);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(16.0);
                ui.heading(egui::RichText::new("◆ ADVENTURE ◆").strong().color(theme.primary));
                ui.label("LLM と一緒にテキストアドベンチャーを楽しもう");
            });

            ui.add_space(16.0);
            ui.label(egui::RichText::new("ゲームを選択").strong().color(theme.primary));

            for game in GAMES {
                let selected = state.selected_game == game.id;
                let response = egui::Frame::new()
                    .fill(theme.card)
                    .stroke(if selected {
                        egui::Stroke::new(2.0, theme.primary)
                    } else {
                        egui::Stroke::NONE
                    })
                    .inner_margin(egui::Margin::same(10))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(game.name).strong().color(theme.primary));
                            ui.label(egui::RichText::new(game.difficulty).small().color(theme.secondary));
                        });
                        ui.label(egui::RichText::new(game.description).small());
                        ui.label(
                            egui::RichText::new(format!("最大ステップ数: {}", game.max_steps))
                                .small()
                                .color(theme.muted),
                        );
                    })
                    .response
                    .interact(egui::Sense::click());

                if response.clicked() {
                    state.selected_game = game.id;
                }
            }

            ui.add_space(16.0);
            ui.label(egui::RichText::new("操作モードを選択").strong().color(theme.primary));
            ui.horizontal(|ui| {
                ui.selectable_value(&mut state.selected_mode, PlayMode::Manual, "👤 手動モード");
                ui.selectable_value(&mut state.selected_mode, PlayMode::Auto, "🤖 自動モード");
            });
            ui.label(
                egui::RichText::new(match state.selected_mode {
                    PlayMode::Manual => "あなたが短文で指示を出し、LLM が行動を決定します",
                    PlayMode::Auto => "AI が自動でゲームを進行します",
                })
                .small()
                .color(theme.muted),
            );

            ui.add_space(20.0);
            ui.vertical_centered(|ui| {
                if ui.button(egui::RichText::new("ゲーム開始").size(18.0)).clicked() {
                    action = Some(HomeAction::Start);
                }
                ui.add_space(8.0);
                if ui.link("操作説明を見る").clicked() {
                    action = Some(HomeAction::ShowInstructions);
                }
            });
        });
    });

    action
}
