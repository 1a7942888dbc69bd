use eframe::egui;

use crate::model::turn::{TurnLog, TurnRecord};

use super::app::Theme;

pub fn draw_game_log(ui: &mut egui::Ui, log: &TurnLog, theme: &Theme, stick_to_bottom: bool) {
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .stick_to_bottom(stick_to_bottom)
        .show(ui, |ui| {
            if log.is_empty() {
                ui.label(egui::RichText::new("ゲームを読み込み中...").color(theme.muted));
                return;
            }

            for (i, record) in log.records().iter().enumerate() {
                ui.add_space(6.0);
                ui.push_id(record.id, |ui| draw_record(ui, i + 1, record, theme));
            }
        });
}

fn draw_record(ui: &mut egui::Ui, turn: usize, record: &TurnRecord, theme: &Theme) {
    egui::Frame::new()
        .fill(theme.card)
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(format!("#{turn}")).monospace().color(theme.muted));

                let action_color = if record.is_start() { theme.secondary } else { theme.primary };
                ui.label(
                    egui::RichText::new(format!("> {}", record.action_taken))
                        .monospace()
                        .strong()
                        .color(action_color),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(record.timestamp.format("%H:%M:%S").to_string())
                            .small()
                            .color(theme.muted),
                    );
                });
            });

            ui.label(egui::RichText::new(&record.observation).monospace());

            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!("スコア: {}", record.score))
                        .small()
                        .color(theme.secondary),
                );
                if record.reward != 0 {
                    let sign = if record.reward > 0 { "+" } else { "" };
                    ui.label(
                        egui::RichText::new(format!("報酬: {sign}{}", record.reward))
                            .small()
                            .color(theme.primary),
                    );
                }
                if record.done {
                    ui.label(
                        egui::RichText::new("★ GAME COMPLETE")
                            .small()
                            .strong()
                            .color(theme.secondary),
                    );
                }
            });
        });
}
