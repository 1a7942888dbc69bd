use eframe::egui;

use crate::model::agent::{AgentState, ThinkingKind, ThinkingLog};
use crate::model::session::SessionController;

use super::app::Theme;

/// Avatar card. In manual mode it echoes the pending input while thinking
/// and the resolved command after a success.
pub fn draw_agent(ui: &mut egui::Ui, controller: &SessionController, theme: &Theme) {
    let state = controller.agent_state();

    egui::Frame::new()
        .fill(theme.card)
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("AI AGENT").strong().color(theme.primary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(state.label()).small().color(mood_color(state, theme)));
                });
            });
            ui.separator();

            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(state.ascii_art()).monospace().color(theme.primary));
                ui.label(egui::RichText::new(state.mood()).size(22.0));
            });

            ui.add_space(4.0);
            ui.label(state.message());

            if state == AgentState::Thinking && !controller.pending_input().is_empty() {
                ui.label(
                    egui::RichText::new(format!("「{}」", controller.pending_input()))
                        .small()
                        .color(theme.muted),
                );
            }
            if state == AgentState::Success && !controller.last_action().is_empty() {
                ui.label(
                    egui::RichText::new(format!("→ {}", controller.last_action()))
                        .monospace()
                        .color(theme.secondary),
                );
            }
        });
}

pub fn draw_thinking_log(ui: &mut egui::Ui, thinking: &ThinkingLog, theme: &Theme) {
    ui.label(egui::RichText::new("思考ログ").strong().color(theme.primary));
    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("thinking_log")
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if thinking.entries().is_empty() {
                ui.label(
                    egui::RichText::new("NEXTを押すとAIの思考がここに表示されます")
                        .small()
                        .color(theme.muted),
                );
            }
            for entry in thinking.entries() {
                ui.push_id(entry.id, |ui| ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                            .small()
                            .color(theme.muted),
                    );
                    ui.label(
                        egui::RichText::new(&entry.message)
                            .small()
                            .color(kind_color(entry.kind, theme)),
                    );
                }));
            }
        });
}

pub fn draw_game_status(ui: &mut egui::Ui, controller: &SessionController, theme: &Theme) {
    let active = controller.session_initialized() && !controller.is_done();
    let status = if controller.is_processing() {
        "処理中..."
    } else if active {
        "アクティブ"
    } else {
        "待機中"
    };

    egui::Frame::new()
        .fill(theme.card)
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("GAME STATUS").strong().color(theme.primary));
            ui.separator();

            egui::Grid::new("game_status").num_columns(2).show(ui, |ui| {
                ui.label("ステータス:");
                ui.label(egui::RichText::new(status).strong().color(if active { theme.primary } else { theme.muted }));
                ui.end_row();

                ui.label("ターン数:");
                ui.label(egui::RichText::new(controller.turn_count().to_string()).strong());
                ui.end_row();

                ui.label("利用可能なアクション:");
                ui.label(egui::RichText::new(controller.log().latest_actions().len().to_string()).strong());
                ui.end_row();

                if !controller.log().is_empty() {
                    ui.label("現在のスコア:");
                    ui.label(
                        egui::RichText::new(controller.log().current_score().to_string())
                            .strong()
                            .color(theme.secondary),
                    );
                    ui.end_row();
                }
            });
        });
}

fn mood_color(state: AgentState, theme: &Theme) -> egui::Color32 {
    match state {
        AgentState::Error => theme.error,
        AgentState::Success => theme.secondary,
        _ => theme.primary,
    }
}

fn kind_color(kind: ThinkingKind, theme: &Theme) -> egui::Color32 {
    match kind {
        ThinkingKind::Observation => theme.observation,
        ThinkingKind::Thinking => theme.thinking,
        ThinkingKind::Action => theme.action,
        ThinkingKind::Result => theme.result,
    }
}
