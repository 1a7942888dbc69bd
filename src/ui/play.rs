use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;

use eframe::egui;
use tracing::error;

use crate::engine::api_client::HttpGameApi;
use crate::engine::config::ClientConfig;
use crate::engine::engine::Engine;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::game::{Handoff, PlayMode};
use crate::model::session::{Mount, SessionController};

use super::agent_panel::{draw_agent, draw_game_status, draw_thinking_log};
use super::app::Theme;
use super::game_log::draw_game_log;
use super::settings::{UiSettings, MAX_PANEL_WIDTH, MIN_PANEL_WIDTH};

pub const MAX_INPUT_CHARS: usize = 200;

/// Removes a plain Enter from this frame's input so the text box never sees
/// it. Shift+Enter stays in the queue and becomes a newline.
fn take_send_key(input: &mut egui::InputState) -> bool {
    if input.modifiers.shift {
        return false;
    }
    input.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
}

pub enum PlayAction {
    Back,
}

/// One play page: a controller plus the engine thread serving it.
pub struct PlayPage {
    controller: SessionController,
    cmd_tx: Sender<EngineCommand>,
    resp_rx: Receiver<EngineResponse>,
    input_text: String,
    should_auto_scroll: bool,
}

impl PlayPage {
    /// `Ok(None)` when the landing page left no selection behind.
    pub fn open(
        ctx: &egui::Context,
        mode: PlayMode,
        handoff: &Handoff,
        config: &ClientConfig,
    ) -> anyhow::Result<Option<Self>> {
        let mut controller = SessionController::new(mode);
        let first = match controller.mount(handoff, config) {
            Mount::Redirect => return Ok(None),
            Mount::Start(cmd) => cmd,
        };

        let api = HttpGameApi::new(config)?;
        let repaint = ctx.clone();
        let (cmd_tx, resp_rx) = Engine::spawn(Box::new(api), move || repaint.request_repaint());

        let page = Self {
            controller,
            cmd_tx,
            resp_rx,
            input_text: String::new(),
            should_auto_scroll: true,
        };
        page.send(first);
        Ok(Some(page))
    }

    fn send(&self, cmd: EngineCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            error!("engine thread is gone, command dropped");
        }
    }

    fn dispatch(&mut self, cmd: Option<EngineCommand>) {
        if let Some(cmd) = cmd {
            self.send(cmd);
        }
    }

    fn pump(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        while let Ok(resp) = self.resp_rx.try_recv() {
            self.controller.handle(resp, now);
            self.should_auto_scroll = true;
        }

        self.controller.tick(now);
        if let Some(at) = self.controller.next_deadline() {
            ctx.request_repaint_after(at.saturating_duration_since(now));
        }
    }

    fn reset(&mut self) {
        self.input_text.clear();
        let cmd = self.controller.reset();
        self.dispatch(cmd);
    }

    fn submit(&mut self) {
        let cmd = self.controller.submit(&self.input_text);
        if cmd.is_some() {
            self.input_text.clear();
        }
        self.dispatch(cmd);
    }

    pub fn draw(
        &mut self,
        ctx: &egui::Context,
        settings: &mut UiSettings,
        theme: &Theme,
    ) -> Option<PlayAction> {
        self.pump(ctx);

        let mut action = None;
        let mode = self.controller.mode();

        /* HEADER */
        egui::TopBottomPanel::top("play_header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("⬅").clicked() {
                    action = Some(PlayAction::Back);
                }
                ui.heading(egui::RichText::new(mode.title()).color(theme.primary));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⟲ RESET").clicked() {
                        self.reset();
                    }
                    if self.controller.is_done() {
                        ui.label(egui::RichText::new("完了!").strong().color(theme.secondary));
                    }
                    if mode == PlayMode::Manual {
                        ui.label(
                            egui::RichText::new(format!("スコア: {}", self.controller.log().current_score()))
                                .color(theme.secondary),
                        );
                    }
                    ui.label(
                        egui::RichText::new(format!("ターン: {}", self.controller.turn_count()))
                            .color(theme.primary),
                    );
                });
            });

            if mode == PlayMode::Auto {
                ui.add(
                    egui::ProgressBar::new(self.controller.progress()).text(format!(
                        "進捗 {} / {}",
                        self.controller.turn_count(),
                        self.controller.max_steps()
                    )),
                );
            }
            ui.add_space(4.0);
        });

        /* FOOTER */
        egui::TopBottomPanel::bottom("play_footer").show(ctx, |ui| {
            ui.add_space(6.0);
            match mode {
                PlayMode::Manual => self.draw_manual_input(ui, theme),
                PlayMode::Auto => self.draw_auto_controls(ui, theme),
            }
            ui.add_space(6.0);
        });

        /* AGENT PANEL */
        let panel = egui::SidePanel::right("agent_panel")
            .resizable(true)
            .default_width(settings.agent_panel_width)
            .width_range(MIN_PANEL_WIDTH..=MAX_PANEL_WIDTH)
            .show(ctx, |ui| {
                draw_agent(ui, &self.controller, theme);
                ui.add_space(8.0);
                match mode {
                    PlayMode::Manual => draw_game_status(ui, &self.controller, theme),
                    PlayMode::Auto => draw_thinking_log(ui, self.controller.thinking(), theme),
                }
            });
        settings.agent_panel_width = panel.response.rect.width();

        /* LOG */
        egui::CentralPanel::default().show(ctx, |ui| {
            draw_game_log(ui, self.controller.log(), theme, self.should_auto_scroll);
        });
        self.should_auto_scroll = false;

        action
    }

    fn draw_manual_input(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        let input_id = egui::Id::new("manual_input_box");
        let enabled = self.controller.can_play();

        if ui.input_mut(|i| i.consume_key(egui::Modifiers::CTRL, egui::Key::L)) {
            ui.memory_mut(|m| m.request_focus(input_id));
        }

        let focused = ui.memory(|m| m.has_focus(input_id));
        let mut send_now = focused && enabled && ui.input_mut(take_send_key);

        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                enabled,
                egui::TextEdit::multiline(&mut self.input_text)
                    .id(input_id)
                    .char_limit(MAX_INPUT_CHARS)
                    .desired_rows(2)
                    .desired_width(ui.available_width() - 80.0)
                    .hint_text("短文で指示してください（例：鍵を探して、ドアを開けて）"),
            );

            if (response.has_focus() || response.lost_focus())
                && ui.input(|i| i.key_pressed(egui::Key::Escape))
            {
                self.input_text.clear();
            }

            let can_send = enabled && !self.input_text.trim().is_empty();
            if ui.add_enabled(can_send, egui::Button::new("送信")).clicked() {
                send_now = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Enter: 送信 | Shift+Enter: 改行 | Esc: クリア | Ctrl+L: フォーカス")
                    .small()
                    .color(theme.muted),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{}/{}",
                        self.input_text.chars().count(),
                        MAX_INPUT_CHARS
                    ))
                    .small()
                    .color(theme.muted),
                );
            });
        });

        if send_now {
            self.submit();
            ui.memory_mut(|m| m.request_focus(input_id));
        }
    }

    fn draw_auto_controls(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        ui.horizontal(|ui| {
            if self.controller.gemini_configured() {
                ui.label(egui::RichText::new("✔ GEMINI AI有効化").color(theme.primary));
            } else if self.controller.session_initialized() {
                ui.label(egui::RichText::new("⚠ GEMINI API未設定").color(theme.secondary));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new("NEXTボタンをクリックして、AIに次の行動を決定させます")
                        .small()
                        .color(theme.muted),
                );

                let label = if self.controller.is_processing() {
                    "実行中..."
                } else if self.controller.is_done() {
                    "ゲーム完了"
                } else {
                    "[ NEXT ]"
                };
                let next = ui.add_enabled(
                    self.controller.can_play(),
                    egui::Button::new(egui::RichText::new(label).size(18.0).strong()),
                );
                if next.clicked() {
                    let cmd = self.controller.advance();
                    self.dispatch(cmd);
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_enter(modifiers: egui::Modifiers) -> (bool, bool) {
        let ctx = egui::Context::default();
        let mut raw = egui::RawInput::default();
        raw.modifiers = modifiers;
        raw.events.push(egui::Event::Key {
            key: egui::Key::Enter,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        });

        let mut sent = false;
        let mut still_queued = false;
        let _ = ctx.run(raw, |ctx| {
            sent = ctx.input_mut(take_send_key);
            still_queued = ctx.input(|i| i.key_pressed(egui::Key::Enter));
        });
        (sent, still_queued)
    }

    #[test]
    fn plain_enter_sends_and_is_consumed() {
        assert_eq!(press_enter(egui::Modifiers::NONE), (true, false));
    }

    #[test]
    fn shift_enter_is_left_for_the_text_box() {
        assert_eq!(press_enter(egui::Modifiers::SHIFT), (false, true));
    }
}
