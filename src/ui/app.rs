use eframe::egui;
use tracing::{error, info};

use crate::engine::config::ClientConfig;
use crate::model::game::Handoff;
use crate::ui::home::{draw_home, HomeAction, HomeState};
use crate::ui::instructions::draw_instructions;
use crate::ui::play::{PlayAction, PlayPage};
use crate::ui::settings::UiSettings;
use crate::ui::settings_io::{load_settings, save_settings};

/* =========================
   Theme
   ========================= */

#[derive(Clone)]
pub struct Theme {
    pub primary: egui::Color32,
    pub secondary: egui::Color32,
    pub muted: egui::Color32,
    pub card: egui::Color32,
    pub error: egui::Color32,

    pub observation: egui::Color32,
    pub thinking: egui::Color32,
    pub action: egui::Color32,
    pub result: egui::Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: egui::Color32::from_rgb(80, 220, 120),
            secondary: egui::Color32::from_rgb(240, 190, 60),
            muted: egui::Color32::from_rgb(130, 140, 130),
            card: egui::Color32::from_rgb(22, 28, 24),
            error: egui::Color32::from_rgb(230, 90, 80),

            observation: egui::Color32::from_rgb(96, 165, 250),
            thinking: egui::Color32::from_rgb(250, 204, 21),
            action: egui::Color32::from_rgb(74, 222, 128),
            result: egui::Color32::from_rgb(192, 132, 252),
        }
    }
}

/* =========================
   Pages
   ========================= */

enum Page {
    Home,
    Instructions,
    Play(PlayPage),
}

/* =========================
   App
   ========================= */

pub struct AdventureApp {
    page: Page,
    home: HomeState,
    handoff: Handoff,
    config: ClientConfig,

    settings: UiSettings,
    saved_settings: UiSettings,
    theme: Theme,
    ui_error: Option<String>,
}

impl AdventureApp {
    pub fn new(config: ClientConfig) -> Self {
        let settings = load_settings();
        Self {
            page: Page::Home,
            home: HomeState::default(),
            handoff: Handoff::default(),
            config,
            saved_settings: settings.clone(),
            settings,
            theme: Theme::default(),
            ui_error: None,
        }
    }

    fn start_play(&mut self, ctx: &egui::Context) {
        self.handoff.store(self.home.selected_game, self.home.selected_mode);
        let mode = self.handoff.selected_mode().unwrap_or_default();
        info!(game = self.home.selected_game, ?mode, "starting play page");

        match PlayPage::open(ctx, mode, &self.handoff, &self.config) {
            Ok(Some(page)) => {
                self.ui_error = None;
                self.page = Page::Play(page);
            }
            Ok(None) => self.page = Page::Home,
            Err(e) => {
                error!(error = %e, "could not open play page");
                self.ui_error = Some(format!("ゲームを開始できませんでした: {e}"));
                self.page = Page::Home;
            }
        }
    }

    fn persist_settings(&mut self, ctx: &egui::Context) {
        let settling = ctx.input(|i| !i.pointer.any_down());
        if settling && self.settings != self.saved_settings {
            save_settings(&self.settings);
            self.saved_settings = self.settings.clone();
        }
    }
}

impl eframe::App for AdventureApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        let mut next_page = None;

        match &mut self.page {
            Page::Home => {
                if let Some(err) = &self.ui_error {
                    egui::TopBottomPanel::bottom("home_error").show(ctx, |ui| {
                        ui.colored_label(self.theme.error, err.as_str());
                    });
                }
                egui::TopBottomPanel::bottom("home_settings").show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("UI Scale");
                        ui.add(egui::Slider::new(&mut self.settings.ui_scale, 0.75..=2.0));
                    });
                });

                match draw_home(ctx, &mut self.home, &self.theme) {
                    Some(HomeAction::Start) => next_page = Some(PageRequest::Play),
                    Some(HomeAction::ShowInstructions) => next_page = Some(PageRequest::Instructions),
                    None => {}
                }
            }
            Page::Instructions => {
                if draw_instructions(ctx, &self.theme) {
                    next_page = Some(PageRequest::Home);
                }
            }
            Page::Play(play) => {
                if let Some(PlayAction::Back) = play.draw(ctx, &mut self.settings, &self.theme) {
                    next_page = Some(PageRequest::Home);
                }
            }
        }

        match next_page {
            Some(PageRequest::Home) => self.page = Page::Home,
            Some(PageRequest::Instructions) => self.page = Page::Instructions,
            Some(PageRequest::Play) => self.start_play(ctx),
            None => {}
        }

        self.persist_settings(ctx);
    }
}

enum PageRequest {
    Home,
    Instructions,
    Play,
}
