use serde::{Deserialize, Serialize};

pub const MIN_PANEL_WIDTH: f32 = 256.0;
pub const MAX_PANEL_WIDTH: f32 = 600.0;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,

    /// Width of the avatar / trace panel on the play pages.
    pub agent_panel_width: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            agent_panel_width: 320.0,
        }
    }
}

impl UiSettings {
    /// Pulls hand-edited or stale values back into usable ranges.
    pub fn sanitized(mut self) -> Self {
        if !self.ui_scale.is_finite() {
            self.ui_scale = 1.0;
        }
        self.ui_scale = self.ui_scale.clamp(0.75, 2.0);
        if !self.agent_panel_width.is_finite() {
            self.agent_panel_width = UiSettings::default().agent_panel_width;
        }
        self.agent_panel_width = self.agent_panel_width.clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH);
        self
    }
}
