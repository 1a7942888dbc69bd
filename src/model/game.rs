/// How a play page picks its next action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayMode {
    #[default]
    Manual,
    Auto,
}

impl PlayMode {
    pub fn title(self) -> &'static str {
        match self {
            PlayMode::Manual => "手動モード",
            PlayMode::Auto => "自動モード",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInfo {
    pub id: &'static str,
    /// Game file the backend loads on `/reset`.
    pub backend_id: &'static str,
    pub name: &'static str,
    pub difficulty: &'static str,
    pub description: &'static str,
    pub max_steps: u32,
}

pub const GAMES: &[GameInfo] = &[GameInfo {
    id: "treasure-hunt",
    backend_id: "simple_game",
    name: "Treasure Hunt",
    difficulty: "Medium",
    description:
        "Find the hidden treasure in a mysterious mansion filled with puzzles and secrets.",
    max_steps: 50,
}];

pub fn find_game(id: &str) -> Option<&'static GameInfo> {
    GAMES.iter().find(|g| g.id == id)
}

/* =========================
   Page handoff
   ========================= */

/// Values the landing page leaves behind for the play page.
///
/// Lives as long as the app window, never written to disk.
#[derive(Debug, Clone, Default)]
pub struct Handoff {
    selected_game: Option<String>,
    selected_mode: Option<PlayMode>,
}

impl Handoff {
    pub fn store(&mut self, game_id: &str, mode: PlayMode) {
        self.selected_game = Some(game_id.to_string());
        self.selected_mode = Some(mode);
    }

    pub fn selected_game(&self) -> Option<&str> {
        self.selected_game.as_deref()
    }

    pub fn selected_mode(&self) -> Option<PlayMode> {
        self.selected_mode
    }
}
