use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Mood of the avatar shown next to the game log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentState {
    #[default]
    Idle,
    Thinking,
    Success,
    Error,
    Auto,
}

impl AgentState {
    pub fn message(self) -> &'static str {
        match self {
            AgentState::Idle => "準備OK。短文で誘導してね。",
            AgentState::Thinking => "考え中…",
            AgentState::Success => "実行しました！",
            AgentState::Error => "うまくいかなかった…言い換えてみて",
            AgentState::Auto => "自動進行中…",
        }
    }

    pub fn mood(self) -> &'static str {
        match self {
            AgentState::Idle => "😊",
            AgentState::Thinking => "🤔",
            AgentState::Success => "✨",
            AgentState::Error => "😅",
            AgentState::Auto => "🔄",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentState::Idle => "待機中",
            AgentState::Thinking => "思考中",
            AgentState::Success => "実行完了",
            AgentState::Error => "エラー",
            AgentState::Auto => "自動進行",
        }
    }

    pub fn ascii_art(self) -> &'static str {
        match self {
            AgentState::Thinking | AgentState::Auto => {
                "    ∩───∩\n   （ ◔   ◔ ）\n    ∪ ─── ∪\n      ∪   ∪"
            }
            AgentState::Success => "    ∩───∩\n   （ ◕   ◕ ）\n    ∪  ω  ∪\n      ∪   ∪",
            AgentState::Idle | AgentState::Error => {
                "    ∩───∩\n   （ ◕   ◕ ）\n    ∪ ─── ∪\n      ∪   ∪"
            }
        }
    }
}

/* =========================
   Thinking trace (auto mode)
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinkingKind {
    Observation,
    Thinking,
    Action,
    Result,
}

#[derive(Debug, Clone)]
pub struct ThinkingEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: ThinkingKind,
    pub message: String,
}

/// Operator-facing reasoning trace. Never read back for control decisions.
#[derive(Debug, Clone, Default)]
pub struct ThinkingLog {
    entries: Vec<ThinkingEntry>,
}

impl ThinkingLog {
    pub fn push(&mut self, kind: ThinkingKind, message: impl Into<String>) {
        self.entries.push(ThinkingEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[ThinkingEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
