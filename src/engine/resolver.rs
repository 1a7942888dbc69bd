use crate::engine::api_client::{ApiError, GameApi, SessionHandle, SuggestionQuery};

/// Everything a resolver may look at when picking the next command.
#[derive(Debug, Clone, Default)]
pub struct TurnContext {
    /// Free text typed by the player. Empty in auto mode.
    pub input: String,
    pub observation: String,
    pub available_actions: Vec<String>,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    pub action: String,
    /// Shown in the thinking trace only.
    pub reasoning: Option<String>,
    /// The backend could not reach its LLM and answered with a default.
    pub is_fallback: bool,
}

impl ResolvedAction {
    fn plain(action: String) -> Self {
        Self {
            action,
            reasoning: None,
            is_fallback: false,
        }
    }
}

pub trait ActionResolver: Send {
    fn resolve(
        &self,
        api: &dyn GameApi,
        session: &SessionHandle,
        ctx: &TurnContext,
    ) -> Result<ResolvedAction, ApiError>;
}

/* =========================
   Keyword resolver (manual)
   ========================= */

enum Cue {
    /// Any of the substrings.
    Any(&'static [&'static str]),
    /// Every substring.
    All(&'static [&'static str]),
}

impl Cue {
    fn matches(&self, text: &str) -> bool {
        match self {
            Cue::Any(words) => words.iter().any(|w| text.contains(w)),
            Cue::All(words) => words.iter().all(|w| text.contains(w)),
        }
    }
}

/// Checked top to bottom; the first hit wins.
const KEYWORD_RULES: &[(Cue, &str)] = &[
    (Cue::Any(&["北", "north"]), "go north"),
    (Cue::Any(&["南", "south"]), "go south"),
    (Cue::Any(&["東", "east"]), "go east"),
    (Cue::Any(&["西", "west"]), "go west"),
    (Cue::Any(&["開け", "open"]), "open door"),
    (Cue::Any(&["閉め", "close"]), "close door"),
    (Cue::All(&["鍵", "探"]), "examine room"),
    (Cue::Any(&["調べ", "examine"]), "examine room"),
    (Cue::Any(&["拾", "take"]), "take key"),
    (Cue::Any(&["インベントリ", "inventory"]), "inventory"),
];

/// Maps short free-text instructions onto canonical commands. Unknown
/// input is passed through trimmed but otherwise untouched.
pub fn map_user_input(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    KEYWORD_RULES
        .iter()
        .find(|(cue, _)| cue.matches(&lower))
        .map(|(_, command)| command.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordResolver;

impl ActionResolver for KeywordResolver {
    fn resolve(
        &self,
        _api: &dyn GameApi,
        _session: &SessionHandle,
        ctx: &TurnContext,
    ) -> Result<ResolvedAction, ApiError> {
        Ok(ResolvedAction::plain(map_user_input(&ctx.input)))
    }
}

/* =========================
   Remote resolver (auto)
   ========================= */

#[derive(Debug, Default, Clone, Copy)]
pub struct RemoteResolver;

impl ActionResolver for RemoteResolver {
    fn resolve(
        &self,
        api: &dyn GameApi,
        session: &SessionHandle,
        ctx: &TurnContext,
    ) -> Result<ResolvedAction, ApiError> {
        let instruction = ctx.input.trim();
        let query = SuggestionQuery {
            observation: ctx.observation.clone(),
            available_actions: ctx.available_actions.clone(),
            score: ctx.score,
            user_instruction: (!instruction.is_empty()).then(|| instruction.to_string()),
        };

        let suggestion = api.suggest_action(session, &query)?;

        Ok(ResolvedAction {
            action: suggestion.suggested_action,
            reasoning: suggestion.reasoning.filter(|r| !r.trim().is_empty()),
            is_fallback: suggestion.is_fallback,
        })
    }
}
