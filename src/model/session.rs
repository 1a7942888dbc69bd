use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::engine::api_client::{ApiError, SessionHandle};
use crate::engine::config::ClientConfig;
use crate::engine::protocol::{EngineCommand, EngineResponse, TurnOutcome};
use crate::engine::resolver::{ResolvedAction, TurnContext};
use crate::model::agent::{AgentState, ThinkingKind, ThinkingLog};
use crate::model::game::{find_game, Handoff, PlayMode};
use crate::model::turn::{TurnLog, TurnRecord};

/// How long the error mood is shown before falling back to idle.
pub const ERROR_RECOVERY: Duration = Duration::from_millis(3000);
/// How long the success mood is shown after a manual turn.
pub const SUCCESS_SETTLE: Duration = Duration::from_millis(2000);

const DEFAULT_MAX_STEPS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Initializing,
    Active,
    Done,
    Error,
}

pub enum Mount {
    /// No game was picked on the landing page.
    Redirect,
    Start(EngineCommand),
}

/// Lifecycle and turn gating for one play page.
///
/// Every input is an explicit method call that updates the state and hands
/// back whatever the engine thread should do next; nothing here touches the
/// network or the UI.
pub struct SessionController {
    mode: PlayMode,
    game_id: String,
    phase: SessionPhase,
    session: Option<SessionHandle>,
    generation: u64,
    is_processing: bool,

    log: TurnLog,
    thinking: ThinkingLog,

    agent_state: AgentState,
    mood_deadline: Option<(Instant, AgentState)>,
    last_action: String,
    pending_input: String,

    gemini_configured: bool,
    max_steps: u32,
}

impl SessionController {
    pub fn new(mode: PlayMode) -> Self {
        Self {
            mode,
            game_id: String::new(),
            phase: SessionPhase::Uninitialized,
            session: None,
            generation: 0,
            is_processing: false,
            log: TurnLog::default(),
            thinking: ThinkingLog::default(),
            agent_state: AgentState::Idle,
            mood_deadline: None,
            last_action: String::new(),
            pending_input: String::new(),
            gemini_configured: false,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Reads the landing page's selection and starts the first session.
    pub fn mount(&mut self, handoff: &Handoff, config: &ClientConfig) -> Mount {
        let Some(selected) = handoff.selected_game() else {
            debug!("no game selected, leaving play page");
            return Mount::Redirect;
        };

        self.game_id = config.backend_game_id(selected).to_string();
        self.max_steps = find_game(selected)
            .map(|g| g.max_steps)
            .unwrap_or(DEFAULT_MAX_STEPS);

        Mount::Start(self.initialize())
    }

    fn initialize(&mut self) -> EngineCommand {
        self.phase = SessionPhase::Initializing;
        self.session = None;
        info!(generation = self.generation, game_id = %self.game_id, "initializing game");

        EngineCommand::StartSession {
            generation: self.generation,
            game_id: self.game_id.clone(),
            probe_health: self.mode == PlayMode::Auto,
        }
    }

    /// Throws away the whole session and starts a fresh one. Answers still
    /// in flight for the old session are ignored when they arrive.
    pub fn reset(&mut self) -> Option<EngineCommand> {
        if self.phase == SessionPhase::Uninitialized {
            return None;
        }

        self.generation += 1;
        self.log.clear();
        self.thinking.clear();
        self.agent_state = AgentState::Idle;
        self.mood_deadline = None;
        self.last_action.clear();
        self.pending_input.clear();
        self.is_processing = false;

        Some(self.initialize())
    }

    pub fn require_session(&self) -> Result<&SessionHandle, ApiError> {
        self.session.as_ref().ok_or(ApiError::NoSession)
    }

    /// A turn may start only with a live session, nothing in flight and the
    /// game not finished.
    pub fn can_play(&self) -> bool {
        self.session_initialized() && !self.is_processing && !self.is_done()
    }

    /// Manual mode: send the player's text. Ignored when blank or gated.
    pub fn submit(&mut self, input: &str) -> Option<EngineCommand> {
        let input = input.trim();
        if input.is_empty() || !self.can_play() {
            return None;
        }

        let session = self.require_session().ok()?.clone();

        self.is_processing = true;
        self.set_mood(AgentState::Thinking);
        self.pending_input = input.to_string();

        Some(EngineCommand::PlayTurn {
            generation: self.generation,
            session,
            mode: self.mode,
            context: self.turn_context(input.to_string()),
        })
    }

    /// Auto mode: ask the backend for the next move and play it.
    pub fn advance(&mut self) -> Option<EngineCommand> {
        if !self.can_play() {
            debug!(
                processing = self.is_processing,
                done = self.is_done(),
                initialized = self.session_initialized(),
                "next turn blocked"
            );
            return None;
        }

        let session = self.require_session().ok()?.clone();

        self.is_processing = true;
        self.set_mood(AgentState::Auto);

        let context = self.turn_context(String::new());
        self.thinking.push(
            ThinkingKind::Observation,
            format!(
                "現在の状況を確認しています... スコア: {}, 選択肢: {}個",
                context.score,
                context.available_actions.len()
            ),
        );
        self.thinking
            .push(ThinkingKind::Thinking, "AIに最適な行動を問い合わせ中...");

        Some(EngineCommand::PlayTurn {
            generation: self.generation,
            session,
            mode: self.mode,
            context,
        })
    }

    fn turn_context(&self, input: String) -> TurnContext {
        TurnContext {
            input,
            observation: self.log.latest_observation().to_string(),
            available_actions: self.log.latest_actions().to_vec(),
            score: self.log.current_score(),
        }
    }

    /* =========================
       Engine responses
       ========================= */

    pub fn handle(&mut self, resp: EngineResponse, now: Instant) {
        if resp.generation() != self.generation {
            debug!(
                stale = resp.generation(),
                current = self.generation,
                "dropping response from a previous session"
            );
            return;
        }

        match resp {
            EngineResponse::Health { result, .. } => {
                if let Ok(health) = result {
                    self.gemini_configured = health.gemini_configured.unwrap_or(false);
                }
            }
            EngineResponse::SessionStarted { result, .. } => match result {
                Ok(started) => {
                    let initial = started.initial;
                    info!(
                        session_id = started.handle.id(),
                        done = initial.done,
                        current_step = ?initial.current_step,
                        max_steps = ?initial.max_steps,
                        "session ready"
                    );
                    self.session = Some(started.handle);
                    self.log.clear();
                    self.log.push(TurnRecord::start(
                        initial.observation,
                        initial.score,
                        initial.available_actions,
                    ));
                    self.phase = SessionPhase::Active;
                }
                Err(e) => {
                    warn!(error = %e, transport = e.is_transport(), "initialization failed");
                    self.phase = SessionPhase::Error;
                    self.session = None;
                    self.set_mood(AgentState::Error);
                    if self.mode == PlayMode::Auto {
                        self.thinking.push(
                            ThinkingKind::Result,
                            format!("エラーが発生しました: {e}"),
                        );
                    }
                }
            },
            EngineResponse::ActionResolved { resolved, .. } => self.on_resolved(resolved),
            EngineResponse::TurnFinished { result, .. } => {
                self.is_processing = false;
                self.pending_input.clear();
                match result {
                    Ok(outcome) => self.on_turn(outcome, now),
                    Err(e) => {
                        self.agent_state = AgentState::Error;
                        self.mood_deadline = Some((now + ERROR_RECOVERY, AgentState::Idle));
                        if self.mode == PlayMode::Auto {
                            self.thinking.push(
                                ThinkingKind::Result,
                                format!("エラーが発生しました: {e}"),
                            );
                        }
                    }
                }
            }
        }
    }

    fn on_resolved(&mut self, resolved: ResolvedAction) {
        self.last_action = resolved.action.clone();
        if self.mode != PlayMode::Auto {
            return;
        }

        self.gemini_configured = !resolved.is_fallback;
        if let Some(reasoning) = resolved.reasoning {
            self.thinking
                .push(ThinkingKind::Thinking, format!("💭 {reasoning}"));
        }
        let suffix = if resolved.is_fallback { " (フォールバック)" } else { "" };
        self.thinking.push(
            ThinkingKind::Action,
            format!("選択した行動: {}{suffix}", resolved.action),
        );
    }

    fn on_turn(&mut self, outcome: TurnOutcome, now: Instant) {
        let TurnOutcome { action, step } = outcome;
        let reward = step.reward.unwrap_or(0);
        let done = step.done;
        debug!(action = %action, reward, current_step = ?step.current_step, "turn recorded");

        if self.mode == PlayMode::Auto {
            let sign = if reward > 0 { "+" } else { "" };
            self.thinking.push(
                ThinkingKind::Result,
                format!("実行完了！ スコア: {} (報酬: {sign}{reward})", step.score),
            );
        }
        if let Some(max) = step.max_steps.filter(|m| *m > 0) {
            self.max_steps = max;
        }

        self.log.push(TurnRecord {
            id: uuid::Uuid::new_v4(),
            action_taken: action,
            observation: step.observation,
            score: step.score,
            reward,
            done,
            timestamp: chrono::Utc::now(),
            available_actions: step.available_actions,
        });

        if done {
            info!(turns = self.log.len(), score = self.log.current_score(), "game finished");
            self.phase = SessionPhase::Done;
        }

        match self.mode {
            PlayMode::Manual => {
                self.agent_state = AgentState::Success;
                self.mood_deadline = (!done).then_some((now + SUCCESS_SETTLE, AgentState::Idle));
            }
            PlayMode::Auto => self.set_mood(AgentState::Idle),
        }
    }

    /* =========================
       Timers
       ========================= */

    fn set_mood(&mut self, state: AgentState) {
        self.agent_state = state;
        self.mood_deadline = None;
    }

    /// Applies a pending mood change once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some((at, next)) = self.mood_deadline {
            if now >= at {
                self.agent_state = next;
                self.mood_deadline = None;
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.mood_deadline.map(|(at, _)| at)
    }

    /* =========================
       Read access
       ========================= */

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn session_initialized(&self) -> bool {
        matches!(self.phase, SessionPhase::Active | SessionPhase::Done)
    }

    pub fn is_done(&self) -> bool {
        self.phase == SessionPhase::Done
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn log(&self) -> &TurnLog {
        &self.log
    }

    pub fn thinking(&self) -> &ThinkingLog {
        &self.thinking
    }

    pub fn agent_state(&self) -> AgentState {
        self.agent_state
    }

    pub fn last_action(&self) -> &str {
        &self.last_action
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn gemini_configured(&self) -> bool {
        self.gemini_configured
    }

    pub fn turn_count(&self) -> usize {
        self.log.len()
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Share of the step budget used so far, capped at 1.
    pub fn progress(&self) -> f32 {
        if self.max_steps == 0 {
            return 1.0;
        }
        (self.log.len() as f32 / self.max_steps as f32).min(1.0)
    }
}
