//! Scripted backend used by engine and controller tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::engine::api_client::{
    ApiError, GameApi, HealthResponse, NewSession, ResetResponse, SessionHandle, StepResponse,
    SuggestionQuery, SuggestionResponse,
};

#[derive(Default)]
struct Script {
    sessions: VecDeque<Result<NewSession, ApiError>>,
    steps: VecDeque<Result<StepResponse, ApiError>>,
    suggestions: VecDeque<Result<SuggestionResponse, ApiError>>,
    health: Option<Result<HealthResponse, ApiError>>,

    created: usize,
    session_calls: Vec<String>,
    step_calls: Vec<(String, String)>,
    suggest_calls: Vec<SuggestionQuery>,
    health_calls: usize,
}

/// Answers from queued responses and records every call. Clones share state.
#[derive(Clone, Default)]
pub struct ScriptedApi {
    script: Arc<Mutex<Script>>,
}

pub fn step(observation: &str, score: i64, reward: i64, done: bool) -> StepResponse {
    StepResponse {
        observation: observation.to_string(),
        score,
        reward: Some(reward),
        done,
        available_actions: Some(vec!["look".into()]),
        current_step: None,
        max_steps: None,
    }
}

pub fn new_session(id: &str, observation: &str) -> NewSession {
    NewSession {
        handle: SessionHandle::new(id),
        initial: ResetResponse {
            session_id: id.to_string(),
            observation: observation.to_string(),
            score: 0,
            done: false,
            available_actions: Some(vec!["go north".into(), "look".into()]),
            current_step: Some(0),
            max_steps: Some(50),
        },
    }
}

impl ScriptedApi {
    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_session(self, id: &str, observation: &str) -> Self {
        self.lock().sessions.push_back(Ok(new_session(id, observation)));
        self
    }

    pub fn with_session_error(self, err: ApiError) -> Self {
        self.lock().sessions.push_back(Err(err));
        self
    }

    pub fn with_step(self, response: StepResponse) -> Self {
        self.lock().steps.push_back(Ok(response));
        self
    }

    pub fn with_step_error(self, err: ApiError) -> Self {
        self.lock().steps.push_back(Err(err));
        self
    }

    pub fn with_suggestion(self, action: &str, reasoning: Option<&str>, is_fallback: bool) -> Self {
        self.lock().suggestions.push_back(Ok(SuggestionResponse {
            suggested_action: action.to_string(),
            reasoning: reasoning.map(str::to_string),
            is_fallback,
        }));
        self
    }

    pub fn with_suggestion_error(self, err: ApiError) -> Self {
        self.lock().suggestions.push_back(Err(err));
        self
    }

    pub fn with_health(self, health: Result<HealthResponse, ApiError>) -> Self {
        self.lock().health = Some(health);
        self
    }

    pub fn total_calls(&self) -> usize {
        let s = self.lock();
        s.session_calls.len() + s.step_calls.len() + s.suggest_calls.len() + s.health_calls
    }

    pub fn session_calls(&self) -> Vec<String> {
        self.lock().session_calls.clone()
    }

    pub fn step_calls(&self) -> Vec<(String, String)> {
        self.lock().step_calls.clone()
    }

    pub fn suggest_queries(&self) -> Vec<SuggestionQuery> {
        self.lock().suggest_calls.clone()
    }

    pub fn health_calls(&self) -> usize {
        self.lock().health_calls
    }
}

impl GameApi for ScriptedApi {
    fn create_session(&self, game_id: &str) -> Result<NewSession, ApiError> {
        let mut s = self.lock();
        s.session_calls.push(game_id.to_string());
        s.created += 1;
        let fallback_id = format!("session-{}", s.created);
        s.sessions
            .pop_front()
            .unwrap_or_else(|| Ok(new_session(&fallback_id, "You wake up in a dusty hall.")))
    }

    fn execute_action(
        &self,
        session: &SessionHandle,
        action: &str,
    ) -> Result<StepResponse, ApiError> {
        let mut s = self.lock();
        s.step_calls
            .push((session.id().to_string(), action.to_string()));
        s.steps
            .pop_front()
            .unwrap_or_else(|| Ok(step("Nothing happens.", 0, 0, false)))
    }

    fn suggest_action(
        &self,
        _session: &SessionHandle,
        query: &SuggestionQuery,
    ) -> Result<SuggestionResponse, ApiError> {
        let mut s = self.lock();
        s.suggest_calls.push(query.clone());
        s.suggestions.pop_front().unwrap_or_else(|| {
            Ok(SuggestionResponse {
                suggested_action: "look".into(),
                reasoning: None,
                is_fallback: true,
            })
        })
    }

    fn health_check(&self) -> Result<HealthResponse, ApiError> {
        let mut s = self.lock();
        s.health_calls += 1;
        s.health.clone().unwrap_or_else(|| {
            Ok(HealthResponse {
                status: "ok".into(),
                gemini_configured: Some(false),
            })
        })
    }
}
