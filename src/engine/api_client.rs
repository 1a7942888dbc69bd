use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::config::ClientConfig;

/* =========================
   Errors
   ========================= */

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Gameplay call attempted before any session was created. No request is sent.
    #[error("No active session")]
    NoSession,

    /// Backend answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Builds the error for a non-2xx response, preferring the body's
    /// `detail` string over the generic status message.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_owned))
            .filter(|d| !d.is_empty());

        ApiError::Status {
            status,
            message: detail.unwrap_or_else(|| format!("API Error ({status})")),
        }
    }

    pub fn is_transport(&self) -> bool {
        !matches!(self, ApiError::NoSession)
    }
}

/* =========================
   Wire types
   ========================= */

#[derive(Debug, Clone, Serialize)]
struct ResetRequest<'a> {
    game_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct StepRequest<'a> {
    session_id: &'a str,
    action: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct SuggestRequest<'a> {
    session_id: &'a str,
    observation: &'a str,
    available_actions: &'a [String],
    score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_instruction: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResetResponse {
    pub session_id: String,
    pub observation: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub available_actions: Option<Vec<String>>,
    #[serde(default)]
    pub current_step: Option<u32>,
    #[serde(default)]
    pub max_steps: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StepResponse {
    pub observation: String,
    #[serde(default)]
    pub score: i64,
    /// The backend sends `null` when a step carries no reward.
    #[serde(default)]
    pub reward: Option<i64>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub available_actions: Option<Vec<String>>,
    #[serde(default)]
    pub current_step: Option<u32>,
    #[serde(default)]
    pub max_steps: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuggestionResponse {
    pub suggested_action: String,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub is_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, rename = "gemini_api_configured")]
    pub gemini_configured: Option<bool>,
}

/// What the suggestion endpoint needs to know about the current turn.
#[derive(Debug, Clone, Default)]
pub struct SuggestionQuery {
    pub observation: String,
    pub available_actions: Vec<String>,
    pub score: i64,
    pub user_instruction: Option<String>,
}

/* =========================
   Session handle
   ========================= */

/// Proof that a backend session exists. Only obtainable from `create_session`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    id: String,
}

impl SessionHandle {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub handle: SessionHandle,
    pub initial: ResetResponse,
}

/* =========================
   Gateway
   ========================= */

/// The backend as seen by the engine thread. One request per call, no retries.
pub trait GameApi: Send {
    fn create_session(&self, game_id: &str) -> Result<NewSession, ApiError>;

    fn execute_action(&self, session: &SessionHandle, action: &str)
        -> Result<StepResponse, ApiError>;

    fn suggest_action(
        &self,
        session: &SessionHandle,
        query: &SuggestionQuery,
    ) -> Result<SuggestionResponse, ApiError>;

    fn health_check(&self) -> Result<HealthResponse, ApiError>;
}

pub struct HttpGameApi {
    client: Client,
    base_url: String,
}

impl HttpGameApi {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(endpoint, "POST");
        let result = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))
            .and_then(decode);

        if let Err(e) = &result {
            warn!(endpoint, error = %e, "API request failed");
        }
        result
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        debug!(endpoint, "GET");
        let result = self
            .client
            .get(self.url(endpoint))
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))
            .and_then(decode);

        if let Err(e) = &result {
            warn!(endpoint, error = %e, "API request failed");
        }
        result
    }
}

fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(ApiError::from_error_body(status.as_u16(), &body));
    }

    resp.json::<T>().map_err(|e| ApiError::Decode(e.to_string()))
}

impl GameApi for HttpGameApi {
    fn create_session(&self, game_id: &str) -> Result<NewSession, ApiError> {
        let initial: ResetResponse = self.post("/reset", &ResetRequest { game_id })?;

        Ok(NewSession {
            handle: SessionHandle::new(initial.session_id.clone()),
            initial,
        })
    }

    fn execute_action(
        &self,
        session: &SessionHandle,
        action: &str,
    ) -> Result<StepResponse, ApiError> {
        self.post(
            "/step",
            &StepRequest {
                session_id: session.id(),
                action,
            },
        )
    }

    fn suggest_action(
        &self,
        session: &SessionHandle,
        query: &SuggestionQuery,
    ) -> Result<SuggestionResponse, ApiError> {
        self.post(
            "/gemini/suggest-action",
            &SuggestRequest {
                session_id: session.id(),
                observation: &query.observation,
                available_actions: &query.available_actions,
                score: query.score,
                user_instruction: query.user_instruction.as_deref(),
            },
        )
    }

    fn health_check(&self) -> Result<HealthResponse, ApiError> {
        self.get("/healthz")
    }
}
