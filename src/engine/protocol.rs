use crate::engine::api_client::{ApiError, HealthResponse, NewSession, SessionHandle, StepResponse};
use crate::engine::resolver::{ResolvedAction, TurnContext};
use crate::model::game::PlayMode;

/// Requests from a play page to the engine thread.
///
/// `generation` is echoed back untouched so the page can drop answers that
/// belong to a session it has already reset away from.
pub enum EngineCommand {
    StartSession {
        generation: u64,
        game_id: String,
        probe_health: bool,
    },
    PlayTurn {
        generation: u64,
        session: SessionHandle,
        mode: PlayMode,
        context: TurnContext,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub action: String,
    pub step: StepResponse,
}

pub enum EngineResponse {
    Health {
        generation: u64,
        result: Result<HealthResponse, ApiError>,
    },
    SessionStarted {
        generation: u64,
        result: Result<NewSession, ApiError>,
    },
    /// Sent between resolution and the step request.
    ActionResolved {
        generation: u64,
        resolved: ResolvedAction,
    },
    TurnFinished {
        generation: u64,
        result: Result<TurnOutcome, ApiError>,
    },
}

impl EngineResponse {
    pub fn generation(&self) -> u64 {
        match self {
            EngineResponse::Health { generation, .. }
            | EngineResponse::SessionStarted { generation, .. }
            | EngineResponse::ActionResolved { generation, .. }
            | EngineResponse::TurnFinished { generation, .. } => *generation,
        }
    }
}
