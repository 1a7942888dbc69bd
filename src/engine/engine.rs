use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, warn};

use crate::engine::api_client::GameApi;
use crate::engine::protocol::{EngineCommand, EngineResponse, TurnOutcome};
use crate::engine::resolver::{ActionResolver, KeywordResolver, RemoteResolver};
use crate::model::game::PlayMode;

type Waker = Box<dyn Fn() + Send>;

/// Owns the backend connection and runs one command at a time, so at most
/// one request is ever in flight.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    api: Box<dyn GameApi>,
    keyword: KeywordResolver,
    remote: RemoteResolver,
    waker: Option<Waker>,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        api: Box<dyn GameApi>,
    ) -> Self {
        Self {
            rx,
            tx,
            api,
            keyword: KeywordResolver,
            remote: RemoteResolver,
            waker: None,
        }
    }

    /// Called after every response so an idle UI notices it.
    pub fn with_waker(mut self, waker: impl Fn() + Send + 'static) -> Self {
        self.waker = Some(Box::new(waker));
        self
    }

    /// Starts an engine on its own thread.
    pub fn spawn(
        api: Box<dyn GameApi>,
        waker: impl Fn() + Send + 'static,
    ) -> (Sender<EngineCommand>, Receiver<EngineResponse>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, api).with_waker(waker);
            engine.run();
        });

        (cmd_tx, resp_rx)
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            self.process(cmd);
        }
        debug!("engine command channel closed");
    }

    fn resolver(&self, mode: PlayMode) -> &dyn ActionResolver {
        match mode {
            PlayMode::Manual => &self.keyword,
            PlayMode::Auto => &self.remote,
        }
    }

    fn send(&self, resp: EngineResponse) {
        let _ = self.tx.send(resp);
        if let Some(wake) = &self.waker {
            wake();
        }
    }

    pub fn process(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::StartSession {
                generation,
                game_id,
                probe_health,
            } => {
                if probe_health {
                    let result = self.api.health_check();
                    match &result {
                        Ok(h) => debug!(status = %h.status, llm = ?h.gemini_configured, "health check"),
                        Err(e) => warn!(error = %e, "health check failed"),
                    }
                    self.send(EngineResponse::Health { generation, result });
                }

                let result = self.api.create_session(&game_id);
                match &result {
                    Ok(s) => info!(generation, game_id = %game_id, session_id = s.handle.id(), "session created"),
                    Err(e) => warn!(generation, game_id = %game_id, error = %e, "failed to create session"),
                }
                self.send(EngineResponse::SessionStarted { generation, result });
            }

            EngineCommand::PlayTurn {
                generation,
                session,
                mode,
                context,
            } => {
                let resolved = match self.resolver(mode).resolve(self.api.as_ref(), &session, &context) {
                    Ok(r) => r,
                    Err(e) => {
                        warn!(generation, error = %e, "could not resolve action");
                        self.send(EngineResponse::TurnFinished {
                            generation,
                            result: Err(e),
                        });
                        return;
                    }
                };

                let action = resolved.action.clone();
                self.send(EngineResponse::ActionResolved {
                    generation,
                    resolved,
                });

                let result = self
                    .api
                    .execute_action(&session, &action)
                    .map(|step| TurnOutcome {
                        action: action.clone(),
                        step,
                    });
                match &result {
                    Ok(o) => debug!(generation, action = %action, done = o.step.done, "step executed"),
                    Err(e) => warn!(generation, action = %action, error = %e, "step failed"),
                }
                self.send(EngineResponse::TurnFinished { generation, result });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::api_client::{ApiError, SessionHandle};
    use crate::engine::resolver::TurnContext;
    use crate::engine::test_support::{step, ScriptedApi};

    fn engine(api: &ScriptedApi) -> (Engine, Receiver<EngineResponse>) {
        let (_cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        (Engine::new(cmd_rx, resp_tx, Box::new(api.clone())), resp_rx)
    }

    fn turn(mode: PlayMode, input: &str) -> EngineCommand {
        EngineCommand::PlayTurn {
            generation: 3,
            session: SessionHandle::new("s-1"),
            mode,
            context: TurnContext {
                input: input.into(),
                ..TurnContext::default()
            },
        }
    }

    #[test]
    fn start_session_probes_health_first_when_asked() {
        let api = ScriptedApi::default().with_session("s-7", "Hello");
        let (mut engine, rx) = engine(&api);

        engine.process(EngineCommand::StartSession {
            generation: 1,
            game_id: "simple_game".into(),
            probe_health: true,
        });

        let responses: Vec<_> = rx.try_iter().collect();
        assert_eq!(responses.len(), 2);
        assert!(matches!(responses[0], EngineResponse::Health { generation: 1, .. }));
        match &responses[1] {
            EngineResponse::SessionStarted { generation, result } => {
                assert_eq!(*generation, 1);
                assert_eq!(result.as_ref().unwrap().handle.id(), "s-7");
            }
            _ => panic!("expected SessionStarted"),
        }
        assert_eq!(api.session_calls(), vec!["simple_game".to_string()]);
    }

    #[test]
    fn start_session_without_probe_skips_health() {
        let api = ScriptedApi::default();
        let (mut engine, rx) = engine(&api);

        engine.process(EngineCommand::StartSession {
            generation: 1,
            game_id: "g".into(),
            probe_health: false,
        });

        assert_eq!(api.health_calls(), 0);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn manual_turn_maps_keywords_then_steps() {
        let api = ScriptedApi::default().with_step(step("Cold room", 1, 1, false));
        let (mut engine, rx) = engine(&api);

        engine.process(turn(PlayMode::Manual, "北へ"));

        assert_eq!(api.step_calls(), vec![("s-1".to_string(), "go north".to_string())]);
        assert!(api.suggest_queries().is_empty());

        let responses: Vec<_> = rx.try_iter().collect();
        assert_eq!(responses.len(), 2);
        match &responses[1] {
            EngineResponse::TurnFinished { generation, result } => {
                assert_eq!(*generation, 3);
                let outcome = result.as_ref().unwrap();
                assert_eq!(outcome.action, "go north");
                assert_eq!(outcome.step.observation, "Cold room");
            }
            _ => panic!("expected TurnFinished"),
        }
    }

    #[test]
    fn auto_turn_executes_fallback_suggestion() {
        let api = ScriptedApi::default()
            .with_suggestion("take key", None, true)
            .with_step(step("Taken.", 5, 5, false));
        let (mut engine, rx) = engine(&api);

        engine.process(turn(PlayMode::Auto, ""));

        assert_eq!(api.step_calls(), vec![("s-1".to_string(), "take key".to_string())]);
        let responses: Vec<_> = rx.try_iter().collect();
        match &responses[0] {
            EngineResponse::ActionResolved { resolved, .. } => assert!(resolved.is_fallback),
            _ => panic!("expected ActionResolved"),
        }
        assert!(matches!(
            &responses[1],
            EngineResponse::TurnFinished { result: Ok(_), .. }
        ));
    }

    #[test]
    fn failed_suggestion_skips_the_step() {
        let api = ScriptedApi::default().with_suggestion_error(ApiError::Status {
            status: 502,
            message: "upstream down".into(),
        });
        let (mut engine, rx) = engine(&api);

        engine.process(turn(PlayMode::Auto, ""));

        assert!(api.step_calls().is_empty());
        let responses: Vec<_> = rx.try_iter().collect();
        assert_eq!(responses.len(), 1);
        match &responses[0] {
            EngineResponse::TurnFinished { result: Err(e), .. } => {
                assert_eq!(e.to_string(), "upstream down")
            }
            _ => panic!("expected failed TurnFinished"),
        }
    }

    #[test]
    fn spawned_engine_answers_and_wakes() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use std::time::{Duration, Instant};

        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let (tx, rx) = Engine::spawn(Box::new(ScriptedApi::default()), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tx.send(EngineCommand::StartSession {
            generation: 9,
            game_id: "g".into(),
            probe_health: false,
        })
        .unwrap();

        let resp = rx.recv_timeout(Duration::from_secs(5)).expect("response");
        assert_eq!(resp.generation(), 9);

        // The waker fires just after the send, on the worker thread.
        let deadline = Instant::now() + Duration::from_secs(5);
        while wakes.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(wakes.load(Ordering::SeqCst) >= 1);
    }
}
