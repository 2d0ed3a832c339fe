use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use panel_logging::{panel_debug, panel_warn};
use thiserror::Error;

use crate::{
    Backend, BackendError, BackendSettings, CallId, EngineEvent, ImageUpload, ReqwestBackend,
};

enum EngineCommand {
    Analyze {
        call_id: CallId,
        image: ImageUpload,
        question: String,
    },
    Recommend {
        call_id: CallId,
        task: String,
    },
    ListAgents,
    Health,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("could not build http client: {0}")]
    Client(#[from] BackendError),
}

/// Runs backend calls on a background tokio runtime. Commands go in through
/// the handle; completions come back as [`EngineEvent`]s, in completion order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> Result<Self, EngineError> {
        let backend = ReqwestBackend::new(settings)?;
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("askpanel-engine")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), command, event_tx).await;
                });
            }
            panel_debug!("engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn analyze(&self, call_id: CallId, image: ImageUpload, question: impl Into<String>) {
        self.send(EngineCommand::Analyze {
            call_id,
            image,
            question: question.into(),
        });
    }

    pub fn recommend(&self, call_id: CallId, task: impl Into<String>) {
        self.send(EngineCommand::Recommend {
            call_id,
            task: task.into(),
        });
    }

    pub fn load_agents(&self) {
        self.send(EngineCommand::ListAgents);
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::Health);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks up to `timeout` for the next completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            panel_warn!("engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    backend: &dyn Backend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Analyze {
            call_id,
            image,
            question,
        } => EngineEvent::AnalysisCompleted {
            call_id,
            result: backend.analyze_image(&image, &question).await,
        },
        EngineCommand::Recommend { call_id, task } => EngineEvent::RecommendationsCompleted {
            call_id,
            result: backend.recommend(&task).await,
        },
        EngineCommand::ListAgents => EngineEvent::AgentsLoaded(backend.list_agents().await),
        EngineCommand::Health => EngineEvent::HealthChecked(backend.health().await),
    };
    let _ = event_tx.send(event);
}
