//! askpanel engine: backend HTTP calls and effect execution.
mod backend;
mod engine;
mod settings;
mod types;
mod wire;

pub use backend::{Backend, ReqwestBackend};
pub use engine::{EngineError, EngineHandle};
pub use settings::{BackendSettings, DEFAULT_BACKEND_URL};
pub use types::{
    AgentDirectory, AgentInfo, AgentMatch, AnalyzeReply, BackendError, CallId, EngineEvent,
    FailureKind, HealthReport, ImageUpload, RecommendationSet,
};
