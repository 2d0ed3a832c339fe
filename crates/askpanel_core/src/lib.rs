//! askpanel core: pure request/result state machines and view-model helpers.
mod controller;
mod effect;
mod msg;
mod outcome;
mod state;
mod update;
mod view_model;
mod view_state;

pub use controller::{ImageQaController, RecommenderController, SelectedImage};
pub use effect::Effect;
pub use msg::Msg;
pub use outcome::{
    AgentCatalog, AgentProfile, AnalysisReply, Answer, CallFailure, FailureMessages, RankedAgent,
    Recommendations, IMAGE_QA_MESSAGES, RECOMMENDER_MESSAGES,
};
pub use state::{AppState, CatalogState};
pub use update::update;
pub use view_model::{
    AgentRowView, AppViewModel, CatalogCardView, CatalogView, ImageQaView, ImageSummary,
    MatchLevel, RecommendationsView, RecommenderView, GENERAL_PURPOSE_REASON,
};
pub use view_state::{Phase, RequestTicket, ViewState};
