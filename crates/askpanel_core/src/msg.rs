use crate::{
    AgentCatalog, AnalysisReply, CallFailure, Recommendations, RequestTicket, SelectedImage,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Front end is up; loads the agent catalog the first time.
    Startup,
    /// User picked an image file.
    ImageSelected(SelectedImage),
    /// User removed the selected image.
    ImageCleared,
    /// User edited the question text.
    QuestionChanged(String),
    /// User asked for the image to be analyzed.
    AnalyzeClicked,
    /// Image QA backend call completed.
    AnalysisFinished {
        ticket: RequestTicket,
        outcome: Result<AnalysisReply, CallFailure>,
    },
    /// User chose "ask another question".
    ImageQaResetClicked,
    /// User edited the task description.
    TaskChanged(String),
    /// User asked for recommendations.
    RecommendClicked,
    /// Recommender backend call completed.
    RecommendationsFinished {
        ticket: RequestTicket,
        outcome: Result<Recommendations, CallFailure>,
    },
    /// User chose "try another task".
    RecommenderResetClicked,
    /// Agent catalog load completed; the error carries diagnostic text only.
    CatalogLoaded(Result<AgentCatalog, String>),
    /// Fallback for placeholder wiring.
    NoOp,
}
